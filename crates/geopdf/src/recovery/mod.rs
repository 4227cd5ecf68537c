//! Metadata recovery for rasters the library driver cannot georeference.
//!
//! Strategies run strictly in order; the first one that produces a validated
//! [`GeoExtent`] wins and the rest are skipped.

mod byte_scan;
mod geotransform;
mod vector_extent;

pub use byte_scan::{scan_text, ByteScanStrategy};
pub use geotransform::GeoTransformStrategy;
pub use vector_extent::VectorExtentStrategy;

use std::path::Path;

use geopdf_common::GeoExtent;
use tracing::{debug, info};

use crate::config::ServiceConfig;
use crate::library::GeoLibrary;

/// A single way of recovering a document's geographic extent.
pub trait RecoveryStrategy: Send {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Attempt recovery. Every handle acquired is released before returning.
    fn recover(&self, library: &dyn GeoLibrary, path: &Path) -> Option<GeoExtent>;
}

/// Ordered list of recovery strategies.
pub struct MetadataRecoveryChain {
    strategies: Vec<Box<dyn RecoveryStrategy>>,
}

impl MetadataRecoveryChain {
    pub fn new(strategies: Vec<Box<dyn RecoveryStrategy>>) -> Self {
        Self { strategies }
    }

    /// Geotransform, then byte scan, then vector extent.
    pub fn standard(config: &ServiceConfig) -> Self {
        Self::new(vec![
            Box::new(GeoTransformStrategy),
            Box::new(ByteScanStrategy::new(config.scan_limit_bytes)),
            Box::new(VectorExtentStrategy),
        ])
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    pub fn recover(&self, library: &dyn GeoLibrary, path: &Path) -> Option<GeoExtent> {
        let recovered = self.strategies.iter().find_map(|strategy| {
            debug!(strategy = strategy.name(), path = %path.display(), "Trying metadata recovery");
            strategy
                .recover(library, path)
                .map(|extent| (strategy.name(), extent))
        });

        match recovered {
            Some((name, extent)) => {
                info!(
                    strategy = name,
                    path = %path.display(),
                    center_x = extent.center().x,
                    center_y = extent.center().y,
                    "Recovered geographic extent"
                );
                Some(extent)
            }
            None => {
                info!(path = %path.display(), "No metadata recovery strategy succeeded");
                None
            }
        }
    }
}
