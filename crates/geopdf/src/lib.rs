//! GeoPDF metadata extraction and rendering.
//!
//! Rasters are opened through a geospatial library. When the library's PDF
//! driver rejects a document's projection scheme, the first page is
//! rasterized instead and the geographic extent is recovered by an ordered
//! chain of strategies.

pub mod backend;
pub mod classifier;
pub mod config;
pub mod library;
pub mod operations;
pub mod page;
pub mod probe;
pub mod recovery;
pub mod registry;
pub mod reproject;
pub mod selector;
pub mod service;

pub use classifier::{classify, SchemeClass};
pub use config::{ConfigError, ServiceConfig};
pub use library::{CoordinateTransform, GeoLibrary, RasterDataset, VectorDataset, VectorLayer};
pub use operations::GeoPdfCore;
pub use page::{PageError, PageImage, PageRasterizer, UnavailableRasterizer};
pub use probe::RasterProbe;
pub use recovery::{MetadataRecoveryChain, RecoveryStrategy};
pub use registry::DriverRegistry;
pub use selector::RenderSelector;
pub use service::GeoPdfService;

pub use geopdf_common::{
    CornerSet, ErrorCode, GeoExtent, GeoPdfError, GeoPdfResult, LonLat, ResponseEnvelope,
};
