//! Synchronous operations over an owned library and page rasterizer.
//!
//! Every operation returns a [`ResponseEnvelope`]. Callers that need the
//! calls serialized and kept off their own thread go through
//! [`crate::service::GeoPdfService`].

use std::path::Path;

use geopdf_common::{
    DriverInfo, DriverList, GeoPdfError, GeoPdfInfo, GeoPdfResult, RenderResult,
    ResponseEnvelope, VersionInfo,
};
use tracing::{debug, info};

use crate::config::ServiceConfig;
use crate::library::GeoLibrary;
use crate::page::PageRasterizer;
use crate::probe::RasterProbe;
use crate::recovery::MetadataRecoveryChain;
use crate::registry::DriverRegistry;
use crate::selector::RenderSelector;

pub struct GeoPdfCore {
    library: Box<dyn GeoLibrary>,
    rasterizer: Box<dyn PageRasterizer>,
    registry: DriverRegistry,
    chain: MetadataRecoveryChain,
    config: ServiceConfig,
}

impl GeoPdfCore {
    pub fn new(
        library: Box<dyn GeoLibrary>,
        rasterizer: Box<dyn PageRasterizer>,
        config: ServiceConfig,
    ) -> Self {
        let chain = MetadataRecoveryChain::standard(&config);
        Self::with_chain(library, rasterizer, chain, config)
    }

    pub fn with_chain(
        library: Box<dyn GeoLibrary>,
        rasterizer: Box<dyn PageRasterizer>,
        chain: MetadataRecoveryChain,
        config: ServiceConfig,
    ) -> Self {
        info!(
            backend = library.backend_name(),
            rasterizer = rasterizer.backend_name(),
            strategies = ?chain.strategy_names(),
            fallback_scale = config.fallback_scale,
            "GeoPDF core initialized"
        );
        Self {
            library,
            rasterizer,
            registry: DriverRegistry::new(),
            chain,
            config,
        }
    }

    /// Check the backend and register drivers once.
    fn prepare(&self) -> GeoPdfResult<&dyn GeoLibrary> {
        let library: &dyn GeoLibrary = self.library.as_ref();
        if !library.is_available() {
            return Err(GeoPdfError::BackendUnavailable(format!(
                "{} backend not compiled in",
                library.backend_name()
            )));
        }
        self.registry.ensure_registered(library)?;
        Ok(library)
    }

    pub fn version_info(&self) -> ResponseEnvelope<VersionInfo> {
        let outcome = self.prepare().and_then(|library| {
            library
                .version_info()
                .map_err(|e| GeoPdfError::NativeLibrary(e.message))
        });
        ResponseEnvelope::from_result("Version info retrieved", outcome)
    }

    pub fn list_drivers(&self) -> ResponseEnvelope<DriverList> {
        let outcome = self.registered_drivers().and_then(|drivers| {
            if drivers.is_empty() {
                Err(GeoPdfError::DriverNotFound("no drivers registered".into()))
            } else {
                Ok(DriverList::from(drivers))
            }
        });
        ResponseEnvelope::from_result("Drivers listed", outcome)
    }

    pub fn find_driver(&self, short_name: &str) -> ResponseEnvelope<DriverInfo> {
        let outcome = self.registered_drivers().and_then(|drivers| {
            drivers
                .into_iter()
                .find(|d| d.short_name.eq_ignore_ascii_case(short_name))
                .ok_or_else(|| GeoPdfError::DriverNotFound(short_name.to_string()))
        });
        ResponseEnvelope::from_result("Driver found", outcome)
    }

    fn registered_drivers(&self) -> GeoPdfResult<Vec<DriverInfo>> {
        let library = self.prepare()?;
        library
            .drivers()
            .map_err(|e| GeoPdfError::NativeLibrary(e.message))
    }

    pub fn read_geopdf(&self, path: &Path) -> ResponseEnvelope<GeoPdfInfo> {
        debug!(path = %path.display(), "read_geopdf");
        let outcome = self
            .prepare()
            .and_then(|library| RasterProbe::new(library).open(path))
            .map(GeoPdfInfo::from);
        ResponseEnvelope::from_result("GeoPDF read", outcome)
    }

    pub fn render(&self, input: &Path, output: &Path) -> ResponseEnvelope<RenderResult> {
        debug!(input = %input.display(), output = %output.display(), "render_geopdf_to_png");
        let outcome = self.prepare().and_then(|library| {
            RenderSelector::new(library, self.rasterizer.as_ref(), &self.chain, &self.config)
                .render(input, output)
        });
        let message = match &outcome {
            Ok(result) => format!("Rendered with {}", result.rendered_with),
            Err(_) => String::new(),
        };
        ResponseEnvelope::from_result(message, outcome)
    }
}
