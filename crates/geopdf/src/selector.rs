//! Chooses between the library raster path and page rasterization.

use std::path::Path;

use geopdf_common::dataset::native_corners;
use geopdf_common::{
    CornerSet, GeoPdfError, GeoPdfResult, RasterInfo, RenderResult, RenderedWith,
};
use renderer::{compose_rgba, write_png, BandLayout};
use tracing::{info, warn};

use crate::classifier::{classify, SchemeClass};
use crate::config::ServiceConfig;
use crate::library::{GeoLibrary, RasterDataset};
use crate::page::PageRasterizer;
use crate::probe::RasterProbe;
use crate::recovery::MetadataRecoveryChain;
use crate::reproject::corners_to_wgs84;

pub struct RenderSelector<'a> {
    library: &'a dyn GeoLibrary,
    rasterizer: &'a dyn PageRasterizer,
    chain: &'a MetadataRecoveryChain,
    config: &'a ServiceConfig,
}

impl<'a> RenderSelector<'a> {
    pub fn new(
        library: &'a dyn GeoLibrary,
        rasterizer: &'a dyn PageRasterizer,
        chain: &'a MetadataRecoveryChain,
        config: &'a ServiceConfig,
    ) -> Self {
        Self {
            library,
            rasterizer,
            chain,
            config,
        }
    }

    /// Render `input` to a PNG at `output`.
    pub fn render(&self, input: &Path, output: &Path) -> GeoPdfResult<RenderResult> {
        let primary = RasterProbe::new(self.library)
            .open_with(input, |dataset, info| self.render_primary(dataset, info, output));

        let err = match primary {
            Ok(result) => return Ok(result),
            Err(err @ GeoPdfError::OpenFailed { .. }) => err,
            Err(err) => return Err(err),
        };

        let detail = err.detail().unwrap_or_default();
        match classify(detail) {
            SchemeClass::Other => Err(err.with_fallback_attempted(false)),
            SchemeClass::UnsupportedScheme => {
                info!(
                    path = %input.display(),
                    detail,
                    "Raster driver rejected projection scheme, using page fallback"
                );
                self.render_fallback(input, output)
                    .ok_or_else(|| err.with_fallback_attempted(true))
            }
        }
    }

    fn render_primary(
        &self,
        dataset: &dyn RasterDataset,
        info: RasterInfo,
        output: &Path,
    ) -> GeoPdfResult<RenderResult> {
        let layout = BandLayout::from_band_count(info.band_count)
            .ok_or(GeoPdfError::UnsupportedBandLayout(info.band_count))?;

        let bands = (1..=layout.bands_to_read())
            .map(|band| dataset.read_band_u8(band))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| GeoPdfError::render(format!("failed to read band: {}", e)))?;

        let pixels = compose_rgba(layout, &bands, info.width, info.height)
            .map_err(|e| GeoPdfError::render(e.to_string()))?;
        write_png(output, &pixels, info.width, info.height)
            .map_err(|e| GeoPdfError::render(e.to_string()))?;

        let (corners, metadata_extracted) = match info.geo_transform {
            Some(gt) => (self.primary_corners(&info, &gt), None),
            None => (CornerSet::zeroed(), Some(false)),
        };

        info!(
            output = %output.display(),
            width = info.width,
            height = info.height,
            bands = info.band_count,
            "Rendered with raster driver"
        );

        Ok(RenderResult {
            output_path: output.to_path_buf(),
            width: info.width,
            height: info.height,
            geo_transform: info.geo_transform,
            corners,
            rendered_with: RenderedWith::Primary,
            metadata_extracted,
        })
    }

    /// Corners in WGS84 where possible; native coordinates otherwise.
    fn primary_corners(&self, info: &RasterInfo, gt: &[f64; 6]) -> CornerSet {
        let native = native_corners(gt, info.width, info.height);
        let Some(projection) = info.projection_text() else {
            return native;
        };

        match corners_to_wgs84(self.library, projection, &native) {
            Ok(corners) => corners,
            Err(e) => {
                warn!(error = %e, "Reprojection to WGS84 failed, reporting native coordinates");
                native
            }
        }
    }

    /// Page rasterization with recovered geocoding. `None` when the page
    /// could not be rendered or written.
    fn render_fallback(&self, input: &Path, output: &Path) -> Option<RenderResult> {
        let extent = self.chain.recover(self.library, input);

        let page = match self
            .rasterizer
            .render_first_page(input, self.config.fallback_scale)
        {
            Ok(page) => page,
            Err(e) => {
                warn!(
                    backend = self.rasterizer.backend_name(),
                    error = %e,
                    "Page fallback failed"
                );
                return None;
            }
        };

        if let Err(e) = write_png(output, &page.rgba, page.width, page.height) {
            warn!(error = %e, "Page fallback could not be written");
            return None;
        }

        info!(
            output = %output.display(),
            width = page.width,
            height = page.height,
            metadata_extracted = extent.is_some(),
            "Rendered with page fallback"
        );

        Some(RenderResult {
            output_path: output.to_path_buf(),
            width: page.width,
            height: page.height,
            geo_transform: None,
            corners: extent.map(CornerSet::from).unwrap_or_else(CornerSet::zeroed),
            rendered_with: RenderedWith::Fallback,
            metadata_extracted: Some(extent.is_some()),
        })
    }
}
