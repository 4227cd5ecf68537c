use std::path::Path;

use geopdf_common::dataset::native_corners;
use geopdf_common::GeoExtent;
use tracing::{debug, warn};

use super::RecoveryStrategy;
use crate::library::GeoLibrary;
use crate::probe::RasterProbe;
use crate::reproject::corners_to_wgs84;

/// Recovers the extent from the raster geotransform and projection.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeoTransformStrategy;

impl RecoveryStrategy for GeoTransformStrategy {
    fn name(&self) -> &'static str {
        "geotransform"
    }

    fn recover(&self, library: &dyn GeoLibrary, path: &Path) -> Option<GeoExtent> {
        let info = match RasterProbe::new(library).open(path) {
            Ok(info) => info,
            Err(e) => {
                debug!(error = %e, "Geotransform strategy: raster reopen failed");
                return None;
            }
        };

        let gt = info.geo_transform?;
        let projection = info.projection_text()?;

        let corners = native_corners(&gt, info.width, info.height);
        let corners = match corners_to_wgs84(library, projection, &corners) {
            Ok(corners) => corners,
            Err(e) => {
                warn!(error = %e, "Geotransform strategy: reprojection failed");
                return None;
            }
        };

        let extent = GeoExtent::from_corners(corners);
        if extent.is_none() {
            warn!("Geotransform strategy: corners out of geographic range");
        }
        extent
    }
}
