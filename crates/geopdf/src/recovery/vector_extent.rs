use std::path::Path;

use geopdf_common::{names_wgs84_geographic, BoundingBox, GeoExtent, LonLat};
use tracing::debug;

use super::RecoveryStrategy;
use crate::library::{GeoLibrary, VectorLayer};
use crate::reproject::transform_points;

/// Recovers the extent from the document's vector layers.
#[derive(Debug, Clone, Copy, Default)]
pub struct VectorExtentStrategy;

impl VectorExtentStrategy {
    fn layer_extent(library: &dyn GeoLibrary, layer: &dyn VectorLayer) -> Option<GeoExtent> {
        let bounds = match layer.extent() {
            Ok(bounds) => bounds,
            Err(e) => {
                debug!(layer = %layer.name(), error = %e, "Vector extent: no layer extent");
                return None;
            }
        };

        if !bounds.is_geographic() {
            debug!(layer = %layer.name(), ?bounds, "Vector extent: bounds out of range");
            return None;
        }

        let srs = layer
            .spatial_ref_wkt()
            .filter(|wkt| !wkt.trim().is_empty());

        match srs {
            Some(wkt) if !names_wgs84_geographic(&wkt) => {
                let mut points = [
                    LonLat::new(bounds.min_x, bounds.min_y),
                    LonLat::new(bounds.max_x, bounds.max_y),
                ];
                if let Err(e) = transform_points(library, &wkt, &mut points) {
                    debug!(layer = %layer.name(), error = %e, "Vector extent: reprojection failed");
                    return None;
                }
                GeoExtent::from_bounds(&BoundingBox::spanning(points[0], points[1]))
            }
            _ => GeoExtent::from_bounds(&bounds),
        }
    }
}

impl RecoveryStrategy for VectorExtentStrategy {
    fn name(&self) -> &'static str {
        "vector-extent"
    }

    fn recover(&self, library: &dyn GeoLibrary, path: &Path) -> Option<GeoExtent> {
        let dataset = match library.open_vector(path) {
            Ok(dataset) => dataset,
            Err(e) => {
                debug!(error = %e, "Vector extent: open failed");
                return None;
            }
        };

        (0..dataset.layer_count()).find_map(|index| {
            let layer = match dataset.layer(index) {
                Ok(layer) => layer,
                Err(e) => {
                    debug!(index, error = %e, "Vector extent: layer unavailable");
                    return None;
                }
            };
            Self::layer_extent(library, layer.as_ref())
        })
    }
}
