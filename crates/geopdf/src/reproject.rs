//! Corner reprojection into WGS84.

use geopdf_common::{names_wgs84_geographic, CornerSet, LibraryError, LonLat};

use crate::library::GeoLibrary;

/// Reproject a corner set from `projection` into WGS84 lon/lat.
///
/// Corners already in WGS84 geographic are returned unchanged. The center is
/// recomputed from the transformed corners.
pub fn corners_to_wgs84(
    library: &dyn GeoLibrary,
    projection: &str,
    corners: &CornerSet,
) -> Result<CornerSet, LibraryError> {
    if names_wgs84_geographic(projection) {
        return Ok(*corners);
    }

    let mut points = [
        corners.top_left,
        corners.top_right,
        corners.bottom_left,
        corners.bottom_right,
    ];
    transform_points(library, projection, &mut points)?;

    let [top_left, top_right, bottom_left, bottom_right] = points;
    Ok(CornerSet::new(top_left, top_right, bottom_left, bottom_right))
}

/// Transform points in place from `projection` into WGS84.
pub fn transform_points(
    library: &dyn GeoLibrary,
    projection: &str,
    points: &mut [LonLat],
) -> Result<(), LibraryError> {
    let transform = library.transform_to_wgs84(projection)?;
    transform.transform(points)?;

    if points.iter().any(|p| !(p.x.is_finite() && p.y.is_finite())) {
        return Err(LibraryError::new("transform produced non-finite coordinates"));
    }
    Ok(())
}
