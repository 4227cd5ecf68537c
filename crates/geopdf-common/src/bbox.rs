//! Bounding box, corner and extent types.

use serde::{Deserialize, Serialize};

use crate::crs::{is_valid_latitude, is_valid_longitude};

/// A longitude/latitude (or native x/y) coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LonLat {
    pub x: f64,
    pub y: f64,
}

impl LonLat {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Check that the pair is a valid WGS84 longitude/latitude.
    pub fn is_geographic(&self) -> bool {
        is_valid_longitude(self.x) && is_valid_latitude(self.y)
    }
}

/// An axis-aligned bounding box.
///
/// For geographic CRS (EPSG:4326), coordinates are in degrees.
/// For projected CRS, coordinates are in the CRS units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Create a new bounding box from corner coordinates.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Smallest box spanning two arbitrary points.
    pub fn spanning(a: LonLat, b: LonLat) -> Self {
        Self {
            min_x: a.x.min(b.x),
            min_y: a.y.min(b.y),
            max_x: a.x.max(b.x),
            max_y: a.y.max(b.y),
        }
    }

    /// Check that all four bounds are valid WGS84 longitude/latitude values.
    pub fn is_geographic(&self) -> bool {
        is_valid_longitude(self.min_x)
            && is_valid_longitude(self.max_x)
            && is_valid_latitude(self.min_y)
            && is_valid_latitude(self.max_y)
    }
}

/// Four corners of a raster footprint plus its center.
///
/// Coordinates are not validated: a primary render whose reprojection failed
/// carries native (possibly projected) coordinates here.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CornerSet {
    pub top_left: LonLat,
    pub top_right: LonLat,
    pub bottom_left: LonLat,
    pub bottom_right: LonLat,
    pub center: LonLat,
}

impl CornerSet {
    /// Build a corner set. The center is the mean of top-left and bottom-right.
    pub fn new(top_left: LonLat, top_right: LonLat, bottom_left: LonLat, bottom_right: LonLat) -> Self {
        let center = LonLat::new(
            (top_left.x + bottom_right.x) / 2.0,
            (top_left.y + bottom_right.y) / 2.0,
        );
        Self {
            top_left,
            top_right,
            bottom_left,
            bottom_right,
            center,
        }
    }

    /// Corners of an axis-aligned box (north up).
    pub fn from_bounds(bbox: &BoundingBox) -> Self {
        Self::new(
            LonLat::new(bbox.min_x, bbox.max_y),
            LonLat::new(bbox.max_x, bbox.max_y),
            LonLat::new(bbox.min_x, bbox.min_y),
            LonLat::new(bbox.max_x, bbox.min_y),
        )
    }

    /// All-zero corners, reported when no geocoding is available.
    pub fn zeroed() -> Self {
        Self::default()
    }

    fn points(&self) -> [LonLat; 5] {
        [
            self.top_left,
            self.top_right,
            self.bottom_left,
            self.bottom_right,
            self.center,
        ]
    }
}

/// A validated geographic footprint.
///
/// Every corner and the center lie within [-180,180] x [-90,90]. The only way
/// to obtain one is through the validating constructors, so an extent is either
/// fully valid or absent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct GeoExtent {
    corners: CornerSet,
}

impl GeoExtent {
    /// Validate an arbitrary corner set.
    pub fn from_corners(corners: CornerSet) -> Option<Self> {
        let all_finite = corners.points().iter().all(|p| p.x.is_finite() && p.y.is_finite());
        if all_finite && corners.points().iter().all(LonLat::is_geographic) {
            Some(Self { corners })
        } else {
            None
        }
    }

    /// Validate an axis-aligned box given as min/max longitude and latitude.
    pub fn from_bounds(bbox: &BoundingBox) -> Option<Self> {
        if bbox.min_x > bbox.max_x || bbox.min_y > bbox.max_y {
            return None;
        }
        Self::from_corners(CornerSet::from_bounds(bbox))
    }

    pub fn corners(&self) -> &CornerSet {
        &self.corners
    }

    pub fn top_left(&self) -> LonLat {
        self.corners.top_left
    }

    pub fn top_right(&self) -> LonLat {
        self.corners.top_right
    }

    pub fn bottom_left(&self) -> LonLat {
        self.corners.bottom_left
    }

    pub fn bottom_right(&self) -> LonLat {
        self.corners.bottom_right
    }

    pub fn center(&self) -> LonLat {
        self.corners.center
    }
}

impl From<GeoExtent> for CornerSet {
    fn from(extent: GeoExtent) -> Self {
        extent.corners
    }
}
