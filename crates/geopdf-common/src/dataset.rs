//! Dataset descriptions and operation payloads.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::bbox::{CornerSet, LonLat};

/// Six-coefficient affine mapping from pixel (column, row) to reference coordinates:
/// `[origin_x, pixel_width, row_rotation, origin_y, column_rotation, pixel_height]`.
pub type GeoTransform = [f64; 6];

/// Treat an all-zero geotransform as absent.
pub fn non_zero_geo_transform(gt: GeoTransform) -> Option<GeoTransform> {
    if gt.iter().all(|c| *c == 0.0) {
        None
    } else {
        Some(gt)
    }
}

/// Apply a geotransform to a pixel position, ignoring rotation terms.
pub fn pixel_to_geo(gt: &GeoTransform, col: f64, row: f64) -> LonLat {
    LonLat::new(gt[0] + col * gt[1], gt[3] + row * gt[5])
}

/// Corner positions of a `width` x `height` raster in its native reference.
pub fn native_corners(gt: &GeoTransform, width: usize, height: usize) -> CornerSet {
    let (w, h) = (width as f64, height as f64);
    CornerSet::new(
        pixel_to_geo(gt, 0.0, 0.0),
        pixel_to_geo(gt, w, 0.0),
        pixel_to_geo(gt, 0.0, h),
        pixel_to_geo(gt, w, h),
    )
}

/// Per-band description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BandInfo {
    pub band_number: usize,
    pub data_type: String,
    pub block_width: usize,
    pub block_height: usize,
}

/// Metadata reported by a successful raster probe.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterInfo {
    pub width: usize,
    pub height: usize,
    pub band_count: usize,
    pub geo_transform: Option<GeoTransform>,
    pub projection: String,
    pub driver: String,
    pub bands: Vec<BandInfo>,
}

impl RasterInfo {
    /// Projection text, if the dataset reported any.
    pub fn projection_text(&self) -> Option<&str> {
        let trimmed = self.projection.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    }
}

/// Result of `read_geopdf`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoPdfInfo {
    pub width: usize,
    pub height: usize,
    pub band_count: usize,
    pub driver: String,
    pub projection: String,
    pub geo_transform: GeoTransform,
    pub bands: Vec<BandInfo>,
}

impl From<RasterInfo> for GeoPdfInfo {
    fn from(info: RasterInfo) -> Self {
        Self {
            width: info.width,
            height: info.height,
            band_count: info.band_count,
            driver: info.driver,
            projection: info.projection,
            geo_transform: info.geo_transform.unwrap_or([0.0; 6]),
            bands: info.bands,
        }
    }
}

/// Result of `get_version_info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionInfo {
    pub version: String,
    pub version_num: i64,
    pub release_date: String,
}

/// A registered driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverInfo {
    pub short_name: String,
    pub long_name: String,
}

/// Result of `list_drivers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverList {
    pub count: usize,
    pub drivers: Vec<DriverInfo>,
}

impl From<Vec<DriverInfo>> for DriverList {
    fn from(drivers: Vec<DriverInfo>) -> Self {
        Self {
            count: drivers.len(),
            drivers,
        }
    }
}

/// Which back end produced a rendered image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderedWith {
    /// Library raster driver.
    Primary,
    /// Page rasterization of the PDF.
    Fallback,
}

impl fmt::Display for RenderedWith {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderedWith::Primary => write!(f, "primary"),
            RenderedWith::Fallback => write!(f, "fallback"),
        }
    }
}

/// Result of `render_geopdf_to_png`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderResult {
    pub output_path: PathBuf,
    pub width: usize,
    pub height: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geo_transform: Option<GeoTransform>,
    #[serde(flatten)]
    pub corners: CornerSet,
    pub rendered_with: RenderedWith,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata_extracted: Option<bool>,
}
