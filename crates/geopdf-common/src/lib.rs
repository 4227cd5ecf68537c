//! Common types shared by the GeoPDF binding crates.

pub mod bbox;
pub mod crs;
pub mod dataset;
pub mod envelope;
pub mod error;

pub use bbox::{BoundingBox, CornerSet, GeoExtent, LonLat};
pub use crs::{names_wgs84_geographic, WGS84_EPSG};
pub use dataset::{
    BandInfo, DriverInfo, DriverList, GeoPdfInfo, GeoTransform, RasterInfo, RenderResult,
    RenderedWith, VersionInfo,
};
pub use envelope::ResponseEnvelope;
pub use error::{ErrorCode, GeoPdfError, GeoPdfResult, LibraryError};
