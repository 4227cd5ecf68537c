//! Seams to the underlying geospatial library.
//!
//! Every dataset, layer and coordinate transform is handed out as an owned
//! boxed value whose `Drop` releases the native handle, so a handle cannot
//! outlive the scope that acquired it and is released on every exit path,
//! including unwinding.

use std::path::Path;

use geopdf_common::{BandInfo, BoundingBox, DriverInfo, GeoTransform, LibraryError, LonLat, VersionInfo};

/// Capabilities the binding needs from the geospatial library.
pub trait GeoLibrary {
    /// Short name of the backend, used in diagnostics.
    fn backend_name(&self) -> &'static str;

    /// Whether the backend was compiled in and can answer requests.
    fn is_available(&self) -> bool {
        true
    }

    /// Register all drivers. Safe to call repeatedly; returns the driver count.
    fn register_drivers(&self) -> Result<usize, LibraryError>;

    fn version_info(&self) -> Result<VersionInfo, LibraryError>;

    /// Registered drivers in registry order.
    fn drivers(&self) -> Result<Vec<DriverInfo>, LibraryError>;

    /// Open a file through the generic raster interface.
    fn open_raster<'a>(&'a self, path: &Path) -> Result<Box<dyn RasterDataset + 'a>, LibraryError>;

    /// Open a file through the generic vector interface.
    fn open_vector<'a>(&'a self, path: &Path) -> Result<Box<dyn VectorDataset + 'a>, LibraryError>;

    /// Create a transform from `source` (WKT, PROJ string or authority code)
    /// to WGS84 geographic degrees in longitude/latitude order.
    fn transform_to_wgs84<'a>(
        &'a self,
        source: &str,
    ) -> Result<Box<dyn CoordinateTransform + 'a>, LibraryError>;
}

/// An open raster dataset.
pub trait RasterDataset {
    /// (width, height) in pixels.
    fn raster_size(&self) -> (usize, usize);

    fn band_count(&self) -> usize;

    /// Raw geotransform, if the dataset reports one.
    fn geo_transform(&self) -> Option<GeoTransform>;

    /// Primary projection accessor. Empty when unknown.
    fn projection(&self) -> String;

    /// Secondary accessor: WKT of the dataset's spatial reference object.
    fn spatial_ref_wkt(&self) -> Option<String>;

    fn driver_name(&self) -> String;

    /// Describe a band (1-based).
    fn band_info(&self, band: usize) -> Result<BandInfo, LibraryError>;

    /// Read a full band (1-based) as unsigned 8-bit samples, row-major, top row first.
    fn read_band_u8(&self, band: usize) -> Result<Vec<u8>, LibraryError>;
}

/// An open vector dataset.
pub trait VectorDataset {
    fn layer_count(&self) -> usize;

    fn layer<'a>(&'a self, index: usize) -> Result<Box<dyn VectorLayer + 'a>, LibraryError>;
}

/// A layer of an open vector dataset.
pub trait VectorLayer {
    fn name(&self) -> String;

    fn spatial_ref_wkt(&self) -> Option<String>;

    /// Layer extent in the layer's own reference, computed if not cached.
    fn extent(&self) -> Result<BoundingBox, LibraryError>;
}

/// A coordinate transform into WGS84.
pub trait CoordinateTransform {
    /// Transform points in place.
    fn transform(&self, points: &mut [LonLat]) -> Result<(), LibraryError>;
}
