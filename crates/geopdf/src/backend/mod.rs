//! Concrete backends, selected by cargo features.

#[cfg(feature = "gdal")]
mod gdal_library;
#[cfg(feature = "pdfium")]
mod pdfium_pages;

#[cfg(feature = "gdal")]
pub use gdal_library::GdalLibrary;
#[cfg(feature = "pdfium")]
pub use pdfium_pages::PdfiumRasterizer;

use std::path::Path;

use geopdf_common::{DriverInfo, LibraryError, VersionInfo};

use crate::config::ServiceConfig;
use crate::library::{CoordinateTransform, GeoLibrary, RasterDataset, VectorDataset};
use crate::page::PageRasterizer;

/// Stand-in used when no geospatial backend was compiled in. Reports itself
/// unavailable, so every operation answers `CLASS_NOT_FOUND`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableLibrary;

impl UnavailableLibrary {
    fn unavailable<T>() -> Result<T, LibraryError> {
        Err(LibraryError::new("built without the `gdal` feature"))
    }
}

impl GeoLibrary for UnavailableLibrary {
    fn backend_name(&self) -> &'static str {
        "gdal"
    }

    fn is_available(&self) -> bool {
        false
    }

    fn register_drivers(&self) -> Result<usize, LibraryError> {
        Self::unavailable()
    }

    fn version_info(&self) -> Result<VersionInfo, LibraryError> {
        Self::unavailable()
    }

    fn drivers(&self) -> Result<Vec<DriverInfo>, LibraryError> {
        Self::unavailable()
    }

    fn open_raster<'a>(&'a self, _path: &Path) -> Result<Box<dyn RasterDataset + 'a>, LibraryError> {
        Self::unavailable()
    }

    fn open_vector<'a>(&'a self, _path: &Path) -> Result<Box<dyn VectorDataset + 'a>, LibraryError> {
        Self::unavailable()
    }

    fn transform_to_wgs84<'a>(
        &'a self,
        _source: &str,
    ) -> Result<Box<dyn CoordinateTransform + 'a>, LibraryError> {
        Self::unavailable()
    }
}

/// The geospatial library this build was compiled with.
pub fn default_library() -> Box<dyn GeoLibrary> {
    #[cfg(feature = "gdal")]
    {
        Box::new(GdalLibrary::new())
    }
    #[cfg(not(feature = "gdal"))]
    {
        Box::new(UnavailableLibrary)
    }
}

/// The page rasterizer this build was compiled with.
pub fn default_rasterizer(config: &ServiceConfig) -> Box<dyn PageRasterizer> {
    #[cfg(feature = "pdfium")]
    {
        Box::new(PdfiumRasterizer::new(config.pdfium_library_path.clone()))
    }
    #[cfg(not(feature = "pdfium"))]
    {
        let _ = config;
        Box::new(crate::page::UnavailableRasterizer)
    }
}
