//! Raster probe: opens a file through the library's raster interface.

use std::io::ErrorKind;
use std::path::Path;

use geopdf_common::dataset::non_zero_geo_transform;
use geopdf_common::{GeoPdfError, GeoPdfResult, RasterInfo};
use tracing::debug;

use crate::library::{GeoLibrary, RasterDataset};

/// Validate that `path` names a readable, non-empty regular file.
pub fn check_input_file(path: &Path) -> GeoPdfResult<()> {
    let display = path.display().to_string();

    let metadata = match std::fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == ErrorKind::PermissionDenied => {
            return Err(GeoPdfError::PermissionDenied(display))
        }
        Err(_) => return Err(GeoPdfError::FileNotFound(display)),
    };

    if !metadata.is_file() {
        return Err(GeoPdfError::FileNotFound(display));
    }

    if metadata.len() == 0 {
        return Err(GeoPdfError::FileEmpty(display));
    }

    match std::fs::File::open(path) {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == ErrorKind::PermissionDenied => {
            Err(GeoPdfError::PermissionDenied(display))
        }
        Err(e) => Err(GeoPdfError::InternalError(format!("{}: {}", display, e))),
    }
}

/// Describe an open dataset.
pub fn describe(dataset: &dyn RasterDataset) -> GeoPdfResult<RasterInfo> {
    let (width, height) = dataset.raster_size();
    let band_count = dataset.band_count();

    let mut projection = dataset.projection();
    if projection.trim().is_empty() {
        projection = dataset.spatial_ref_wkt().unwrap_or_default();
    }

    let bands = (1..=band_count)
        .map(|band| dataset.band_info(band))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| GeoPdfError::InternalError(format!("failed to read band info: {}", e)))?;

    Ok(RasterInfo {
        width,
        height,
        band_count,
        geo_transform: dataset.geo_transform().and_then(non_zero_geo_transform),
        projection,
        driver: dataset.driver_name(),
        bands,
    })
}

/// Opens rasters and reports their metadata or a structured failure.
pub struct RasterProbe<'a> {
    library: &'a dyn GeoLibrary,
}

impl<'a> RasterProbe<'a> {
    pub fn new(library: &'a dyn GeoLibrary) -> Self {
        Self { library }
    }

    /// Open `path` and describe it. The dataset is closed before returning.
    pub fn open(&self, path: &Path) -> GeoPdfResult<RasterInfo> {
        self.open_with(path, |_, info| Ok(info))
    }

    /// Open `path` and lend the dataset to `f`. The dataset is closed when
    /// `f` returns or unwinds.
    pub fn open_with<T, F>(&self, path: &Path, f: F) -> GeoPdfResult<T>
    where
        F: FnOnce(&dyn RasterDataset, RasterInfo) -> GeoPdfResult<T>,
    {
        check_input_file(path)?;

        let dataset = self
            .library
            .open_raster(path)
            .map_err(|diagnostic| {
                debug!(path = %path.display(), error = %diagnostic, "Raster open failed");
                GeoPdfError::open_failed(path.display().to_string(), diagnostic)
            })?;

        let info = describe(dataset.as_ref())?;
        debug!(
            path = %path.display(),
            driver = %info.driver,
            width = info.width,
            height = info.height,
            bands = info.band_count,
            "Opened raster"
        );
        f(dataset.as_ref(), info)
    }
}
