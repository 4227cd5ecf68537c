//! GDAL implementation of the library seams.

use std::path::Path;

use gdal::errors::GdalError;
use gdal::spatial_ref::{AxisMappingStrategy, CoordTransform, SpatialRef};
use gdal::vector::LayerAccess;
use gdal::{Dataset, DatasetOptions, DriverManager, GdalOpenFlags};
use geopdf_common::{BandInfo, BoundingBox, DriverInfo, GeoTransform, LibraryError, LonLat, VersionInfo};
use tracing::debug;

use crate::library::{CoordinateTransform, GeoLibrary, RasterDataset, VectorDataset, VectorLayer};

/// Copy a GDAL failure into a library diagnostic, keeping the CPL message
/// and error number verbatim.
fn diagnostic(err: GdalError) -> LibraryError {
    match err {
        GdalError::CplError { number, msg, .. } => LibraryError::with_type(msg, number),
        GdalError::NullPointer { msg, .. } => LibraryError::new(msg),
        other => LibraryError::new(other.to_string()),
    }
}

fn open_with_flags(path: &Path, open_flags: GdalOpenFlags) -> Result<Dataset, LibraryError> {
    Dataset::open_ex(
        path,
        DatasetOptions {
            open_flags,
            ..Default::default()
        },
    )
    .map_err(diagnostic)
}

fn srs_wkt(srs: &SpatialRef) -> Option<String> {
    srs.to_wkt().ok().filter(|wkt| !wkt.is_empty())
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GdalLibrary;

impl GdalLibrary {
    pub fn new() -> Self {
        Self
    }
}

impl GeoLibrary for GdalLibrary {
    fn backend_name(&self) -> &'static str {
        "gdal"
    }

    fn register_drivers(&self) -> Result<usize, LibraryError> {
        DriverManager::register_all();
        Ok(DriverManager::count())
    }

    fn version_info(&self) -> Result<VersionInfo, LibraryError> {
        let version_num = gdal::version::version_info("VERSION_NUM");
        Ok(VersionInfo {
            version: gdal::version::version_info("RELEASE_NAME"),
            version_num: version_num
                .trim()
                .parse()
                .map_err(|_| LibraryError::new(format!("unexpected VERSION_NUM '{}'", version_num)))?,
            release_date: gdal::version::version_info("RELEASE_DATE"),
        })
    }

    fn drivers(&self) -> Result<Vec<DriverInfo>, LibraryError> {
        (0..DriverManager::count())
            .map(|index| {
                DriverManager::get_driver(index)
                    .map(|driver| DriverInfo {
                        short_name: driver.short_name(),
                        long_name: driver.long_name(),
                    })
                    .map_err(diagnostic)
            })
            .collect()
    }

    fn open_raster<'a>(&'a self, path: &Path) -> Result<Box<dyn RasterDataset + 'a>, LibraryError> {
        let dataset = open_with_flags(path, GdalOpenFlags::GDAL_OF_RASTER)?;
        debug!(path = %path.display(), "GDAL raster dataset opened");
        Ok(Box::new(GdalRaster { dataset }))
    }

    fn open_vector<'a>(&'a self, path: &Path) -> Result<Box<dyn VectorDataset + 'a>, LibraryError> {
        let dataset = open_with_flags(path, GdalOpenFlags::GDAL_OF_VECTOR)?;
        debug!(path = %path.display(), "GDAL vector dataset opened");
        Ok(Box::new(GdalVector { dataset }))
    }

    fn transform_to_wgs84<'a>(
        &'a self,
        source: &str,
    ) -> Result<Box<dyn CoordinateTransform + 'a>, LibraryError> {
        let source = SpatialRef::from_definition(source).map_err(diagnostic)?;
        source.set_axis_mapping_strategy(AxisMappingStrategy::TraditionalGisOrder);
        let target = SpatialRef::from_epsg(geopdf_common::WGS84_EPSG).map_err(diagnostic)?;
        target.set_axis_mapping_strategy(AxisMappingStrategy::TraditionalGisOrder);

        let transform = CoordTransform::new(&source, &target).map_err(diagnostic)?;
        Ok(Box::new(GdalTransform { transform }))
    }
}

/// Raster dataset. Dropping it closes the GDAL handle.
struct GdalRaster {
    dataset: Dataset,
}

impl RasterDataset for GdalRaster {
    fn raster_size(&self) -> (usize, usize) {
        self.dataset.raster_size()
    }

    fn band_count(&self) -> usize {
        self.dataset.raster_count() as usize
    }

    fn geo_transform(&self) -> Option<GeoTransform> {
        self.dataset.geo_transform().ok()
    }

    fn projection(&self) -> String {
        self.dataset.projection()
    }

    fn spatial_ref_wkt(&self) -> Option<String> {
        self.dataset.spatial_ref().ok().as_ref().and_then(srs_wkt)
    }

    fn driver_name(&self) -> String {
        self.dataset.driver().short_name()
    }

    fn band_info(&self, band: usize) -> Result<BandInfo, LibraryError> {
        let raster_band = self.dataset.rasterband(band).map_err(diagnostic)?;
        let (block_width, block_height) = raster_band.block_size();
        Ok(BandInfo {
            band_number: band,
            data_type: raster_band.band_type().name(),
            block_width,
            block_height,
        })
    }

    fn read_band_u8(&self, band: usize) -> Result<Vec<u8>, LibraryError> {
        let raster_band = self.dataset.rasterband(band).map_err(diagnostic)?;
        let size = self.dataset.raster_size();
        let buffer = raster_band
            .read_as::<u8>((0, 0), size, size, None)
            .map_err(diagnostic)?;
        Ok(buffer.data().to_vec())
    }
}

/// Vector dataset. Dropping it closes the GDAL handle.
struct GdalVector {
    dataset: Dataset,
}

impl VectorDataset for GdalVector {
    fn layer_count(&self) -> usize {
        self.dataset.layer_count() as usize
    }

    fn layer<'a>(&'a self, index: usize) -> Result<Box<dyn VectorLayer + 'a>, LibraryError> {
        let layer = self.dataset.layer(index).map_err(diagnostic)?;
        Ok(Box::new(GdalLayer { layer }))
    }
}

struct GdalLayer<'a> {
    layer: gdal::vector::Layer<'a>,
}

impl VectorLayer for GdalLayer<'_> {
    fn name(&self) -> String {
        self.layer.name()
    }

    fn spatial_ref_wkt(&self) -> Option<String> {
        self.layer.spatial_ref().as_ref().and_then(srs_wkt)
    }

    fn extent(&self) -> Result<BoundingBox, LibraryError> {
        let envelope = self.layer.get_extent().map_err(diagnostic)?;
        Ok(BoundingBox::new(
            envelope.MinX,
            envelope.MinY,
            envelope.MaxX,
            envelope.MaxY,
        ))
    }
}

/// Transform into WGS84. Dropping it destroys the OGR transform.
struct GdalTransform {
    transform: CoordTransform,
}

impl CoordinateTransform for GdalTransform {
    fn transform(&self, points: &mut [LonLat]) -> Result<(), LibraryError> {
        let mut xs: Vec<f64> = points.iter().map(|p| p.x).collect();
        let mut ys: Vec<f64> = points.iter().map(|p| p.y).collect();
        let mut zs = vec![0.0; points.len()];

        self.transform
            .transform_coords(&mut xs, &mut ys, &mut zs)
            .map_err(diagnostic)?;

        for (point, (x, y)) in points.iter_mut().zip(xs.into_iter().zip(ys)) {
            *point = LonLat::new(x, y);
        }
        Ok(())
    }
}
