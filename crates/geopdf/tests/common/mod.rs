//! Mock geospatial library and page rasterizer for integration tests.
//!
//! Every handle the mock hands out bumps a ledger counter when it is opened
//! and another when it is dropped, so tests can assert that nothing leaks.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use geopdf::{
    CoordinateTransform, GeoLibrary, PageError, PageImage, PageRasterizer, RasterDataset,
    VectorDataset, VectorLayer,
};
use geopdf_common::{
    BandInfo, BoundingBox, DriverInfo, GeoTransform, LibraryError, LonLat, VersionInfo,
};
use test_utils::fixtures::geo::{GT_WGS84_TENTH_DEGREE, WKT_WGS84};

// ============================================================================
// Ledger
// ============================================================================

#[derive(Debug, Default)]
pub struct Ledger {
    pub raster_opened: AtomicUsize,
    pub raster_closed: AtomicUsize,
    pub vector_opened: AtomicUsize,
    pub vector_closed: AtomicUsize,
    pub layer_opened: AtomicUsize,
    pub layer_closed: AtomicUsize,
    pub transform_opened: AtomicUsize,
    pub transform_closed: AtomicUsize,
    pub open_raster_calls: AtomicUsize,
    pub open_vector_calls: AtomicUsize,
    pub registrations: AtomicUsize,
}

fn bump(counter: &AtomicUsize) {
    counter.fetch_add(1, Ordering::SeqCst);
}

fn read(counter: &AtomicUsize) -> usize {
    counter.load(Ordering::SeqCst)
}

impl Ledger {
    pub fn rasters_opened(&self) -> usize {
        read(&self.raster_opened)
    }

    pub fn vectors_opened(&self) -> usize {
        read(&self.vector_opened)
    }

    pub fn transforms_opened(&self) -> usize {
        read(&self.transform_opened)
    }

    pub fn open_raster_calls(&self) -> usize {
        read(&self.open_raster_calls)
    }

    pub fn open_vector_calls(&self) -> usize {
        read(&self.open_vector_calls)
    }

    pub fn registrations(&self) -> usize {
        read(&self.registrations)
    }

    /// Every handle that was opened has been closed.
    pub fn is_balanced(&self) -> bool {
        read(&self.raster_opened) == read(&self.raster_closed)
            && read(&self.vector_opened) == read(&self.vector_closed)
            && read(&self.layer_opened) == read(&self.layer_closed)
            && read(&self.transform_opened) == read(&self.transform_closed)
    }
}

// ============================================================================
// Configurable behavior
// ============================================================================

#[derive(Debug, Clone)]
pub struct MockRaster {
    pub width: usize,
    pub height: usize,
    pub band_count: usize,
    pub geo_transform: Option<GeoTransform>,
    pub projection: String,
    pub spatial_ref_wkt: Option<String>,
    pub driver: String,
    pub panic_on_read: bool,
}

impl MockRaster {
    /// 100x100, 3-band WGS84 raster anchored at (-10, 20) with 0.1 degree pixels.
    pub fn wgs84_rgb() -> Self {
        Self {
            width: 100,
            height: 100,
            band_count: 3,
            geo_transform: Some(GT_WGS84_TENTH_DEGREE),
            projection: WKT_WGS84.to_string(),
            spatial_ref_wkt: Some(WKT_WGS84.to_string()),
            driver: "PDF".to_string(),
            panic_on_read: false,
        }
    }

    pub fn with_size(mut self, width: usize, height: usize) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_bands(mut self, band_count: usize) -> Self {
        self.band_count = band_count;
        self
    }

    pub fn with_geo_transform(mut self, gt: Option<GeoTransform>) -> Self {
        self.geo_transform = gt;
        self
    }

    pub fn with_projection(mut self, projection: &str) -> Self {
        self.projection = projection.to_string();
        self
    }

    pub fn with_spatial_ref(mut self, wkt: Option<&str>) -> Self {
        self.spatial_ref_wkt = wkt.map(str::to_string);
        self
    }

    pub fn panicking_on_read(mut self) -> Self {
        self.panic_on_read = true;
        self
    }
}

#[derive(Debug, Clone)]
pub enum RasterBehavior {
    Open(MockRaster),
    Fail(LibraryError),
    Panic,
}

#[derive(Debug, Clone)]
pub struct MockLayer {
    pub name: String,
    pub spatial_ref_wkt: Option<String>,
    pub extent: Option<BoundingBox>,
}

impl MockLayer {
    pub fn new(name: &str, spatial_ref_wkt: Option<&str>, extent: Option<BoundingBox>) -> Self {
        Self {
            name: name.to_string(),
            spatial_ref_wkt: spatial_ref_wkt.map(str::to_string),
            extent,
        }
    }
}

/// Maps source coordinates into WGS84. `None` makes transform creation fail.
pub type PointMapper = fn(LonLat) -> LonLat;

// ============================================================================
// MockLibrary
// ============================================================================

pub struct MockLibrary {
    pub ledger: Arc<Ledger>,
    raster: Mutex<RasterBehavior>,
    vector_layers: Option<Vec<MockLayer>>,
    transform: Option<PointMapper>,
    drivers: Vec<DriverInfo>,
    fail_registration: AtomicBool,
    available: bool,
}

impl MockLibrary {
    pub fn new(raster: RasterBehavior) -> Self {
        Self {
            ledger: Arc::new(Ledger::default()),
            raster: Mutex::new(raster),
            vector_layers: None,
            transform: None,
            drivers: vec![
                DriverInfo {
                    short_name: "GTiff".into(),
                    long_name: "GeoTIFF".into(),
                },
                DriverInfo {
                    short_name: "PDF".into(),
                    long_name: "Geospatial PDF".into(),
                },
            ],
            fail_registration: AtomicBool::new(false),
            available: true,
        }
    }

    pub fn opening(raster: MockRaster) -> Self {
        Self::new(RasterBehavior::Open(raster))
    }

    pub fn failing(message: &str) -> Self {
        Self::new(RasterBehavior::Fail(LibraryError::with_type(message, 1)))
    }

    pub fn with_vector_layers(mut self, layers: Vec<MockLayer>) -> Self {
        self.vector_layers = Some(layers);
        self
    }

    pub fn with_transform(mut self, mapper: PointMapper) -> Self {
        self.transform = Some(mapper);
        self
    }

    pub fn with_drivers(mut self, drivers: Vec<DriverInfo>) -> Self {
        self.drivers = drivers;
        self
    }

    pub fn with_failing_registration(self) -> Self {
        self.fail_registration.store(true, Ordering::SeqCst);
        self
    }

    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }

    pub fn set_registration_fails(&self, fails: bool) {
        self.fail_registration.store(fails, Ordering::SeqCst);
    }

    pub fn set_raster(&self, raster: RasterBehavior) {
        if let Ok(mut behavior) = self.raster.lock() {
            *behavior = raster;
        }
    }
}

impl GeoLibrary for MockLibrary {
    fn backend_name(&self) -> &'static str {
        "mock"
    }

    fn is_available(&self) -> bool {
        self.available
    }

    fn register_drivers(&self) -> Result<usize, LibraryError> {
        bump(&self.ledger.registrations);
        if self.fail_registration.load(Ordering::SeqCst) {
            return Err(LibraryError::new("driver registration failed"));
        }
        Ok(self.drivers.len())
    }

    fn version_info(&self) -> Result<VersionInfo, LibraryError> {
        Ok(VersionInfo {
            version: "3.8.4".into(),
            version_num: 3_080_400,
            release_date: "20240208".into(),
        })
    }

    fn drivers(&self) -> Result<Vec<DriverInfo>, LibraryError> {
        Ok(self.drivers.clone())
    }

    fn open_raster<'a>(&'a self, _path: &Path) -> Result<Box<dyn RasterDataset + 'a>, LibraryError> {
        bump(&self.ledger.open_raster_calls);
        let behavior = self
            .raster
            .lock()
            .map(|b| b.clone())
            .map_err(|_| LibraryError::new("mock poisoned"))?;
        match behavior {
            RasterBehavior::Open(data) => {
                bump(&self.ledger.raster_opened);
                Ok(Box::new(MockRasterHandle {
                    data,
                    ledger: Arc::clone(&self.ledger),
                }))
            }
            RasterBehavior::Fail(err) => Err(err),
            RasterBehavior::Panic => panic!("mock raster driver crashed"),
        }
    }

    fn open_vector<'a>(&'a self, _path: &Path) -> Result<Box<dyn VectorDataset + 'a>, LibraryError> {
        bump(&self.ledger.open_vector_calls);
        match &self.vector_layers {
            Some(layers) => {
                bump(&self.ledger.vector_opened);
                Ok(Box::new(MockVectorHandle {
                    layers: layers.clone(),
                    ledger: Arc::clone(&self.ledger),
                }))
            }
            None => Err(LibraryError::new("not recognized as a supported vector format")),
        }
    }

    fn transform_to_wgs84<'a>(
        &'a self,
        _source: &str,
    ) -> Result<Box<dyn CoordinateTransform + 'a>, LibraryError> {
        match self.transform {
            Some(mapper) => {
                bump(&self.ledger.transform_opened);
                Ok(Box::new(MockTransformHandle {
                    mapper,
                    ledger: Arc::clone(&self.ledger),
                }))
            }
            None => Err(LibraryError::new("cannot create coordinate transformation")),
        }
    }
}

// ============================================================================
// Handles
// ============================================================================

struct MockRasterHandle {
    data: MockRaster,
    ledger: Arc<Ledger>,
}

impl Drop for MockRasterHandle {
    fn drop(&mut self) {
        bump(&self.ledger.raster_closed);
    }
}

impl RasterDataset for MockRasterHandle {
    fn raster_size(&self) -> (usize, usize) {
        (self.data.width, self.data.height)
    }

    fn band_count(&self) -> usize {
        self.data.band_count
    }

    fn geo_transform(&self) -> Option<GeoTransform> {
        self.data.geo_transform
    }

    fn projection(&self) -> String {
        self.data.projection.clone()
    }

    fn spatial_ref_wkt(&self) -> Option<String> {
        self.data.spatial_ref_wkt.clone()
    }

    fn driver_name(&self) -> String {
        self.data.driver.clone()
    }

    fn band_info(&self, band: usize) -> Result<BandInfo, LibraryError> {
        if band == 0 || band > self.data.band_count {
            return Err(LibraryError::new(format!("band {} out of range", band)));
        }
        Ok(BandInfo {
            band_number: band,
            data_type: "Byte".into(),
            block_width: self.data.width,
            block_height: 1,
        })
    }

    fn read_band_u8(&self, band: usize) -> Result<Vec<u8>, LibraryError> {
        if self.data.panic_on_read {
            panic!("mock band read crashed");
        }
        if band == 0 || band > self.data.band_count {
            return Err(LibraryError::new(format!("band {} out of range", band)));
        }
        let value = (band * 10).min(255) as u8;
        Ok(vec![value; self.data.width * self.data.height])
    }
}

struct MockVectorHandle {
    layers: Vec<MockLayer>,
    ledger: Arc<Ledger>,
}

impl Drop for MockVectorHandle {
    fn drop(&mut self) {
        bump(&self.ledger.vector_closed);
    }
}

impl VectorDataset for MockVectorHandle {
    fn layer_count(&self) -> usize {
        self.layers.len()
    }

    fn layer<'a>(&'a self, index: usize) -> Result<Box<dyn VectorLayer + 'a>, LibraryError> {
        let data = self
            .layers
            .get(index)
            .ok_or_else(|| LibraryError::new(format!("layer {} out of range", index)))?;
        bump(&self.ledger.layer_opened);
        Ok(Box::new(MockLayerHandle {
            data,
            ledger: Arc::clone(&self.ledger),
        }))
    }
}

struct MockLayerHandle<'a> {
    data: &'a MockLayer,
    ledger: Arc<Ledger>,
}

impl Drop for MockLayerHandle<'_> {
    fn drop(&mut self) {
        bump(&self.ledger.layer_closed);
    }
}

impl VectorLayer for MockLayerHandle<'_> {
    fn name(&self) -> String {
        self.data.name.clone()
    }

    fn spatial_ref_wkt(&self) -> Option<String> {
        self.data.spatial_ref_wkt.clone()
    }

    fn extent(&self) -> Result<BoundingBox, LibraryError> {
        self.data
            .extent
            .ok_or_else(|| LibraryError::new("layer has no extent"))
    }
}

struct MockTransformHandle {
    mapper: PointMapper,
    ledger: Arc<Ledger>,
}

impl Drop for MockTransformHandle {
    fn drop(&mut self) {
        bump(&self.ledger.transform_closed);
    }
}

impl CoordinateTransform for MockTransformHandle {
    fn transform(&self, points: &mut [LonLat]) -> Result<(), LibraryError> {
        for point in points.iter_mut() {
            *point = (self.mapper)(*point);
        }
        Ok(())
    }
}

/// UTM-like meters to degrees: divide by 100 000.
pub fn meters_to_degrees(p: LonLat) -> LonLat {
    LonLat::new(p.x / 100_000.0, p.y / 100_000.0)
}

// ============================================================================
// MockRasterizer
// ============================================================================

#[derive(Debug, Clone)]
pub struct MockRasterizer {
    page: Option<(usize, usize)>,
    pub calls: Arc<AtomicUsize>,
    pub last_scale: Arc<Mutex<Option<f32>>>,
}

impl MockRasterizer {
    /// Renders a white page of `width` x `height` pixels.
    pub fn rendering(width: usize, height: usize) -> Self {
        Self {
            page: Some((width, height)),
            calls: Arc::new(AtomicUsize::new(0)),
            last_scale: Arc::new(Mutex::new(None)),
        }
    }

    pub fn failing() -> Self {
        Self {
            page: None,
            calls: Arc::new(AtomicUsize::new(0)),
            last_scale: Arc::new(Mutex::new(None)),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PageRasterizer for MockRasterizer {
    fn backend_name(&self) -> &'static str {
        "mock-pages"
    }

    fn render_first_page(&self, _path: &Path, scale: f32) -> Result<PageImage, PageError> {
        bump(&self.calls);
        if let Ok(mut last) = self.last_scale.lock() {
            *last = Some(scale);
        }
        match self.page {
            Some((width, height)) => PageImage::new(width, height, vec![255; width * height * 4]),
            None => Err(PageError::Render("mock page renderer failed".into())),
        }
    }
}

// ============================================================================
// Files
// ============================================================================

/// Temp dir holding a non-empty input file named `name`.
pub fn input_file(name: &str, bytes: &[u8]) -> (tempfile::TempDir, PathBuf) {
    let dir = test_utils::temp_test_dir();
    let path = test_utils::fixtures::write_fixture(dir.path(), name, bytes);
    (dir, path)
}

/// Assert a point is within 1e-9 of (x, y).
pub fn assert_point(actual: LonLat, x: f64, y: f64) {
    test_utils::assert_coords_approx_eq!((actual.x, actual.y), (x, y), 1e-9);
}
