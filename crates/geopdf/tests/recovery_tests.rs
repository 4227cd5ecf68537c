//! Tests for the metadata recovery chain and its strategies.

mod common;

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use common::{assert_point, input_file, meters_to_degrees, MockLayer, MockLibrary, MockRaster};
use geopdf::recovery::{ByteScanStrategy, GeoTransformStrategy, VectorExtentStrategy};
use geopdf::{GeoExtent, GeoLibrary, MetadataRecoveryChain, RecoveryStrategy, ServiceConfig};
use geopdf_common::{BoundingBox, LonLat};
use test_utils::fixtures::geo::{GT_UTM_10M, WKT_ED50, WKT_UTM_32N, WKT_WGS84};
use test_utils::fixtures::{bbox_array_pdf_bytes, diagnostics, geodetic_pdf_bytes, plain_pdf_bytes};

/// Strategy that counts its calls and returns a fixed answer.
struct CountingStrategy {
    name: &'static str,
    calls: Arc<AtomicUsize>,
    answer: Option<GeoExtent>,
}

impl CountingStrategy {
    fn boxed(
        name: &'static str,
        answer: Option<GeoExtent>,
    ) -> (Box<dyn RecoveryStrategy>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let strategy = Self {
            name,
            calls: Arc::clone(&calls),
            answer,
        };
        (Box::new(strategy), calls)
    }
}

impl RecoveryStrategy for CountingStrategy {
    fn name(&self) -> &'static str {
        self.name
    }

    fn recover(&self, _library: &dyn GeoLibrary, _path: &Path) -> Option<GeoExtent> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answer
    }
}

fn extent(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> GeoExtent {
    GeoExtent::from_bounds(&BoundingBox::new(min_x, min_y, max_x, max_y)).unwrap()
}

// ============================================================================
// Chain ordering
// ============================================================================

#[test]
fn test_first_success_short_circuits() {
    let (a, a_calls) = CountingStrategy::boxed("a", None);
    let (b, b_calls) = CountingStrategy::boxed("b", Some(extent(1.0, 2.0, 3.0, 4.0)));
    let (c, c_calls) = CountingStrategy::boxed("c", Some(extent(5.0, 6.0, 7.0, 8.0)));
    let chain = MetadataRecoveryChain::new(vec![a, b, c]);

    let library = MockLibrary::failing(diagnostics::GEODETIC);
    let recovered = chain.recover(&library, Path::new("/unused.pdf")).unwrap();

    assert_point(recovered.bottom_left(), 1.0, 2.0);
    assert_eq!(a_calls.load(Ordering::SeqCst), 1);
    assert_eq!(b_calls.load(Ordering::SeqCst), 1);
    assert_eq!(c_calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_first_strategy_wins_when_all_succeed() {
    let (a, a_calls) = CountingStrategy::boxed("a", Some(extent(-10.0, 10.0, 0.0, 20.0)));
    let (b, b_calls) = CountingStrategy::boxed("b", Some(extent(1.0, 2.0, 3.0, 4.0)));
    let (c, c_calls) = CountingStrategy::boxed("c", Some(extent(5.0, 6.0, 7.0, 8.0)));
    let chain = MetadataRecoveryChain::new(vec![a, b, c]);

    let library = MockLibrary::failing(diagnostics::GEODETIC);
    let recovered = chain.recover(&library, Path::new("/unused.pdf")).unwrap();

    assert_eq!(recovered, extent(-10.0, 10.0, 0.0, 20.0));
    assert_eq!(a_calls.load(Ordering::SeqCst), 1);
    assert_eq!(b_calls.load(Ordering::SeqCst), 0);
    assert_eq!(c_calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_all_strategies_fail() {
    let (a, a_calls) = CountingStrategy::boxed("a", None);
    let (b, b_calls) = CountingStrategy::boxed("b", None);
    let chain = MetadataRecoveryChain::new(vec![a, b]);

    let library = MockLibrary::failing(diagnostics::GEODETIC);
    assert!(chain.recover(&library, Path::new("/unused.pdf")).is_none());
    assert_eq!(a_calls.load(Ordering::SeqCst), 1);
    assert_eq!(b_calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_standard_chain_order() {
    let chain = MetadataRecoveryChain::standard(&ServiceConfig::default());
    assert_eq!(
        chain.strategy_names(),
        vec!["geotransform", "byte-scan", "vector-extent"]
    );
}

#[test]
fn test_standard_chain_prefers_byte_scan_over_vector() {
    let (_dir, path) = input_file("geodetic.pdf", &geodetic_pdf_bytes(10.0, 20.0, 15.0, 25.0));
    let library = MockLibrary::failing(diagnostics::GEODETIC).with_vector_layers(vec![
        MockLayer::new("neatline", None, Some(BoundingBox::new(-1.0, -1.0, 1.0, 1.0))),
    ]);
    let chain = MetadataRecoveryChain::standard(&ServiceConfig::default());

    let recovered = chain.recover(&library, &path).unwrap();
    assert_point(recovered.center(), 12.5, 22.5);
    assert_eq!(library.ledger.open_vector_calls(), 0);
    assert!(library.ledger.is_balanced());
}

#[test]
fn test_standard_chain_prefers_geotransform() {
    let (_dir, path) = input_file("geodetic.pdf", &geodetic_pdf_bytes(10.0, 20.0, 15.0, 25.0));
    let library = MockLibrary::opening(MockRaster::wgs84_rgb()).with_vector_layers(vec![
        MockLayer::new("neatline", None, Some(BoundingBox::new(-1.0, -1.0, 1.0, 1.0))),
    ]);
    let chain = MetadataRecoveryChain::standard(&ServiceConfig::default());

    let recovered = chain.recover(&library, &path).unwrap();
    assert_point(recovered.top_left(), -10.0, 20.0);
    assert_point(recovered.bottom_right(), 0.0, 10.0);
    assert_point(recovered.center(), -5.0, 15.0);
    assert_eq!(library.ledger.open_vector_calls(), 0);
    assert!(library.ledger.is_balanced());
}

// ============================================================================
// Strategy A: geotransform
// ============================================================================

#[test]
fn test_geotransform_wgs84_uses_native_corners() {
    let (_dir, path) = input_file("map.pdf", b"%PDF-1.7");
    let library = MockLibrary::opening(MockRaster::wgs84_rgb());

    let recovered = GeoTransformStrategy.recover(&library, &path).unwrap();
    assert_point(recovered.top_left(), -10.0, 20.0);
    assert_point(recovered.bottom_right(), 0.0, 10.0);
    assert_eq!(library.ledger.transforms_opened(), 0);
    assert!(library.ledger.is_balanced());
}

#[test]
fn test_geotransform_reprojects_projected_corners() {
    let (_dir, path) = input_file("utm.pdf", b"%PDF-1.7");
    let raster = MockRaster::wgs84_rgb()
        .with_geo_transform(Some(GT_UTM_10M))
        .with_projection(WKT_UTM_32N);
    let library = MockLibrary::opening(raster).with_transform(meters_to_degrees);

    let recovered = GeoTransformStrategy.recover(&library, &path).unwrap();
    // 500000 m -> 5 deg; 5000000 m -> 50 deg; 100 px * 10 m = 1000 m = 0.01 deg
    assert_point(recovered.top_left(), 5.0, 50.0);
    assert_point(recovered.bottom_right(), 5.01, 49.99);
    assert_eq!(library.ledger.transforms_opened(), 1);
    assert!(library.ledger.is_balanced());
}

#[test]
fn test_geotransform_reprojects_other_datum() {
    let (_dir, path) = input_file("ed50.pdf", b"%PDF-1.7");
    let raster = MockRaster::wgs84_rgb().with_projection(WKT_ED50);
    let library = MockLibrary::opening(raster).with_transform(|p| LonLat::new(p.x + 0.5, p.y));

    let recovered = GeoTransformStrategy.recover(&library, &path).unwrap();
    assert_point(recovered.top_left(), -9.5, 20.0);
    assert_eq!(library.ledger.transforms_opened(), 1);
    assert!(library.ledger.is_balanced());
}

#[test]
fn test_geotransform_rejects_failed_reprojection() {
    let (_dir, path) = input_file("utm.pdf", b"%PDF-1.7");
    let raster = MockRaster::wgs84_rgb()
        .with_geo_transform(Some(GT_UTM_10M))
        .with_projection(WKT_UTM_32N);
    let library = MockLibrary::opening(raster);

    assert!(GeoTransformStrategy.recover(&library, &path).is_none());
    assert!(library.ledger.is_balanced());
}

#[test]
fn test_geotransform_rejects_out_of_range() {
    let (_dir, path) = input_file("utm.pdf", b"%PDF-1.7");
    // Claims WGS84 but carries meter coordinates.
    let raster = MockRaster::wgs84_rgb().with_geo_transform(Some(GT_UTM_10M));
    let library = MockLibrary::opening(raster);

    assert!(GeoTransformStrategy.recover(&library, &path).is_none());
}

#[test]
fn test_geotransform_needs_projection_and_transform() {
    let (_dir, path) = input_file("map.pdf", b"%PDF-1.7");

    let no_gt = MockLibrary::opening(MockRaster::wgs84_rgb().with_geo_transform(None));
    assert!(GeoTransformStrategy.recover(&no_gt, &path).is_none());

    let no_projection = MockLibrary::opening(
        MockRaster::wgs84_rgb()
            .with_projection("")
            .with_spatial_ref(None),
    );
    assert!(GeoTransformStrategy.recover(&no_projection, &path).is_none());

    let failing = MockLibrary::failing(diagnostics::GEODETIC);
    assert!(GeoTransformStrategy.recover(&failing, &path).is_none());
}

// ============================================================================
// Strategy B: byte scan
// ============================================================================

#[test]
fn test_byte_scan_corner_tags() {
    let (_dir, path) = input_file("geodetic.pdf", &geodetic_pdf_bytes(10.0, 20.0, 15.0, 25.0));
    let library = MockLibrary::failing(diagnostics::GEODETIC);

    let recovered = ByteScanStrategy::default().recover(&library, &path).unwrap();
    assert_point(recovered.top_left(), 10.0, 25.0);
    assert_point(recovered.top_right(), 15.0, 25.0);
    assert_point(recovered.bottom_left(), 10.0, 20.0);
    assert_point(recovered.bottom_right(), 15.0, 20.0);
    assert_point(recovered.center(), 12.5, 22.5);
}

#[test]
fn test_byte_scan_array_skips_media_box() {
    let (_dir, path) = input_file("bounds.pdf", &bbox_array_pdf_bytes(-3.5, 40.0, 2.5, 44.0));
    let library = MockLibrary::failing(diagnostics::GEODETIC);

    let recovered = ByteScanStrategy::default().recover(&library, &path).unwrap();
    assert_point(recovered.top_left(), -3.5, 44.0);
    assert_point(recovered.bottom_right(), 2.5, 40.0);
}

#[test]
fn test_byte_scan_respects_limit() {
    let mut bytes = vec![b' '; 4096];
    bytes.extend_from_slice(&geodetic_pdf_bytes(10.0, 20.0, 15.0, 25.0));
    let (_dir, path) = input_file("late.pdf", &bytes);
    let library = MockLibrary::failing(diagnostics::GEODETIC);

    assert!(ByteScanStrategy::new(1024).recover(&library, &path).is_none());
    assert!(ByteScanStrategy::new(64 * 1024).recover(&library, &path).is_some());
}

#[test]
fn test_byte_scan_latin1_bytes() {
    let mut bytes = vec![0xC0, 0xFF, 0x80, b'\n'];
    bytes.extend_from_slice(&geodetic_pdf_bytes(-1.0, -2.0, 1.0, 2.0));
    let (_dir, path) = input_file("binary.pdf", &bytes);
    let library = MockLibrary::failing(diagnostics::GEODETIC);

    let recovered = ByteScanStrategy::default().recover(&library, &path).unwrap();
    assert_point(recovered.center(), 0.0, 0.0);
}

#[test]
fn test_byte_scan_nothing_found() {
    let (_dir, path) = input_file("plain.pdf", &plain_pdf_bytes());
    let library = MockLibrary::failing(diagnostics::GEODETIC);
    assert!(ByteScanStrategy::default().recover(&library, &path).is_none());
}

// ============================================================================
// Strategy C: vector extent
// ============================================================================

#[test]
fn test_vector_extent_without_srs() {
    let library = MockLibrary::failing(diagnostics::GEODETIC).with_vector_layers(vec![
        MockLayer::new("frame", None, Some(BoundingBox::new(1.0, 2.0, 3.0, 4.0))),
    ]);

    let recovered = VectorExtentStrategy
        .recover(&library, Path::new("/unused.pdf"))
        .unwrap();
    assert_point(recovered.top_left(), 1.0, 4.0);
    assert_point(recovered.bottom_right(), 3.0, 2.0);
    assert!(library.ledger.is_balanced());
}

#[test]
fn test_vector_extent_first_valid_layer_wins() {
    let library = MockLibrary::failing(diagnostics::GEODETIC).with_vector_layers(vec![
        MockLayer::new("empty", Some(WKT_WGS84), None),
        MockLayer::new("page", None, Some(BoundingBox::new(0.0, 0.0, 612.0, 792.0))),
        MockLayer::new("map", Some(WKT_WGS84), Some(BoundingBox::new(-5.0, 40.0, 5.0, 50.0))),
        MockLayer::new("later", None, Some(BoundingBox::new(1.0, 1.0, 2.0, 2.0))),
    ]);

    let recovered = VectorExtentStrategy
        .recover(&library, Path::new("/unused.pdf"))
        .unwrap();
    assert_point(recovered.center(), 0.0, 45.0);
    assert!(library.ledger.is_balanced());
}

#[test]
fn test_vector_extent_reprojects_foreign_srs() {
    let library = MockLibrary::failing(diagnostics::GEODETIC)
        .with_vector_layers(vec![MockLayer::new(
            "grid",
            Some(WKT_UTM_32N),
            Some(BoundingBox::new(100.0, 10.0, 150.0, 20.0)),
        )])
        .with_transform(|p| LonLat::new(p.x / 10.0, p.y / 10.0));

    let recovered = VectorExtentStrategy
        .recover(&library, Path::new("/unused.pdf"))
        .unwrap();
    assert_point(recovered.bottom_left(), 10.0, 1.0);
    assert_point(recovered.top_right(), 15.0, 2.0);
    assert_eq!(library.ledger.transforms_opened(), 1);
    assert!(library.ledger.is_balanced());
}

#[test]
fn test_vector_extent_no_layers() {
    let library = MockLibrary::failing(diagnostics::GEODETIC).with_vector_layers(vec![]);
    assert!(VectorExtentStrategy
        .recover(&library, Path::new("/unused.pdf"))
        .is_none());
    assert!(library.ledger.is_balanced());

    let no_vector = MockLibrary::failing(diagnostics::GEODETIC);
    assert!(VectorExtentStrategy
        .recover(&no_vector, Path::new("/unused.pdf"))
        .is_none());
}

// ============================================================================
// Handle release
// ============================================================================

/// Opens a vector dataset and a layer, then panics while holding both.
struct PanickingStrategy;

impl RecoveryStrategy for PanickingStrategy {
    fn name(&self) -> &'static str {
        "panicking"
    }

    fn recover(&self, library: &dyn GeoLibrary, path: &Path) -> Option<GeoExtent> {
        let dataset = library.open_vector(path).ok()?;
        let _layer = dataset.layer(0).ok()?;
        panic!("strategy crashed while holding handles");
    }
}

#[test]
fn test_handles_released_on_panic() {
    let library = MockLibrary::failing(diagnostics::GEODETIC).with_vector_layers(vec![
        MockLayer::new("frame", None, Some(BoundingBox::new(1.0, 2.0, 3.0, 4.0))),
    ]);
    let chain = MetadataRecoveryChain::new(vec![Box::new(PanickingStrategy)]);

    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        chain.recover(&library, Path::new("/unused.pdf"))
    }));

    assert!(outcome.is_err());
    assert_eq!(library.ledger.vectors_opened(), 1);
    assert!(library.ledger.is_balanced());
}
