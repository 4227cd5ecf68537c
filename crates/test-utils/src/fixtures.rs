//! Common test fixtures for GeoPDF binding tests.
//!
//! Fixture files are synthetic: they carry just enough PDF-like text for the
//! byte-pattern scan and the file checks, not a renderable document.

use std::path::{Path, PathBuf};

/// Geotransforms and spatial references used across tests.
pub mod geo {
    /// 0.1 degree pixels anchored at (-10, 20), north up.
    pub const GT_WGS84_TENTH_DEGREE: [f64; 6] = [-10.0, 0.1, 0.0, 20.0, 0.0, -0.1];

    /// 10 m pixels anchored at UTM 32N (500000, 5000000), north up.
    pub const GT_UTM_10M: [f64; 6] = [500_000.0, 10.0, 0.0, 5_000_000.0, 0.0, -10.0];

    /// WGS84 geographic WKT.
    pub const WKT_WGS84: &str = r#"GEOGCS["WGS 84",DATUM["WGS_1984",SPHEROID["WGS 84",6378137,298.257223563]],PRIMEM["Greenwich",0],UNIT["degree",0.0174532925199433],AUTHORITY["EPSG","4326"]]"#;

    /// WGS84 / UTM zone 32N WKT.
    pub const WKT_UTM_32N: &str = r#"PROJCS["WGS 84 / UTM zone 32N",GEOGCS["WGS 84",DATUM["WGS_1984",SPHEROID["WGS 84",6378137,298.257223563]]],PROJECTION["Transverse_Mercator"],AUTHORITY["EPSG","32632"]]"#;

    /// ED50 geographic WKT with a `TOWGS84` shift.
    pub const WKT_ED50: &str = r#"GEOGCS["ED50",DATUM["European_Datum_1950",SPHEROID["International 1924",6378388,297],TOWGS84[-87,-98,-121,0,0,0,0]],PRIMEM["Greenwich",0],UNIT["degree",0.0174532925199433],AUTHORITY["EPSG","4230"]]"#;
}

/// Diagnostic messages reported by the PDF raster driver.
pub mod diagnostics {
    pub const GEODETIC: &str = "Unhandled (yet) value for ProjectionType : GEODETIC";
    pub const UNHANDLED_PROJECTION_TYPE: &str = "Unhandled (yet) value for ProjectionType : TC";
    pub const NOT_RECOGNIZED: &str =
        "`/tmp/a.pdf' not recognized as being in a supported file format.";
    pub const NO_SUCH_FILE: &str = "No such file";
}

/// Minimal PDF-like document carrying an LGIDict-style bounding box.
pub fn geodetic_pdf_bytes(llx: f64, lly: f64, urx: f64, ury: f64) -> Vec<u8> {
    format!(
        "%PDF-1.7\n1 0 obj\n<< /Type /Catalog /LGIDict << /Type /LGIDict /Projection << /ProjectionType (GEODETIC) >> /Neatline << /LLX {} /LLY {} /URX {} /URY {} >> >> >>\nendobj\n%%EOF\n",
        llx, lly, urx, ury
    )
    .into_bytes()
}

/// Minimal PDF-like document with only a bracketed coordinate array.
///
/// A `/MediaBox` that is out of geographic range appears first, so the scan
/// must skip it.
pub fn bbox_array_pdf_bytes(x1: f64, y1: f64, x2: f64, y2: f64) -> Vec<u8> {
    format!(
        "%PDF-1.7\n1 0 obj\n<< /Type /Page /MediaBox [0 0 612 792] >>\nendobj\n2 0 obj\n<< /Bounds [ {} {} {} {} ] >>\nendobj\n%%EOF\n",
        x1, y1, x2, y2
    )
    .into_bytes()
}

/// PDF-like document with no recognizable georeferencing.
pub fn plain_pdf_bytes() -> Vec<u8> {
    b"%PDF-1.4\n1 0 obj\n<< /Type /Page /MediaBox [0 0 612 792] >>\nendobj\n%%EOF\n".to_vec()
}

/// Write `bytes` to `dir/name` and return the path.
pub fn write_fixture(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).expect("Failed to write test fixture");
    path
}
