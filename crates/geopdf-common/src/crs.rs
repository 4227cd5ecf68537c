//! Coordinate Reference System helpers.
//!
//! Spatial references arrive as opaque text (WKT, PROJ strings or authority
//! codes) from the geospatial library; only the checks the binding needs are
//! implemented here.

/// EPSG code of the WGS84 geographic reference every output is expressed in.
pub const WGS84_EPSG: u32 = 4326;

/// Valid longitude range in degrees.
pub const LONGITUDE_RANGE: (f64, f64) = (-180.0, 180.0);

/// Valid latitude range in degrees.
pub const LATITUDE_RANGE: (f64, f64) = (-90.0, 90.0);

pub fn is_valid_longitude(value: f64) -> bool {
    value.is_finite() && value >= LONGITUDE_RANGE.0 && value <= LONGITUDE_RANGE.1
}

pub fn is_valid_latitude(value: f64) -> bool {
    value.is_finite() && value >= LATITUDE_RANGE.0 && value <= LATITUDE_RANGE.1
}

/// Check if spatial reference text names the WGS84 geographic reference.
///
/// Accepts:
/// - "EPSG:4326" / "CRS:84" authority strings
/// - geographic WKT (`GEOGCS[`, `GEOGCRS[`, `GEODCRS[`) on the WGS 84 datum
/// - PROJ strings with `+proj=longlat` and `+datum=WGS84`
///
/// Projected WKT on the WGS 84 datum (e.g. UTM) is not geographic and returns false.
pub fn names_wgs84_geographic(text: &str) -> bool {
    let normalized = text.trim().to_uppercase();
    if normalized.is_empty() {
        return false;
    }

    if normalized == "EPSG:4326" || normalized == "CRS:84" || normalized == "WGS84" {
        return true;
    }

    if normalized.starts_with("+PROJ=") {
        return normalized.contains("+PROJ=LONGLAT") && normalized.contains("+DATUM=WGS84");
    }

    let geographic_root = ["GEOGCS[", "GEOGCRS[", "GEODCRS[", "GEOGRAPHICCRS["]
        .iter()
        .any(|root| normalized.starts_with(root));

    geographic_root && names_wgs84_datum(&normalized)
}

const WGS84_DATUM_NAMES: [&str; 5] = ["WGS_1984", "WGS 84", "WGS84", "D_WGS_1984", "WGS 1984"];

/// Whether the WKT's datum (or WKT2 datum ensemble) is WGS 84.
///
/// Only the quoted datum name counts. `TOWGS84[...]` clauses and CRS names
/// that mention WGS 84 do not.
fn names_wgs84_datum(normalized: &str) -> bool {
    match datum_name(normalized) {
        Some(name) => {
            let name = name.trim();
            WGS84_DATUM_NAMES.contains(&name) || name.starts_with("WORLD GEODETIC SYSTEM 1984")
        }
        None => false,
    }
}

/// First quoted name following `DATUM[` or `ENSEMBLE[`.
fn datum_name(normalized: &str) -> Option<&str> {
    let start = ["DATUM[", "ENSEMBLE["]
        .iter()
        .filter_map(|key| normalized.find(key).map(|pos| pos + key.len()))
        .min()?;
    let rest = normalized[start..].strip_prefix('"')?;
    rest.find('"').map(|end| &rest[..end])
}
