//! Classifies raster open failures by their diagnostic text.

/// Outcome of classifying an open failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemeClass {
    /// The raster driver rejected the document's coordinate addressing scheme.
    /// Only this class triggers the fallback renderer.
    UnsupportedScheme,
    Other,
}

/// Classify a library diagnostic. Matching is case-insensitive.
pub fn classify(detail: &str) -> SchemeClass {
    let lower = detail.to_lowercase();

    if lower.contains("geodetic") {
        return SchemeClass::UnsupportedScheme;
    }

    if lower.contains("unhandled")
        && (lower.contains("projectiontype") || lower.contains("projection type"))
    {
        return SchemeClass::UnsupportedScheme;
    }

    SchemeClass::Other
}
