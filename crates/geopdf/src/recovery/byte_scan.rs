//! Raw byte scan for georeferencing left in the document text.
//!
//! Two patterns are recognized, in order of preference:
//!
//! 1. Numeric `/LLX`, `/LLY`, `/URX`, `/URY` tags (LGIDict neatline style).
//! 2. The first bracketed array of four numbers that reads as two valid
//!    (lon, lat) pairs. This can match unrelated arrays that happen to be in
//!    range.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use geopdf_common::crs::{is_valid_latitude, is_valid_longitude};
use geopdf_common::{BoundingBox, CornerSet, GeoExtent, LonLat};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::RecoveryStrategy;
use crate::config::DEFAULT_SCAN_LIMIT_BYTES;
use crate::library::GeoLibrary;

static CORNER_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"/(LLX|LLY|URX|URY)\s*([-+]?(?:\d+(?:\.\d*)?|\.\d+))")
        .expect("Failed to compile corner tag regex")
});

static FOUR_NUMBER_ARRAY: Lazy<Regex> = Lazy::new(|| {
    let num = r"([-+]?(?:\d+(?:\.\d*)?|\.\d+))";
    Regex::new(&format!(r"\[\s*{num}\s+{num}\s+{num}\s+{num}\s*\]"))
        .expect("Failed to compile coordinate array regex")
});

/// Scans the head of the file for coordinate patterns.
#[derive(Debug, Clone, Copy)]
pub struct ByteScanStrategy {
    limit: usize,
}

impl ByteScanStrategy {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }

    fn read_prefix(&self, path: &Path) -> std::io::Result<String> {
        let mut bytes = Vec::with_capacity(self.limit.min(64 * 1024));
        File::open(path)?
            .take(self.limit as u64)
            .read_to_end(&mut bytes)?;
        // Latin-1: every byte maps to the code point of the same value.
        Ok(bytes.iter().map(|&b| b as char).collect())
    }
}

impl Default for ByteScanStrategy {
    fn default() -> Self {
        Self::new(DEFAULT_SCAN_LIMIT_BYTES)
    }
}

impl RecoveryStrategy for ByteScanStrategy {
    fn name(&self) -> &'static str {
        "byte-scan"
    }

    fn recover(&self, _library: &dyn GeoLibrary, path: &Path) -> Option<GeoExtent> {
        match self.read_prefix(path) {
            Ok(text) => scan_text(&text),
            Err(e) => {
                debug!(error = %e, path = %path.display(), "Byte scan: read failed");
                None
            }
        }
    }
}

/// Find an extent in document text.
pub fn scan_text(text: &str) -> Option<GeoExtent> {
    scan_corner_tags(text).or_else(|| scan_four_number_arrays(text))
}

fn scan_corner_tags(text: &str) -> Option<GeoExtent> {
    let (mut llx, mut lly, mut urx, mut ury) = (None, None, None, None);

    for caps in CORNER_TAG.captures_iter(text) {
        let value: f64 = match caps[2].parse() {
            Ok(v) => v,
            Err(_) => continue,
        };
        let slot = match &caps[1] {
            "LLX" => &mut llx,
            "LLY" => &mut lly,
            "URX" => &mut urx,
            _ => &mut ury,
        };
        slot.get_or_insert(value);

        if llx.is_some() && lly.is_some() && urx.is_some() && ury.is_some() {
            break;
        }
    }

    let (llx, lly, urx, ury) = (llx?, lly?, urx?, ury?);
    if !(is_valid_longitude(llx)
        && is_valid_longitude(urx)
        && is_valid_latitude(lly)
        && is_valid_latitude(ury))
    {
        debug!(llx, lly, urx, ury, "Byte scan: corner tags out of range");
        return None;
    }

    GeoExtent::from_corners(CornerSet::new(
        LonLat::new(llx, ury),
        LonLat::new(urx, ury),
        LonLat::new(llx, lly),
        LonLat::new(urx, lly),
    ))
}

fn scan_four_number_arrays(text: &str) -> Option<GeoExtent> {
    FOUR_NUMBER_ARRAY.captures_iter(text).find_map(|caps| {
        let mut values = [0.0f64; 4];
        for (i, value) in values.iter_mut().enumerate() {
            *value = caps[i + 1].parse().ok()?;
        }
        let a = LonLat::new(values[0], values[1]);
        let b = LonLat::new(values[2], values[3]);
        if !(a.is_geographic() && b.is_geographic()) {
            return None;
        }
        GeoExtent::from_bounds(&BoundingBox::spanning(a, b))
    })
}
