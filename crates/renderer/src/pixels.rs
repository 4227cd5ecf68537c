//! Interleaving of raster bands into RGBA pixel buffers.

use thiserror::Error;

/// How raster bands map onto output channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandLayout {
    /// One band replicated into R, G and B.
    Gray,
    /// Bands 1-3 as R, G, B; alpha is opaque.
    Rgb,
    /// Bands 1-4 as R, G, B, A. Bands past the fourth are ignored.
    Rgba,
}

impl BandLayout {
    /// Pick a layout for a raster's band count. Returns None for 0 or 2 bands.
    pub fn from_band_count(count: usize) -> Option<Self> {
        match count {
            1 => Some(BandLayout::Gray),
            3 => Some(BandLayout::Rgb),
            n if n >= 4 => Some(BandLayout::Rgba),
            _ => None,
        }
    }

    /// Number of bands that must be read for this layout.
    pub fn bands_to_read(&self) -> usize {
        match self {
            BandLayout::Gray => 1,
            BandLayout::Rgb => 3,
            BandLayout::Rgba => 4,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PixelError {
    #[error("expected {expected} bands, got {actual}")]
    BandCount { expected: usize, actual: usize },

    #[error("band {band} holds {actual} samples, expected {expected}")]
    BandLength {
        band: usize,
        expected: usize,
        actual: usize,
    },
}

/// Interleave 8-bit band samples (row-major, top row first) into RGBA.
pub fn compose_rgba(
    layout: BandLayout,
    bands: &[Vec<u8>],
    width: usize,
    height: usize,
) -> Result<Vec<u8>, PixelError> {
    let expected_bands = layout.bands_to_read();
    if bands.len() != expected_bands {
        return Err(PixelError::BandCount {
            expected: expected_bands,
            actual: bands.len(),
        });
    }

    let num_pixels = width * height;
    for (i, band) in bands.iter().enumerate() {
        if band.len() != num_pixels {
            return Err(PixelError::BandLength {
                band: i + 1,
                expected: num_pixels,
                actual: band.len(),
            });
        }
    }

    let mut pixels = Vec::with_capacity(num_pixels * 4);
    match layout {
        BandLayout::Gray => {
            for &v in &bands[0] {
                pixels.extend_from_slice(&[v, v, v, 255]);
            }
        }
        BandLayout::Rgb => {
            for i in 0..num_pixels {
                pixels.extend_from_slice(&[bands[0][i], bands[1][i], bands[2][i], 255]);
            }
        }
        BandLayout::Rgba => {
            for i in 0..num_pixels {
                pixels.extend_from_slice(&[bands[0][i], bands[1][i], bands[2][i], bands[3][i]]);
            }
        }
    }

    Ok(pixels)
}
