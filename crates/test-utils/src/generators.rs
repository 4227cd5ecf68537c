//! Synthetic band data generators.
//!
//! Patterns are predictable so decoded pixels can be checked by position.

/// Creates a band whose sample at (col, row) is `(col + row * width) % 256`.
///
/// # Example
///
/// ```
/// use test_utils::create_ramp_band;
///
/// let band = create_ramp_band(4, 2);
/// assert_eq!(band.len(), 8);
/// assert_eq!(band[0], 0);
/// assert_eq!(band[5], 5); // col=1, row=1
/// ```
pub fn create_ramp_band(width: usize, height: usize) -> Vec<u8> {
    (0..width * height).map(|i| (i % 256) as u8).collect()
}

/// Creates a band filled with a single value.
pub fn create_constant_band(width: usize, height: usize, value: u8) -> Vec<u8> {
    vec![value; width * height]
}

/// Creates `count` bands where band `b` (0-based) holds the constant `(b + 1) * 10`.
///
/// Interleaved output then reads `[10, 20, 30, ...]` for every pixel, which makes
/// channel ordering easy to assert.
pub fn create_channel_marked_bands(width: usize, height: usize, count: usize) -> Vec<Vec<u8>> {
    (0..count)
        .map(|b| create_constant_band(width, height, ((b + 1) * 10).min(255) as u8))
        .collect()
}

/// Creates an RGBA buffer with a horizontal red and vertical green gradient.
pub fn create_test_rgba_pixels(width: usize, height: usize) -> Vec<u8> {
    let mut pixels = Vec::with_capacity(width * height * 4);
    for y in 0..height {
        for x in 0..width {
            pixels.push((x * 255 / width.max(1)) as u8);
            pixels.push((y * 255 / height.max(1)) as u8);
            pixels.push(128);
            pixels.push(255);
        }
    }
    pixels
}
