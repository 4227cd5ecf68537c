//! Image output for rendered GeoPDF pages.
//!
//! - Band interleaving into RGBA buffers
//! - PNG encoding

pub mod pixels;
pub mod png;

pub use pixels::{compose_rgba, BandLayout, PixelError};
pub use png::{create_png, write_png, PngError};
