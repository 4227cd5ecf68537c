//! Seam to the PDF page rasterizer used by the fallback renderer.

use std::path::Path;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageError {
    #[error("Page rasterizer not available: {0}")]
    Unavailable(String),

    #[error("Document has no pages")]
    NoPages,

    #[error("Page rendering failed: {0}")]
    Render(String),
}

/// Straight (non-premultiplied) RGBA pixels of a rendered page, top row first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageImage {
    pub width: usize,
    pub height: usize,
    pub rgba: Vec<u8>,
}

impl PageImage {
    pub fn new(width: usize, height: usize, rgba: Vec<u8>) -> Result<Self, PageError> {
        if rgba.len() != width * height * 4 {
            return Err(PageError::Render(format!(
                "pixel buffer holds {} bytes, expected {} for {}x{} RGBA",
                rgba.len(),
                width * height * 4,
                width,
                height
            )));
        }
        Ok(Self {
            width,
            height,
            rgba,
        })
    }
}

/// Rasterizes the first page of a PDF document.
pub trait PageRasterizer: Send {
    fn backend_name(&self) -> &'static str;

    /// Render page 1 upscaled by `scale`.
    fn render_first_page(&self, path: &Path, scale: f32) -> Result<PageImage, PageError>;
}

/// Stand-in used when no page rasterizer was compiled in.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableRasterizer;

impl PageRasterizer for UnavailableRasterizer {
    fn backend_name(&self) -> &'static str {
        "none"
    }

    fn render_first_page(&self, _path: &Path, _scale: f32) -> Result<PageImage, PageError> {
        Err(PageError::Unavailable(
            "built without the `pdfium` feature".to_string(),
        ))
    }
}
