//! Page rasterization through PDFium.
//!
//! `Pdfium` is `!Send`, so the library is bound per call. Repeat binds hit
//! the loader's cache.

use std::path::{Path, PathBuf};

use pdfium_render::prelude::*;
use tracing::debug;

use crate::page::{PageError, PageImage, PageRasterizer};

#[derive(Debug, Clone, Default)]
pub struct PdfiumRasterizer {
    library_dir: Option<PathBuf>,
}

impl PdfiumRasterizer {
    /// Bind from `library_dir` when given, otherwise from the system search path.
    pub fn new(library_dir: Option<PathBuf>) -> Self {
        Self { library_dir }
    }

    fn bind(&self) -> Result<Pdfium, PageError> {
        let bindings = match &self.library_dir {
            Some(dir) => {
                let lib_path =
                    Pdfium::pdfium_platform_library_name_at_path(dir.to_string_lossy().as_ref());
                debug!(path = ?lib_path, "Binding PDFium");
                Pdfium::bind_to_library(&lib_path)
            }
            None => Pdfium::bind_to_system_library(),
        }
        .map_err(|e| PageError::Unavailable(format!("PDFium library not loaded: {e}")))?;

        Ok(Pdfium::new(bindings))
    }
}

impl PageRasterizer for PdfiumRasterizer {
    fn backend_name(&self) -> &'static str {
        "pdfium"
    }

    fn render_first_page(&self, path: &Path, scale: f32) -> Result<PageImage, PageError> {
        let pdfium = self.bind()?;
        let document = pdfium
            .load_pdf_from_file(path, None)
            .map_err(|e| PageError::Render(format!("Failed to load PDF: {e}")))?;

        let pages = document.pages();
        if pages.len() == 0 {
            return Err(PageError::NoPages);
        }
        let page = pages
            .get(0)
            .map_err(|e| PageError::Render(format!("Failed to load page 1: {e}")))?;

        let config = PdfRenderConfig::new().scale_page_by_factor(scale);
        let bitmap = page
            .render_with_config(&config)
            .map_err(|e| PageError::Render(format!("Rendering failed: {e}")))?;

        let rgba = bitmap.as_image().to_rgba8();
        let (width, height) = (rgba.width() as usize, rgba.height() as usize);
        debug!(width, height, scale, "Rasterized first page");
        PageImage::new(width, height, rgba.into_raw())
    }
}
