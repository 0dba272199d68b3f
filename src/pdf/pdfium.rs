//! Production backend using pdfium-render.
//!
//! Note: pdfium-render's Pdfium struct is not Send+Sync, so this backend never
//! advertises parallel support and callers bind a fresh instance per pass.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use image::RgbaImage;
use log::{debug, info, warn};
use pdfium_render::prelude::*;

use super::backend::{Backend, DocumentMetadata, LoadedDocument, LoadedPage, RenderTarget};
use super::error::PdfError;

static LOGGED_SUCCESS: AtomicBool = AtomicBool::new(false);

#[cfg(target_os = "windows")]
const LIBRARY_NAME: &str = "pdfium.dll";
#[cfg(target_os = "macos")]
const LIBRARY_NAME: &str = "libpdfium.dylib";
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
const LIBRARY_NAME: &str = "libpdfium.so";

fn announce(origin: &str) {
    if !LOGGED_SUCCESS.swap(true, Ordering::Relaxed) {
        info!("Loaded PDFium from {}", origin);
    }
}

/// Bind to the PDFium library, trying the most specific location first.
fn bind_pdfium(explicit: Option<&Path>) -> Result<Pdfium, PdfError> {
    // Strategy 1: explicit path from configuration
    if let Some(path) = explicit {
        match Pdfium::bind_to_library(path) {
            Ok(bindings) => {
                announce(&path.display().to_string());
                return Ok(Pdfium::new(bindings));
            }
            Err(e) => warn!("Failed configured library {}: {}", path.display(), e),
        }
    }

    // Strategy 2: library bundled next to the executable
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            #[cfg(target_os = "macos")]
            let candidates = [exe_dir.join("..").join("Frameworks"), exe_dir.to_path_buf()];
            #[cfg(not(target_os = "macos"))]
            let candidates = [exe_dir.to_path_buf()];

            for dir in candidates {
                let lib_path = dir.join(LIBRARY_NAME);
                if !lib_path.exists() {
                    continue;
                }
                match Pdfium::bind_to_library(&lib_path) {
                    Ok(bindings) => {
                        announce(&lib_path.display().to_string());
                        return Ok(Pdfium::new(bindings));
                    }
                    Err(e) => warn!("Failed bundled library {}: {}", lib_path.display(), e),
                }
            }
        }
    }

    // Strategy 3: system library (for development)
    match Pdfium::bind_to_system_library() {
        Ok(bindings) => {
            announce("system library");
            Ok(Pdfium::new(bindings))
        }
        Err(e) => Err(PdfError::InitError(format!(
            "Could not load PDFium library ({}). Set PDF_SCROLL_PDFIUM or place it next to the executable.",
            e
        ))),
    }
}

/// Backend over a bound PDFium instance.
pub struct PdfiumBackend {
    pdfium: Pdfium,
}

impl PdfiumBackend {
    pub fn bind(explicit: Option<&Path>) -> Result<Self, PdfError> {
        Ok(Self {
            pdfium: bind_pdfium(explicit)?,
        })
    }
}

impl Backend for PdfiumBackend {
    fn load<'a>(&'a self, bytes: &'a [u8]) -> Result<Box<dyn LoadedDocument + 'a>, PdfError> {
        let doc = self
            .pdfium
            .load_pdf_from_byte_slice(bytes, None)
            .map_err(|e| PdfError::malformed(e.to_string()))?;
        debug!("PDFium loaded {} bytes", bytes.len());
        Ok(Box::new(PdfiumDocument { doc }))
    }
}

struct PdfiumDocument<'a> {
    doc: PdfDocument<'a>,
}

impl LoadedDocument for PdfiumDocument<'_> {
    fn page_count(&self) -> u32 {
        self.doc.pages().len() as u32
    }

    fn metadata(&self) -> DocumentMetadata {
        let metadata = self.doc.metadata();
        DocumentMetadata {
            title: metadata
                .get(PdfDocumentMetadataTagType::Title)
                .map(|t| t.value().to_string()),
            author: metadata
                .get(PdfDocumentMetadataTagType::Author)
                .map(|t| t.value().to_string()),
            pdf_version: format!("{:?}", self.doc.version()),
        }
    }

    fn load_page(&self, index: u32) -> Result<Box<dyn LoadedPage + '_>, PdfError> {
        let page_index = u16::try_from(index).map_err(|_| PdfError::IndexError {
            index: i64::from(index),
            page_count: self.page_count(),
        })?;
        let page = self
            .doc
            .pages()
            .get(page_index)
            .map_err(|e| PdfError::RenderError(e.to_string()))?;
        Ok(Box::new(PdfiumPage { page }))
    }
}

struct PdfiumPage<'a> {
    page: PdfPage<'a>,
}

impl LoadedPage for PdfiumPage<'_> {
    fn width(&self) -> f32 {
        self.page.width().value
    }

    fn height(&self) -> f32 {
        self.page.height().value
    }

    fn rotation(&self) -> i32 {
        match self.page.rotation() {
            Ok(PdfPageRenderRotation::None) | Err(_) => 0,
            Ok(PdfPageRenderRotation::Degrees90) => 90,
            Ok(PdfPageRenderRotation::Degrees180) => 180,
            Ok(PdfPageRenderRotation::Degrees270) => 270,
        }
    }

    fn render(&self, target: RenderTarget) -> Result<RgbaImage, PdfError> {
        let [r, g, b] = target.background;
        let (width, height) = match (i32::try_from(target.width), i32::try_from(target.height)) {
            (Ok(width), Ok(height)) => (width, height),
            _ => {
                return Err(PdfError::RenderError(format!(
                    "{}x{} does not fit a PDFium bitmap",
                    target.width, target.height
                )))
            }
        };

        // Display mode: opaque fill, LCD text, no annotations or form widgets
        let config = PdfRenderConfig::new()
            .set_target_size(width, height)
            .set_clear_color(PdfColor::new(r, g, b, 255))
            .use_lcd_text_rendering(true)
            .render_annotations(false)
            .render_form_data(false);

        let bitmap = self
            .page
            .render_with_config(&config)
            .map_err(|e| PdfError::RenderError(e.to_string()))?;

        let rgba = bitmap.as_image().to_rgba8();
        let (width, height) = (rgba.width(), rgba.height());
        RgbaImage::from_raw(width, height, rgba.into_raw()).ok_or_else(|| {
            PdfError::RenderError(format!("PDFium returned a short {}x{} bitmap", width, height))
        })
    }
}
