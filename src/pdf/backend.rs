//! The seam between the pipeline and a concrete PDF engine.
//!
//! A backend loads documents from a byte slice; documents hand out pages;
//! pages render themselves into an RGBA buffer of an exact pixel size.
//! Dropping a loaded document or page releases the engine resource behind it.

use image::RgbaImage;

use super::error::PdfError;

/// Metadata a backend may expose about a loaded document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub pdf_version: String,
}

/// Exact output geometry for a single page render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderTarget {
    pub width: u32,
    pub height: u32,
    /// Opaque colour painted under the page content.
    pub background: [u8; 3],
}

/// A PDF engine able to open documents.
pub trait Backend {
    fn load<'a>(&'a self, bytes: &'a [u8]) -> Result<Box<dyn LoadedDocument + 'a>, PdfError>;

    /// Returns `self` when the engine tolerates concurrent loads from several threads.
    fn as_parallel(&self) -> Option<&(dyn Backend + Sync)> {
        None
    }
}

/// An open document. Read-only once loaded.
pub trait LoadedDocument {
    fn page_count(&self) -> u32;

    fn metadata(&self) -> DocumentMetadata {
        DocumentMetadata::default()
    }

    /// `index` is already bounds-checked by the caller.
    fn load_page(&self, index: u32) -> Result<Box<dyn LoadedPage + '_>, PdfError>;
}

/// An open page, sized in PDF points.
pub trait LoadedPage {
    fn width(&self) -> f32;

    fn height(&self) -> f32;

    /// Page rotation in degrees (0, 90, 180, 270).
    fn rotation(&self) -> i32 {
        0
    }

    /// Render the page stretched to exactly `target.width` x `target.height` pixels.
    fn render(&self, target: RenderTarget) -> Result<RgbaImage, PdfError>;
}
