//! High-level entry points for hosts that just want a gallery out of a PDF.
//!
//! Note: pdfium-render's Pdfium struct is not Send+Sync, so we don't keep one
//! around. Each command binds a fresh PDFium instance for its own pass.

use crate::config::RenderOptions;
use crate::gallery::CompositeDocument;
use crate::pdf::{Backend, DocumentHandle, DocumentInfo, PageInfo, PdfError, PdfiumBackend};
use crate::pipeline::Pipeline;
use crate::source::FileSource;

fn bind(options: &RenderOptions) -> Result<PdfiumBackend, PdfError> {
    PdfiumBackend::bind(options.pdfium_library.as_deref())
}

/// Render a PDF on disk (plain path, `file://` URL or percent-encoded path).
pub fn render_gallery_from_file(
    path: &str,
    options: &RenderOptions,
) -> Result<CompositeDocument, PdfError> {
    let source = FileSource::from_arg(path)?;
    Pipeline::new(bind(options)?, options.clone())?.render(&source)
}

/// Render a PDF already held in memory (e.g. from drag-and-drop).
pub fn render_gallery_from_bytes(
    bytes: &[u8],
    options: &RenderOptions,
) -> Result<CompositeDocument, PdfError> {
    Pipeline::new(bind(options)?, options.clone())?.render(bytes)
}

/// Get document info from bytes.
pub fn get_document_info(bytes: &[u8], options: &RenderOptions) -> Result<DocumentInfo, PdfError> {
    document_info_with(&bind(options)?, bytes)
}

/// Get all page infos for the document.
pub fn get_all_page_infos(
    bytes: &[u8],
    options: &RenderOptions,
) -> Result<Vec<PageInfo>, PdfError> {
    page_infos_with(&bind(options)?, bytes)
}

fn document_info_with<B: Backend + ?Sized>(
    backend: &B,
    bytes: &[u8],
) -> Result<DocumentInfo, PdfError> {
    DocumentHandle::open(backend, bytes)?.info()
}

fn page_infos_with<B: Backend + ?Sized>(
    backend: &B,
    bytes: &[u8],
) -> Result<Vec<PageInfo>, PdfError> {
    DocumentHandle::open(backend, bytes)?.page_infos()
}
