//! Scoped ownership of an open document and of the page currently being rendered.

use log::debug;
use serde::{Deserialize, Serialize};

use super::backend::{Backend, LoadedDocument, LoadedPage, RenderTarget};
use super::error::PdfError;

/// Page metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PageInfo {
    /// Page index (0-based)
    pub index: u32,
    /// Page width in PDF points
    pub width: f32,
    /// Page height in PDF points
    pub height: f32,
    /// Page rotation in degrees (0, 90, 180, 270)
    pub rotation: i32,
}

/// Document metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentInfo {
    /// Total number of pages
    pub page_count: u32,
    /// Document title (if available)
    pub title: Option<String>,
    /// Document author (if available)
    pub author: Option<String>,
    /// PDF version string
    pub pdf_version: String,
}

/// An opened document. The engine resource is released by [`close`](Self::close)
/// or, on any other exit path, when the handle is dropped.
pub struct DocumentHandle<'a> {
    inner: Option<Box<dyn LoadedDocument + 'a>>,
    page_count: u32,
}

impl<'a> DocumentHandle<'a> {
    pub fn open<B>(backend: &'a B, bytes: &'a [u8]) -> Result<Self, PdfError>
    where
        B: Backend + ?Sized,
    {
        if bytes.is_empty() {
            return Err(PdfError::empty());
        }
        let inner = backend.load(bytes)?;
        let page_count = inner.page_count();
        debug!("Opened document with {} pages", page_count);
        Ok(Self {
            inner: Some(inner),
            page_count,
        })
    }

    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    pub fn is_closed(&self) -> bool {
        self.inner.is_none()
    }

    /// Check a caller-supplied (possibly negative) index against the page range.
    pub fn validate_index(&self, index: i64) -> Result<u32, PdfError> {
        u32::try_from(index)
            .ok()
            .filter(|i| *i < self.page_count)
            .ok_or(PdfError::IndexError {
                index,
                page_count: self.page_count,
            })
    }

    pub fn page(&self, index: u32) -> Result<PageHandle<'_>, PdfError> {
        let doc = self.inner.as_deref().ok_or(PdfError::NoDocument)?;
        let index = self.validate_index(i64::from(index))?;
        let inner = doc.load_page(index)?;
        Ok(PageHandle {
            index,
            width: inner.width(),
            height: inner.height(),
            source_width: source_units(inner.width()),
            source_height: source_units(inner.height()),
            rotation: inner.rotation(),
            inner: Some(inner),
        })
    }

    pub fn info(&self) -> Result<DocumentInfo, PdfError> {
        let doc = self.inner.as_deref().ok_or(PdfError::NoDocument)?;
        let metadata = doc.metadata();
        Ok(DocumentInfo {
            page_count: self.page_count,
            title: metadata.title,
            author: metadata.author,
            pdf_version: metadata.pdf_version,
        })
    }

    pub fn page_infos(&self) -> Result<Vec<PageInfo>, PdfError> {
        (0..self.page_count)
            .map(|index| self.page(index).map(|page| page.info()))
            .collect()
    }

    /// Release the underlying document. Safe to call more than once.
    pub fn close(&mut self) {
        if let Some(doc) = self.inner.take() {
            drop(doc);
            debug!("Closed document");
        }
    }
}

impl Drop for DocumentHandle<'_> {
    fn drop(&mut self) {
        self.close();
    }
}

/// A page opened for one render. Consumed by [`close`](Self::close); dropping it
/// on an error path releases it too.
pub struct PageHandle<'d> {
    inner: Option<Box<dyn LoadedPage + 'd>>,
    index: u32,
    width: f32,
    height: f32,
    source_width: u32,
    source_height: u32,
    rotation: i32,
}

/// Whole PDF points, truncated, as the page size is reported in integer units.
fn source_units(points: f32) -> u32 {
    points.max(0.0) as u32
}

impl PageHandle<'_> {
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Width in whole source units (PDF points, truncated).
    pub fn width(&self) -> u32 {
        self.source_width
    }

    /// Height in whole source units (PDF points, truncated).
    pub fn height(&self) -> u32 {
        self.source_height
    }

    pub fn info(&self) -> PageInfo {
        PageInfo {
            index: self.index,
            width: self.width,
            height: self.height,
            rotation: self.rotation,
        }
    }

    pub(crate) fn render(&self, target: RenderTarget) -> Result<image::RgbaImage, PdfError> {
        self.inner
            .as_deref()
            .ok_or(PdfError::NoDocument)?
            .render(target)
    }

    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if self.inner.take().is_some() {
            debug!("Closed page {}", self.index);
        }
    }
}

impl Drop for PageHandle<'_> {
    fn drop(&mut self) {
        self.release();
    }
}
