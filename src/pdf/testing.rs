//! In-memory backend used by unit tests. Counts every open and close so the
//! resource-release guarantees can be asserted.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use image::{Rgba, RgbaImage};

use super::backend::{Backend, DocumentMetadata, LoadedDocument, LoadedPage, RenderTarget};
use super::error::PdfError;

pub(crate) const FAKE_PDF: &[u8] = b"%PDF-1.7 fake";

#[derive(Debug, Default)]
pub(crate) struct Counters {
    pub docs_opened: AtomicUsize,
    pub docs_closed: AtomicUsize,
    pub pages_opened: AtomicUsize,
    pub pages_closed: AtomicUsize,
}

impl Counters {
    pub fn get(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }

    pub fn balanced(&self) -> bool {
        Self::get(&self.docs_opened) == Self::get(&self.docs_closed)
            && Self::get(&self.pages_opened) == Self::get(&self.pages_closed)
    }
}

pub(crate) struct FakeBackend {
    pages: Vec<(f32, f32)>,
    fail_render_at: Option<u32>,
    pub counters: Arc<Counters>,
}

impl FakeBackend {
    pub fn new(pages: &[(f32, f32)]) -> Self {
        Self {
            pages: pages.to_vec(),
            fail_render_at: None,
            counters: Arc::new(Counters::default()),
        }
    }

    pub fn failing_at(mut self, index: u32) -> Self {
        self.fail_render_at = Some(index);
        self
    }
}

impl Backend for FakeBackend {
    fn load<'a>(&'a self, bytes: &'a [u8]) -> Result<Box<dyn LoadedDocument + 'a>, PdfError> {
        if !bytes.starts_with(b"%PDF") {
            return Err(PdfError::malformed("missing %PDF header"));
        }
        self.counters.docs_opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeDocument { backend: self }))
    }

    fn as_parallel(&self) -> Option<&(dyn Backend + Sync)> {
        Some(self)
    }
}

struct FakeDocument<'a> {
    backend: &'a FakeBackend,
}

impl Drop for FakeDocument<'_> {
    fn drop(&mut self) {
        self.backend.counters.docs_closed.fetch_add(1, Ordering::SeqCst);
    }
}

impl LoadedDocument for FakeDocument<'_> {
    fn page_count(&self) -> u32 {
        self.backend.pages.len() as u32
    }

    fn metadata(&self) -> DocumentMetadata {
        DocumentMetadata {
            title: Some("Fake".to_string()),
            author: None,
            pdf_version: "Pdf1_7".to_string(),
        }
    }

    fn load_page(&self, index: u32) -> Result<Box<dyn LoadedPage + '_>, PdfError> {
        let (width, height) = self.backend.pages[index as usize];
        self.backend.counters.pages_opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakePage {
            backend: self.backend,
            index,
            width,
            height,
        }))
    }
}

struct FakePage<'a> {
    backend: &'a FakeBackend,
    index: u32,
    width: f32,
    height: f32,
}

impl Drop for FakePage<'_> {
    fn drop(&mut self) {
        self.backend.counters.pages_closed.fetch_add(1, Ordering::SeqCst);
    }
}

impl LoadedPage for FakePage<'_> {
    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }

    fn render(&self, target: RenderTarget) -> Result<RgbaImage, PdfError> {
        if self.backend.fail_render_at == Some(self.index) {
            return Err(PdfError::RenderError(format!("page {} is corrupt", self.index)));
        }
        // Left half transparent, right half opaque and tinted by page index
        let tint = (self.index as u8).wrapping_mul(40);
        Ok(RgbaImage::from_fn(target.width, target.height, |x, y| {
            if x < target.width / 2 {
                Rgba([0, 0, 0, 0])
            } else {
                Rgba([tint, (y % 256) as u8, 200, 255])
            }
        }))
    }
}
