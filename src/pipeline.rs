//! The driver: open, rasterize and encode every page, assemble, hand off.
//!
//! Any failure aborts the whole pass. Errors are returned to the caller,
//! which decides how to report them; the display surface only ever sees a
//! complete document.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, info, warn};
use rayon::prelude::*;

use crate::config::RenderOptions;
use crate::gallery::{assemble, CompositeDocument};
use crate::pdf::{encode, Backend, DocumentHandle, EncodedImage, PageRasterizer, PdfError};
use crate::source::{read_source, SourceProvider};
use crate::surface::DisplaySurface;

/// Shared flag checked between pages.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), PdfError> {
        if self.is_cancelled() {
            return Err(PdfError::Cancelled);
        }
        Ok(())
    }
}

pub struct Pipeline<B> {
    backend: B,
    options: RenderOptions,
    cancel: CancelToken,
}

impl<B: Backend> Pipeline<B> {
    pub fn new(backend: B, options: RenderOptions) -> Result<Self, PdfError> {
        options.validate()?;
        Ok(Self {
            backend,
            options,
            cancel: CancelToken::new(),
        })
    }

    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Read `source` fully and render it.
    pub fn render<S>(&self, source: &S) -> Result<CompositeDocument, PdfError>
    where
        S: SourceProvider + ?Sized,
    {
        let result = read_source(source).and_then(|bytes| self.render_bytes(&bytes));
        if let Err(e) = &result {
            debug!("Rendering {} failed: {}", source.describe(), e);
        }
        result
    }

    pub fn render_bytes(&self, bytes: &[u8]) -> Result<CompositeDocument, PdfError> {
        let rasterizer =
            PageRasterizer::new(self.options.scale)?.with_background(self.options.background);

        let images = match self.backend.as_parallel() {
            Some(backend) if self.options.parallel => {
                rasterize_parallel(backend, bytes, &rasterizer, &self.cancel)?
            }
            _ => {
                if self.options.parallel {
                    warn!("Backend is not thread-safe; rendering pages sequentially");
                }
                rasterize_sequential(&self.backend, bytes, &rasterizer, &self.cancel)?
            }
        };

        let document = assemble(images);
        info!(
            "Assembled {} pages at scale {}",
            document.card_count(),
            rasterizer.scale()
        );
        Ok(document)
    }

    /// Render and hand the result to `surface`. Nothing is displayed on failure.
    pub fn present<S, D>(&self, source: &S, surface: &mut D) -> Result<(), PdfError>
    where
        S: SourceProvider + ?Sized,
        D: DisplaySurface + ?Sized,
    {
        let document = self.render(source)?;
        surface.display(document)
    }
}

fn process_page(
    document: &DocumentHandle<'_>,
    index: u32,
    rasterizer: &PageRasterizer,
) -> Result<EncodedImage, PdfError> {
    let page = document.page(index)?;
    let buffer = rasterizer.rasterize(page)?;
    let image = encode(buffer)?;
    debug!("Encoded page {} ({} bytes)", index, image.as_bytes().len());
    Ok(image)
}

fn rasterize_sequential<B>(
    backend: &B,
    bytes: &[u8],
    rasterizer: &PageRasterizer,
    cancel: &CancelToken,
) -> Result<Vec<EncodedImage>, PdfError>
where
    B: Backend + ?Sized,
{
    let mut document = DocumentHandle::open(backend, bytes)?;
    let mut images = Vec::with_capacity(document.page_count() as usize);
    for index in 0..document.page_count() {
        cancel.check()?;
        images.push(process_page(&document, index, rasterizer)?);
    }
    document.close();
    Ok(images)
}

/// Each page task opens its own handle over the shared bytes; results are
/// tagged with their page index and put back in page order before assembly.
fn rasterize_parallel(
    backend: &(dyn Backend + Sync),
    bytes: &[u8],
    rasterizer: &PageRasterizer,
    cancel: &CancelToken,
) -> Result<Vec<EncodedImage>, PdfError> {
    let page_count = DocumentHandle::open(backend, bytes)?.page_count();

    let mut tagged = (0..page_count)
        .into_par_iter()
        .map(|index| {
            cancel.check()?;
            let document = DocumentHandle::open(backend, bytes)?;
            process_page(&document, index, rasterizer).map(|image| (index, image))
        })
        .collect::<Result<Vec<_>, PdfError>>()?;

    tagged.sort_unstable_by_key(|(index, _)| *index);
    Ok(tagged.into_iter().map(|(_, image)| image).collect())
}
