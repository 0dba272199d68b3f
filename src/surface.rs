//! Display surfaces receive the finished composite document.

use std::path::{Path, PathBuf};

use log::info;

use crate::gallery::CompositeDocument;
use crate::pdf::PdfError;

/// Something able to show a UTF-8 HTML document with embedded images and script.
pub trait DisplaySurface {
    fn display(&mut self, document: CompositeDocument) -> Result<(), PdfError>;
}

/// Writes the document to an `.html` file for a browser or webview to open.
#[derive(Debug, Clone)]
pub struct HtmlFileSurface {
    path: PathBuf,
}

impl HtmlFileSurface {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DisplaySurface for HtmlFileSurface {
    fn display(&mut self, document: CompositeDocument) -> Result<(), PdfError> {
        let cards = document.card_count();
        std::fs::write(&self.path, document.into_html())
            .map_err(|e| PdfError::DisplayError(format!("{}: {}", self.path.display(), e)))?;
        info!("Wrote {} pages to {}", cards, self.path.display());
        Ok(())
    }
}
