//! PDF side of the pipeline: opening documents, rasterizing pages and
//! encoding them as embeddable PNGs.
//!
//! This module provides:
//! - Scoped document and page handles with guaranteed release
//! - Deterministic page rasterization at a uniform scale
//! - Lossless PNG encoding with base64 text output

mod backend;
mod document;
mod encoder;
mod error;
mod pdfium;
mod rasterizer;

#[cfg(test)]
pub(crate) mod testing;

pub use backend::*;
pub use document::*;
pub use encoder::*;
pub use error::*;
pub use pdfium::PdfiumBackend;
pub use rasterizer::*;
