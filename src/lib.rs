// pdf-scroll - PDF to scrollable HTML gallery
//
// Renders every page of a PDF with PDFium, encodes the pages as PNG and
// stitches them into one HTML document a webview can scroll through.

pub mod commands;
pub mod config;
pub mod gallery;
pub mod pdf;
pub mod pipeline;
pub mod source;
pub mod surface;

pub use config::RenderOptions;
pub use gallery::{assemble, CompositeDocument};
pub use pdf::{
    encode, DocumentHandle, EncodedImage, PageHandle, PageRasterizer, PdfError, PdfiumBackend,
    PixelBuffer,
};
pub use pipeline::{CancelToken, Pipeline};
pub use source::{FileSource, SourceProvider};
pub use surface::{DisplaySurface, HtmlFileSurface};
