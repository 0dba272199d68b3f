//! Lossless PNG encoding of rendered pages and their base64 text form.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder, ImageFormat};

use super::error::PdfError;
use super::rasterizer::PixelBuffer;

/// PNG bytes for one page. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    bytes: Vec<u8>,
}

impl EncodedImage {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Standard (padded, unwrapped) base64 of the PNG bytes.
    pub fn to_embeddable_text(&self) -> String {
        STANDARD.encode(&self.bytes)
    }

    pub fn data_uri(&self) -> String {
        format!("data:image/png;base64,{}", self.to_embeddable_text())
    }

    /// Decode back into pixels.
    pub fn decode(&self) -> Result<PixelBuffer, PdfError> {
        let image = image::load_from_memory_with_format(&self.bytes, ImageFormat::Png)
            .map_err(|e| PdfError::EncodeError(e.to_string()))?;
        Ok(PixelBuffer::from_image(image.to_rgba8()))
    }
}

/// Encode a buffer at maximum compression. The buffer is released on return.
pub fn encode(buffer: PixelBuffer) -> Result<EncodedImage, PdfError> {
    let mut bytes = Vec::new();
    PngEncoder::new_with_quality(&mut bytes, CompressionType::Best, FilterType::Adaptive)
        .write_image(
            buffer.as_raw(),
            buffer.width(),
            buffer.height(),
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| PdfError::EncodeError(e.to_string()))?;
    Ok(EncodedImage { bytes })
}

pub fn to_embeddable_text(image: &EncodedImage) -> String {
    image.to_embeddable_text()
}
