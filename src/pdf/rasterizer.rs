//! Page rasterization at a uniform scale factor.

use image::RgbaImage;
use log::debug;

use super::backend::RenderTarget;
use super::document::PageHandle;
use super::error::PdfError;

const WHITE: [u8; 3] = [255, 255, 255];

/// Upper bound on pixels per page (1 GiB of RGBA).
pub const MAX_PIXELS: u64 = 1 << 28;

/// A rendered page: 8-bit RGBA, fully opaque.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    image: RgbaImage,
}

impl PixelBuffer {
    pub(crate) fn from_image(image: RgbaImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }
}

/// Scale a source dimension to pixels, never below one pixel. Fails when the
/// result does not fit a bitmap dimension.
pub fn scaled_dimension(source: u32, scale: f32) -> Result<u32, PdfError> {
    let pixels = (f64::from(source) * f64::from(scale)).round().max(1.0);
    if pixels > f64::from(i32::MAX) {
        return Err(PdfError::RenderError(format!(
            "{} units at scale {} exceeds the maximum bitmap dimension",
            source, scale
        )));
    }
    Ok(pixels as u32)
}

#[derive(Debug, Clone, Copy)]
pub struct PageRasterizer {
    scale: f32,
    background: [u8; 3],
}

impl PageRasterizer {
    pub fn new(scale: f32) -> Result<Self, PdfError> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(PdfError::InvalidScale(scale));
        }
        Ok(Self {
            scale,
            background: WHITE,
        })
    }

    pub fn with_background(mut self, background: [u8; 3]) -> Self {
        self.background = background;
        self
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Output size for a page of `width` x `height` source units.
    pub fn target_size(&self, width: u32, height: u32) -> Result<(u32, u32), PdfError> {
        let width = scaled_dimension(width, self.scale)?;
        let height = scaled_dimension(height, self.scale)?;
        if u64::from(width) * u64::from(height) > MAX_PIXELS {
            return Err(PdfError::RenderError(format!(
                "{}x{} pixels exceeds the per-page limit of {}",
                width, height, MAX_PIXELS
            )));
        }
        Ok((width, height))
    }

    /// Render `page` and close it, whether or not rendering succeeded.
    pub fn rasterize(&self, page: PageHandle<'_>) -> Result<PixelBuffer, PdfError> {
        let result = self.render(&page);
        page.close();
        result
    }

    fn render(&self, page: &PageHandle<'_>) -> Result<PixelBuffer, PdfError> {
        let (width, height) = self.target_size(page.width(), page.height())?;
        let mut image = page.render(RenderTarget {
            width,
            height,
            background: self.background,
        })?;

        if image.dimensions() != (width, height) {
            return Err(PdfError::RenderError(format!(
                "page {} rendered at {}x{}, expected {}x{}",
                page.index(),
                image.width(),
                image.height(),
                width,
                height
            )));
        }

        flatten(&mut image, self.background);
        debug!("Rasterized page {} at {}x{}", page.index(), width, height);
        Ok(PixelBuffer::from_image(image))
    }
}

/// Composite every pixel over an opaque background.
fn flatten(image: &mut RgbaImage, background: [u8; 3]) {
    for pixel in image.pixels_mut() {
        let alpha = u32::from(pixel[3]);
        if alpha == 255 {
            continue;
        }
        for channel in 0..3 {
            let fg = u32::from(pixel[channel]);
            let bg = u32::from(background[channel]);
            pixel[channel] = ((fg * alpha + bg * (255 - alpha) + 127) / 255) as u8;
        }
        pixel[3] = 255;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::document::DocumentHandle;
    use crate::pdf::testing::{Counters, FakeBackend, FAKE_PDF};

    #[test]
    fn dimensions_follow_rounded_scale() {
        let raster = PageRasterizer::new(2.0).unwrap();
        assert_eq!(raster.target_size(100, 200).unwrap(), (200, 400));
        assert_eq!(raster.target_size(150, 150).unwrap(), (300, 300));

        let unit = PageRasterizer::new(1.0).unwrap();
        assert_eq!(unit.target_size(612, 792).unwrap(), (612, 792));

        assert_eq!(scaled_dimension(10, 0.25).unwrap(), 3);
        assert_eq!(scaled_dimension(10, 0.24).unwrap(), 2);
    }

    #[test]
    fn tiny_scales_clamp_to_one_pixel() {
        for scale in [1e-3_f32, 1e-6, f32::MIN_POSITIVE] {
            let raster = PageRasterizer::new(scale).unwrap();
            assert_eq!(raster.target_size(100, 200).unwrap(), (1, 1));
        }
    }

    #[test]
    fn huge_scales_are_errors() {
        let raster = PageRasterizer::new(1e10).unwrap();
        assert!(matches!(
            raster.target_size(612, 792),
            Err(PdfError::RenderError(_))
        ));
        assert!(scaled_dimension(612, 1e10).is_err());

        // Each side fits an i32 but the area is over budget
        let raster = PageRasterizer::new(100.0).unwrap();
        assert!(raster.target_size(612, 792).is_err());
    }

    #[test]
    fn huge_scale_fails_without_rendering_and_closes_page() {
        let backend = FakeBackend::new(&[(612.0, 792.0)]);
        let doc = DocumentHandle::open(&backend, FAKE_PDF).unwrap();
        let raster = PageRasterizer::new(1e10).unwrap();

        let err = raster.rasterize(doc.page(0).unwrap()).unwrap_err();
        assert!(matches!(err, PdfError::RenderError(_)));
        assert_eq!(Counters::get(&backend.counters.pages_closed), 1);
    }

    #[test]
    fn fractional_page_uses_whole_source_units() {
        let backend = FakeBackend::new(&[(595.276, 841.89)]);
        let doc = DocumentHandle::open(&backend, FAKE_PDF).unwrap();
        let raster = PageRasterizer::new(2.0).unwrap();

        let buffer = raster.rasterize(doc.page(0).unwrap()).unwrap();
        assert_eq!((buffer.width(), buffer.height()), (1190, 1682));
    }

    #[test]
    fn rejects_non_positive_scale() {
        for scale in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            assert!(matches!(
                PageRasterizer::new(scale),
                Err(PdfError::InvalidScale(_))
            ));
        }
    }

    #[test]
    fn rasterize_fills_background_and_closes_page() {
        let backend = FakeBackend::new(&[(100.0, 200.0)]);
        let doc = DocumentHandle::open(&backend, FAKE_PDF).unwrap();
        let raster = PageRasterizer::new(2.0).unwrap();

        let buffer = raster.rasterize(doc.page(0).unwrap()).unwrap();
        assert_eq!((buffer.width(), buffer.height()), (200, 400));
        assert!(buffer.as_raw().chunks(4).all(|px| px[3] == 255));
        // Transparent half becomes the white background
        assert_eq!(&buffer.as_raw()[..4], &[255, 255, 255, 255]);
        assert_eq!(Counters::get(&backend.counters.pages_closed), 1);
    }

    #[test]
    fn failed_render_still_closes_page() {
        let backend = FakeBackend::new(&[(100.0, 200.0)]).failing_at(0);
        let doc = DocumentHandle::open(&backend, FAKE_PDF).unwrap();
        let raster = PageRasterizer::new(1.0).unwrap();

        let err = raster.rasterize(doc.page(0).unwrap()).unwrap_err();
        assert!(matches!(err, PdfError::RenderError(_)));
        assert_eq!(Counters::get(&backend.counters.pages_opened), 1);
        assert_eq!(Counters::get(&backend.counters.pages_closed), 1);
    }

    #[test]
    fn custom_background_is_used_for_transparent_pixels() {
        let backend = FakeBackend::new(&[(4.0, 4.0)]);
        let doc = DocumentHandle::open(&backend, FAKE_PDF).unwrap();
        let raster = PageRasterizer::new(1.0).unwrap().with_background([10, 20, 30]);

        let buffer = raster.rasterize(doc.page(0).unwrap()).unwrap();
        assert_eq!(&buffer.as_raw()[..4], &[10, 20, 30, 255]);
    }
}
