use image::{
    codecs::{
        jpeg::JpegEncoder,
        png::{CompressionType, FilterType as PngFilter, PngEncoder},
    },
    imageops::FilterType,
    DynamicImage, Rgb, RgbImage,
};

use crate::{
    api::error,
    modules::extraction::{model::CompressionConfig, schema::FileKind},
};

// below this the text is no longer legible to OCR
const MIN_DIMENSION: u32 = 256;

/// Shrinks oversized images so they fit the OCR service's payload ceiling.
#[derive(Debug, Clone, Copy)]
pub struct ImageCompressor {
    config: CompressionConfig,
}

impl ImageCompressor {
    pub fn new(config: CompressionConfig) -> Self {
        Self { config }
    }

    pub fn needs_compression(&self, len: usize) -> bool {
        len > self.config.threshold
    }

    /// Re-encodes the image so it is never larger than `bytes`.
    ///
    /// Images within the maximum dimension are re-encoded as JPEG (a second,
    /// lower-quality pass runs when the first is still over the threshold) and
    /// the input is returned unchanged if that does not help. Larger images are
    /// resized to fit (never upscaling); the smallest of JPEG and PNG is kept,
    /// and the bound is stepped down until the result fits under the input.
    pub fn compress(&self, bytes: &[u8]) -> Result<Vec<u8>, error::SystemError> {
        let img = image::load_from_memory(bytes)?;
        let max = self.config.max_dimension;

        if img.width().max(img.height()) <= max {
            let out = self.encode_smallest(&img, false)?;
            if out.len() > bytes.len() {
                return Ok(bytes.to_vec());
            }
            return Ok(out);
        }

        let mut bound = max;
        while bound >= MIN_DIMENSION {
            let resized = img.resize(bound, bound, FilterType::Lanczos3);
            let out = self.encode_smallest(&resized, true)?;
            if out.len() <= bytes.len() {
                return Ok(out);
            }

            log::info!(
                "Re-encoded at {}px is still larger than the upload ({}KB > {}KB), shrinking further",
                bound,
                out.len() / 1024,
                bytes.len() / 1024
            );
            bound = bound * 3 / 4;
        }

        Err(error::SystemError::bad_request(FileKind::Image.too_large_for_ocr_message()))
    }

    fn encode_smallest(
        &self,
        img: &DynamicImage,
        lossless: bool,
    ) -> Result<Vec<u8>, error::SystemError> {
        let flat = opaque(img);
        let mut best = encode_jpeg(&flat, self.config.primary_quality)?;

        if best.len() > self.config.threshold {
            log::info!(
                "Still too large after first pass ({}KB), re-encoding at quality {}",
                best.len() / 1024,
                self.config.fallback_quality
            );
            let second = encode_jpeg(&flat, self.config.fallback_quality)?;
            if second.len() < best.len() {
                best = second;
            }
        }

        if lossless {
            let png = encode_png(&flat)?;
            if png.len() < best.len() {
                best = png;
            }
        }

        Ok(best)
    }
}

impl Default for ImageCompressor {
    fn default() -> Self {
        Self::new(CompressionConfig::default())
    }
}

/// Drops the alpha channel by compositing onto white, so transparent
/// backgrounds don't turn black under JPEG.
fn flatten(img: &DynamicImage) -> RgbImage {
    if !img.color().has_alpha() {
        return img.to_rgb8();
    }

    let rgba = img.to_rgba8();
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let p = rgba.get_pixel(x, y);
        let alpha = p[3] as u16;
        let blend = |c: u8| ((c as u16 * alpha + 255 * (255 - alpha)) / 255) as u8;
        Rgb([blend(p[0]), blend(p[1]), blend(p[2])])
    })
}

/// Flattened 8-bit image, kept single-channel for grayscale sources.
fn opaque(img: &DynamicImage) -> DynamicImage {
    if img.color().has_color() {
        return DynamicImage::ImageRgb8(flatten(img));
    }
    if !img.color().has_alpha() {
        return DynamicImage::ImageLuma8(img.to_luma8());
    }
    DynamicImage::ImageLuma8(DynamicImage::ImageRgb8(flatten(img)).to_luma8())
}

fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<Vec<u8>, error::SystemError> {
    let mut buffer = Vec::new();
    img.write_with_encoder(JpegEncoder::new_with_quality(&mut buffer, quality))?;
    Ok(buffer)
}

fn encode_png(img: &DynamicImage) -> Result<Vec<u8>, error::SystemError> {
    let mut buffer = Vec::new();
    img.write_with_encoder(PngEncoder::new_with_quality(
        &mut buffer,
        CompressionType::Default,
        PngFilter::Adaptive,
    ))?;
    Ok(buffer)
}
