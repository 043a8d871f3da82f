//! Encoder policies: one closed enum, dispatched by `match`.
//!
//! | Policy | Crate / function |
//! |---|---|
//! | `Lossless` | `image::codecs::png::PngEncoder` (default compression and filter) |
//! | `Lossy` | `mozjpeg::Compress`, baseline single scan, RGB input, fixed quality and chroma sampling |
//! | Round-trip dimensions | `image::ImageReader::into_dimensions` (header only) |
//!
//! Both encoders are deterministic: the same pixels and the same policy
//! always produce the same bytes, which is what lets the budget search treat
//! byte length as a function of width.

use super::params::{EncoderPolicy, Size};
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ImageReader};
use mozjpeg::{ColorSpace, Compress};
use std::borrow::Cow;
use std::io::Cursor;
use thiserror::Error;

/// Largest width or height libjpeg will write.
pub const JPEG_MAX_DIMENSION: u32 = 65_500;

#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("cannot encode an empty {0} image")]
    Empty(Size),
    #[error("PNG encode failed: {0}")]
    Png(#[from] image::ImageError),
    #[error("JPEG encode failed: {0}")]
    Jpeg(std::io::Error),
    #[error("{0} exceeds the JPEG limit of 65500 pixels per side")]
    TooLarge(Size),
    #[error("encoded data is unreadable: {0}")]
    Unreadable(String),
}

impl EncoderPolicy {
    /// Encode `image` into a complete in-memory file.
    pub fn encode(&self, image: &DynamicImage) -> Result<Vec<u8>, EncodeError> {
        let size = Size::new(image.width(), image.height());
        if size.is_degenerate() {
            return Err(EncodeError::Empty(size));
        }
        match self {
            Self::Lossless => encode_png(image),
            Self::Lossy {
                quality,
                subsampling,
            } => encode_jpeg(image, quality.value(), subsampling.pixel_block()),
        }
    }

    /// Read the pixel dimensions back out of an encoded buffer.
    pub fn decode_dimensions(bytes: &[u8]) -> Result<Size, EncodeError> {
        let (width, height) = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| EncodeError::Unreadable(e.to_string()))?
            .into_dimensions()
            .map_err(|e| EncodeError::Unreadable(e.to_string()))?;
        Ok(Size::new(width, height))
    }

    /// File extension matching the encoded format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Lossless => "png",
            Self::Lossy { .. } => "jpg",
        }
    }
}

fn encode_png(image: &DynamicImage) -> Result<Vec<u8>, EncodeError> {
    let mut buf = Vec::new();
    png_compatible(image).write_with_encoder(PngEncoder::new(&mut buf))?;
    Ok(buf)
}

/// PNG has no floating point samples; widen those to 16-bit integers.
fn png_compatible(image: &DynamicImage) -> Cow<'_, DynamicImage> {
    match image {
        DynamicImage::ImageRgb32F(_) => Cow::Owned(DynamicImage::ImageRgb16(image.to_rgb16())),
        DynamicImage::ImageRgba32F(_) => {
            Cow::Owned(DynamicImage::ImageRgba16(image.to_rgba16()))
        }
        _ => Cow::Borrowed(image),
    }
}

fn encode_jpeg(
    image: &DynamicImage,
    quality: u32,
    chroma_block: (u8, u8),
) -> Result<Vec<u8>, EncodeError> {
    // JPEG carries no alpha channel
    let rgb = image.to_rgb8();
    let (width, height) = rgb.dimensions();
    // libjpeg unwinds on oversized frames instead of returning an error
    if width > JPEG_MAX_DIMENSION || height > JPEG_MAX_DIMENSION {
        return Err(EncodeError::TooLarge(Size::new(width, height)));
    }

    let mut comp = Compress::new(ColorSpace::JCS_RGB);
    // Baseline: no progressive scans, no scan optimization
    comp.set_fastest_defaults();
    comp.set_size(width as usize, height as usize);
    comp.set_color_space(ColorSpace::JCS_YCbCr);
    comp.set_quality(quality as f32);
    comp.set_chroma_sampling_pixel_sizes(chroma_block, chroma_block);

    let mut started = comp
        .start_compress(Vec::with_capacity(rgb.len() / 8))
        .map_err(EncodeError::Jpeg)?;
    for row in rgb.as_raw().chunks(width as usize * 3) {
        started.write_scanlines(row).map_err(EncodeError::Jpeg)?;
    }
    started.finish().map_err(EncodeError::Jpeg)
}
