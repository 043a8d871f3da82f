//! Resize transform and trial cost function.
//!
//! These combine the pure dimension math in `calculations` with actual pixel
//! work. Neither keeps state between calls: a repeated `measure` at the same
//! size redoes the full resize and encode.

use super::calculations::max_fit_dimensions;
use super::encoder::EncodeError;
use super::params::{EncoderPolicy, Size};
use image::DynamicImage;
use image::imageops::FilterType;

/// Scale `image` to the largest size that fits inside `target`, keeping its
/// aspect ratio.
///
/// Always returns a new image; the source is left untouched. Applying the
/// transform again with the same `target` yields the same dimensions.
pub fn resize(image: &DynamicImage, target: Size) -> DynamicImage {
    let source = Size::new(image.width(), image.height());
    let fitted = max_fit_dimensions(source, target);
    if fitted == source {
        return image.clone();
    }
    image.resize_exact(fitted.width, fitted.height, FilterType::Lanczos3)
}

/// Encoded byte length of `image` resized to `target` under `policy`.
///
/// The scaled copy and the encoded bytes are dropped before returning; only
/// the length survives.
pub fn measure(
    image: &DynamicImage,
    target: Size,
    policy: &EncoderPolicy,
) -> Result<u64, EncodeError> {
    let scaled = resize(image, target);
    let encoded = policy.encode(&scaled)?;
    Ok(encoded.len() as u64)
}
