//! Shared test utilities.
//!
//! Synthesizes deterministic images instead of shipping binary fixtures.
//! Gradients compress well, noise compresses badly; between them the encoders
//! can be pushed to either end of the size curve.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = tempfile::TempDir::new().unwrap();
//! let path = write_png(tmp.path(), "noise.png", &noise_image(64, 48, 1));
//! ```

use image::{DynamicImage, Rgb, RgbImage};
use std::path::{Path, PathBuf};

// =========================================================================
// Image synthesis
// =========================================================================

/// Smooth diagonal RGB gradient.
pub fn gradient_image(width: u32, height: u32) -> DynamicImage {
    let img = RgbImage::from_fn(width, height, |x, y| {
        let r = (x * 255 / width.max(1)) as u8;
        let g = (y * 255 / height.max(1)) as u8;
        let b = ((x + y) * 255 / (width + height).max(1)) as u8;
        Rgb([r, g, b])
    });
    DynamicImage::ImageRgb8(img)
}

/// Pseudo-random RGB noise, reproducible from `seed`.
pub fn noise_image(width: u32, height: u32, seed: u64) -> DynamicImage {
    let mut state = seed.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
    let img = RgbImage::from_fn(width, height, |_, _| {
        // 64-bit LCG, high bits are the best distributed
        state = state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        let bits = (state >> 40) as u32;
        Rgb([bits as u8, (bits >> 8) as u8, (bits >> 16) as u8])
    });
    DynamicImage::ImageRgb8(img)
}

// =========================================================================
// Fixture files
// =========================================================================

/// Save `image` as PNG under `dir` and return its path.
pub fn write_png(dir: &Path, name: &str, image: &DynamicImage) -> PathBuf {
    let path = dir.join(name);
    image
        .save_with_format(&path, image::ImageFormat::Png)
        .unwrap_or_else(|e| panic!("failed to write fixture {}: {e}", path.display()));
    path
}
