//! Value types shared by every stage of a budget resize.
//!
//! These describe *what* to produce, never *how*. The search engine, the
//! trial cost function and the orchestrator all speak in these types, which
//! keeps the dimension math testable without decoding or encoding anything.
//!
//! ## Types
//!
//! - [`Size`] — pixel dimensions; derived sizes obey the aspect-ratio invariant.
//! - [`Quality`] — lossy encoding quality (1–100, default 95). Clamped on construction.
//! - [`ChromaSubsampling`] — JPEG chroma layout (default 4:2:0).
//! - [`EncoderPolicy`] — closed choice between lossless and lossy output.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Pixel dimensions of an image or a resize target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when either axis is zero.
    pub fn is_degenerate(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Size of this image scaled to `width`, keeping the aspect ratio.
    ///
    /// `height = floor(width * self.height / self.width)`. A zero-width
    /// original yields a zero height instead of dividing by zero.
    pub fn with_width(self, width: u32) -> Self {
        Self {
            width,
            height: super::calculations::height_for_width(self, width),
        }
    }

    pub fn pixel_count(self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x {}", self.width, self.height)
    }
}

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub struct Quality(u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(95)
    }
}

impl From<u32> for Quality {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl From<Quality> for u32 {
    fn from(quality: Quality) -> Self {
        quality.0
    }
}

/// JPEG chroma subsampling layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ChromaSubsampling {
    /// Full chroma resolution.
    #[serde(rename = "4:4:4")]
    Ratio444,
    /// Half horizontal chroma resolution.
    #[serde(rename = "4:2:2")]
    Ratio422,
    /// Half horizontal and half vertical chroma resolution.
    #[default]
    #[serde(rename = "4:2:0")]
    Ratio420,
}

impl ChromaSubsampling {
    /// Pixel block covered by one chroma sample, as `(horizontal, vertical)`.
    pub fn pixel_block(self) -> (u8, u8) {
        match self {
            Self::Ratio444 => (1, 1),
            Self::Ratio422 => (2, 1),
            Self::Ratio420 => (2, 2),
        }
    }
}

impl fmt::Display for ChromaSubsampling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ratio444 => "4:4:4",
            Self::Ratio422 => "4:2:2",
            Self::Ratio420 => "4:2:0",
        })
    }
}

/// Which compressor a run uses. Selected once per run and never changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncoderPolicy {
    /// PNG. Output size depends on pixel content only.
    Lossless,
    /// JPEG at a fixed quality and chroma layout.
    Lossy {
        quality: Quality,
        subsampling: ChromaSubsampling,
    },
}

impl EncoderPolicy {
    /// Lossy policy at quality 95 with 4:2:0 subsampling.
    pub fn lossy() -> Self {
        Self::Lossy {
            quality: Quality::default(),
            subsampling: ChromaSubsampling::default(),
        }
    }

    /// Map the caller's boolean switch onto a policy.
    pub fn select(use_lossless: bool) -> Self {
        if use_lossless {
            Self::Lossless
        } else {
            Self::lossy()
        }
    }
}

impl Default for EncoderPolicy {
    fn default() -> Self {
        Self::lossy()
    }
}

impl fmt::Display for EncoderPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lossless => f.write_str("PNG"),
            Self::Lossy {
                quality,
                subsampling,
            } => write!(f, "JPEG q{} {}", quality.value(), subsampling),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_clamps_to_valid_range() {
        assert_eq!(Quality::new(0).value(), 1);
        assert_eq!(Quality::new(50).value(), 50);
        assert_eq!(Quality::new(150).value(), 100);
    }

    #[test]
    fn quality_default_is_95() {
        assert_eq!(Quality::default().value(), 95);
    }

    #[test]
    fn with_width_floors_height() {
        let original = Size::new(4000, 3000);
        assert_eq!(original.with_width(2000), Size::new(2000, 1500));
        // 333 * 3000 / 4000 = 249.75
        assert_eq!(original.with_width(333), Size::new(333, 249));
    }

    #[test]
    fn with_width_on_zero_width_original() {
        assert_eq!(Size::new(0, 10).with_width(5), Size::new(5, 0));
    }

    #[test]
    fn degenerate_sizes() {
        assert!(Size::new(0, 10).is_degenerate());
        assert!(Size::new(10, 0).is_degenerate());
        assert!(!Size::new(1, 1).is_degenerate());
    }

    #[test]
    fn size_displays_like_console_output() {
        assert_eq!(Size::new(800, 600).to_string(), "800 x 600");
    }

    #[test]
    fn select_maps_switch_to_policy() {
        assert_eq!(EncoderPolicy::select(true), EncoderPolicy::Lossless);
        assert_eq!(
            EncoderPolicy::select(false),
            EncoderPolicy::Lossy {
                quality: Quality::new(95),
                subsampling: ChromaSubsampling::Ratio420,
            }
        );
    }

    #[test]
    fn subsampling_pixel_blocks() {
        assert_eq!(ChromaSubsampling::Ratio444.pixel_block(), (1, 1));
        assert_eq!(ChromaSubsampling::Ratio422.pixel_block(), (2, 1));
        assert_eq!(ChromaSubsampling::Ratio420.pixel_block(), (2, 2));
    }

    #[test]
    fn policy_display() {
        assert_eq!(EncoderPolicy::Lossless.to_string(), "PNG");
        assert_eq!(EncoderPolicy::lossy().to_string(), "JPEG q95 4:2:0");
    }
}
