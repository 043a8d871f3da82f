//! Pure Rust image source.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Existence check | `Path::is_file` |
//! | Format sniffing | `image::ImageReader::with_guessed_format` (magic bytes, not extension) |
//! | Decode (JPEG, PNG, TIFF, WebP) | `image` crate (pure Rust decoders) |

use super::backend::{BackendError, ImageBackend};
use image::{DynamicImage, ImageFormat, ImageReader};
use std::path::Path;

/// Formats whose decoders are compiled in.
const DECODABLE: &[(&str, ImageFormat)] = &[
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("png", ImageFormat::Png),
    ("tif", ImageFormat::Tiff),
    ("tiff", ImageFormat::Tiff),
    ("webp", ImageFormat::WebP),
];

/// Whether `path` has an extension the backend can decode.
///
/// Used by batch mode to pick candidate files; `decode` itself sniffs
/// content and ignores extensions.
pub fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            DECODABLE
                .iter()
                .any(|(known, fmt)| ext.eq_ignore_ascii_case(known) && fmt.reading_enabled())
        })
}

/// Image source backed by the local filesystem.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageBackend for RustBackend {
    fn decode(&self, path: &Path) -> Result<DynamicImage, BackendError> {
        if !path.is_file() {
            return Err(BackendError::NotFound(path.to_path_buf()));
        }
        let decode_error = |message: String| BackendError::Decode {
            path: path.to_path_buf(),
            message,
        };
        ImageReader::open(path)?
            .with_guessed_format()?
            .decode()
            .map_err(|e| decode_error(e.to_string()))
    }
}
