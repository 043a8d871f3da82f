//! Image source trait and shared error type.
//!
//! Reading pixels off storage is not part of the budget search itself. The
//! orchestrator only needs `decode(path) -> image | error`, expressed here as
//! the [`ImageBackend`] trait so tests can hand it canned images.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate's pure-Rust decoders.

use image::DynamicImage;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("File \"{}\" was not found.", .0.display())]
    NotFound(PathBuf),
    #[error("File \"{}\" could not be loaded: {message}", path.display())]
    Decode { path: PathBuf, message: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for image sources.
///
/// Implementations must tell a missing file apart from one that exists but
/// cannot be decoded; the orchestrator reports the two differently.
pub trait ImageBackend {
    /// Read and decode the image at `path`.
    fn decode(&self, path: &Path) -> Result<DynamicImage, BackendError>;
}
