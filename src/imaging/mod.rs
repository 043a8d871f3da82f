//! Image processing — pure Rust apart from the mozjpeg encoder.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader` (format sniffed from content) |
//! | **Resize** | max-fit dimensions + `resize_exact` with Lanczos3 |
//! | **Encode → PNG** | `image::codecs::png::PngEncoder` |
//! | **Encode → JPEG** | `mozjpeg::Compress` with explicit chroma sampling |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Sizes and encoder policies
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Encoder**: [`EncoderPolicy::encode`] and the round-trip dimension read
//! - **Operations**: resize transform and trial cost function

pub mod backend;
mod calculations;
pub mod encoder;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, ImageBackend};
pub use calculations::{height_for_width, heuristic_lower_bound, max_fit_dimensions};
pub use encoder::EncodeError;
pub use operations::{measure, resize};
pub use params::{ChromaSubsampling, EncoderPolicy, Quality, Size};
pub use rust_backend::{RustBackend, has_supported_extension};
