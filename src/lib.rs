//! # budget-resize
//!
//! Shrinks an image to the largest aspect-preserving size whose encoded file
//! fits a byte budget.
//!
//! Encoded size is not a closed-form function of dimensions: it depends on
//! content, encoder and resampling. So the only way to know whether a width
//! fits is to resize, encode and measure. The crate treats that as an
//! expensive black-box cost function and binary-searches the width.
//!
//! # Pipeline
//!
//! ```text
//! decode ──► pick encoder ──► search width ──► resize + encode once more
//!               │                  │
//!           Lossless (PNG)    trial = resize + encode + measure, discard
//!           Lossy (JPEG)      O(log width) trials
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Sizes, encoder policies, decode backend, resize transform, trial cost |
//! | [`search`] | Binary search over widths against a cost function |
//! | [`resize`] | Orchestrator: validate → search → finalize, events, tagged errors |
//! | [`persist`] | Caller-side output naming and writing |
//! | [`config`] | `budget-resize.toml` loading, merging, and validation |
//! | [`output`] | CLI output formatting for events, batch lines, and JSON reports |
//!
//! # Design Decisions
//!
//! ## Closed Encoder Policy
//!
//! The encoder is an enum, [`imaging::EncoderPolicy`], not a trait object.
//! There are exactly two policies and the search needs nothing from them but
//! `encode`, so a `match` is all the dispatch required.
//!
//! ## Lower Bound as the Answer
//!
//! The search returns its lower bound, which may be one step short of the
//! widest width it could have found, and may even be the heuristic floor
//! that was never measured. The returned width is never adjusted upward;
//! see [`search`] for the details and
//! [`search::SearchOutcome::last_feasible`] for the widest measured fit.
//!
//! ## Events Instead of Printing
//!
//! The core never writes to stdout. Progress goes out as
//! [`resize::ResizeEvent`]s on an optional channel, which the CLI renders via
//! [`output`]. With no channel the core is silent.
//!
//! ## Single-Threaded Core
//!
//! Each trial's bounds depend on the previous trial's result, so the search
//! is strictly sequential. Batch mode processes files one after another.

pub mod config;
pub mod imaging;
pub mod output;
pub mod persist;
pub mod resize;
pub mod search;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use resize::{
    DEFAULT_MAX_BYTES, EncodedResult, FailureKind, ResizeError, ResizeEvent, ResizeOptions,
    ResizeRequest, resize_or_none, resize_to_budget, resize_to_budget_with_backend,
};
