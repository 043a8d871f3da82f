//! Resize orchestrator.
//!
//! Wires decode, encoder selection, the width search and the final
//! resize + encode into one call. A run moves through these stages:
//!
//! ```text
//! Idle ──► Validating ──► Searching ──► Finalizing ──► Done
//!              │             │              │
//!              └─────────────┴──────────────┴───────► Failed
//! ```
//!
//! - **Validating**: check the budget, decode the source, pick the encoder.
//!   A missing file and an undecodable file both fail here.
//! - **Searching**: run [`find_optimal_width`] with [`measure`] as its cost.
//! - **Finalizing**: resize the *original* image once more to the winning
//!   size (no trial buffer is reused) and encode it with the same policy.
//!
//! Every pixel buffer is owned by the stage that made it and dropped before
//! the call returns, on success and on every error path. Only the final
//! [`EncodedResult`] leaves the function.
//!
//! ## Diagnostics
//!
//! Progress is reported as [`ResizeEvent`]s on an optional channel. The
//! orchestrator never prints; see [`crate::output`] for rendering.
//!
//! ## Failure reporting
//!
//! [`resize_to_budget`] returns a [`ResizeError`] that says why a run
//! failed. [`resize_or_none`] keeps the older contract of "bytes or nothing"
//! for callers that only care whether output was produced.

use crate::imaging::{
    BackendError, ChromaSubsampling, EncodeError, EncoderPolicy, ImageBackend, Quality,
    RustBackend, Size, measure, resize,
};
use crate::search::{SearchOptions, find_optimal_width};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

/// Budget used when the caller does not pick one: 512 KiB.
pub const DEFAULT_MAX_BYTES: u64 = 524_288;

#[derive(Error, Debug)]
pub enum ResizeError {
    #[error("File \"{}\" was not found.", .0.display())]
    SourceNotFound(PathBuf),
    #[error("File \"{}\" could not be loaded.", path.display())]
    DecodeFailure { path: PathBuf, message: String },
    #[error("Encoding failed: {0}")]
    EncodeFailure(#[from] EncodeError),
    #[error("max_bytes must be greater than zero")]
    InvalidBudget,
}

/// Why a run failed, without the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    SourceNotFound,
    DecodeFailure,
    EncodeFailure,
    InvalidBudget,
}

impl ResizeError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::SourceNotFound(_) => FailureKind::SourceNotFound,
            Self::DecodeFailure { .. } => FailureKind::DecodeFailure,
            Self::EncodeFailure(_) => FailureKind::EncodeFailure,
            Self::InvalidBudget => FailureKind::InvalidBudget,
        }
    }

    fn from_backend(err: BackendError, path: &Path) -> Self {
        match err {
            BackendError::NotFound(path) => Self::SourceNotFound(path),
            BackendError::Decode { path, message } => Self::DecodeFailure { path, message },
            BackendError::Io(e) => Self::DecodeFailure {
                path: path.to_path_buf(),
                message: e.to_string(),
            },
        }
    }
}

/// Where a run currently is, or where it stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Validating,
    Searching,
    Finalizing,
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::Searching => "searching",
            Self::Finalizing => "finalizing",
            Self::Done => "done",
            Self::Failed => "failed",
        })
    }
}

/// Progress events emitted while a run executes.
#[derive(Debug, Clone, PartialEq)]
pub enum ResizeEvent {
    /// Source decoded and encoder chosen.
    Started {
        path: PathBuf,
        original: Size,
        policy: EncoderPolicy,
        budget: u64,
    },
    /// Source has a zero dimension; no search is run.
    Degenerate { path: PathBuf },
    /// One trial encode was measured.
    Trial {
        index: u32,
        size: Size,
        bytes: u64,
        fits: bool,
    },
    /// The search settled on a size.
    SearchFinished {
        size: Size,
        trials: u32,
        capped: bool,
    },
    /// The final buffer is ready.
    Finished { size: Size, bytes: u64 },
    /// The run failed while in `stage`.
    Failed { stage: Stage, message: String },
}

/// What to shrink and how far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeRequest {
    pub path: PathBuf,
    pub max_bytes: u64,
    pub use_lossless: bool,
}

impl ResizeRequest {
    /// Request with the default 512 KiB budget and lossy output.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_bytes: DEFAULT_MAX_BYTES,
            use_lossless: false,
        }
    }

    pub fn max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    pub fn lossless(mut self, use_lossless: bool) -> Self {
        self.use_lossless = use_lossless;
        self
    }
}

/// Encoder parameters and search guard shared by every run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResizeOptions {
    pub quality: Quality,
    pub subsampling: ChromaSubsampling,
    pub search: SearchOptions,
}

impl ResizeOptions {
    /// Encoder policy for a request's lossless switch.
    pub fn policy(&self, use_lossless: bool) -> EncoderPolicy {
        if use_lossless {
            EncoderPolicy::Lossless
        } else {
            EncoderPolicy::Lossy {
                quality: self.quality,
                subsampling: self.subsampling,
            }
        }
    }
}

/// The single buffer a successful run produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedResult {
    pub bytes: Vec<u8>,
    /// Dimensions of the encoded image.
    pub size: Size,
    /// Dimensions of the decoded source.
    pub original: Size,
    pub policy: EncoderPolicy,
    /// Trial encodes spent by the search.
    pub trials: u32,
}

impl EncodedResult {
    /// Trivial result for a source with a zero dimension.
    pub fn degenerate(original: Size, policy: EncoderPolicy) -> Self {
        Self {
            bytes: Vec::new(),
            size: Size::default(),
            original,
            policy,
            trials: 0,
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.size.is_degenerate()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Shrink the image at `request.path` until it encodes within the budget.
pub fn resize_to_budget(
    request: &ResizeRequest,
    options: &ResizeOptions,
    events: Option<Sender<ResizeEvent>>,
) -> Result<EncodedResult, ResizeError> {
    resize_to_budget_with_backend(&RustBackend::new(), request, options, events)
}

/// Like [`resize_to_budget`], but collapses every failure into `None`.
///
/// The failure is still reported on `events` before `None` is returned.
pub fn resize_or_none(
    path: impl Into<PathBuf>,
    max_bytes: u64,
    use_lossless: bool,
    events: Option<Sender<ResizeEvent>>,
) -> Option<Vec<u8>> {
    let request = ResizeRequest::new(path)
        .max_bytes(max_bytes)
        .lossless(use_lossless);
    resize_to_budget(&request, &ResizeOptions::default(), events)
        .ok()
        .map(EncodedResult::into_bytes)
}

/// Run the orchestrator against a specific backend (allows testing with mock).
pub fn resize_to_budget_with_backend(
    backend: &impl ImageBackend,
    request: &ResizeRequest,
    options: &ResizeOptions,
    events: Option<Sender<ResizeEvent>>,
) -> Result<EncodedResult, ResizeError> {
    let mut tracker = Tracker::new(events.as_ref());
    let result = run(backend, request, options, &mut tracker);
    if let Err(err) = &result {
        tracker.fail(err);
    }
    result
}

/// Current stage of one run plus its event channel.
struct Tracker<'a> {
    stage: Stage,
    events: Option<&'a Sender<ResizeEvent>>,
}

impl<'a> Tracker<'a> {
    fn new(events: Option<&'a Sender<ResizeEvent>>) -> Self {
        Self {
            stage: Stage::Idle,
            events,
        }
    }

    fn enter(&mut self, stage: Stage) {
        self.stage = stage;
    }

    fn emit(&self, event: ResizeEvent) {
        if let Some(tx) = self.events {
            tx.send(event).ok();
        }
    }

    /// Move to `Failed`, reporting the stage the error came from.
    fn fail(&mut self, err: &ResizeError) {
        let stage = std::mem::replace(&mut self.stage, Stage::Failed);
        self.emit(ResizeEvent::Failed {
            stage,
            message: err.to_string(),
        });
    }
}

fn run(
    backend: &impl ImageBackend,
    request: &ResizeRequest,
    options: &ResizeOptions,
    tracker: &mut Tracker<'_>,
) -> Result<EncodedResult, ResizeError> {
    tracker.enter(Stage::Validating);
    if request.max_bytes == 0 {
        return Err(ResizeError::InvalidBudget);
    }
    let image = backend
        .decode(&request.path)
        .map_err(|e| ResizeError::from_backend(e, &request.path))?;
    let original = Size::new(image.width(), image.height());
    let policy = options.policy(request.use_lossless);

    tracker.emit(ResizeEvent::Started {
        path: request.path.clone(),
        original,
        policy,
        budget: request.max_bytes,
    });

    if original.is_degenerate() {
        tracker.emit(ResizeEvent::Degenerate {
            path: request.path.clone(),
        });
        tracker.enter(Stage::Done);
        return Ok(EncodedResult::degenerate(original, policy));
    }

    tracker.enter(Stage::Searching);
    let outcome = find_optimal_width(
        original,
        request.max_bytes,
        &options.search,
        |size| measure(&image, size, &policy),
        tracker.events,
    )?;
    tracker.emit(ResizeEvent::SearchFinished {
        size: outcome.size,
        trials: outcome.trials,
        capped: outcome.capped,
    });

    tracker.enter(Stage::Finalizing);
    let (bytes, size) = {
        let scaled = resize(&image, outcome.size);
        (
            policy.encode(&scaled)?,
            Size::new(scaled.width(), scaled.height()),
        )
    };
    tracker.emit(ResizeEvent::Finished {
        size,
        bytes: bytes.len() as u64,
    });

    tracker.enter(Stage::Done);
    Ok(EncodedResult {
        bytes,
        size,
        original,
        policy,
        trials: outcome.trials,
    })
}
