//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Single image
//!
//! ```text
//! photos/dawn.jpg
//!     4000 x 3000 → JPEG q95 4:2:0, budget 524288 bytes
//!     trial 1: 4000 x 3000 = 2415711 bytes (over)
//!     trial 2: 2021 x 1515 = 689002 bytes (over)
//!     trial 3: 1032 x 774 = 201339 bytes (fits)
//!     ...
//! 1723 x 1292
//!     encoded 1723 x 1292 in 517845 bytes
//! ```
//!
//! ## Batch
//!
//! ```text
//! ok    photos/dawn.jpg  4000 x 3000 → 1723 x 1292  517845 bytes
//! fail  photos/notes.png  File "photos/notes.png" could not be loaded.
//! fail  photos/sky.jpg  Failed to write out/sky.jpg.jpg: Permission denied (os error 13)
//! ```
//!
//! # Architecture
//!
//! Every `format_*` function returns lines and does no I/O, so formatting is
//! unit tested without capturing stdout. The `print_*` wrappers write those
//! lines out.

use crate::imaging::Size;
use crate::persist::PersistError;
use crate::resize::{EncodedResult, FailureKind, ResizeError, ResizeEvent};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Indentation for context lines under a header.
const INDENT: &str = "    ";

/// Format a single progress event as display lines.
pub fn format_event(event: &ResizeEvent) -> Vec<String> {
    match event {
        ResizeEvent::Started {
            path,
            original,
            policy,
            budget,
        } => vec![
            path.display().to_string(),
            format!("{INDENT}{original} \u{2192} {policy}, budget {budget} bytes"),
        ],
        ResizeEvent::Degenerate { path } => vec![format!(
            "{INDENT}{} has a zero dimension, nothing to resize",
            path.display()
        )],
        ResizeEvent::Trial {
            index,
            size,
            bytes,
            fits,
        } => {
            let verdict = if *fits { "fits" } else { "over" };
            vec![format!(
                "{INDENT}trial {index}: {size} = {bytes} bytes ({verdict})"
            )]
        }
        ResizeEvent::SearchFinished {
            size,
            trials,
            capped,
        } => {
            let mut lines = vec![size.to_string()];
            if *capped {
                lines.push(format!("{INDENT}stopped after {trials} trials (cap reached)"));
            }
            lines
        }
        ResizeEvent::Finished { size, bytes } => {
            vec![format!("{INDENT}encoded {size} in {bytes} bytes")]
        }
        ResizeEvent::Failed { stage, message } => {
            vec![message.clone(), format!("{INDENT}(while {stage})")]
        }
    }
}

/// Print a progress event to stdout.
pub fn print_event(event: &ResizeEvent) {
    for line in format_event(event) {
        println!("{}", line);
    }
}

/// Format one line of batch output.
pub fn format_batch_line(path: &Path, outcome: &Result<EncodedResult, ResizeError>) -> String {
    match outcome {
        Ok(result) => format!(
            "ok    {}  {} \u{2192} {}  {} bytes",
            path.display(),
            result.original,
            result.size,
            result.bytes.len()
        ),
        Err(err) => format!("fail  {}  {}", path.display(), err),
    }
}

/// Format the batch line for a run whose output could not be saved.
pub fn format_save_failure(path: &Path, err: &PersistError) -> String {
    format!("fail  {}  {}", path.display(), err)
}

/// Format the closing summary of a batch run.
pub fn format_batch_summary(succeeded: usize, failed: usize) -> String {
    let noun = |n: usize| if n == 1 { "image" } else { "images" };
    format!(
        "Resized {} {}, {} failed",
        succeeded,
        noun(succeeded),
        failed
    )
}

/// Machine-readable summary of one run, printed with `--json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResizeReport {
    pub source: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    pub encoder: String,
    pub original: Size,
    pub size: Size,
    pub bytes: usize,
    pub trials: u32,
}

impl ResizeReport {
    pub fn new(source: &Path, output: Option<&Path>, result: &EncodedResult) -> Self {
        Self {
            source: source.to_path_buf(),
            output: output.map(Path::to_path_buf),
            encoder: result.policy.to_string(),
            original: result.original,
            size: result.size,
            bytes: result.bytes.len(),
            trials: result.trials,
        }
    }
}

/// Machine-readable failure, printed with `--json` in place of a report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailureReport {
    pub source: PathBuf,
    pub kind: FailureKind,
    pub error: String,
}

impl FailureReport {
    pub fn new(source: &Path, err: &ResizeError) -> Self {
        Self {
            source: source.to_path_buf(),
            kind: err.kind(),
            error: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::EncoderPolicy;
    use crate::resize::Stage;

    fn result() -> EncodedResult {
        EncodedResult {
            bytes: vec![0; 1234],
            size: Size::new(400, 300),
            original: Size::new(800, 600),
            policy: EncoderPolicy::lossy(),
            trials: 9,
        }
    }

    // =========================================================================
    // Event formatting
    // =========================================================================

    #[test]
    fn started_shows_path_and_plan() {
        let lines = format_event(&ResizeEvent::Started {
            path: PathBuf::from("photos/dawn.jpg"),
            original: Size::new(4000, 3000),
            policy: EncoderPolicy::lossy(),
            budget: 524_288,
        });
        assert_eq!(
            lines,
            vec![
                "photos/dawn.jpg",
                "    4000 x 3000 \u{2192} JPEG q95 4:2:0, budget 524288 bytes",
            ]
        );
    }

    #[test]
    fn trial_shows_verdict() {
        let over = format_event(&ResizeEvent::Trial {
            index: 1,
            size: Size::new(4000, 3000),
            bytes: 2_000_000,
            fits: false,
        });
        assert_eq!(over, vec!["    trial 1: 4000 x 3000 = 2000000 bytes (over)"]);

        let fits = format_event(&ResizeEvent::Trial {
            index: 4,
            size: Size::new(100, 75),
            bytes: 9_000,
            fits: true,
        });
        assert_eq!(fits, vec!["    trial 4: 100 x 75 = 9000 bytes (fits)"]);
    }

    #[test]
    fn search_finished_prints_size_like_console() {
        let lines = format_event(&ResizeEvent::SearchFinished {
            size: Size::new(1723, 1292),
            trials: 12,
            capped: false,
        });
        assert_eq!(lines, vec!["1723 x 1292"]);
    }

    #[test]
    fn capped_search_is_flagged() {
        let lines = format_event(&ResizeEvent::SearchFinished {
            size: Size::new(43, 32),
            trials: 3,
            capped: true,
        });
        assert_eq!(lines[1], "    stopped after 3 trials (cap reached)");
    }

    #[test]
    fn failure_shows_message_and_stage() {
        let lines = format_event(&ResizeEvent::Failed {
            stage: Stage::Validating,
            message: "File \"x.jpg\" was not found.".to_string(),
        });
        assert_eq!(
            lines,
            vec!["File \"x.jpg\" was not found.", "    (while validating)"]
        );
    }

    // =========================================================================
    // Batch formatting
    // =========================================================================

    #[test]
    fn batch_success_line() {
        let line = format_batch_line(Path::new("a.jpg"), &Ok(result()));
        assert_eq!(line, "ok    a.jpg  800 x 600 \u{2192} 400 x 300  1234 bytes");
    }

    #[test]
    fn batch_failure_line() {
        let err = ResizeError::SourceNotFound(PathBuf::from("b.jpg"));
        let line = format_batch_line(Path::new("b.jpg"), &Err(err));
        assert_eq!(line, "fail  b.jpg  File \"b.jpg\" was not found.");
    }

    #[test]
    fn batch_save_failure_line() {
        let err = PersistError::NoFileName(PathBuf::from("/"));
        assert_eq!(
            format_save_failure(Path::new("/"), &err),
            "fail  /  / has no file name"
        );
    }

    #[test]
    fn batch_summary_pluralizes() {
        assert_eq!(format_batch_summary(1, 0), "Resized 1 image, 0 failed");
        assert_eq!(format_batch_summary(3, 2), "Resized 3 images, 2 failed");
    }

    // =========================================================================
    // JSON report
    // =========================================================================

    #[test]
    fn report_serializes_sizes() {
        let report = ResizeReport::new(Path::new("a.jpg"), None, &result());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["encoder"], "JPEG q95 4:2:0");
        assert_eq!(json["size"]["width"], 400);
        assert_eq!(json["original"]["height"], 600);
        assert_eq!(json["bytes"], 1234);
        assert!(json.get("output").is_none());
    }

    #[test]
    fn failure_report_is_tagged() {
        let err = ResizeError::DecodeFailure {
            path: PathBuf::from("c.jpg"),
            message: "bad header".to_string(),
        };
        let json = serde_json::to_value(FailureReport::new(Path::new("c.jpg"), &err)).unwrap();
        assert_eq!(json["source"], "c.jpg");
        assert_eq!(json["kind"], "decode_failure");
        assert_eq!(json["error"], "File \"c.jpg\" could not be loaded.");
    }
}
