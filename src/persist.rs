//! Writing results back to disk.
//!
//! This sits outside the orchestrator: a run only produces bytes, and the
//! caller decides whether and where to keep them.
//!
//! Output names append the encoder's extension to the full source file name,
//! so `photo.jpg` resized losslessly becomes `photo.jpg.png`. The source is
//! never overwritten.

use crate::imaging::EncoderPolicy;
use crate::resize::EncodedResult;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PersistError {
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{} has no file name", .0.display())]
    NoFileName(PathBuf),
}

/// Output path for `source` encoded with `policy`.
///
/// Lands next to the source unless `output_dir` is given.
pub fn output_path(
    source: &Path,
    policy: &EncoderPolicy,
    output_dir: Option<&Path>,
) -> Result<PathBuf, PersistError> {
    let file_name = source
        .file_name()
        .ok_or_else(|| PersistError::NoFileName(source.to_path_buf()))?;

    let mut name = OsString::from(file_name);
    name.push(".");
    name.push(policy.extension());

    let dir = match output_dir {
        Some(dir) => dir,
        None => source.parent().unwrap_or(Path::new("")),
    };
    Ok(dir.join(name))
}

/// Write `bytes` to `path`, creating parent directories as needed.
pub fn persist(bytes: &[u8], path: &Path) -> Result<(), PersistError> {
    let write_error = |source| PersistError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_error)?;
    }
    fs::write(path, bytes).map_err(write_error)
}

/// Write a finished run beside `source` (or into `output_dir`).
///
/// A degenerate result has nothing to write and returns `None`.
pub fn save(
    source: &Path,
    result: &EncodedResult,
    output_dir: Option<&Path>,
) -> Result<Option<PathBuf>, PersistError> {
    if result.is_degenerate() {
        return Ok(None);
    }
    let target = output_path(source, &result.policy, output_dir)?;
    persist(&result.bytes, &target)?;
    Ok(Some(target))
}
