//! Resizer configuration.
//!
//! Handles loading, validating, and merging `budget-resize.toml`. Stock
//! defaults are the base layer; a user file overrides any subset of keys,
//! and command-line flags override both.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [budget]
//! max_bytes = 524288        # Largest acceptable encoded size, in bytes
//!
//! [encoder]
//! lossless = false          # true = PNG, false = JPEG
//! quality = 95              # JPEG quality (1-100)
//! subsampling = "4:2:0"     # JPEG chroma layout: "4:4:4", "4:2:2" or "4:2:0"
//!
//! [search]
//! max_trials = 20           # Cap on trial encodes (omit for no cap)
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse — override just the values you want:
//!
//! ```toml
//! [budget]
//! max_bytes = 1048576
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{ChromaSubsampling, Quality};
use crate::resize::{DEFAULT_MAX_BYTES, ResizeOptions};
use crate::search::SearchOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File looked up in the working directory when no `--config` is given.
pub const CONFIG_FILE_NAME: &str = "budget-resize.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Resizer configuration loaded from `budget-resize.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResizerConfig {
    /// Byte budget settings.
    pub budget: BudgetConfig,
    /// Output encoder settings.
    pub encoder: EncoderConfig,
    /// Width search settings.
    pub search: SearchConfig,
}

impl ResizerConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.budget.max_bytes == 0 {
            return Err(ConfigError::Validation(
                "budget.max_bytes must be greater than 0".into(),
            ));
        }
        if !(1..=100).contains(&self.encoder.quality) {
            return Err(ConfigError::Validation(
                "encoder.quality must be 1-100".into(),
            ));
        }
        if self.search.max_trials == Some(0) {
            return Err(ConfigError::Validation(
                "search.max_trials must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Encoder parameters and search guard for the orchestrator.
    pub fn resize_options(&self) -> ResizeOptions {
        ResizeOptions {
            quality: Quality::new(self.encoder.quality),
            subsampling: self.encoder.subsampling,
            search: SearchOptions {
                max_trials: self.search.max_trials,
            },
        }
    }
}

/// Byte budget settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BudgetConfig {
    /// Largest acceptable encoded size in bytes.
    pub max_bytes: u64,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_BYTES,
        }
    }
}

/// Output encoder settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EncoderConfig {
    /// Encode as PNG instead of JPEG.
    pub lossless: bool,
    /// JPEG quality (1 = worst, 100 = best).
    pub quality: u32,
    /// JPEG chroma subsampling.
    pub subsampling: ChromaSubsampling,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            lossless: false,
            quality: Quality::default().value(),
            subsampling: ChromaSubsampling::default(),
        }
    }
}

/// Width search settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    /// Maximum trial encodes per image. Absent means no cap.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_trials: Option<u32>,
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(ResizerConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<ResizerConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ResizerConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load configuration.
///
/// With an explicit `path` the file must exist. Without one,
/// [`CONFIG_FILE_NAME`] in the working directory is used if present, and the
/// stock defaults otherwise.
pub fn load_config(path: Option<&Path>) -> Result<ResizerConfig, ConfigError> {
    let overlay = match path {
        Some(path) => Some(read_toml(path)?),
        None => {
            let default_path = Path::new(CONFIG_FILE_NAME);
            if default_path.is_file() {
                Some(read_toml(default_path)?)
            } else {
                None
            }
        }
    };
    resolve_config(overlay)
}

fn read_toml(path: &Path) -> Result<toml::Value, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Returns a fully-commented stock `budget-resize.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# budget-resize configuration
# ===========================
#
# Every key is optional. Values shown are the defaults.
# Command-line flags take precedence over this file.

[budget]
# Largest acceptable encoded size in bytes. The image is scaled down until
# its encoded form fits. 524288 = 512 KiB.
max_bytes = 524288

[encoder]
# true  = PNG (lossless; size depends on pixel content only)
# false = JPEG (lossy, using quality and subsampling below)
lossless = false

# JPEG quality, 1-100. Fixed for the whole run: only the dimensions are
# searched, never the quality.
quality = 95

# JPEG chroma subsampling: "4:4:4", "4:2:2" or "4:2:0".
subsampling = "4:2:0"

[search]
# Maximum number of trial encodes per image. Each trial is a full resize and
# encode, so this bounds the worst-case run time. When the cap is hit the
# best width found so far is used. Leave unset to search until converged.
# max_trials = 20
"##
}
