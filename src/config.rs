//! Extractor configuration.
//!
//! Handles loading, validating, and merging the TOML config file. Stock
//! defaults are the base layer; a user file overrides just the keys it sets,
//! and CLI flags override both.
//!
//! ## Config File Location
//!
//! Passed explicitly with `--config <file>`, otherwise `asset-extractor.toml`
//! in the working directory is used when present.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [processing]
//! scale = 2                          # Upscale factor: 1, 2 or 4
//!
//! [export]
//! archive_name = "game-assets.zip"   # Bundle file name, must end in .zip
//! individual = true                  # Also write each asset_N.png
//! manifest = true                    # Write manifest.json
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Override just the values you want:
//!
//! ```toml
//! [processing]
//! scale = 4
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::archive::DEFAULT_ARCHIVE_NAME;
use crate::imaging::ScaleFactor;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File looked up in the working directory when no `--config` is given.
pub const CONFIG_FILENAME: &str = "asset-extractor.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from the TOML file.
///
/// All fields have defaults. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtractorConfig {
    pub processing: ProcessingConfig,
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Upscale factor applied after background removal.
    pub scale: ScaleFactor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    /// File name of the zip bundle inside the output directory.
    pub archive_name: String,
    /// Write each asset as its own PNG next to the archive.
    pub individual: bool,
    /// Write `manifest.json` describing the export.
    pub manifest: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            archive_name: DEFAULT_ARCHIVE_NAME.to_string(),
            individual: true,
            manifest: true,
        }
    }
}

impl ExtractorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_archive_name(&self.export.archive_name)
    }
}

/// An archive name is a bare `*.zip` file name.
pub fn validate_archive_name(name: &str) -> Result<(), ConfigError> {
    let stem = name.strip_suffix(".zip").unwrap_or_default();
    if stem.is_empty() {
        return Err(ConfigError::Validation(format!(
            "export.archive_name must be a file name ending in .zip, got {name:?}"
        )));
    }
    if name.contains(['/', '\\']) {
        return Err(ConfigError::Validation(format!(
            "export.archive_name must not contain path separators, got {name:?}"
        )));
    }
    Ok(())
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(ExtractorConfig::default()).expect("default config must serialize")
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

/// Read a config file as a raw TOML value. `Ok(None)` if it does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    Ok(Some(toml::from_str(&content)?))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<ExtractorConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ExtractorConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the effective config.
///
/// An explicit `path` must exist. Without one, [`CONFIG_FILENAME`] in the
/// working directory is used if present, stock defaults otherwise.
pub fn load_config(path: Option<&Path>) -> Result<ExtractorConfig, ConfigError> {
    let overlay = match path {
        Some(path) => Some(toml::from_str(&fs::read_to_string(path)?)?),
        None => load_raw_config(Path::new(CONFIG_FILENAME))?,
    };
    resolve_config(stock_defaults_value(), overlay)
}

/// Returns a fully-commented stock config file.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Asset Extractor Configuration
# =============================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Pass this file with --config, or save it as asset-extractor.toml in the
# directory you run from. Command-line flags override these values.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Upscale factor applied to every asset after background removal.
# One of 1, 2 or 4. Override per run with --scale.
scale = 2

# ---------------------------------------------------------------------------
# Export
# ---------------------------------------------------------------------------
[export]
# File name of the zip bundle written to the output directory.
# Must end in .zip. Override per run with --archive-name.
archive_name = "game-assets.zip"

# Also write each asset as its own asset_N.png.
individual = true

# Write manifest.json listing every asset, its source rectangle and status.
manifest = true
"##
}
