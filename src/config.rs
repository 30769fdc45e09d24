//! Application configuration.
//!
//! Loaded from `quadframe.toml` in the config directory (the current
//! directory unless `--config-dir` says otherwise). The file is sparse: user
//! values are merged over stock defaults, so it only needs the keys being
//! changed.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [crop]
//! aspect_ratio = [16, 9]    # width:height every slot image is cropped to
//!
//! [preview]
//! width = 640               # Size of the preview composite
//! height = 360
//!
//! [export]
//! quality = 90              # JPEG quality (1-100)
//! output_dir = "."          # Directory export files are written to
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{AspectRatio, OutputSize, Quality};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the config file looked up in the config directory.
pub const CONFIG_FILE_NAME: &str = "quadframe.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `quadframe.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Slot crop settings.
    pub crop: CropConfig,
    /// Live preview size.
    pub preview: PreviewConfig,
    /// Export encoding and destination.
    pub export: ExportConfig,
}

impl AppConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.crop.aspect_ratio[0] == 0 || self.crop.aspect_ratio[1] == 0 {
            return Err(ConfigError::Validation(
                "crop.aspect_ratio values must be non-zero".into(),
            ));
        }
        if self.preview.width < 2 || self.preview.height < 2 {
            return Err(ConfigError::Validation(
                "preview.width and preview.height must be at least 2".into(),
            ));
        }
        if !(1..=100).contains(&self.export.quality) {
            return Err(ConfigError::Validation(
                "export.quality must be 1-100".into(),
            ));
        }
        Ok(())
    }

    pub fn aspect(&self) -> AspectRatio {
        AspectRatio::new(self.crop.aspect_ratio[0], self.crop.aspect_ratio[1])
    }

    pub fn preview_size(&self) -> OutputSize {
        OutputSize::new(self.preview.width, self.preview.height)
    }

    pub fn quality(&self) -> Quality {
        Quality::new(self.export.quality)
    }

    pub fn output_dir(&self) -> PathBuf {
        PathBuf::from(&self.export.output_dir)
    }
}

/// Slot crop settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CropConfig {
    /// Aspect ratio as `[width, height]`.
    pub aspect_ratio: [u32; 2],
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            aspect_ratio: [16, 9],
        }
    }
}

/// Preview composite size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PreviewConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        let size = OutputSize::PREVIEW;
        Self {
            width: size.width,
            height: size.height,
        }
    }
}

/// Export settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    /// JPEG encoding quality (1 = worst, 100 = best).
    pub quality: u32,
    /// Directory export files are written to.
    pub output_dir: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            quality: 90,
            output_dir: ".".to_string(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(AppConfig::default())
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

/// Load `quadframe.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the directory has no config file.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILE_NAME);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Load config from `dir`: stock defaults, user overrides, validation.
pub fn load_config(dir: &Path) -> Result<AppConfig, ConfigError> {
    let merged = match load_raw_config(dir)? {
        Some(overlay) => merge_toml(stock_defaults_value()?, overlay),
        None => stock_defaults_value()?,
    };
    let config: AppConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `quadframe.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# quadframe configuration
# =======================
#
# Place this file as quadframe.toml in the directory you run quadframe from
# (or pass --config-dir). Every key is optional; omitted keys keep the
# defaults shown here. Unknown keys are rejected.

[crop]
# Aspect ratio every slot image is center-cropped to, as [width, height].
aspect_ratio = [16, 9]

[preview]
# Size of the preview composite written by `quadframe preview`.
width = 640
height = 360

[export]
# JPEG quality, 1 (smallest) to 100 (best).
quality = 90
# Directory export files are written to.
output_dir = "."
"##
}
