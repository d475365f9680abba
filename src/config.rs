//! Resizer configuration module.
//!
//! Handles loading, validating, and layering the `image-resizer.toml` file
//! that holds component-level defaults. Per-call
//! [`ResizeOptions`](crate::imaging::ResizeOptions) override these values;
//! anything a call leaves unset falls back to what is configured here.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [resize]
//! max_width = 200             # 0 = unconstrained
//! max_height = 200            # 0 = unconstrained
//! quality = 80                # 0-100; PNG maps this to compression 0-9
//! ignore_small_images = true  # copy images that already fit
//! delete_source = false       # remove the source after writing elsewhere
//! crop_zoom = false           # fill the box by cropping to its ratio
//!
//! [limits]
//! max_decode_bytes = 104857600  # 100 MiB decoded pixel buffer
//! ```
//!
//! Config files are sparse: override just the values you want. Unknown keys
//! are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Default config file name looked up by the CLI.
pub const DEFAULT_CONFIG_FILE: &str = "image-resizer.toml";

/// Component configuration loaded from `image-resizer.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResizerConfig {
    /// Default bounds, quality and behavior switches.
    pub resize: ResizeDefaults,
    /// Resource limits.
    pub limits: LimitsConfig,
}

impl ResizerConfig {
    /// Reject a quality above 100 or a zero decode budget.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.resize.quality > 100 {
            return Err(ConfigError::Validation(
                "resize.quality must be 0-100".into(),
            ));
        }
        if self.limits.max_decode_bytes == 0 {
            return Err(ConfigError::Validation(
                "limits.max_decode_bytes must be non-zero".into(),
            ));
        }
        Ok(())
    }
}

/// Defaults applied when a call does not override them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResizeDefaults {
    /// Maximum output width in pixels (0 = unconstrained).
    pub max_width: u32,
    /// Maximum output height in pixels (0 = unconstrained).
    pub max_height: u32,
    /// Output quality, 0 (worst) to 100 (best).
    pub quality: u32,
    /// Copy images that already fit instead of re-encoding them.
    pub ignore_small_images: bool,
    /// Delete the source after the output has been written to another path.
    pub delete_source: bool,
    /// Zoom-crop to the bounding box ratio unless a call picks a crop mode.
    pub crop_zoom: bool,
}

impl Default for ResizeDefaults {
    fn default() -> Self {
        Self {
            max_width: 200,
            max_height: 200,
            quality: 80,
            ignore_small_images: true,
            delete_source: false,
            crop_zoom: false,
        }
    }
}

/// Resource limits for decoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LimitsConfig {
    /// Largest decoded pixel buffer (RGBA, 4 bytes per pixel) allowed.
    pub max_decode_bytes: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_decode_bytes: 100 * 1024 * 1024,
        }
    }
}

// =============================================================================
// Layered loading: stock defaults, then the user's file
// =============================================================================

/// [`ResizerConfig::default`] serialized to a TOML table, the bottom layer
/// every user file is merged onto.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(ResizerConfig::default())?)
}

/// Layer `overlay` over `base`, descending into tables.
///
/// A `[resize]` section that sets only `quality` keeps the stock
/// `max_width`/`max_height`; scalar values are replaced outright.
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

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto the stock defaults, then deserialize and
/// validate.
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

/// Load config from the given file.
///
/// A missing file yields the stock defaults.
pub fn load_config(path: &Path) -> Result<ResizerConfig, ConfigError> {
    resolve_config(load_raw_config(path)?)
}

/// Returns a fully-commented stock config file with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# image-resizer configuration
# ===========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Command-line flags override them.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Resize defaults
# ---------------------------------------------------------------------------
[resize]
# Bounding box the output must fit in. 0 leaves that axis unconstrained.
max_width = 200
max_height = 200

# Output quality (0 = worst, 100 = best). JPEG uses it directly; PNG and GIF
# sources map it to a compression level: round(10 - quality / 10).
quality = 80

# Copy images that already fit inside the box instead of re-encoding them.
# Such images are never cropped.
ignore_small_images = true

# Delete the source once the output has been written to a different path.
delete_source = false

# Crop to the bounding box ratio so the output fills it with no letterbox.
crop_zoom = false

# ---------------------------------------------------------------------------
# Limits
# ---------------------------------------------------------------------------
[limits]
# Largest decoded pixel buffer allowed, in bytes (width * height * 4).
max_decode_bytes = 104857600
"##
}
