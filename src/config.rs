//! Configuration module.
//!
//! Handles loading, validating, and merging `journal.toml`. Stock defaults are
//! serialized to a TOML table and the user's file is merged on top of it, so
//! a config file only needs the keys it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [entries]
//! default_time = "23:59:59"            # Time for entries that state none
//! default_timezone_offset = "-08:00"   # Offset for times without one
//! adjust_for_daylight_savings = true   # +1h on the default offset in US DST
//! photos_description_char_limit = 1000 # Max photo description length
//! utc_mode = "now-delta"               # or "historical"
//!
//! [layout]
//! font_path = "fonts/font.ttf"
//! font_size = 100
//! font_color = [255, 255, 255]         # RGB
//! aspect_ratio = [7, 9]                # width:height
//! margins = 0.05                       # fraction of each side
//! text_alignment = "center"            # left | center | right
//! always_use_descender_spacing = false
//! descenders = "gjpqy"
//! max_height = 20000                   # canvas height cap for fit-and-grow
//!
//! [debug]
//! show_line_borders = false            # outline every drawn line in red
//! ```
//!
//! Unknown keys are rejected to catch typos early. `text_alignment` is kept
//! as a string here and checked by the layout engine, which refuses unknown
//! values instead of falling back to left alignment.

use crate::time::{UtcMode, UtcOffset, is_time_token};
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
    TomlSer(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Full configuration loaded from `journal.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JournalConfig {
    /// Extraction defaults and export settings.
    pub entries: EntriesConfig,
    /// Title card typography and geometry.
    pub layout: LayoutConfig,
    /// Debug drawing switches.
    pub debug: DebugConfig,
}

impl JournalConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let entries = &self.entries;
        if !is_time_token(&entries.default_time) || entries.default_time.len() != 8 {
            return Err(ConfigError::Validation(
                "entries.default_time must be HH:MM:SS".into(),
            ));
        }
        if UtcOffset::parse(&entries.default_timezone_offset).is_none() {
            return Err(ConfigError::Validation(
                "entries.default_timezone_offset must be ±HH:MM".into(),
            ));
        }

        let layout = &self.layout;
        if layout.font_size == 0 {
            return Err(ConfigError::Validation(
                "layout.font_size must be non-zero".into(),
            ));
        }
        if layout.aspect_ratio[0] == 0 || layout.aspect_ratio[1] == 0 {
            return Err(ConfigError::Validation(
                "layout.aspect_ratio values must be non-zero".into(),
            ));
        }
        if !(0.0..0.5).contains(&layout.margins) {
            return Err(ConfigError::Validation(
                "layout.margins must be in [0, 0.5)".into(),
            ));
        }
        if layout.max_height < crate::layout::INITIAL_HEIGHT {
            return Err(ConfigError::Validation(format!(
                "layout.max_height must be at least {}",
                crate::layout::INITIAL_HEIGHT
            )));
        }
        Ok(())
    }
}

/// Extraction defaults and export settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EntriesConfig {
    /// Time given to entries that never state one.
    pub default_time: String,
    /// Offset given to times that carry none.
    pub default_timezone_offset: String,
    /// Shift the default offset by an hour inside the US DST window.
    pub adjust_for_daylight_savings: bool,
    /// Longest photo description, ellipsis included.
    pub photos_description_char_limit: usize,
    /// How UTC timestamps for exported rows are computed.
    pub utc_mode: UtcMode,
}

impl Default for EntriesConfig {
    fn default() -> Self {
        Self {
            default_time: "23:59:59".to_string(),
            default_timezone_offset: "-08:00".to_string(),
            adjust_for_daylight_savings: true,
            photos_description_char_limit: 1000,
            utc_mode: UtcMode::NowDelta,
        }
    }
}

/// Title card typography and geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    /// TrueType/OpenType font used to measure and draw titles.
    pub font_path: String,
    /// Font size in pixels.
    pub font_size: u32,
    /// Text color as `[r, g, b]`.
    pub font_color: [u8; 3],
    /// Canvas aspect ratio as `[width, height]`.
    pub aspect_ratio: [u32; 2],
    /// Margin on each side as a fraction of the canvas dimension.
    pub margins: f64,
    /// `left`, `center`, or `right`.
    pub text_alignment: String,
    /// Reserve descender space under every line, not only lines with descenders.
    pub always_use_descender_spacing: bool,
    /// Characters that reach below the baseline.
    pub descenders: String,
    /// Largest canvas height fit-and-grow may try.
    pub max_height: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            font_path: "fonts/font.ttf".to_string(),
            font_size: 100,
            font_color: [255, 255, 255],
            aspect_ratio: [7, 9],
            margins: 0.05,
            text_alignment: "center".to_string(),
            always_use_descender_spacing: false,
            descenders: "gjpqy".to_string(),
            max_height: 20_000,
        }
    }
}

/// Debug drawing switches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DebugConfig {
    /// Outline every drawn line in red.
    pub show_line_borders: bool,
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(JournalConfig::default())?)
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

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<JournalConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: JournalConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `path`, falling back to stock defaults when it is absent.
pub fn load_config(path: &Path) -> Result<JournalConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(path)?;
    if overlay.is_none() {
        log::info!("no config at {}; using defaults", path.display());
    }
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `journal.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# journal-cards configuration
# ===========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Entry extraction
# ---------------------------------------------------------------------------
[entries]
# Time given to entries that never state one (HH:MM:SS).
default_time = "23:59:59"

# Offset given to times written without one (+HH:MM or -HH:MM).
default_timezone_offset = "-08:00"

# Add an hour to the default offset between the second Sunday of March and
# the first Sunday of November (US daylight saving rule).
adjust_for_daylight_savings = true

# Longest photo description, including the trailing "...".
photos_description_char_limit = 1000

# How exported rows compute their UTC timestamp:
#   "now-delta"  - correct with the host's current local/UTC difference
#   "historical" - correct with the difference at the entry's own date
utc_mode = "now-delta"

# ---------------------------------------------------------------------------
# Title card layout
# ---------------------------------------------------------------------------
[layout]
# TrueType or OpenType font used to draw titles.
font_path = "fonts/font.ttf"

# Font size in pixels.
font_size = 100

# Text color as [red, green, blue].
font_color = [255, 255, 255]

# Canvas aspect ratio as [width, height].
aspect_ratio = [7, 9]

# Margin on each side, as a fraction of the canvas width/height.
margins = 0.05

# Horizontal alignment: "left", "center", or "right".
text_alignment = "center"

# Reserve descender space under every line instead of only under lines
# that contain a descender character.
always_use_descender_spacing = false

# Characters that reach below the baseline.
descenders = "gjpqy"

# The canvas grows in steps of 100px until the title fits. Titles that still
# do not fit at this height fail instead of growing forever.
max_height = 20000

# ---------------------------------------------------------------------------
# Debugging
# ---------------------------------------------------------------------------
[debug]
# Draw a red box around every line of text.
show_line_borders = false
"##
}
