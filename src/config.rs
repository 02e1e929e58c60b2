//! Stamp configuration module.
//!
//! Handles loading, validating, and merging `stamp.toml` files. Settings are
//! layered: stock defaults, then the config file, then command-line flags.
//!
//! ## Config File Location
//!
//! Place `stamp.toml` in the image folder, or pass `--config <path>`:
//!
//! ```text
//! photos/
//! ├── stamp.toml       # Picked up automatically
//! ├── 2024/
//! │   └── beach.jpg
//! └── portrait.png
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [placement]
//! vertical = "bottom"       # top | bottom
//! horizontal = "center"     # left | center | right
//! padding = 10              # Pixels from the chosen edges
//!
//! [logo]
//! scale = 0.2               # Logo width as a fraction of image width (0.01-1.0)
//! opacity = 1.0             # 0.0 (invisible) to 1.0 (as drawn)
//!
//! [output]
//! suffix = ""               # Inserted before the extension
//! recursive = true          # Descend into subfolders
//! jpeg_quality = 95         # JPEG encoding quality (1-100)
//!
//! [processing]
//! max_processes = 4         # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{
    HorizontalPosition, LogoScale, Opacity, Placement, Quality, StampSettings, VerticalPosition,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Config file looked up in the image folder.
pub const CONFIG_FILE_NAME: &str = "stamp.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Stamp configuration loaded from `stamp.toml`.
///
/// All fields have defaults matching the command-line defaults. Config files
/// need only specify the values they want to override.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StampConfig {
    pub placement: PlacementConfig,
    pub logo: LogoConfig,
    pub output: OutputConfig,
    pub processing: ProcessingConfig,
}

impl StampConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !LogoScale(self.logo.scale).is_valid() {
            return Err(ConfigError::Validation(format!(
                "logo.scale must be {}-{}, got {}",
                LogoScale::MIN,
                LogoScale::MAX,
                self.logo.scale
            )));
        }
        if !Opacity(self.logo.opacity).is_valid() {
            return Err(ConfigError::Validation(format!(
                "logo.opacity must be 0.0-1.0, got {}",
                self.logo.opacity
            )));
        }
        if !(1..=100).contains(&self.output.jpeg_quality) {
            return Err(ConfigError::Validation(
                "output.jpeg_quality must be 1-100".into(),
            ));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// The compositing parameters described by this config.
    pub fn to_settings(&self) -> StampSettings {
        StampSettings {
            placement: Placement {
                vertical: self.placement.vertical,
                horizontal: self.placement.horizontal,
                padding: self.placement.padding,
            },
            scale: LogoScale(self.logo.scale),
            opacity: Opacity(self.logo.opacity),
            quality: Quality::new(self.output.jpeg_quality),
        }
    }
}

/// Where the logo goes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlacementConfig {
    pub vertical: VerticalPosition,
    pub horizontal: HorizontalPosition,
    /// Distance in pixels from the chosen edges. Ignored for centered placement.
    pub padding: u32,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        let placement = Placement::default();
        Self {
            vertical: placement.vertical,
            horizontal: placement.horizontal,
            padding: placement.padding,
        }
    }
}

/// How the logo is drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogoConfig {
    pub scale: f64,
    pub opacity: f64,
}

impl Default for LogoConfig {
    fn default() -> Self {
        Self {
            scale: LogoScale::default().value(),
            opacity: Opacity::default().value(),
        }
    }
}

/// Output naming, traversal, and encoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub suffix: String,
    pub recursive: bool,
    pub jpeg_quality: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            suffix: String::new(),
            recursive: true,
            jpeg_quality: u32::from(Quality::default().value()),
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel stamping workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

/// Command-line values layered over the config file.
///
/// `None` fields leave the underlying value untouched.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub vertical: Option<VerticalPosition>,
    pub horizontal: Option<HorizontalPosition>,
    pub padding: Option<u32>,
    pub scale: Option<f64>,
    pub opacity: Option<f64>,
    pub suffix: Option<String>,
    pub recursive: Option<bool>,
    pub jpeg_quality: Option<u32>,
}

impl Overrides {
    /// Sparse TOML table holding only the values that were set.
    pub fn to_toml(&self) -> toml::Value {
        let mut placement = toml::Table::new();
        if let Some(v) = self.vertical {
            placement.insert("vertical".into(), toml::Value::String(v.as_str().into()));
        }
        if let Some(h) = self.horizontal {
            placement.insert("horizontal".into(), toml::Value::String(h.as_str().into()));
        }
        if let Some(p) = self.padding {
            placement.insert("padding".into(), toml::Value::Integer(i64::from(p)));
        }

        let mut logo = toml::Table::new();
        if let Some(s) = self.scale {
            logo.insert("scale".into(), toml::Value::Float(s));
        }
        if let Some(o) = self.opacity {
            logo.insert("opacity".into(), toml::Value::Float(o));
        }

        let mut output = toml::Table::new();
        if let Some(s) = &self.suffix {
            output.insert("suffix".into(), toml::Value::String(s.clone()));
        }
        if let Some(r) = self.recursive {
            output.insert("recursive".into(), toml::Value::Boolean(r));
        }
        if let Some(q) = self.jpeg_quality {
            output.insert("jpeg_quality".into(), toml::Value::Integer(i64::from(q)));
        }

        let mut root = toml::Table::new();
        for (name, table) in [("placement", placement), ("logo", logo), ("output", output)] {
            if !table.is_empty() {
                root.insert(name.into(), toml::Value::Table(table));
            }
        }
        toml::Value::Table(root)
    }
}

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(StampConfig::default()).expect("default config must serialize")
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

/// Read a config file as a raw TOML value. A missing file is an error.
pub fn read_raw_config(path: &Path) -> Result<toml::Value, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Load `stamp.toml` from a folder as a raw TOML value.
///
/// Returns `Ok(None)` if the folder has no `stamp.toml`.
pub fn load_raw_config(folder: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = folder.join(CONFIG_FILE_NAME);
    if !config_path.exists() {
        return Ok(None);
    }
    read_raw_config(&config_path).map(Some)
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<StampConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: StampConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the effective config for a folder.
///
/// Layers stock defaults, the config file (`explicit` if given, otherwise
/// `<folder>/stamp.toml` when present), and `overrides`, then validates.
pub fn load_config(
    folder: &Path,
    explicit: Option<&Path>,
    overrides: &Overrides,
) -> Result<StampConfig, ConfigError> {
    let file = match explicit {
        Some(path) => Some(read_raw_config(path)?),
        None => load_raw_config(folder)?,
    };
    let base = match file {
        Some(file) => merge_toml(stock_defaults_value(), file),
        None => stock_defaults_value(),
    };
    resolve_config(base, Some(overrides.to_toml()))
}

/// Returns a fully-commented stock `stamp.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Logo Stamper Configuration
# ==========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Put this file in the image folder as stamp.toml, or pass --config <path>.
# Command-line flags override values from this file.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Placement
# ---------------------------------------------------------------------------
[placement]
# Vertical edge the logo sits against: "top" or "bottom".
vertical = "bottom"

# Horizontal position: "left", "center" or "right".
horizontal = "center"

# Distance in pixels from the chosen edges. Not applied horizontally when
# the logo is centered.
padding = 10

# ---------------------------------------------------------------------------
# Logo appearance
# ---------------------------------------------------------------------------
[logo]
# Logo width as a fraction of each image's width (0.01 - 1.0).
# The logo keeps its aspect ratio.
scale = 0.2

# Opacity multiplier applied to the logo's alpha channel (0.0 - 1.0).
opacity = 1.0

# ---------------------------------------------------------------------------
# Output
# ---------------------------------------------------------------------------
[output]
# Text inserted before the file extension, e.g. "_logo" -> beach_logo.jpg.
suffix = ""

# Include images in subfolders.
recursive = true

# JPEG encoding quality (1 = worst, 100 = best). PNG output is lossless.
jpeg_quality = 95

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel stamping workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
