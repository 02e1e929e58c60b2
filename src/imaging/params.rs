//! Parameter types for stamping operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the high-level [`operations`](super::operations) module
//! (which decides where outputs go) and the [`backend`](super::backend)
//! (which does the actual pixel work).
//!
//! ## Types
//!
//! - [`VerticalPosition`] / [`HorizontalPosition`]: logo anchor on the image.
//! - [`Placement`]: anchor plus padding in pixels.
//! - [`LogoScale`]: logo width as a fraction of the image width.
//! - [`Opacity`]: multiplier applied to the logo's alpha channel.
//! - [`Quality`]: JPEG encoding quality (1–100, default 95). Clamped on construction.
//! - [`StampSettings`]: the full appearance parameter set shared by every front-end.
//! - [`StampParams`] / [`PreviewParams`]: one job for the backend.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Vertical anchor of the logo.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalPosition {
    Top,
    #[default]
    Bottom,
}

/// Horizontal anchor of the logo.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalPosition {
    Left,
    #[default]
    Center,
    Right,
}

impl VerticalPosition {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
        }
    }
}

impl HorizontalPosition {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }
}

impl fmt::Display for VerticalPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for HorizontalPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VerticalPosition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "top" => Ok(Self::Top),
            "bottom" => Ok(Self::Bottom),
            other => Err(format!("unknown vertical position '{other}' (top, bottom)")),
        }
    }
}

impl FromStr for HorizontalPosition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "left" => Ok(Self::Left),
            "center" => Ok(Self::Center),
            "right" => Ok(Self::Right),
            other => Err(format!(
                "unknown horizontal position '{other}' (left, center, right)"
            )),
        }
    }
}

/// Where the logo goes: anchor plus padding from the anchored edges.
///
/// Padding applies to the anchored edges only. A centered logo ignores the
/// horizontal padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub vertical: VerticalPosition,
    pub horizontal: HorizontalPosition,
    pub padding: u32,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            vertical: VerticalPosition::default(),
            horizontal: HorizontalPosition::default(),
            padding: 10,
        }
    }
}

/// Logo width as a fraction of the target image width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogoScale(pub f64);

impl LogoScale {
    pub const MIN: f64 = 0.01;
    pub const MAX: f64 = 1.0;

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn is_valid(self) -> bool {
        (Self::MIN..=Self::MAX).contains(&self.0)
    }
}

impl Default for LogoScale {
    fn default() -> Self {
        Self(0.2)
    }
}

/// Multiplier for the logo's alpha channel (0 = invisible, 1 = unchanged).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Opacity(pub f64);

impl Opacity {
    pub fn value(self) -> f64 {
        self.0
    }

    pub fn is_valid(self) -> bool {
        (0.0..=1.0).contains(&self.0)
    }

    /// Whether the logo's alpha channel needs rewriting at all.
    pub fn is_translucent(self) -> bool {
        self.0 < 1.0
    }
}

impl Default for Opacity {
    fn default() -> Self {
        Self(1.0)
    }
}

/// Quality setting for JPEG encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u8);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(95)
    }
}

/// Appearance of the stamped logo. Both front-ends build one of these.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StampSettings {
    pub placement: Placement,
    pub scale: LogoScale,
    pub opacity: Opacity,
    pub quality: Quality,
}

/// Stamp `logo` onto `source` and write the result to `output`.
#[derive(Debug, Clone, PartialEq)]
pub struct StampParams {
    pub source: PathBuf,
    pub logo: PathBuf,
    pub output: PathBuf,
    pub settings: StampSettings,
}

/// Stamp `logo` onto `source`, shrink the result to fit `max_edge`, and write
/// it as an opaque image to `output`.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewParams {
    pub source: PathBuf,
    pub logo: PathBuf,
    pub output: PathBuf,
    pub settings: StampSettings,
    pub max_edge: u32,
}
