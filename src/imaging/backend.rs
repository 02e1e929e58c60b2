//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the three operations every backend must
//! support: identify, stamp, and preview.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate. Tests use a recording mock so batch logic can be exercised without
//! decoding a single pixel.

use super::params::{PreviewParams, StampParams};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode {path}: {reason}")]
    Decode { path: PathBuf, reason: String },
    #[error("Logo scales to an empty image on {0} (image too narrow for the logo scale)")]
    EmptyLogo(PathBuf),
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Trait for image processing backends.
///
/// `Sync` because the batch driver calls one backend from rayon's pool.
pub trait ImageBackend: Sync {
    /// Get image dimensions (also proves the file decodes as an image header).
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Composite the logo onto the source and write the output file.
    fn stamp(&self, params: &StampParams) -> Result<(), BackendError>;

    /// Composite, shrink to fit, and write an opaque preview image.
    fn preview(&self, params: &PreviewParams) -> Result<(), BackendError>;
}
