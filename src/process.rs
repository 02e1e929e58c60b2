//! Batch stamping.
//!
//! Takes an image folder and a logo, and writes a stamped copy of every image
//! into a single output directory.
//!
//! ## Output Location
//!
//! ```text
//! photos/
//! ├── beach.jpg
//! ├── 2024/
//! │   └── dunes.png
//! └── output/              # Default output dir, must not exist yet
//!     ├── beach.jpg
//!     └── dunes.png        # Flat: subfolders are not mirrored
//! ```
//!
//! An explicit output directory is created if missing and may already exist.
//!
//! ## Failure Handling
//!
//! Problems with the run as a whole (missing folder, unreadable logo, an
//! existing default output dir, duplicate file names) stop before any image
//! is written. A single image that cannot be stamped is reported as
//! [`ProcessEvent::ImageSkipped`] and the batch continues.
//!
//! ## Parallel Processing
//!
//! Images are stamped in parallel using [rayon](https://docs.rs/rayon). The
//! pool size comes from `processing.max_processes`, set up by the binary.

use crate::config::StampConfig;
use crate::imaging::{self, BackendError, ImageBackend, RustBackend};
use crate::scan::{self, ScanError};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;
use tracing::{debug, warn};

/// Name of the output directory created inside the image folder by default.
pub const DEFAULT_OUTPUT_DIR: &str = "output";

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error("Logo file not found: {0}")]
    LogoNotFound(PathBuf),
    #[error("Logo could not be loaded: {0}")]
    Logo(BackendError),
    #[error(
        "{} already exists. Please explicitly provide a save dir.",
        .0.display()
    )]
    OutputExists(PathBuf),
    #[error("No images found in {0}")]
    NoImages(PathBuf),
    #[error("Preview failed: {0}")]
    Preview(BackendError),
}

/// Progress events emitted while a batch runs.
///
/// `index` is the 1-based position of the image in scan order. Events for
/// different images may arrive out of order.
#[derive(Debug, Clone)]
pub enum ProcessEvent {
    Started {
        total: usize,
        output_dir: PathBuf,
    },
    ImageStamped {
        index: usize,
        total: usize,
        source: PathBuf,
        output: PathBuf,
    },
    ImageSkipped {
        index: usize,
        total: usize,
        source: PathBuf,
        reason: String,
    },
}

/// One successfully written image.
#[derive(Debug, Clone, PartialEq)]
pub struct StampedImage {
    pub source: PathBuf,
    pub output: PathBuf,
}

#[derive(Debug)]
pub struct ProcessResult {
    pub output_dir: PathBuf,
    /// Stamped images in scan order.
    pub stamped: Vec<StampedImage>,
    pub skipped: usize,
}

impl ProcessResult {
    pub fn total(&self) -> usize {
        self.stamped.len() + self.skipped
    }
}

/// Stamp every image in `folder` with the pure-Rust backend.
pub fn process(
    folder: &Path,
    logo: &Path,
    save_dir: Option<&Path>,
    config: &StampConfig,
    progress: Option<Sender<ProcessEvent>>,
) -> Result<ProcessResult, ProcessError> {
    if !folder.is_dir() {
        return Err(ScanError::FolderNotFound(folder.to_path_buf()).into());
    }
    let backend = RustBackend::new();
    if logo.is_file() {
        // Full decode up front; also warms the logo cache for the workers.
        backend.logo(logo).map_err(ProcessError::Logo)?;
    }
    process_with_backend(&backend, folder, logo, save_dir, config, progress)
}

/// Stamp every image using a specific backend (allows testing with mock).
pub fn process_with_backend(
    backend: &impl ImageBackend,
    folder: &Path,
    logo: &Path,
    save_dir: Option<&Path>,
    config: &StampConfig,
    progress: Option<Sender<ProcessEvent>>,
) -> Result<ProcessResult, ProcessError> {
    if !folder.is_dir() {
        return Err(ScanError::FolderNotFound(folder.to_path_buf()).into());
    }
    check_logo(backend, logo)?;

    let images = scan::scan(folder, config.output.recursive)?;
    let output_dir = prepare_output_dir(folder, save_dir)?;
    let total = images.len();
    debug!(total, output_dir = %output_dir.display(), "stamping images");

    if let Some(tx) = &progress {
        tx.send(ProcessEvent::Started {
            total,
            output_dir: output_dir.clone(),
        })
        .ok();
    }

    let settings = config.to_settings();
    let suffix = config.output.suffix.as_str();

    let outcomes: Vec<Option<StampedImage>> = images
        .par_iter()
        .enumerate()
        .map(|(i, source)| {
            let index = i + 1;
            match imaging::stamp_image(backend, source, logo, &output_dir, suffix, &settings) {
                Ok(output) => {
                    debug!(source = %source.display(), output = %output.display(), "stamped");
                    if let Some(tx) = &progress {
                        tx.send(ProcessEvent::ImageStamped {
                            index,
                            total,
                            source: source.clone(),
                            output: output.clone(),
                        })
                        .ok();
                    }
                    Some(StampedImage {
                        source: source.clone(),
                        output,
                    })
                }
                Err(e) => {
                    warn!(source = %source.display(), error = %e, "skipping image");
                    if let Some(tx) = &progress {
                        tx.send(ProcessEvent::ImageSkipped {
                            index,
                            total,
                            source: source.clone(),
                            reason: e.to_string(),
                        })
                        .ok();
                    }
                    None
                }
            }
        })
        .collect();

    let skipped = outcomes.iter().filter(|o| o.is_none()).count();
    Ok(ProcessResult {
        output_dir,
        stamped: outcomes.into_iter().flatten().collect(),
        skipped,
    })
}

/// Render the preview for a folder: its first image, stamped and downscaled.
///
/// Returns the image the preview was rendered from.
pub fn preview(
    folder: &Path,
    logo: &Path,
    output: &Path,
    config: &StampConfig,
    full_size: bool,
) -> Result<PathBuf, ProcessError> {
    preview_with_backend(&RustBackend::new(), folder, logo, output, config, full_size)
}

/// Render a folder preview using a specific backend (allows testing with mock).
pub fn preview_with_backend(
    backend: &impl ImageBackend,
    folder: &Path,
    logo: &Path,
    output: &Path,
    config: &StampConfig,
    full_size: bool,
) -> Result<PathBuf, ProcessError> {
    check_logo(backend, logo)?;
    let source = scan::first_image(folder, config.output.recursive)?
        .ok_or_else(|| ProcessError::NoImages(folder.to_path_buf()))?;
    debug!(source = %source.display(), full_size, "rendering preview");

    imaging::render_preview(
        backend,
        &source,
        logo,
        output,
        &config.to_settings(),
        full_size,
    )
    .map_err(ProcessError::Preview)?;
    Ok(source)
}

fn check_logo(backend: &impl ImageBackend, logo: &Path) -> Result<(), ProcessError> {
    if !logo.is_file() {
        return Err(ProcessError::LogoNotFound(logo.to_path_buf()));
    }
    let (width, height) = imaging::get_dimensions(backend, logo).map_err(ProcessError::Logo)?;
    debug!(logo = %logo.display(), width, height, "logo loaded");
    Ok(())
}

/// Resolve and create the output directory.
///
/// The default `<folder>/output` must be new so a previous run is never
/// silently mixed into the next one. An explicit directory may exist.
fn prepare_output_dir(folder: &Path, save_dir: Option<&Path>) -> Result<PathBuf, ProcessError> {
    match save_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            Ok(dir.to_path_buf())
        }
        None => {
            let dir = folder.join(DEFAULT_OUTPUT_DIR);
            match std::fs::create_dir(&dir) {
                Ok(()) => Ok(dir),
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                    Err(ProcessError::OutputExists(dir))
                }
                Err(e) => Err(e.into()),
            }
        }
    }
}
