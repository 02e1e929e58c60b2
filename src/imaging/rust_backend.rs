//! Pure Rust stamping backend on the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG) | `image::ImageReader` with format sniffing |
//! | Logo resize | `image::imageops::resize` with `Lanczos3` filter |
//! | Alpha blend | `image::imageops::overlay` |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` (alpha dropped) |
//! | Encode → PNG | `image::ImageFormat::Png` (alpha kept) |

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::calculations::calculate_preview_size;
use super::composite::stamp_pixels;
use super::params::{PreviewParams, Quality, StampParams, StampSettings};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, ImageFormat, ImageReader, RgbaImage};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

/// Extensions the batch scanner picks up. Both have decoders compiled in.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Returns the set of image file extensions that are stamped.
pub fn supported_input_extensions() -> &'static [&'static str] {
    SUPPORTED_EXTENSIONS
}

/// Pure Rust backend using the `image` crate.
///
/// Decoded logos are cached per path, so a batch decodes its logo once no
/// matter how many photos it stamps.
#[derive(Default)]
pub struct RustBackend {
    logos: Mutex<HashMap<PathBuf, Arc<RgbaImage>>>,
}

impl RustBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the logo at `path`, or return the cached copy.
    pub fn logo(&self, path: &Path) -> Result<Arc<RgbaImage>, BackendError> {
        let mut cache = self.logos.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(logo) = cache.get(path) {
            return Ok(Arc::clone(logo));
        }
        let logo = Arc::new(load_image(path)?.into_rgba8());
        cache.insert(path.to_path_buf(), Arc::clone(&logo));
        Ok(logo)
    }

    /// Decode the source and blend the logo onto it.
    fn composite(
        &self,
        source: &Path,
        logo: &Path,
        settings: &StampSettings,
    ) -> Result<RgbaImage, BackendError> {
        let base = load_image(source)?.into_rgba8();
        let logo = self.logo(logo)?;
        stamp_pixels(&base, &logo, settings)
            .ok_or_else(|| BackendError::EmptyLogo(source.to_path_buf()))
    }
}

/// Load and decode an image from disk, sniffing the format from its bytes.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    let decode_err = |reason: String| BackendError::Decode {
        path: path.to_path_buf(),
        reason,
    };
    ImageReader::open(path)?
        .with_guessed_format()?
        .decode()
        .map_err(|e| decode_err(e.to_string()))
}

/// Output format chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Jpeg,
    Png,
}

fn output_format(path: &Path) -> Result<OutputFormat, BackendError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "jpg" | "jpeg" => Ok(OutputFormat::Jpeg),
        "png" => Ok(OutputFormat::Png),
        other => Err(BackendError::UnsupportedFormat(other.to_string())),
    }
}

/// Save an image, inferring format from the extension.
///
/// JPEG has no alpha channel, so JPEG outputs are flattened to RGB first.
fn save_image(img: DynamicImage, path: &Path, quality: Quality) -> Result<(), BackendError> {
    match output_format(path)? {
        OutputFormat::Jpeg => save_jpeg(img, path, quality),
        OutputFormat::Png => img
            .save_with_format(path, ImageFormat::Png)
            .map_err(|e| BackendError::ProcessingFailed(format!("PNG encode failed: {}", e))),
    }
}

fn save_jpeg(img: DynamicImage, path: &Path, quality: Quality) -> Result<(), BackendError> {
    let rgb = img.into_rgb8();
    let file = std::fs::File::create(path)?;
    let writer = std::io::BufWriter::new(file);
    JpegEncoder::new_with_quality(writer, quality.value())
        .write_image(rgb.as_raw(), rgb.width(), rgb.height(), ExtendedColorType::Rgb8)
        .map_err(|e| BackendError::ProcessingFailed(format!("JPEG encode failed: {}", e)))
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let (width, height) = ImageReader::open(path)?
            .with_guessed_format()?
            .into_dimensions()
            .map_err(|e| BackendError::Decode {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        Ok(Dimensions { width, height })
    }

    fn stamp(&self, params: &StampParams) -> Result<(), BackendError> {
        // Fail on the extension before spending time on pixels
        output_format(&params.output)?;
        let stamped = self.composite(&params.source, &params.logo, &params.settings)?;
        save_image(
            DynamicImage::ImageRgba8(stamped),
            &params.output,
            params.settings.quality,
        )
    }

    fn preview(&self, params: &PreviewParams) -> Result<(), BackendError> {
        output_format(&params.output)?;
        let stamped = self.composite(&params.source, &params.logo, &params.settings)?;
        let rgb = DynamicImage::ImageRgba8(stamped).into_rgb8();

        let fitted = match calculate_preview_size(rgb.dimensions(), params.max_edge) {
            Some((w, h)) => image::imageops::resize(&rgb, w, h, FilterType::Lanczos3),
            None => rgb,
        };

        save_image(
            DynamicImage::ImageRgb8(fitted),
            &params.output,
            params.settings.quality,
        )
    }
}
