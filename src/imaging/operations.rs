//! High-level image operations.
//!
//! These functions combine naming and calculations with backend execution.
//! They decide where outputs go, build the parameters, and call the backend.

use super::backend::{BackendError, ImageBackend};
use super::params::{PreviewParams, StampParams, StampSettings};
use crate::naming::output_file_name;
use std::path::{Path, PathBuf};

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Longest preview edge for the regular preview.
pub const PREVIEW_MAX_EDGE: u32 = 400;
/// Longest preview edge for the full-size preview.
pub const FULL_PREVIEW_MAX_EDGE: u32 = 1200;

/// Get image dimensions using the backend.
pub fn get_dimensions(backend: &impl ImageBackend, path: &Path) -> Result<(u32, u32)> {
    let dims = backend.identify(path)?;
    Ok((dims.width, dims.height))
}

/// Plan a stamp operation without executing it.
pub fn plan_stamp(
    source: &Path,
    logo: &Path,
    output_dir: &Path,
    suffix: &str,
    settings: &StampSettings,
) -> Result<StampParams> {
    let file_name = output_file_name(source, suffix).ok_or_else(|| {
        BackendError::ProcessingFailed(format!("No file name in {}", source.display()))
    })?;

    Ok(StampParams {
        source: source.to_path_buf(),
        logo: logo.to_path_buf(),
        output: output_dir.join(file_name),
        settings: *settings,
    })
}

/// Stamp one image into `output_dir`. Returns the written path.
pub fn stamp_image(
    backend: &impl ImageBackend,
    source: &Path,
    logo: &Path,
    output_dir: &Path,
    suffix: &str,
    settings: &StampSettings,
) -> Result<PathBuf> {
    let params = plan_stamp(source, logo, output_dir, suffix, settings)?;
    backend.stamp(&params)?;
    Ok(params.output)
}

/// Render a display-sized preview of one stamped image.
///
/// The regular preview fits within [`PREVIEW_MAX_EDGE`]; `full_size` raises
/// the cap to [`FULL_PREVIEW_MAX_EDGE`]. Images already within the cap keep
/// their size.
pub fn render_preview(
    backend: &impl ImageBackend,
    source: &Path,
    logo: &Path,
    output: &Path,
    settings: &StampSettings,
    full_size: bool,
) -> Result<()> {
    let max_edge = if full_size {
        FULL_PREVIEW_MAX_EDGE
    } else {
        PREVIEW_MAX_EDGE
    };

    backend.preview(&PreviewParams {
        source: source.to_path_buf(),
        logo: logo.to_path_buf(),
        output: output.to_path_buf(),
        settings: *settings,
        max_edge,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::Dimensions;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};
    use crate::imaging::params::{LogoScale, Opacity};

    #[test]
    fn get_dimensions_calls_backend() {
        let backend = MockBackend::with_dimensions(vec![Dimensions {
            width: 1920,
            height: 1080,
        }]);

        let dims = get_dimensions(&backend, Path::new("/logo.png")).unwrap();
        assert_eq!(dims, (1920, 1080));
    }

    #[test]
    fn plan_stamp_keeps_name_without_suffix() {
        let params = plan_stamp(
            Path::new("/photos/trip/beach.jpg"),
            Path::new("/logo.png"),
            Path::new("/out"),
            "",
            &StampSettings::default(),
        )
        .unwrap();

        assert_eq!(params.output, PathBuf::from("/out/beach.jpg"));
        assert_eq!(params.source, PathBuf::from("/photos/trip/beach.jpg"));
        assert_eq!(params.logo, PathBuf::from("/logo.png"));
    }

    #[test]
    fn plan_stamp_applies_suffix() {
        let params = plan_stamp(
            Path::new("/photos/beach.PNG"),
            Path::new("/logo.png"),
            Path::new("/out"),
            "_stamped",
            &StampSettings::default(),
        )
        .unwrap();

        assert_eq!(params.output, PathBuf::from("/out/beach_stamped.PNG"));
    }

    #[test]
    fn plan_stamp_without_file_name_errors() {
        let result = plan_stamp(
            Path::new("/"),
            Path::new("/logo.png"),
            Path::new("/out"),
            "",
            &StampSettings::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn stamp_image_passes_settings_to_backend() {
        let backend = MockBackend::new();
        let settings = StampSettings {
            scale: LogoScale(0.5),
            opacity: Opacity(0.3),
            ..StampSettings::default()
        };

        let written = stamp_image(
            &backend,
            Path::new("/photos/a.jpg"),
            Path::new("/logo.png"),
            Path::new("/out"),
            "",
            &settings,
        )
        .unwrap();

        assert_eq!(written, PathBuf::from("/out/a.jpg"));
        let ops = backend.get_operations();
        assert_eq!(ops.len(), 1);
        assert!(matches!(
            &ops[0],
            RecordedOp::Stamp { output, settings: s, .. }
                if output == "/out/a.jpg" && *s == settings
        ));
    }

    #[test]
    fn stamp_image_propagates_backend_failure() {
        let backend = MockBackend::new().failing_on("a.jpg");
        let result = stamp_image(
            &backend,
            Path::new("/photos/a.jpg"),
            Path::new("/logo.png"),
            Path::new("/out"),
            "",
            &StampSettings::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn render_preview_uses_regular_cap() {
        let backend = MockBackend::new();
        render_preview(
            &backend,
            Path::new("/photos/a.jpg"),
            Path::new("/logo.png"),
            Path::new("/tmp/preview.png"),
            &StampSettings::default(),
            false,
        )
        .unwrap();

        assert!(matches!(
            &backend.get_operations()[0],
            RecordedOp::Preview { max_edge: 400, .. }
        ));
    }

    #[test]
    fn render_preview_full_size_cap() {
        let backend = MockBackend::new();
        render_preview(
            &backend,
            Path::new("/photos/a.jpg"),
            Path::new("/logo.png"),
            Path::new("/tmp/preview.png"),
            &StampSettings::default(),
            true,
        )
        .unwrap();

        assert!(matches!(
            &backend.get_operations()[0],
            RecordedOp::Preview { max_edge: 1200, .. }
        ));
    }
}
