//! In-memory compositing: scale the logo, fade it, and blend it onto a photo.
//!
//! Everything here works on decoded buffers so it can be tested without
//! touching the filesystem. Decoding and encoding live in
//! [`rust_backend`](super::rust_backend).

use super::calculations::{calculate_logo_size, calculate_position, opacity_alpha};
use super::params::{Opacity, StampSettings};
use image::RgbaImage;
use image::imageops::{self, FilterType};

/// Resize the logo to exact dimensions with Lanczos3 resampling.
pub fn scale_logo(logo: &RgbaImage, size: (u32, u32)) -> RgbaImage {
    imageops::resize(logo, size.0, size.1, FilterType::Lanczos3)
}

/// Multiply every alpha value by the opacity. No-op at full opacity.
pub fn apply_opacity(logo: &mut RgbaImage, opacity: Opacity) {
    if !opacity.is_translucent() {
        return;
    }
    for pixel in logo.pixels_mut() {
        pixel[3] = opacity_alpha(pixel[3], opacity);
    }
}

/// Blend the logo onto a copy of `base` according to `settings`.
///
/// The logo's own alpha channel is the blend mask. Parts of the logo that
/// fall outside the image are clipped. Returns `None` when the logo would
/// scale to an empty image.
pub fn stamp_pixels(
    base: &RgbaImage,
    logo: &RgbaImage,
    settings: &StampSettings,
) -> Option<RgbaImage> {
    let size = calculate_logo_size(base.dimensions(), logo.dimensions(), settings.scale)?;

    let mut scaled = scale_logo(logo, size);
    apply_opacity(&mut scaled, settings.opacity);

    let (x, y) = calculate_position(base.dimensions(), size, &settings.placement);
    let mut result = base.clone();
    imageops::overlay(&mut result, &scaled, x, y);
    Some(result)
}
