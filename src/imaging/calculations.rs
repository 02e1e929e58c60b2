//! Pure calculation functions for logo placement.
//!
//! All functions here are pure and testable without any I/O or images.

use super::params::{HorizontalPosition, LogoScale, Opacity, Placement, VerticalPosition};

/// Calculate the scaled logo size for a target image.
///
/// The logo width becomes `scale` of the image width (rounded down), and the
/// height follows the logo's own aspect ratio (rounded down).
///
/// Returns `None` when the scaled logo would have a zero dimension.
///
/// # Examples
/// ```
/// # use logo_stamper::imaging::{LogoScale, calculate_logo_size};
/// // 20% of a 1000px wide photo, 200x100 logo → 200x100
/// assert_eq!(calculate_logo_size((1000, 800), (200, 100), LogoScale(0.2)), Some((200, 100)));
///
/// // 10% of 1000px with a 400x300 logo → 100x75
/// assert_eq!(calculate_logo_size((1000, 800), (400, 300), LogoScale(0.1)), Some((100, 75)));
/// ```
pub fn calculate_logo_size(
    image: (u32, u32),
    logo: (u32, u32),
    scale: LogoScale,
) -> Option<(u32, u32)> {
    let (image_w, _) = image;
    let (logo_w, logo_h) = logo;
    if logo_w == 0 {
        return None;
    }

    let new_w = (image_w as f64 * scale.value()).floor() as u32;
    let new_h = (logo_h as u64 * new_w as u64 / logo_w as u64) as u32;

    (new_w > 0 && new_h > 0).then_some((new_w, new_h))
}

/// Calculate the top-left corner of the logo on the image.
///
/// Coordinates may be negative when the logo plus padding does not fit; the
/// overlay clips whatever falls outside the image.
pub fn calculate_position(image: (u32, u32), logo: (u32, u32), placement: &Placement) -> (i64, i64) {
    let (image_w, image_h) = (image.0 as i64, image.1 as i64);
    let (logo_w, logo_h) = (logo.0 as i64, logo.1 as i64);
    let padding = placement.padding as i64;

    let x = match placement.horizontal {
        HorizontalPosition::Left => padding,
        HorizontalPosition::Right => image_w - logo_w - padding,
        HorizontalPosition::Center => (image_w - logo_w).div_euclid(2),
    };

    let y = match placement.vertical {
        VerticalPosition::Top => padding,
        VerticalPosition::Bottom => image_h - logo_h - padding,
    };

    (x, y)
}

/// Scale one alpha value by the opacity, truncating toward zero.
pub fn opacity_alpha(alpha: u8, opacity: Opacity) -> u8 {
    (alpha as f64 * opacity.value().clamp(0.0, 1.0)) as u8
}

/// Calculate display dimensions that fit within `max_edge` on both axes.
///
/// Returns `None` when the image already fits and should keep its size.
pub fn calculate_preview_size(dims: (u32, u32), max_edge: u32) -> Option<(u32, u32)> {
    let (w, h) = dims;
    if w == 0 || h == 0 || (w <= max_edge && h <= max_edge) {
        return None;
    }

    let ratio = (max_edge as f64 / w as f64).min(max_edge as f64 / h as f64);
    let new_w = ((w as f64 * ratio).floor() as u32).max(1);
    let new_h = ((h as f64 * ratio).floor() as u32).max(1);
    Some((new_w, new_h))
}
