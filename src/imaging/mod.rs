//! Image processing on the `image` crate.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `ImageReader` header read, format sniffed from content |
//! | **Logo resize** | `imageops::resize` with Lanczos3 |
//! | **Opacity** | alpha channel multiply |
//! | **Blend** | `imageops::overlay` (logo alpha as mask) |
//! | **Save** | JPEG (RGB, quality) or PNG (RGBA) by extension |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for placement math (unit testable)
//! - **Parameters**: Data structures describing stamp operations
//! - **Composite**: In-memory pixel work on decoded buffers
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining naming + backend

pub mod backend;
mod calculations;
pub mod composite;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::{
    calculate_logo_size, calculate_position, calculate_preview_size, opacity_alpha,
};
pub use operations::{get_dimensions, plan_stamp, render_preview, stamp_image};
pub use params::{
    HorizontalPosition, LogoScale, Opacity, Placement, PreviewParams, Quality, StampParams,
    StampSettings, VerticalPosition,
};
pub use rust_backend::{RustBackend, supported_input_extensions};
