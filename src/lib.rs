//! # Logo Stamper
//!
//! Batch watermarking for photographers: put a logo on every image in a
//! folder, with a configurable position, padding, size, and opacity.
//!
//! # Pipeline
//!
//! ```text
//! 1. Scan     folder  →  Vec<PathBuf>   (JPEG/PNG, optional recursion, unique names)
//! 2. Stamp    images  →  output/        (scale logo, fade, place, blend, save)
//! 3. Report   events  →  stdout         (one entry per image, summary at the end)
//! ```
//!
//! The `preview` command runs step 2 on the first scanned image only and
//! writes a downscaled PNG, so settings can be checked before a full run.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Finds the images in a folder and rejects duplicate file names |
//! | [`process`] | Batch driver: output dir, logo check, parallel stamping, progress events |
//! | [`config`] | `stamp.toml` loading, validation, and layering of CLI flags |
//! | [`naming`] | Output file names: source stem + suffix + original extension |
//! | [`imaging`] | Placement math, pixel compositing, and the `image`-crate backend |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Flat Output
//!
//! Stamped copies go to a single directory regardless of how deep the source
//! was. This keeps the output easy to upload or hand over, at the price of
//! requiring unique file names across the scanned tree. A leftover `output/`
//! from an earlier run is the usual cause of a clash, which is why the default
//! output directory must not exist yet.
//!
//! ## Logo Width Follows The Image
//!
//! The logo is sized relative to each image's width, not in pixels, so a
//! mixed folder of phone shots and full-frame files gets a visually consistent
//! mark. The logo's aspect ratio is always preserved.
//!
//! ## Pure-Rust Imaging
//!
//! The [`imaging`] module uses the `image` crate for decoding, Lanczos3
//! resampling, alpha blending, and encoding. No system libraries are needed.
//! JPEG outputs are flattened to RGB; PNG outputs keep their alpha channel.

pub mod config;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod process;
pub mod scan;
