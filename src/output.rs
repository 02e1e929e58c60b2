//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Scan
//!
//! ```text
//! Images in photos
//! 001 beach.jpg
//!     Source: 2024/beach.jpg
//! 002 portrait.png
//!     Source: portrait.png
//!
//! Found 2 images
//! ```
//!
//! ## Stamp
//!
//! ```text
//! Stamping 2 images → photos/output
//! 001 beach.jpg
//!     Output: photos/output/beach.jpg
//! 002 portrait.png (skipped)
//!     Reason: Failed to decode photos/portrait.png: ...
//!
//! Stamped 1 of 2 images → photos/output
//! Skipped 1 image
//! ```
//!
//! Stamp lines arrive as images finish, so indices may be out of order.
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::process::{ProcessEvent, ProcessResult};
use std::path::Path;

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        format!("{} {}", count, word)
    } else {
        format!("{} {}s", count, word)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// ============================================================================
// Scan output
// ============================================================================

/// Format the list of images a stamp run would touch.
///
/// Source paths are shown relative to `folder`.
pub fn format_scan_output(folder: &Path, images: &[impl AsRef<Path>]) -> Vec<String> {
    let mut lines = vec![format!("Images in {}", folder.display())];

    for (i, image) in images.iter().enumerate() {
        let image = image.as_ref();
        let relative = image.strip_prefix(folder).unwrap_or(image);
        lines.push(format!("{} {}", format_index(i + 1), file_name(image)));
        lines.push(format!("{}Source: {}", indent(1), relative.display()));
    }

    lines.push(String::new());
    lines.push(format!("Found {}", plural(images.len(), "image")));
    lines
}

pub fn print_scan_output(folder: &Path, images: &[impl AsRef<Path>]) {
    for line in format_scan_output(folder, images) {
        println!("{}", line);
    }
}

// ============================================================================
// Stamp output
// ============================================================================

/// Format a single stamp progress event as display lines.
pub fn format_process_event(event: &ProcessEvent) -> Vec<String> {
    match event {
        ProcessEvent::Started { total, output_dir } => {
            vec![format!(
                "Stamping {} → {}",
                plural(*total, "image"),
                output_dir.display()
            )]
        }
        ProcessEvent::ImageStamped {
            index,
            source,
            output,
            ..
        } => vec![
            format!("{} {}", format_index(*index), file_name(source)),
            format!("{}Output: {}", indent(1), output.display()),
        ],
        ProcessEvent::ImageSkipped {
            index,
            source,
            reason,
            ..
        } => vec![
            format!("{} {} (skipped)", format_index(*index), file_name(source)),
            format!("{}Reason: {}", indent(1), reason),
        ],
    }
}

/// Format the end-of-run summary.
pub fn format_process_summary(result: &ProcessResult) -> Vec<String> {
    let mut lines = vec![
        String::new(),
        format!(
            "Stamped {} of {} → {}",
            result.stamped.len(),
            plural(result.total(), "image"),
            result.output_dir.display()
        ),
    ];
    if result.skipped > 0 {
        lines.push(format!("Skipped {}", plural(result.skipped, "image")));
    }
    lines
}

pub fn print_process_summary(result: &ProcessResult) {
    for line in format_process_summary(result) {
        println!("{}", line);
    }
}

// ============================================================================
// Preview output
// ============================================================================

pub fn format_preview_output(source: &Path, output: &Path) -> Vec<String> {
    vec![
        format!("Preview of {}", file_name(source)),
        format!("{}Source: {}", indent(1), source.display()),
        format!("{}Written: {}", indent(1), output.display()),
    ]
}

pub fn print_preview_output(source: &Path, output: &Path) {
    for line in format_preview_output(source, output) {
        println!("{}", line);
    }
}
