//! Output filename derivation.
//!
//! A stamped image keeps its source name, optionally with a suffix inserted
//! before the extension. The extension is carried over verbatim (case
//! included), which also decides the output encoding:
//! - `beach.JPG` + `""` → `beach.JPG`
//! - `beach.jpg` + `"_logo"` → `beach_logo.jpg`
//! - `archive.tar.png` + `"-wm"` → `archive.tar-wm.png`

use std::ffi::OsString;
use std::path::Path;

/// Build the output file name for `source` with `suffix` before the extension.
///
/// Returns `None` if `source` has no file name component.
pub fn output_file_name(source: &Path, suffix: &str) -> Option<OsString> {
    let file_name = source.file_name()?;
    if suffix.is_empty() {
        return Some(file_name.to_os_string());
    }

    let stem = source.file_stem()?;
    let mut name = stem.to_os_string();
    name.push(suffix);
    if let Some(ext) = source.extension() {
        name.push(".");
        name.push(ext);
    }
    Some(name)
}

/// True if the extension is one of `extensions`, case-insensitive.
pub fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| extensions.iter().any(|x| e.eq_ignore_ascii_case(x)))
}
