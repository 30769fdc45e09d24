//! Export file naming.
//!
//! An export is named after what went into it: the file stem of each slot's
//! source identifier, in slot order, joined with underscores, followed by the
//! output size.
//!
//! - `photos/dawn.jpg`, empty, `paste_tmp_2.png`, `b.png` at 1920x1080
//!   → `dawn_none_paste_tmp_2_b_1920x1080.jpg`
//!
//! Empty slots contribute the placeholder [`EMPTY_SLOT_NAME`].

use crate::imaging::OutputSize;
use std::path::Path;

/// Name used for a slot with no image.
pub const EMPTY_SLOT_NAME: &str = "none";

/// File stem of a source identifier: no directories, no extension.
///
/// - `"photos/dawn.jpg"` → `"dawn"`
/// - `"dawn"` → `"dawn"`
/// - `"archive.tar.gz"` → `"archive.tar"`
/// - `""` → `""`
pub fn source_stem(source: &str) -> String {
    Path::new(source)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Build the export filename from per-slot sources (`None` = empty slot).
pub fn export_filename<'a>(
    sources: impl IntoIterator<Item = Option<&'a str>>,
    size: OutputSize,
) -> String {
    let names: Vec<String> = sources
        .into_iter()
        .map(|source| match source {
            Some(s) => source_stem(s),
            None => EMPTY_SLOT_NAME.to_string(),
        })
        .collect();
    format!("{}_{}.jpg", names.join("_"), size)
}
