//! Deterministic filenames for everything the exporter saves.
//!
//! ```text
//! processed-7-64x64.png       # item 7, 64×64 preset, PNG
//! processed-7-original.svg    # item 7, original size, SVG
//! processed-7.png             # item 7 inside the "download all" archive
//! processed-images.zip        # the archive itself
//! ```
//!
//! The size segment follows the preset's *declared* size, so two presets with
//! the same dimensions produce the same filename.

use crate::catalog::{OutputFormat, SizePreset};

/// Name of the archive produced by "download all".
pub const ARCHIVE_FILENAME: &str = "processed-images.zip";

/// Filename for one exported file.
pub fn export_filename(item_id: u64, preset: &SizePreset, format: OutputFormat) -> String {
    match preset.target_size() {
        Some((w, h)) => format!("processed-{}-{}x{}.{}", item_id, w, h, format.extension()),
        None => format!("processed-{}-original.{}", item_id, format.extension()),
    }
}

/// Entry name for an item's processed image inside the archive.
pub fn archive_entry_name(item_id: u64) -> String {
    format!("processed-{}.png", item_id)
}
