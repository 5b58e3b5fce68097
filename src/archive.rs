//! "Download all": bundle every processed image into one zip.
//!
//! Entries are the unmodified processed bytes, one per processed item, named
//! `processed-<id>.png`. Items still processing are left out without error.
//! The archive is saved once, as `processed-images.zip`.

use crate::media::{Collection, MediaItem};
use crate::naming::{ARCHIVE_FILENAME, archive_entry_name};
use crate::saver::{FileSaver, SaveError};
use serde::{Deserialize, Serialize};
use std::io::{Cursor, Write};
use thiserror::Error;
use tracing::{debug, info};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Save failed: {0}")]
    Save(#[from] SaveError),
}

/// Per-entry compression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchiveCompression {
    #[default]
    Deflated,
    /// PNG is already compressed; storing trades size for speed.
    Stored,
}

impl ArchiveCompression {
    fn method(self) -> CompressionMethod {
        match self {
            Self::Deflated => CompressionMethod::Deflated,
            Self::Stored => CompressionMethod::Stored,
        }
    }
}

/// A finished archive and what went into it.
#[derive(Debug, Clone)]
pub struct Archive {
    pub bytes: Vec<u8>,
    pub entries: Vec<String>,
    /// Ids of items left out because they are still processing.
    pub skipped: Vec<u64>,
}

/// Build the archive in memory from `items`, in iteration order.
pub fn build_archive<'a>(
    items: impl IntoIterator<Item = &'a MediaItem>,
    compression: ArchiveCompression,
) -> Result<Archive, ArchiveError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(compression.method());
    let mut entries = Vec::new();
    let mut skipped = Vec::new();

    for item in items {
        let Some(bytes) = item.processed.as_deref() else {
            debug!(item_id = item.id, "still processing, left out of archive");
            skipped.push(item.id);
            continue;
        };
        let name = archive_entry_name(item.id);
        zip.start_file(name.as_str(), options)?;
        zip.write_all(bytes)?;
        debug!(item_id = item.id, entry = %name, "archived");
        entries.push(name);
    }

    let bytes = zip.finish()?.into_inner();
    Ok(Archive {
        bytes,
        entries,
        skipped,
    })
}

/// Archive the whole collection and save it under [`ARCHIVE_FILENAME`].
pub fn download_all(
    collection: &Collection,
    saver: &impl FileSaver,
    compression: ArchiveCompression,
) -> Result<Archive, ArchiveError> {
    let archive = build_archive(collection.items(), compression)?;
    saver.save(ARCHIVE_FILENAME, &archive.bytes)?;
    info!(
        entries = archive.entries.len(),
        skipped = archive.skipped.len(),
        bytes = archive.bytes.len(),
        "archive saved"
    );
    Ok(archive)
}
