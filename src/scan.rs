//! Building a [`Collection`] from directories on disk.
//!
//! ## Directory Layout
//!
//! ```text
//! uploads/                 # --source: one file per upload
//! ├── config.toml          # Optional, see config.rs
//! ├── beach.jpg            # → item 1 (image/jpeg)
//! ├── clip.mp4             # → item 2 (video/mp4)
//! └── notes.txt            # not media, ignored
//!
//! processed/               # --processed: written by the background processor
//! └── beach.png            # item 1 is Ready; item 2 is still Processing
//! ```
//!
//! Uploads are taken in filename order, so ids are stable between runs as
//! long as the directory does not change. Only the top level is scanned.

use crate::media::{Collection, CollectionError, SourceFile};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Collection error: {0}")]
    Collection(#[from] CollectionError),
    #[error("Upload directory not found: {0}")]
    SourceNotFound(PathBuf),
}

/// Extension → MIME type for everything accepted as an upload.
const MEDIA_TYPES: &[(&str, &str)] = &[
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("bmp", "image/bmp"),
    ("tif", "image/tiff"),
    ("tiff", "image/tiff"),
    ("mp4", "video/mp4"),
    ("m4v", "video/mp4"),
    ("webm", "video/webm"),
    ("mov", "video/quicktime"),
];

/// MIME type for a path, by extension. `None` for non-media files.
pub fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    MEDIA_TYPES
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, mime)| *mime)
}

/// Where the processed PNG for an upload lives.
pub fn processed_path(processed_dir: &Path, upload: &Path) -> Option<PathBuf> {
    let stem = upload.file_stem()?;
    let mut name = stem.to_os_string();
    name.push(".png");
    Some(processed_dir.join(name))
}

/// Scan `source_dir` for uploads and attach any processed files found in
/// `processed_dir`.
pub fn scan(source_dir: &Path, processed_dir: &Path) -> Result<Collection, ScanError> {
    if !source_dir.is_dir() {
        return Err(ScanError::SourceNotFound(source_dir.to_path_buf()));
    }

    let mut collection = Collection::new();
    let walker = WalkDir::new(source_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let Some(mime) = mime_for_path(path) else {
            debug!(path = %path.display(), "not a media file, skipped");
            continue;
        };

        let name = entry.file_name().to_string_lossy().into_owned();
        let bytes = std::fs::read(path)?;
        let id = collection.upload(SourceFile::new(name, mime, bytes));

        if let Some(processed) = processed_path(processed_dir, path).filter(|p| p.is_file()) {
            collection.attach_processed(id, std::fs::read(&processed)?)?;
        }
    }

    info!(
        items = collection.len(),
        processed = collection.processed().count(),
        "scanned uploads"
    );
    Ok(collection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn mime_from_extension() {
        assert_eq!(mime_for_path(Path::new("a.JPG")), Some("image/jpeg"));
        assert_eq!(mime_for_path(Path::new("clip.mov")), Some("video/quicktime"));
        assert_eq!(mime_for_path(Path::new("notes.txt")), None);
        assert_eq!(mime_for_path(Path::new("noext")), None);
    }

    #[test]
    fn processed_path_swaps_extension() {
        assert_eq!(
            processed_path(Path::new("/p"), Path::new("/u/beach.jpg")),
            Some(PathBuf::from("/p/beach.png"))
        );
    }

    #[test]
    fn scan_assigns_ids_in_name_order_and_pairs_processed() {
        let tmp = TempDir::new().unwrap();
        let uploads = tmp.path().join("uploads");
        let processed = tmp.path().join("processed");
        fs::create_dir_all(&uploads).unwrap();
        fs::create_dir_all(&processed).unwrap();

        fs::write(uploads.join("b-clip.mp4"), b"video").unwrap();
        fs::write(uploads.join("a-beach.jpg"), b"jpeg").unwrap();
        fs::write(uploads.join("notes.txt"), b"text").unwrap();
        fs::create_dir(uploads.join("nested")).unwrap();
        fs::write(processed.join("a-beach.png"), b"png").unwrap();

        let c = scan(&uploads, &processed).unwrap();
        let names: Vec<&str> = c.items().iter().map(|i| i.source.name.as_str()).collect();
        assert_eq!(names, vec!["a-beach.jpg", "b-clip.mp4"]);

        let beach = c.get(1).unwrap();
        assert_eq!(beach.source.mime, "image/jpeg");
        assert_eq!(beach.processed.as_deref(), Some(&b"png"[..]));

        let clip = c.get(2).unwrap();
        assert_eq!(clip.source.mime, "video/mp4");
        assert!(clip.processed.is_none());
    }

    #[test]
    fn missing_processed_dir_means_nothing_processed() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.png"), b"x").unwrap();
        let c = scan(tmp.path(), &tmp.path().join("nope")).unwrap();
        assert_eq!(c.len(), 1);
        assert_eq!(c.processed().count(), 0);
    }

    #[test]
    fn missing_source_dir_errors() {
        let tmp = TempDir::new().unwrap();
        let result = scan(&tmp.path().join("nope"), tmp.path());
        assert!(matches!(result, Err(ScanError::SourceNotFound(_))));
    }
}
