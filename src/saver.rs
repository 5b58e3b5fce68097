//! The "download trigger" capability.
//!
//! Everything the exporter produces leaves through a [`FileSaver`]. The CLI
//! uses [`DirectorySaver`], which writes into an output directory; tests and
//! embedders use [`MemorySaver`] to capture saves in order.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum SaveError {
    #[error("IO error saving {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Refusing to save outside the output directory: {0}")]
    InvalidFilename(String),
}

/// Something that can persist a named byte stream.
///
/// `Sync` so one saver can be shared by items exported in parallel.
pub trait FileSaver: Sync {
    fn save(&self, filename: &str, bytes: &[u8]) -> Result<(), SaveError>;
}

/// Plain filenames only: no separators, no `..`, not empty.
fn validate_filename(filename: &str) -> Result<(), SaveError> {
    let bad = filename.is_empty()
        || filename == "."
        || filename == ".."
        || filename.contains(['/', '\\']);
    if bad {
        return Err(SaveError::InvalidFilename(filename.to_string()));
    }
    Ok(())
}

/// Saves into a directory, creating it on first use. Existing files with the
/// same name are overwritten, matching a browser's "replace" behaviour.
#[derive(Debug, Clone)]
pub struct DirectorySaver {
    dir: PathBuf,
}

impl DirectorySaver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl FileSaver for DirectorySaver {
    fn save(&self, filename: &str, bytes: &[u8]) -> Result<(), SaveError> {
        validate_filename(filename)?;
        let path = self.dir.join(filename);
        let io_err = |source| SaveError::Io {
            path: path.clone(),
            source,
        };
        std::fs::create_dir_all(&self.dir).map_err(io_err)?;
        std::fs::write(&path, bytes).map_err(io_err)?;
        info!(path = %path.display(), bytes = bytes.len(), "saved");
        Ok(())
    }
}

/// In-memory sink that records every save in call order.
#[derive(Debug, Default)]
pub struct MemorySaver {
    files: Mutex<Vec<(String, Vec<u8>)>>,
}

impl MemorySaver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all saves so far, in order.
    pub fn files(&self) -> Vec<(String, Vec<u8>)> {
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn filenames(&self) -> Vec<String> {
        self.files().into_iter().map(|(name, _)| name).collect()
    }

    /// Bytes of the most recent save under `filename`.
    pub fn get(&self, filename: &str) -> Option<Vec<u8>> {
        self.files()
            .into_iter()
            .rev()
            .find(|(name, _)| name == filename)
            .map(|(_, bytes)| bytes)
    }
}

impl FileSaver for MemorySaver {
    fn save(&self, filename: &str, bytes: &[u8]) -> Result<(), SaveError> {
        validate_filename(filename)?;
        debug!(filename, bytes = bytes.len(), "saved to memory");
        // A panic elsewhere while holding the lock leaves the list intact
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((filename.to_string(), bytes.to_vec()));
        Ok(())
    }
}
