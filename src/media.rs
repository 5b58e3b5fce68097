//! Uploaded media items and the collection that owns them.
//!
//! Lifecycle of a [`MediaItem`]:
//!
//! ```text
//! upload ──► Processing ──(attach_processed)──► Ready ──(remove)──► gone
//! ```
//!
//! The collection is the only owner. Presentation and export code borrow
//! items; nothing outside [`Collection`] mutates them.

use serde::Serialize;
use std::collections::BTreeSet;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CollectionError {
    #[error("No media item with id {0}")]
    UnknownItem(u64),
}

/// Broad kind of an upload, derived from its MIME type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    pub fn from_mime(mime: &str) -> Option<Self> {
        let top = mime.split('/').next().unwrap_or("");
        match top.to_ascii_lowercase().as_str() {
            "image" => Some(Self::Image),
            "video" => Some(Self::Video),
            _ => None,
        }
    }
}

/// Raw upload as received from the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes,
        }
    }

    pub fn kind(&self) -> Option<MediaKind> {
        MediaKind::from_mime(&self.mime)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaItem {
    pub id: u64,
    pub source: SourceFile,
    /// Processed PNG, present once background processing completes.
    pub processed: Option<Vec<u8>>,
}

impl MediaItem {
    pub fn is_processed(&self) -> bool {
        self.processed.is_some()
    }

    /// Kind shown in the grid. Unknown MIME types are rendered as images.
    pub fn kind(&self) -> MediaKind {
        self.source.kind().unwrap_or(MediaKind::Image)
    }
}

/// Ordered set of uploads. Ids are assigned on upload and never reused.
#[derive(Debug, Clone)]
pub struct Collection {
    items: Vec<MediaItem>,
    next_id: u64,
}

impl Default for Collection {
    fn default() -> Self {
        Self::new()
    }
}

impl Collection {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            next_id: 1,
        }
    }

    /// Add an upload and return its id.
    pub fn upload(&mut self, source: SourceFile) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        debug!(id, name = %source.name, mime = %source.mime, "uploaded");
        self.items.push(MediaItem {
            id,
            source,
            processed: None,
        });
        id
    }

    /// Attach the processing result to an item, moving it to ready.
    pub fn attach_processed(&mut self, id: u64, bytes: Vec<u8>) -> Result<(), CollectionError> {
        let item = self
            .items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or(CollectionError::UnknownItem(id))?;
        debug!(id, len = bytes.len(), "processed file attached");
        item.processed = Some(bytes);
        Ok(())
    }

    /// Delete an item. Returns it if it existed.
    pub fn remove(&mut self, id: u64) -> Option<MediaItem> {
        let pos = self.items.iter().position(|i| i.id == id)?;
        debug!(id, "removed");
        Some(self.items.remove(pos))
    }

    pub fn get(&self, id: u64) -> Option<&MediaItem> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn items(&self) -> &[MediaItem] {
        &self.items
    }

    /// Resolve `ids` to items, in first-mention order with repeats dropped.
    /// Fails on the first id that is not in the collection.
    pub fn select(&self, ids: &[u64]) -> Result<Vec<&MediaItem>, CollectionError> {
        let mut seen = BTreeSet::new();
        ids.iter()
            .filter(|id| seen.insert(**id))
            .map(|id| self.get(*id).ok_or(CollectionError::UnknownItem(*id)))
            .collect()
    }

    /// Items whose processed file is present, in upload order.
    pub fn processed(&self) -> impl Iterator<Item = &MediaItem> {
        self.items.iter().filter(|i| i.is_processed())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
