//! Per-item download menu state.
//!
//! ```text
//!            open(anchor)
//!   Closed ───────────────► Open { position, formats, downloaded }
//!     ▲                         │
//!     └──── close() ────────────┘   (backdrop click; clears everything)
//! ```
//!
//! While open, the menu tracks which formats are selected (in the order the
//! user picked them, which is also the export order) and which size presets
//! were already exported in this session. Size controls are enabled only
//! while at least one format is selected.

use crate::catalog::OutputFormat;
use serde::Serialize;
use std::collections::BTreeSet;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Download menu is not open")]
    MenuClosed,
}

/// Layout rectangle of the element the menu is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AnchorRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl AnchorRect {
    pub fn right(&self) -> f64 {
        self.x + self.width
    }
}

/// Screen position of the floating menu's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct MenuPosition {
    pub x: f64,
    pub y: f64,
}

/// State of an open menu.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OpenMenu {
    pub position: MenuPosition,
    formats: Vec<OutputFormat>,
    downloaded: BTreeSet<String>,
}

impl OpenMenu {
    pub fn selected_formats(&self) -> &[OutputFormat] {
        &self.formats
    }

    pub fn downloaded(&self) -> &BTreeSet<String> {
        &self.downloaded
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum DownloadMenu {
    #[default]
    Closed,
    Open(OpenMenu),
}

impl DownloadMenu {
    /// Open the menu beside `anchor`, `offset_x` pixels right of its right
    /// edge and level with its top. Re-opening an open menu only moves it.
    pub fn open(&mut self, anchor: AnchorRect, offset_x: f64) {
        let position = MenuPosition {
            x: anchor.right() + offset_x,
            y: anchor.y,
        };
        match self {
            Self::Open(menu) => menu.position = position,
            Self::Closed => {
                *self = Self::Open(OpenMenu {
                    position,
                    ..OpenMenu::default()
                })
            }
        }
    }

    /// Close the menu, discarding selected formats and download tracking.
    pub fn close(&mut self) {
        *self = Self::Closed;
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open(_))
    }

    pub fn position(&self) -> Option<MenuPosition> {
        match self {
            Self::Open(menu) => Some(menu.position),
            Self::Closed => None,
        }
    }

    fn open_mut(&mut self) -> Result<&mut OpenMenu, SelectionError> {
        match self {
            Self::Open(menu) => Ok(menu),
            Self::Closed => Err(SelectionError::MenuClosed),
        }
    }

    /// Flip a format on or off. Returns whether it is now selected.
    pub fn toggle_format(&mut self, format: OutputFormat) -> Result<bool, SelectionError> {
        let menu = self.open_mut()?;
        if let Some(pos) = menu.formats.iter().position(|f| *f == format) {
            menu.formats.remove(pos);
            Ok(false)
        } else {
            menu.formats.push(format);
            Ok(true)
        }
    }

    /// Selected formats in selection order. Empty while closed.
    pub fn selected_formats(&self) -> &[OutputFormat] {
        match self {
            Self::Open(menu) => menu.selected_formats(),
            Self::Closed => &[],
        }
    }

    pub fn is_format_selected(&self, format: OutputFormat) -> bool {
        self.selected_formats().contains(&format)
    }

    /// Size controls are clickable only with at least one format selected.
    pub fn sizes_enabled(&self) -> bool {
        !self.selected_formats().is_empty()
    }

    pub fn mark_downloaded(&mut self, preset_id: &str) -> Result<(), SelectionError> {
        self.open_mut()?.downloaded.insert(preset_id.to_string());
        Ok(())
    }

    pub fn is_downloaded(&self, preset_id: &str) -> bool {
        match self {
            Self::Open(menu) => menu.downloaded.contains(preset_id),
            Self::Closed => false,
        }
    }
}
