//! Input events and the outcomes the session reports for them.

use serde::{Deserialize, Serialize};
use snapedit_core::{PixelBuffer, PixelRect};

/// Mouse button (or equivalent) of a pointer press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerButton {
    /// Places the selected sticker.
    #[default]
    Primary,
    /// Undo in static sessions.
    Secondary,
}

/// One user interaction, in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    SelectOverlay {
        index: usize,
    },
    SelectFilter {
        index: usize,
    },
    PointerDown {
        x: i32,
        y: i32,
        #[serde(default)]
        button: PointerButton,
    },
    Undo,
    Save,
}

/// Result of a catalog selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    Selected(usize),
    /// Index past the end of the catalog; the previous selection stays.
    Ignored { index: usize, count: usize },
}

/// Result of a sticker placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceOutcome {
    /// Region of the canvas (or sticker layer) that was written.
    Placed(PixelRect),
    /// The footprint missed the canvas entirely.
    Outside,
}

/// Result of an undo request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndoOutcome {
    Undone { remaining: usize },
    /// Only the initial snapshot is left.
    AtInitial,
    /// Live sessions have no history.
    Unsupported,
}

/// Result of a save request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The caller should write this image.
    Still(PixelBuffer),
    /// The active recording was finalized.
    RecordingFinished { frames: u64 },
    /// Live session with no frame composed yet.
    NothingToSave,
}

/// What [`EditSession::handle`](crate::EditSession::handle) did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    OverlaySelected(SelectOutcome),
    FilterSelected(SelectOutcome),
    Placed(PlaceOutcome),
    Undo(UndoOutcome),
    Saved(SaveOutcome),
}
