//! SnapEdit Session - editing state and undo
//!
//! Implements the interactive editing model:
//! - Static sessions over a still image with snapshot undo
//! - Live sessions with a persistent sticker layer and optional recording
//! - Overlay catalog, input events and replayable event scripts

pub mod catalog;
pub mod config;
pub mod event;
pub mod history;
pub mod layer;
pub mod script;
pub mod session;

pub use catalog::{Overlay, OverlayCatalog};
pub use config::SessionConfig;
pub use event::{
    EventOutcome, PlaceOutcome, PointerButton, SaveOutcome, SelectOutcome, SessionEvent,
    UndoOutcome,
};
pub use history::EditHistory;
pub use layer::StickerLayer;
pub use script::{EventScript, ScriptedEvent};
pub use session::{EditSession, ModeKind, RecordingState};
