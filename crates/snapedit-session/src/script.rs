//! Recorded event scripts with versioning and migration.
//!
//! Scripts drive headless sessions. JSON with a schema version field keeps
//! older files loadable.

use serde::{Deserialize, Serialize};
use snapedit_core::{Result, SnapEditError};

use crate::event::SessionEvent;

/// Current schema version.
pub const CURRENT_VERSION: u32 = 1;

/// An event, optionally pinned to a live frame index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptedEvent {
    /// Live frame the event fires before; unpinned events fire on frame 0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame: Option<u64>,
    #[serde(flatten)]
    pub event: SessionEvent,
}

impl ScriptedEvent {
    pub fn new(event: SessionEvent) -> Self {
        Self { frame: None, event }
    }

    pub fn at_frame(frame: u64, event: SessionEvent) -> Self {
        Self {
            frame: Some(frame),
            event,
        }
    }
}

/// Versioned event script file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventScript {
    /// Schema version for migration.
    pub version: u32,
    pub events: Vec<ScriptedEvent>,
}

impl EventScript {
    pub fn new(events: Vec<ScriptedEvent>) -> Self {
        Self {
            version: CURRENT_VERSION,
            events,
        }
    }

    /// Events in file order, ignoring frame pins.
    pub fn events(&self) -> impl Iterator<Item = &SessionEvent> {
        self.events.iter().map(|e| &e.event)
    }

    /// Events that fire before live frame `frame`, in file order.
    pub fn events_at(&self, frame: u64) -> impl Iterator<Item = &SessionEvent> {
        self.events
            .iter()
            .filter(move |e| e.frame.unwrap_or(0) == frame)
            .map(|e| &e.event)
    }

    /// Highest frame index any event is pinned to.
    pub fn last_frame(&self) -> Option<u64> {
        self.events.iter().map(|e| e.frame.unwrap_or(0)).max()
    }

    /// Serialize to JSON bytes.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self)
            .map_err(|e| SnapEditError::Serialization(format!("Failed to serialize script: {}", e)))
    }

    /// Deserialize from JSON bytes, applying migrations if needed.
    pub fn from_json(data: &[u8]) -> Result<Self> {
        let raw: serde_json::Value = serde_json::from_slice(data)
            .map_err(|e| SnapEditError::Serialization(format!("Invalid JSON: {}", e)))?;

        let version = match raw.get("version").and_then(|v| v.as_u64()) {
            Some(v) => u32::try_from(v).map_err(|_| {
                SnapEditError::Serialization(format!("Script version {} is out of range", v))
            })?,
            None => 0,
        };

        if version > CURRENT_VERSION {
            return Err(SnapEditError::Serialization(format!(
                "Script version {} is newer than supported version {}",
                version, CURRENT_VERSION
            )));
        }

        let migrated = migrate(raw, version)?;

        serde_json::from_value(migrated)
            .map_err(|e| SnapEditError::Serialization(format!("Failed to parse script: {}", e)))
    }

    /// Save script to a file path.
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<()> {
        let data = self.to_json()?;
        std::fs::write(path, data)?;
        Ok(())
    }

    /// Load script from a file path.
    pub fn load_from_file(path: &std::path::Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_json(&data)
    }
}

/// Apply sequential migrations from `from_version` to CURRENT_VERSION.
fn migrate(mut data: serde_json::Value, from_version: u32) -> Result<serde_json::Value> {
    let mut version = from_version;

    while version < CURRENT_VERSION {
        match version {
            0 => {
                // v0 -> v1: a bare array of events
                if data.is_array() {
                    data = serde_json::json!({
                        "version": 1,
                        "events": data,
                    });
                } else if let Some(obj) = data.as_object_mut() {
                    obj.insert("version".into(), serde_json::json!(1));
                }
                version = 1;
            }
            _ => {
                return Err(SnapEditError::Serialization(format!(
                    "No migration path from version {}",
                    version
                )));
            }
        }
    }

    Ok(data)
}
