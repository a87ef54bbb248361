//! Session settings.

use serde::{Deserialize, Serialize};
use snapedit_effects::BlendMode;

/// Tunables for an [`EditSession`](crate::EditSession).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// How sticker alpha is applied.
    pub blend_mode: BlendMode,
    /// Maximum undo snapshots including the initial image; `None` is unbounded.
    pub history_limit: Option<usize>,
}

impl SessionConfig {
    /// Smooth alpha blending instead of hard-edged stickers.
    pub fn smooth() -> Self {
        Self {
            blend_mode: BlendMode::Alpha,
            ..Default::default()
        }
    }

    /// Cap history at `limit` snapshots.
    pub fn bounded(limit: usize) -> Self {
        Self {
            history_limit: Some(limit),
            ..Default::default()
        }
    }
}
