//! Application configuration: a JSON file, then command-line overrides.

use anyhow::Context as _;
use serde::{Deserialize, Serialize};
use snapedit_effects::BlendMode;
use snapedit_media::RecordSettings;
use snapedit_session::SessionConfig;
use std::path::Path;

/// Everything the binary can be configured with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub session: SessionConfig,
    pub record: RecordSettings,
}

impl AppConfig {
    /// Read a JSON config file. Missing fields keep their defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let data =
            std::fs::read(path).with_context(|| format!("read config '{}'", path.display()))?;
        serde_json::from_slice(&data).with_context(|| format!("parse config '{}'", path.display()))
    }

    /// Load `path` if given, otherwise start from defaults.
    pub fn resolve(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Apply command-line overrides.
    pub fn with_overrides(
        mut self,
        blend_mode: Option<BlendMode>,
        history_limit: Option<usize>,
    ) -> Self {
        if let Some(mode) = blend_mode {
            self.session.blend_mode = mode;
        }
        if history_limit.is_some() {
            self.session.history_limit = history_limit;
        }
        self
    }
}
