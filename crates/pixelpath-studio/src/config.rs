use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tunables for a [`Studio`](crate::Studio).
///
/// Every field has a default, so a partial JSON object is a valid config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudioConfig {
    /// How long an error notice stays visible, in milliseconds.
    pub notice_duration_ms: u64,
    /// Longer-side size requested from the thumbnail renderer, in pixels.
    pub thumbnail_size: u32,
    /// Characters of the parent id used in branch labels.
    pub branch_label_len: usize,
    pub root_title: String,
    pub root_prompt: String,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            notice_duration_ms: 5_000,
            thumbnail_size: 128,
            branch_label_len: 4,
            root_title: "Initial Image".to_string(),
            root_prompt: "Initial image".to_string(),
        }
    }
}

impl StudioConfig {
    /// Parse a config from JSON, filling unspecified fields with defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn notice_duration(&self) -> Duration {
        Duration::from_millis(self.notice_duration_ms)
    }
}
