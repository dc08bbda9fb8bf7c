use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

/// A transient, auto-dismissing error message for presenters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub message: String,
    pub raised_at: DateTime<Utc>,
    /// How long the notice should stay visible after `raised_at`.
    pub duration: Duration,
}

impl Notice {
    pub fn new(message: impl Into<String>, raised_at: DateTime<Utc>, duration: Duration) -> Self {
        Self {
            message: message.into(),
            raised_at,
            duration,
        }
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        // Durations too large for chrono never expire in practice.
        let span = chrono::Duration::from_std(self.duration).unwrap_or(chrono::Duration::MAX);
        self.raised_at
            .checked_add_signed(span)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at()
    }
}
