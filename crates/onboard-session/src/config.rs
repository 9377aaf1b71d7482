//! Session timing configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Timers used by the interactive wizard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Quiet period after the last keystroke before a field is validated
    pub debounce_ms: u64,
    /// How long a success message stays visible
    pub success_display_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            success_display_ms: 2500,
        }
    }
}

impl SessionConfig {
    /// Create a new configuration with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the debounce window
    #[must_use]
    pub fn debounce(mut self, debounce: Duration) -> Self {
        self.debounce_ms = u64::try_from(debounce.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Set the success message display window
    #[must_use]
    pub fn success_display(mut self, display: Duration) -> Self {
        self.success_display_ms = u64::try_from(display.as_millis()).unwrap_or(u64::MAX);
        self
    }

    #[must_use]
    pub fn debounce_duration(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    #[must_use]
    pub fn success_display_duration(&self) -> Duration {
        Duration::from_millis(self.success_display_ms)
    }
}
