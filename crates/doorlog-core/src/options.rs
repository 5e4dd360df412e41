//! Per-command transport options.

use std::time::Duration;

/// Scheduling priority hint passed to the transport
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Priority {
    /// Regular application traffic
    #[default]
    Normal,
    /// Interview and refresh queries
    NodeQuery,
}

/// Options for a single request/response exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandOptions {
    /// How long to wait for a correlated reply
    pub timeout: Duration,
    /// Scheduling hint
    pub priority: Priority,
}

impl CommandOptions {
    /// Use a different reply timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Use a different priority
    #[must_use]
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }
}

impl Default for CommandOptions {
    fn default() -> Self {
        Self { timeout: Duration::from_secs(10), priority: Priority::Normal }
    }
}
