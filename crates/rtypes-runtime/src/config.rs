//! Runtime configuration.

use std::time::Duration;

/// Configuration for the batch consumer.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// How long one receive waits before the loop re-checks for shutdown.
    pub poll_timeout: Duration,
    /// Flush the outbound channel after every published batch.
    pub flush_on_publish: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            poll_timeout: Duration::from_secs(1),
            flush_on_publish: true,
        }
    }
}

impl RuntimeConfig {
    /// Creates a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the poll timeout.
    pub fn with_poll_timeout(mut self, timeout: Duration) -> Self {
        self.poll_timeout = timeout;
        self
    }

    /// Sets whether to flush after each publish.
    pub fn with_flush_on_publish(mut self, flush: bool) -> Self {
        self.flush_on_publish = flush;
        self
    }
}
