//! Sanity-check reporting
//!
//! A sanity failure is a violated invariant the design assumes always holds
//! (unhandled goal value, point-goal without a point, post-placement
//! mismatch, duplicate squad name). These are surfaced loudly but the
//! pipeline keeps running: aborting mid-match forfeits the whole run, while
//! a bot playing through a bug can often still win.

/// Records and reports invariant violations without stopping the pipeline
#[derive(Debug, Default)]
pub struct SanityMonitor {
    failures: Vec<String>,
}

impl SanityMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report a violated invariant. Logged at error level and counted.
    pub fn fail(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::error!(target: "overseer::sanity", "SANITY FAILURE: {}", message);
        self.failures.push(message);
    }

    /// Number of failures recorded so far
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// All failure messages, oldest first
    pub fn failures(&self) -> &[String] {
        &self.failures
    }
}
