//! User-facing wait policy for readiness polling
//!
//! End users configure how long an apply waits for the control plane as
//! a duration string (`"5m"`, `"45m"`) or the sentinel `"do_not_retry"`
//! to skip polling entirely. Invalid strings fall back to the default
//! with a logged warning rather than failing the apply.

use std::time::Duration;

use tracing::warn;

/// Sentinel string that disables readiness polling
pub const DO_NOT_RETRY: &str = "do_not_retry";

/// Default wait budget when none (or garbage) is configured
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// How long to wait for the control plane after a mutation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WaitPolicy {
    /// Poll until ready, bounded by this wall-clock budget
    Wait(Duration),
    /// Fire the mutation and return without polling
    DoNotRetry,
}

impl WaitPolicy {
    /// Parse a user-supplied wait string
    ///
    /// Never fails: unparseable input logs a warning and falls back to
    /// [`DEFAULT_WAIT_TIMEOUT`].
    pub fn parse(input: &str) -> Self {
        if input == DO_NOT_RETRY {
            return Self::DoNotRetry;
        }
        match humantime::parse_duration(input) {
            Ok(timeout) => Self::Wait(timeout),
            Err(_) => {
                warn!(
                    input = %input,
                    default = %humantime::format_duration(DEFAULT_WAIT_TIMEOUT),
                    "invalid wait duration, falling back to default"
                );
                Self::Wait(DEFAULT_WAIT_TIMEOUT)
            }
        }
    }

    /// The polling budget, or `None` when polling is disabled
    pub fn timeout(&self) -> Option<Duration> {
        match self {
            Self::Wait(timeout) => Some(*timeout),
            Self::DoNotRetry => None,
        }
    }
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self::Wait(DEFAULT_WAIT_TIMEOUT)
    }
}
