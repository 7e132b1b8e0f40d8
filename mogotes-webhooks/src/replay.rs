//! Replay window enforcement

use crate::{Result, WebhookError};

/// Default allowed clock skew, in seconds
pub const DEFAULT_MAX_AGE_SECONDS: u64 = 300;

/// Check that `timestamp` is within `max_age_seconds` of `now`.
///
/// The window is symmetric: timestamps in the future are rejected the same
/// way as stale ones. A skew of exactly `max_age_seconds` is accepted.
pub fn check_window(timestamp: i64, now: i64, max_age_seconds: u64) -> Result<()> {
    if now.abs_diff(timestamp) > max_age_seconds {
        return Err(WebhookError::TimestampOutOfWindow {
            timestamp,
            max_age_seconds,
        });
    }
    Ok(())
}

/// Replay guard with a fixed window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplayWindow {
    max_age_seconds: u64,
}

impl Default for ReplayWindow {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_AGE_SECONDS)
    }
}

impl ReplayWindow {
    /// Create a guard with the given window
    pub fn new(max_age_seconds: u64) -> Self {
        Self { max_age_seconds }
    }

    /// Allowed skew in seconds
    pub fn max_age_seconds(&self) -> u64 {
        self.max_age_seconds
    }

    /// Check a timestamp against an explicit clock reading
    pub fn check(&self, timestamp: i64, now: i64) -> Result<()> {
        check_window(timestamp, now, self.max_age_seconds)
    }

    /// Check a timestamp against the system clock
    pub fn check_now(&self, timestamp: i64) -> Result<()> {
        self.check(timestamp, chrono::Utc::now().timestamp())
    }
}
