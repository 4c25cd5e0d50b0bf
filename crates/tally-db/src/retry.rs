//! Turso transient error retry logic.
//!
//! Provides automatic retry with exponential backoff for transient
//! Turso cloud infrastructure errors (node recycling, shared lock
//! contention). These errors surface as HTTP 400 responses from the
//! Hrana API and resolve on their own within seconds.
//!
//! Local databases never encounter these errors, so the retry path is
//! gated on `TallyDb::is_remote`.

use std::time::Duration;

/// Configuration for retry behavior on transient Turso errors.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the initial one).
    pub max_attempts: u32,
    /// Initial delay before the first retry.
    pub base_delay: Duration,
    /// Maximum delay between retries (backoff is capped here).
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(2),
        }
    }
}

impl RetryConfig {
    /// Delay before retry number `attempt` (1-based), doubling each time.
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

/// Detect transient Turso infrastructure errors.
///
/// The predicate is narrow so genuine SQL or constraint errors are never
/// retried.
pub fn is_transient_turso_error(e: &libsql::Error) -> bool {
    let msg = e.to_string();
    msg.contains("unable to acquire shared lock")
        || msg.contains("deletion must be in progress")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_and_caps() {
        let config = RetryConfig::default();
        assert_eq!(config.delay_for(1), Duration::from_millis(100));
        assert_eq!(config.delay_for(2), Duration::from_millis(200));
        assert_eq!(config.delay_for(3), Duration::from_millis(400));
        assert_eq!(config.delay_for(10), Duration::from_secs(2));
    }

    #[test]
    fn constraint_errors_are_not_transient() {
        let err = libsql::Error::SqliteFailure(19, "UNIQUE constraint failed".into());
        assert!(!is_transient_turso_error(&err));
    }

    #[test]
    fn shared_lock_errors_are_transient() {
        let err = libsql::Error::SqliteFailure(1, "unable to acquire shared lock on node".into());
        assert!(is_transient_turso_error(&err));
    }
}
