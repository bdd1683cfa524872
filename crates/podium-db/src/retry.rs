//! Transient lock-contention retry logic.
//!
//! A file-backed ledger shared between the CLI and a long-running sweep can
//! briefly report `database is locked` while another connection holds the
//! write lock. These errors clear on their own, so write paths retry them
//! with exponential backoff. Constraint and syntax errors are never retried.

use std::time::Duration;

/// Configuration for retry behavior with exponential backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
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
    /// Delay to wait after the given failed attempt (1-based).
    ///
    /// Doubles from `base_delay` and never exceeds `max_delay`.
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        self.base_delay
            .saturating_mul(1_u32 << exponent)
            .min(self.max_delay)
    }
}

/// Detect transient lock-contention errors.
///
/// The predicate is intentionally narrow to avoid retrying genuine
/// SQL or constraint errors.
pub fn is_transient_error(e: &libsql::Error) -> bool {
    let msg = e.to_string();
    msg.contains("database is locked")
        || msg.contains("database table is locked")
        || msg.contains("SQLITE_BUSY")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(1, 100)]
    #[case(2, 200)]
    #[case(3, 400)]
    #[case(4, 500)]
    #[case(40, 500)]
    fn backoff_doubles_and_caps(#[case] attempt: u32, #[case] expected_ms: u64) {
        let cfg = RetryConfig {
            max_attempts: 6,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_millis(500),
        };
        assert_eq!(cfg.delay_for(attempt), Duration::from_millis(expected_ms));
    }

    #[rstest]
    #[case(5, "database is locked", true)]
    #[case(6, "database table is locked", true)]
    #[case(19, "UNIQUE constraint failed", false)]
    #[case(1, "no such table: timeline_entries", false)]
    fn only_lock_errors_are_transient(
        #[case] code: i32,
        #[case] message: &str,
        #[case] transient: bool,
    ) {
        let err = libsql::Error::SqliteFailure(code, message.into());
        assert_eq!(is_transient_error(&err), transient);
    }
}
