//! Retry policy.
//!
//! # Responsibilities
//! - Decide whether a failed attempt may be retried
//! - Provide the fixed delay before the next attempt
//!
//! # Design Decisions
//! - Connection, DNS and timeout errors are retryable; status codes never are
//! - `max_retries` counts retries, so total attempts = `max_retries + 1`

use std::time::Duration;
use serde::{Deserialize, Serialize};

/// Fixed-delay retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Retries allowed after the first attempt.
    pub max_retries: u32,
    /// Delay between attempts.
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, delay: Duration) -> Self {
        Self { max_retries, delay }
    }

    /// Whether a transport failure on `attempt` (1-based) may be retried.
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt <= self.max_retries
    }

    /// Wait out the retry delay.
    pub async fn wait(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(2, Duration::from_secs(5))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_attempt_budget() {
        let policy = RetryPolicy::new(2, Duration::from_secs(5));
        assert!(policy.should_retry(1));
        assert!(policy.should_retry(2));
        assert!(!policy.should_retry(3));
    }

    #[test]
    fn test_no_retries() {
        let policy = RetryPolicy::new(0, Duration::ZERO);
        assert!(!policy.should_retry(1));
    }

    #[tokio::test]
    async fn test_wait_honors_delay() {
        let policy = RetryPolicy::new(1, Duration::from_millis(30));
        let start = Instant::now();
        policy.wait().await;
        assert!(start.elapsed() >= Duration::from_millis(30));
    }
}
