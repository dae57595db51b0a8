//! Exponential back-off for quota-limited generation calls.
//!
//! [`RetryPolicy::run`] wraps any fallible async operation and retries only
//! the errors its predicate accepts. The wait before retry `k` (1-based) is
//! `min_delay * 2^(k-1)`, capped at `max_delay`.
//!
//! | Retry | Wait with the Gemini defaults |
//! |-------|-------------------------------|
//! | 1     | 4 s                           |
//! | 2     | 8 s                           |
//! | 3     | 16 s                          |
//! | 4     | 32 s                          |
//!
//! With `max_attempts = 5` the operation runs at most five times.

use std::future::Future;
use std::time::Duration;

use crate::error::IntelError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first. Zero behaves like one.
    pub max_attempts: u32,
    pub min_delay: Duration,
    pub max_delay: Duration,
}

impl RetryPolicy {
    #[must_use]
    pub const fn new(max_attempts: u32, min_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts,
            min_delay,
            max_delay,
        }
    }

    /// Five attempts, 4 s floor, 60 s ceiling.
    #[must_use]
    pub const fn gemini_default() -> Self {
        Self::new(5, Duration::from_secs(4), Duration::from_secs(60))
    }

    /// Wait before the `retry`-th retry (1-based).
    #[must_use]
    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        let shift = retry.saturating_sub(1).min(31);
        self.min_delay
            .saturating_mul(1u32 << shift)
            .min(self.max_delay)
    }

    /// Run `operation`, retrying errors accepted by `is_retriable`.
    ///
    /// # Errors
    ///
    /// Returns the first non-retriable error, or the last retriable one once
    /// `max_attempts` is exhausted.
    pub async fn run<T, F, Fut, P>(&self, is_retriable: P, mut operation: F) -> Result<T, IntelError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, IntelError>>,
        P: Fn(&IntelError) -> bool,
    {
        let mut attempt = 1u32;
        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    if !is_retriable(&err) || attempt >= self.max_attempts {
                        return Err(err);
                    }
                    let delay = self.delay_for_retry(attempt);
                    tracing::warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %err,
                        "rate limited, retrying after back-off"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::gemini_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn instant(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::new(max_attempts, Duration::ZERO, Duration::ZERO)
    }

    fn rate_limited() -> IntelError {
        IntelError::RateLimited {
            backend: "gemini".to_owned(),
            message: "RESOURCE_EXHAUSTED".to_owned(),
        }
    }

    #[test]
    fn delay_doubles_from_floor() {
        let policy = RetryPolicy::gemini_default();
        assert_eq!(policy.delay_for_retry(1), Duration::from_secs(4));
        assert_eq!(policy.delay_for_retry(2), Duration::from_secs(8));
        assert_eq!(policy.delay_for_retry(3), Duration::from_secs(16));
        assert_eq!(policy.delay_for_retry(4), Duration::from_secs(32));
    }

    #[test]
    fn delay_is_capped_at_ceiling() {
        let policy = RetryPolicy::gemini_default();
        assert_eq!(policy.delay_for_retry(5), Duration::from_secs(60));
        assert_eq!(policy.delay_for_retry(40), Duration::from_secs(60));
    }

    #[tokio::test]
    async fn succeeds_immediately_on_first_try() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = instant(5)
            .run(IntelError::is_rate_limited, || {
                let c = Arc::clone(&c);
                async move {
                    c.fetch_add(1, Ordering::SeqCst);
                    Ok::<u32, IntelError>(42)
                }
            })
            .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_rate_limit_then_succeeds() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = instant(5)
            .run(IntelError::is_rate_limited, || {
                let c = Arc::clone(&c);
                async move {
                    let n = c.fetch_add(1, Ordering::SeqCst);
                    if n < 2 {
                        Err(rate_limited())
                    } else {
                        Ok::<&str, IntelError>("ok")
                    }
                }
            })
            .await;
        assert_eq!(result.unwrap(), "ok");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn stops_at_attempt_ceiling() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = instant(3)
            .run(IntelError::is_rate_limited, || {
                let c = Arc::clone(&c);
                async move {
                    c.fetch_add(1, Ordering::SeqCst);
                    Err::<u32, IntelError>(rate_limited())
                }
            })
            .await;
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(matches!(result, Err(IntelError::RateLimited { .. })));
    }

    #[tokio::test]
    async fn does_not_retry_other_errors() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = instant(5)
            .run(IntelError::is_rate_limited, || {
                let c = Arc::clone(&c);
                async move {
                    c.fetch_add(1, Ordering::SeqCst);
                    Err::<u32, IntelError>(IntelError::UnexpectedStatus {
                        backend: "gemini".to_owned(),
                        status: 400,
                        body: "bad request".to_owned(),
                    })
                }
            })
            .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(
            result,
            Err(IntelError::UnexpectedStatus { status: 400, .. })
        ));
    }

    #[tokio::test]
    async fn zero_attempts_still_runs_once() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let _ = instant(0)
            .run(IntelError::is_rate_limited, || {
                let c = Arc::clone(&c);
                async move {
                    c.fetch_add(1, Ordering::SeqCst);
                    Err::<u32, IntelError>(rate_limited())
                }
            })
            .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
