//! Generic retry with exponential backoff for transient collaborator
//! failures.

use std::future::Future;
use std::time::Duration;

/// Errors that can distinguish retryable from permanent failures.
pub trait Transient {
    fn is_transient(&self) -> bool;
}

/// Exponential backoff policy: `initial_delay * multiplier^attempt`,
/// capped at `max_delay`, for up to `max_attempts` tries.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub multiplier: f64,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    /// 3 attempts, 1 s initial delay, doubling, capped at 60 s.
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_secs(1),
            multiplier: 2.0,
            max_delay: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    /// Delay before retrying after the given 0-based failed attempt.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let backoff = self.initial_delay.as_secs_f64() * self.multiplier.powi(attempt as i32);
        Duration::from_secs_f64(backoff.min(self.max_delay.as_secs_f64()))
    }
}

/// Run `op`, retrying transient failures per `policy`. Permanent errors and
/// the final transient failure are returned to the caller unchanged.
pub async fn retry_transient<T, E, F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<T, E>
where
    E: Transient + std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let attempts = policy.max_attempts.max(1);
    let mut attempt = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() && attempt + 1 < attempts => {
                let delay = policy.delay_for(attempt);
                tracing::warn!(
                    error = %err,
                    attempt = attempt + 1,
                    max_attempts = attempts,
                    delay_ms = delay.as_millis() as u64,
                    "transient failure, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    #[derive(Debug)]
    enum FakeError {
        Flaky,
        Fatal,
    }

    impl std::fmt::Display for FakeError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                FakeError::Flaky => write!(f, "flaky"),
                FakeError::Fatal => write!(f, "fatal"),
            }
        }
    }

    impl Transient for FakeError {
        fn is_transient(&self) -> bool {
            matches!(self, FakeError::Flaky)
        }
    }

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            initial_delay: Duration::from_millis(0),
            multiplier: 2.0,
            max_delay: Duration::from_millis(0),
        }
    }

    #[tokio::test]
    async fn succeeds_after_transient_failures() {
        let calls = AtomicU32::new(0);
        let result = retry_transient(&fast_policy(), || async {
            if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(FakeError::Flaky)
            } else {
                Ok(42u32)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn permanent_errors_are_not_retried() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, FakeError> = retry_transient(&fast_policy(), || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(FakeError::Fatal)
        })
        .await;
        assert!(matches!(result.unwrap_err(), FakeError::Fatal));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn exhausted_attempts_return_last_error() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, FakeError> = retry_transient(&fast_policy(), || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(FakeError::Flaky)
        })
        .await;
        assert!(matches!(result.unwrap_err(), FakeError::Flaky));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn backoff_grows_and_caps() {
        let policy = RetryPolicy {
            max_attempts: 5,
            initial_delay: Duration::from_secs(1),
            multiplier: 2.0,
            max_delay: Duration::from_secs(60),
        };
        assert_eq!(policy.delay_for(0), Duration::from_secs(1));
        assert_eq!(policy.delay_for(1), Duration::from_secs(2));
        assert_eq!(policy.delay_for(5), Duration::from_secs(32));
        assert_eq!(policy.delay_for(10), Duration::from_secs(60)); // capped
    }
}
