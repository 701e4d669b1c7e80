//! Exponential backoff for calls into fallible collaborators.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
    max_delay: Duration,
}

impl RetryPolicy {
    /// - `max_attempts`: total tries including the first, at least 1
    /// - `base_delay`: wait after the first failure, doubled per retry
    pub fn new(max_attempts: u32, base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            max_delay,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay before retry number `retry` (0-based), or `None` once the
    /// attempts are spent.
    pub fn delay_for(&self, retry: u32) -> Option<Duration> {
        if retry + 1 >= self.max_attempts {
            return None;
        }

        let factor = 2u32.checked_pow(retry).unwrap_or(u32::MAX);
        let delay = self
            .base_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay);
        Some(delay.min(self.max_delay))
    }

    pub async fn run<T, E, F, Fut>(&self, operation: &str, mut op: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let mut retry = 0;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) => match self.delay_for(retry) {
                    Some(delay) => {
                        warn!(
                            operation,
                            attempt = retry + 1,
                            max_attempts = self.max_attempts(),
                            delay_ms = delay.as_millis() as u64,
                            error = %err,
                            "retrying after failure"
                        );
                        tokio::time::sleep(delay).await;
                        retry += 1;
                    }
                    None => return Err(err),
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn delays_double_until_capped() {
        let policy = RetryPolicy::new(6, Duration::from_secs(1), Duration::from_secs(5));

        assert_eq!(policy.delay_for(0), Some(Duration::from_secs(1)));
        assert_eq!(policy.delay_for(1), Some(Duration::from_secs(2)));
        assert_eq!(policy.delay_for(2), Some(Duration::from_secs(4)));
        assert_eq!(policy.delay_for(3), Some(Duration::from_secs(5)));
        assert_eq!(policy.delay_for(4), Some(Duration::from_secs(5)));
        assert_eq!(policy.delay_for(5), None);
    }

    #[test]
    fn single_attempt_never_retries() {
        let policy = RetryPolicy::new(0, Duration::from_secs(1), Duration::from_secs(5));
        assert_eq!(policy.max_attempts(), 1);
        assert_eq!(policy.delay_for(0), None);
    }

    #[tokio::test]
    async fn run_retries_until_success() {
        let policy = RetryPolicy::new(3, Duration::from_millis(1), Duration::from_millis(2));
        let calls = Cell::new(0);

        let result: Result<u32, String> = policy
            .run("flaky", || {
                calls.set(calls.get() + 1);
                let n = calls.get();
                async move {
                    if n < 3 {
                        Err(format!("failure {n}"))
                    } else {
                        Ok(n)
                    }
                }
            })
            .await;

        assert_eq!(result, Ok(3));
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test]
    async fn run_returns_last_error() {
        let policy = RetryPolicy::new(2, Duration::from_millis(1), Duration::from_millis(1));
        let calls = Cell::new(0);

        let result: Result<(), String> = policy
            .run("always-failing", || {
                calls.set(calls.get() + 1);
                let n = calls.get();
                async move { Err(format!("failure {n}")) }
            })
            .await;

        assert_eq!(result, Err("failure 2".to_string()));
        assert_eq!(calls.get(), 2);
    }
}
