//! Bounded retry with exponential backoff for the API clients

use std::future::Future;
use std::time::Duration as StdDuration;

use super::ports::ApiError;

/// Retry policy: attempt budget and backoff base.
/// Delay doubles after each failed attempt.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: StdDuration,
}

impl RetryPolicy {
    /// Create a policy with the given attempt budget and base delay
    pub const fn new(max_attempts: u32, base_delay: StdDuration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    /// Delay before the retry following the given (1-based) attempt
    pub fn delay_for(&self, attempt: u32) -> StdDuration {
        self.base_delay * 2u32.saturating_pow(attempt.saturating_sub(1))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, StdDuration::from_millis(500))
    }
}

/// Run an API call, replaying transient failures with exponential backoff.
///
/// Non-transient errors and the final transient failure surface unchanged.
pub async fn with_retry<T, F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<T, ApiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_transient() && attempt < policy.max_attempts => {
                let delay = policy.delay_for(attempt);
                log::warn!(
                    "transient API failure (attempt {}/{}), retrying in {:?}: {}",
                    attempt,
                    policy.max_attempts,
                    delay,
                    e
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
