//! Exponential backoff for quota errors, shared by speech and analysis.

use std::future::Future;
use std::time::Duration;

use crate::error::{GeminiError, GeminiResult};

/// How quota failures are retried.
///
/// Attempt `n` (1-based) that fails with a quota error is followed by a
/// delay of `base_delay * 2^(n-1)`. Any other error is returned at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Zero behaves like one.
    pub max_attempts: u32,
    /// Delay after the first failed attempt.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// A policy that makes exactly one attempt.
    pub const fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::ZERO,
        }
    }

    /// Delay to wait after failed attempt `attempt` (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        self.base_delay.saturating_mul(1 << exponent)
    }
}

/// Run `op` until it succeeds, fails with a non-quota error, or attempts run out.
///
/// When attempts run out the last quota error is returned with its
/// `attempts` field set to the number of attempts made.
pub(crate) async fn with_backoff<T, F, Fut>(
    policy: RetryPolicy,
    operation: &'static str,
    mut op: F,
) -> GeminiResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = GeminiResult<T>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match op().await {
            Ok(value) => {
                if attempt > 1 {
                    tracing::debug!(operation, attempt, "Succeeded after backoff");
                }
                return Ok(value);
            }
            Err(GeminiError::QuotaExhausted { message, .. }) if attempt < max_attempts => {
                let delay = policy.delay_after(attempt);
                tracing::warn!(
                    operation,
                    attempt,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    %message,
                    "Quota exhausted, backing off"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(GeminiError::QuotaExhausted { message, .. }) => {
                return Err(GeminiError::QuotaExhausted {
                    attempts: attempt,
                    message,
                });
            }
            Err(e) => return Err(e),
        }
    }
}
