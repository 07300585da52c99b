//! Retry with exponential back-off for Overpass requests.
//!
//! [`retry_with_backoff`] wraps a fallible async attempt and retries every
//! failure except caller cancellation. Overpass answers 504 when its query
//! queue is full, so gateway timeouts are the common case, but connection
//! errors, deadlines, and other non-2xx statuses follow the same schedule.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::error::LocatorError;

/// Attempt budget, back-off schedule, and per-attempt deadline for one
/// endpoint.
///
/// Back-off schedule with the default `backoff_base` of 1 s:
///
/// | Failed attempt | Sleep before next attempt |
/// |----------------|---------------------------|
/// | 0              | 1 s × 2¹ = 2 s            |
/// | 1              | 1 s × 2² = 4 s            |
/// | 2              | 1 s × 2³ = 8 s            |
///
/// No sleep follows the final attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Values below 1 are treated as 1.
    pub max_attempts: u32,
    pub backoff_base: Duration,
    /// Hard deadline for a single request; the request is dropped when it
    /// expires.
    pub attempt_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_base: Duration::from_secs(1),
            attempt_timeout: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    /// Sleep after failed attempt `attempt` (0-based): `backoff_base * 2^(attempt + 1)`.
    #[must_use]
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let exponent = (attempt + 1).min(20);
        self.backoff_base.saturating_mul(1u32 << exponent)
    }

    fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Sum of every back-off sleep a fully failing endpoint incurs.
    #[must_use]
    pub fn total_backoff(&self) -> Duration {
        (0..self.attempts() - 1).map(|i| self.backoff_delay(i)).sum()
    }

    /// Upper bound on time spent against one endpoint before it is given up.
    #[must_use]
    pub fn worst_case_per_endpoint(&self) -> Duration {
        self.attempt_timeout
            .saturating_mul(self.attempts())
            .saturating_add(self.total_backoff())
    }
}

/// Runs `operation` up to `policy.max_attempts` times.
///
/// `operation` receives the 0-based attempt number. On success the value is
/// returned immediately. [`LocatorError::Cancelled`] is returned as-is. Any
/// other error is retried after [`RetryPolicy::backoff_delay`]; once the
/// budget is spent the last error is wrapped in
/// [`LocatorError::ExhaustedRetries`]. Cancelling `cancel` interrupts a
/// pending back-off sleep.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    policy: &RetryPolicy,
    cancel: &CancellationToken,
    url: &str,
    mut operation: F,
) -> Result<T, LocatorError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, LocatorError>>,
{
    let max_attempts = policy.attempts();
    let mut attempt = 0u32;

    loop {
        let err = match operation(attempt).await {
            Ok(value) => return Ok(value),
            Err(LocatorError::Cancelled) => return Err(LocatorError::Cancelled),
            Err(err) => err,
        };

        if attempt + 1 >= max_attempts {
            return Err(LocatorError::ExhaustedRetries {
                url: url.to_owned(),
                attempts: attempt + 1,
                source: Box::new(err),
            });
        }

        let delay = policy.backoff_delay(attempt);
        #[allow(clippy::cast_possible_truncation)]
        let delay_ms = delay.as_millis() as u64;
        if err.status() == Some(504) {
            tracing::warn!(
                url,
                attempt,
                max_attempts,
                delay_ms,
                "gateway timeout, retrying after back-off"
            );
        } else {
            tracing::warn!(
                url,
                attempt,
                max_attempts,
                delay_ms,
                error = %err,
                "request failed, retrying after back-off"
            );
        }

        tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(LocatorError::Cancelled),
            () = tokio::time::sleep(delay) => {}
        }

        attempt += 1;
    }
}
