use std::time::Duration;

use tracing::warn;

use crate::oracle::backoff::calculate_backoff_delay;
use crate::oracle::{CompletionOracle, OracleError, ResponseFormat};

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of calls, the first one included.
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
        }
    }
}

impl RetryPolicy {
    /// A policy that makes a single attempt.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::ZERO,
        }
    }
}

/// Call the oracle, retrying transient failures with exponential backoff.
///
/// Non-retriable errors are returned straight away. A rate limit that names
/// a `Retry-After` waits at least that long.
pub async fn complete_with_retry(
    oracle: &dyn CompletionOracle,
    prompt: &str,
    format: ResponseFormat,
    policy: &RetryPolicy,
) -> Result<String, OracleError> {
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        let err = match oracle.complete(prompt, format).await {
            Ok(response) => return Ok(response),
            Err(err) => err,
        };

        attempt += 1;
        if !err.should_retry() || attempt >= max_attempts {
            return Err(err);
        }

        let mut delay = calculate_backoff_delay(attempt - 1, policy.base_delay);
        if let OracleError::RateLimited {
            retry_after: Some(retry_after),
        } = &err
        {
            delay = delay.max(*retry_after);
        }

        warn!(
            attempt,
            max_attempts,
            delay_ms = delay.as_millis() as u64,
            error = %err,
            "Oracle call failed, retrying"
        );
        tokio::time::sleep(delay).await;
    }
}
