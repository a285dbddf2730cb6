//! Retry executor: exponential backoff with jitter around a single remote call.
//!
//! Every call to the text or image service goes through [`RetryExecutor::execute`].
//! Per-call failures never escape as panics; they resolve to a [`RetryError`].

use crate::error::{RetryClass, RetryError, ServiceError};
use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Backoff parameters for one class of remote calls.
#[derive(Debug, Clone, PartialEq)]
pub struct BackoffPolicy {
    /// Base delay before the first retry
    pub initial_delay: Duration,
    /// Growth factor per counted attempt
    pub exponential_base: f64,
    /// Scale each delay by `1 + U(0,1)`
    pub jitter: bool,
    /// Counted failures allowed before giving up
    pub max_retries: u32,
    /// Whether connection failures consume the retry budget.
    /// When false they retry without bound while the connection keeps failing.
    pub count_connection_failures: bool,
}

impl BackoffPolicy {
    pub const TEXT_MAX_RETRIES: u32 = 5;
    pub const IMAGE_MAX_RETRIES: u32 = 3;

    /// Policy for text-generation calls.
    pub fn text() -> Self {
        Self::with_max_retries(Self::TEXT_MAX_RETRIES)
    }

    /// Policy for image-generation calls.
    pub fn image() -> Self {
        Self::with_max_retries(Self::IMAGE_MAX_RETRIES)
    }

    pub fn with_max_retries(max_retries: u32) -> Self {
        Self {
            initial_delay: Duration::from_secs(1),
            exponential_base: 2.0,
            jitter: true,
            max_retries,
            count_connection_failures: true,
        }
    }

    /// Delay after `attempt` counted failures, for a uniform `sample` in [0, 1].
    ///
    /// `initial_delay * exponential_base^attempt * (1 + jitter * sample)`
    pub fn delay_for(&self, attempt: u32, sample: f64) -> Duration {
        let jitter = if self.jitter {
            sample.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let factor = self.exponential_base.powi(exponent) * (1.0 + jitter);
        Duration::try_from_secs_f64(self.initial_delay.as_secs_f64() * factor)
            .unwrap_or(Duration::MAX)
    }
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self::text()
    }
}

/// Wraps fallible remote calls with the configured [`BackoffPolicy`].
#[derive(Debug, Clone)]
pub struct RetryExecutor {
    policy: BackoffPolicy,
}

impl RetryExecutor {
    pub fn new(policy: BackoffPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &BackoffPolicy {
        &self.policy
    }

    /// Run `call` until it succeeds, the budget is spent, or it fails terminally.
    ///
    /// `operation` only labels log events.
    pub async fn execute<T, F, Fut>(&self, operation: &str, mut call: F) -> Result<T, RetryError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ServiceError>>,
    {
        let max_retries = self.policy.max_retries;
        let mut attempt: u32 = 0;

        loop {
            let error = match call().await {
                Ok(value) => return Ok(value),
                Err(error) => error,
            };

            match error.retry_class() {
                RetryClass::Terminal => {
                    warn!(operation, error = %error, "Request rejected, not retrying");
                    return Err(RetryError::Rejected(error));
                }
                RetryClass::Counted => attempt += 1,
                RetryClass::Connection => {
                    if self.policy.count_connection_failures {
                        attempt += 1;
                    } else {
                        debug!(operation, attempt, "Connection failure not counted");
                    }
                }
            }

            if attempt >= max_retries {
                warn!(
                    operation,
                    attempts = attempt,
                    error = %error,
                    "Max retries exceeded"
                );
                return Err(RetryError::Exhausted {
                    attempts: attempt,
                    last_error: error,
                });
            }

            let sample = rand::thread_rng().gen::<f64>();
            let delay = self.policy.delay_for(attempt, sample);
            warn!(
                operation,
                attempt,
                max_retries,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                error = %error,
                "Retrying remote call"
            );
            tokio::time::sleep(delay).await;
        }
    }
}
