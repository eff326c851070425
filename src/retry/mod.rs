//! Retry wrapper around calls to the generative service.
//!
//! A caller hands over a closure that performs one call. Each failure is
//! classified through [`RetryableError`]. Rate-limited failures are retried
//! with exponential backoff plus jitter. Anything else, or a rate limit on
//! the last attempt, comes back as a [`ClueError`] with a user-safe message.
//! The technical error only ever reaches the log.

pub mod classify;

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, error, warn};

pub use classify::{
    classify, is_rate_limited, message_without_rate_limit, user_message, Classification,
    FALLBACK_MESSAGE, RULES,
};

use crate::error::ClueError;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(1000);
pub const DEFAULT_MAX_JITTER: Duration = Duration::from_millis(500);

/// A failure the retry loop knows how to classify.
///
/// Opaque errors fall back to matching their text against the table.
/// Errors with structure (status codes, parse failures) override both
/// methods so nothing in free text can change how they are treated.
pub trait RetryableError: Display {
    fn classification(&self) -> Classification {
        classify(&self.to_string())
    }

    fn user_message(&self) -> &'static str {
        user_message(&self.to_string())
    }
}

impl RetryableError for String {}
impl RetryableError for &str {}
impl RetryableError for anyhow::Error {}

/// Result of a single attempt, consumed by the retry loop.
#[derive(Debug, PartialEq)]
pub enum AttemptOutcome<T> {
    Success(T),
    Failure {
        classification: Classification,
        message: &'static str,
        raw: String,
    },
}

impl<T> AttemptOutcome<T> {
    pub fn from_result<E: RetryableError>(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => AttemptOutcome::Success(value),
            Err(err) => AttemptOutcome::Failure {
                classification: err.classification(),
                message: err.user_message(),
                raw: err.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one.
    pub max_attempts: u32,
    pub base_delay: Duration,
    /// Upper bound (exclusive) of the random delay added to each backoff.
    pub max_jitter: Duration,
    /// Also retry network and 5xx failures.
    pub retry_transient: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
            max_jitter: DEFAULT_MAX_JITTER,
            retry_transient: false,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Self::default()
        }
    }

    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    pub fn with_max_jitter(mut self, jitter: Duration) -> Self {
        self.max_jitter = jitter;
        self
    }

    pub fn with_retry_transient(mut self, enabled: bool) -> Self {
        self.retry_transient = enabled;
        self
    }

    fn attempt_limit(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Whether a failure on `attempt` (1-based) earns another attempt.
    pub fn should_retry(&self, classification: Classification, attempt: u32) -> bool {
        if attempt >= self.attempt_limit() {
            return false;
        }
        match classification {
            Classification::RateLimited => true,
            Classification::Transient => self.retry_transient,
            Classification::Permanent => false,
        }
    }

    /// `2^(attempt-1) * base_delay + jitter`, saturating on overflow.
    pub fn backoff_delay(&self, attempt: u32, jitter: Duration) -> Duration {
        let exponent = attempt.saturating_sub(1).min(31);
        self.base_delay
            .saturating_mul(1u32 << exponent)
            .saturating_add(jitter)
    }

    /// Backoff for the wait after a failed `attempt`, with fresh jitter.
    pub fn delay_before_retry(&self, attempt: u32) -> Duration {
        let max_micros = self.max_jitter.as_micros() as u64;
        let jitter = if max_micros == 0 {
            Duration::ZERO
        } else {
            Duration::from_micros(rand::random_range(0..max_micros))
        };
        self.backoff_delay(attempt, jitter)
    }

    /// Run `operation` until it succeeds or the policy gives up.
    pub async fn call<T, E, F, Fut>(&self, mut operation: F) -> Result<T, ClueError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: RetryableError,
    {
        let limit = self.attempt_limit();
        let mut attempt = 0;

        loop {
            attempt += 1;
            match AttemptOutcome::from_result(operation().await) {
                AttemptOutcome::Success(value) => {
                    if attempt > 1 {
                        debug!(attempt, "AI service call succeeded after retry");
                    }
                    return Ok(value);
                }
                AttemptOutcome::Failure {
                    classification,
                    message,
                    raw,
                } => {
                    if self.should_retry(classification, attempt) {
                        let delay = self.delay_before_retry(attempt);
                        warn!(
                            attempt,
                            max_attempts = limit,
                            delay_ms = delay.as_millis() as u64,
                            classification = classification.as_str(),
                            "AI service request failed, retrying"
                        );
                        tokio::time::sleep(delay).await;
                        continue;
                    }

                    error!(
                        attempt,
                        classification = classification.as_str(),
                        error = %raw,
                        "Error calling AI service"
                    );
                    return Err(ClueError::Service {
                        classification,
                        message: message.to_string(),
                        attempts: attempt,
                    });
                }
            }
        }
    }
}

/// Call `operation` with the default backoff and at most `max_attempts` tries.
pub async fn call_with_retry<T, E, F, Fut>(operation: F, max_attempts: u32) -> Result<T, ClueError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: RetryableError,
{
    RetryPolicy::new(max_attempts).call(operation).await
}
