//! Generic retry logic with exponential backoff
//!
//! Wraps fallible async operations in a bounded retry loop. The backoff
//! doubles from one second up to a ten second cap, with jitter to keep
//! concurrent callers from retrying in lockstep. Only errors that report
//! themselves as retryable are attempted again.

use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Backoff parameters for a retried operation
///
/// Hydrated from the application config; see `config::ResilienceConfig`.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Delay before the first retry in milliseconds
    pub initial_delay_ms: u64,
    /// Ceiling on any single backoff delay in milliseconds
    pub max_delay_ms: u64,
    /// Growth factor applied per retry
    pub multiplier: f64,
    /// Retries after the first attempt; 2 means at most three tries overall
    pub max_retries: u32,
    /// Randomize delays to spread out concurrent callers
    pub jitter_enabled: bool,
    /// Jitter amplitude as a fraction of the delay (0.1 = plus or minus 10%)
    pub jitter_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::new(1000, 10_000, 2.0, 2)
    }
}

impl RetryConfig {
    /// Backoff with the given delays, keeping jitter at the standard 10%
    #[must_use]
    pub const fn new(
        initial_delay_ms: u64,
        max_delay_ms: u64,
        multiplier: f64,
        max_retries: u32,
    ) -> Self {
        Self {
            initial_delay_ms,
            max_delay_ms,
            multiplier,
            max_retries,
            jitter_enabled: true,
            jitter_factor: 0.1,
        }
    }

    /// Disable jitter, mainly useful for deterministic tests
    #[must_use]
    pub const fn without_jitter(mut self) -> Self {
        self.jitter_enabled = false;
        self
    }

    /// Delay before retry number `attempt` (0-indexed)
    ///
    /// Exponential: `initial_delay * multiplier^attempt`, capped at
    /// `max_delay_ms`, then jittered.
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_wrap,
        clippy::cast_sign_loss,
        clippy::cast_possible_truncation
    )]
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let raw = (self.initial_delay_ms as f64) * self.multiplier.powi(attempt as i32);
        let mut delay_ms = raw.min(self.max_delay_ms as f64);

        if self.jitter_enabled {
            let amplitude = delay_ms * self.jitter_factor;
            let jittered = delay_ms + rand::rng().random_range(-amplitude..=amplitude);
            delay_ms = jittered.max(0.0);
        }

        Duration::from_millis(delay_ms as u64)
    }
}

/// Classifies an error as transient or permanent
pub trait Retryable {
    /// Whether another attempt could plausibly succeed
    fn is_retryable(&self) -> bool;
}

// Connection failures and timeouts are transient; a rejected request or a
// broken payload will not improve on a second try.
impl Retryable for integration_weather::WeatherError {
    fn is_retryable(&self) -> bool {
        matches!(self, Self::ConnectionFailed(_) | Self::Timeout)
    }
}

/// Final outcome of a retried operation plus attempt metadata
#[derive(Debug)]
pub struct RetryResult<T, E> {
    /// Success, or the error from the last attempt
    pub result: Result<T, E>,
    /// How many attempts ran; 1 means the first try succeeded or was fatal
    pub attempts: u32,
    /// Wall time across all attempts, backoff sleeps included
    pub total_duration: Duration,
}

impl<T, E> RetryResult<T, E> {
    /// True when the final attempt succeeded
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.result.is_ok()
    }

    /// True when every attempt failed
    #[must_use]
    pub const fn is_err(&self) -> bool {
        self.result.is_err()
    }

    /// Drop the attempt metadata and keep the outcome
    pub fn into_result(self) -> Result<T, E> {
        self.result
    }
}

/// Run an async operation until it succeeds, fails permanently, or exhausts
/// the retry budget
///
/// Only errors whose `Retryable` impl says so are tried again; everything
/// else returns on the spot. The `RetryResult` carries the outcome plus
/// attempt metadata.
#[allow(clippy::cast_possible_truncation)]
pub async fn with_retry<F, Fut, T, E>(config: &RetryConfig, mut operation: F) -> RetryResult<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Retryable + std::fmt::Display,
{
    let start = std::time::Instant::now();
    let finish = |result: Result<T, E>, attempts: u32| RetryResult {
        result,
        attempts,
        total_duration: start.elapsed(),
    };
    let mut attempts = 0u32;

    loop {
        attempts += 1;
        match operation().await {
            Ok(value) => {
                if attempts > 1 {
                    debug!(
                        attempts,
                        duration_ms = start.elapsed().as_millis() as u64,
                        "Succeeded after retries"
                    );
                }
                return finish(Ok(value), attempts);
            }
            Err(err) => {
                // Retries completed so far, which also 0-indexes the next delay
                let retries_done = attempts - 1;

                if !err.is_retryable() {
                    debug!(attempts, error = %err, "Failed with non-retryable error");
                    return finish(Err(err), attempts);
                }

                if retries_done >= config.max_retries {
                    warn!(
                        attempts,
                        max_retries = config.max_retries,
                        error = %err,
                        "Retry budget exhausted, giving up"
                    );
                    return finish(Err(err), attempts);
                }

                let delay = config.delay_for_attempt(retries_done);
                warn!(
                    attempt = attempts,
                    max_retries = config.max_retries,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "Attempt failed, backing off"
                );

                tokio::time::sleep(delay).await;
            }
        }
    }
}

/// `with_retry` for callers that only want the final `Result`
pub async fn retry<F, Fut, T, E>(config: &RetryConfig, operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Retryable + std::fmt::Display,
{
    with_retry(config, operation).await.into_result()
}
