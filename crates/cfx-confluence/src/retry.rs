//! Bounded exponential-backoff retries around blocking remote calls.

use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinError;
use tokio::time::Instant;
use tracing::warn;

/// Default number of attempts, including the first call.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
/// Default bound on total time spent across attempts and sleeps.
pub const DEFAULT_MAX_ELAPSED: Duration = Duration::from_secs(30);
/// Default delay before the first retry.
pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_millis(500);
/// Default growth factor between consecutive delays.
pub const DEFAULT_MULTIPLIER: f64 = 2.0;
/// Smallest accepted initial delay; a zero delay would never grow.
pub const MIN_INITIAL_DELAY: Duration = Duration::from_millis(1);

/// Retry strategy for remote calls.
///
/// Each attempt runs on tokio's blocking pool so the caller's task stays
/// free while the network call is in flight. Only errors accepted by the
/// classifier passed to [`execute`](Self::execute) are retried.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    max_elapsed: Duration,
    initial_delay: Duration,
    multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            max_elapsed: DEFAULT_MAX_ELAPSED,
            initial_delay: DEFAULT_INITIAL_DELAY,
            multiplier: DEFAULT_MULTIPLIER,
        }
    }
}

impl RetryPolicy {
    /// Policy with default bounds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the attempt limit (at least one attempt is always made).
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Set the bound on total elapsed time.
    #[must_use]
    pub fn with_max_elapsed(mut self, max_elapsed: Duration) -> Self {
        self.max_elapsed = max_elapsed;
        self
    }

    /// Set the delay before the first retry (at least [`MIN_INITIAL_DELAY`]).
    #[must_use]
    pub fn with_initial_delay(mut self, initial_delay: Duration) -> Self {
        self.initial_delay = initial_delay.max(MIN_INITIAL_DELAY);
        self
    }

    /// Set the delay growth factor.
    ///
    /// Each retry must wait strictly longer than the previous one, so
    /// factors that are not finite and greater than 1 fall back to
    /// [`DEFAULT_MULTIPLIER`].
    #[must_use]
    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = if multiplier.is_finite() && multiplier > 1.0 {
            multiplier
        } else {
            DEFAULT_MULTIPLIER
        };
        self
    }

    /// Attempt limit.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Bound on total elapsed time.
    pub fn max_elapsed(&self) -> Duration {
        self.max_elapsed
    }

    /// Sleep before retry `retry` (1-based): `initial * multiplier^(retry-1)`.
    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        let exponent = i32::try_from(retry.saturating_sub(1)).unwrap_or(i32::MAX);
        let secs = self.initial_delay.as_secs_f64() * self.multiplier.powi(exponent);
        Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
    }

    /// Run `operation` until it succeeds, fails permanently, or the policy
    /// is exhausted.
    ///
    /// On exhaustion the last error is returned unchanged. A worker that
    /// panics or is cancelled is reported through `E::from(JoinError)` and is
    /// not retried unless `is_transient` accepts it.
    ///
    /// # Errors
    ///
    /// Returns the first non-transient error, or the last transient error
    /// once attempts or elapsed time run out.
    pub async fn execute<T, E, F, C>(&self, operation: F, is_transient: C) -> Result<T, E>
    where
        T: Send + 'static,
        E: From<JoinError> + Display + Send + 'static,
        F: Fn() -> Result<T, E> + Send + Sync + 'static,
        C: Fn(&E) -> bool,
    {
        let operation = Arc::new(operation);
        let started = Instant::now();
        let mut attempt = 1;

        loop {
            let call = Arc::clone(&operation);
            let outcome = match tokio::task::spawn_blocking(move || call()).await {
                Ok(outcome) => outcome,
                Err(join_error) => Err(E::from(join_error)),
            };

            let err = match outcome {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };

            if !is_transient(&err) || attempt >= self.max_attempts {
                return Err(err);
            }

            let delay = self.delay_for_retry(attempt);
            if started.elapsed().saturating_add(delay) > self.max_elapsed {
                warn!(attempt, error = %err, "Retry time budget exhausted");
                return Err(err);
            }

            warn!(
                attempt,
                max_attempts = self.max_attempts,
                delay = ?delay,
                error = %err,
                "Transient failure, retrying"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}
