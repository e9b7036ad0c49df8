//! Retry curves for delivery attempts.

use std::future::Future;
use std::time::Duration;

use crate::config::Retries;
use crate::time::Sleeper;

use super::DeliveryError;

/// How the base delay grows with each retry.
#[derive(Debug, Clone, PartialEq)]
pub enum Backoff {
    /// `step × retry`
    Linear {
        /// Delay added per retry
        step: Duration,
    },
    /// `initial × multiplier^(retry - 1)`
    Exponential {
        /// Delay before the first retry
        initial: Duration,
        /// Growth factor per retry
        multiplier: f64,
    },
}

/// Retry behavior for one delivery strategy.
///
/// Retry numbers are 1-based: retry 1 is the first attempt after the
/// initial call. The delay for a retry is the [`Backoff`] base, stretched
/// by a random factor in `[1, 1 + jitter)`, then capped at `max_delay`.
///
/// # Example
///
/// ```
/// use slack_send::config::Retries;
/// use slack_send::delivery::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::webhook(Retries::Five);
/// assert_eq!(policy.max_retries, 5);
/// assert_eq!(policy.delay_for_retry(5), Duration::from_secs(300));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Maximum number of retries after the initial attempt.
    pub max_retries: u32,

    /// Growth of the base delay.
    pub backoff: Backoff,

    /// Upper bound on any single delay.
    pub max_delay: Duration,

    /// Fraction of random stretch applied to the base delay.
    ///
    /// `0.0` disables jitter; `1.0` stretches up to double.
    pub jitter: f64,
}

impl RetryPolicy {
    /// Cap applied to curves that have no natural upper bound.
    pub const UNBOUNDED_MAX_DELAY: Duration = Duration::from_secs(60 * 60);

    /// A policy that never retries.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            max_retries: 0,
            backoff: Backoff::Linear {
                step: Duration::ZERO,
            },
            max_delay: Duration::ZERO,
            jitter: 0.0,
        }
    }

    /// Curves used for webhook POSTs.
    ///
    /// - `0`: no retries
    /// - `5`: five retries, one more minute of delay per retry
    /// - `10`: ten retries, doubling from 4s (about 34 minutes by the
    ///   tenth) plus up to 20% jitter
    /// - `RAPID`: twelve retries, one more second per retry
    #[must_use]
    pub const fn webhook(retries: Retries) -> Self {
        match retries {
            Retries::Zero => Self::none(),
            Retries::Five => Self {
                max_retries: 5,
                backoff: Backoff::Linear {
                    step: Duration::from_secs(60),
                },
                max_delay: Self::UNBOUNDED_MAX_DELAY,
                jitter: 0.0,
            },
            Retries::Ten => Self {
                max_retries: 10,
                backoff: Backoff::Exponential {
                    initial: Duration::from_secs(4),
                    multiplier: 2.0,
                },
                max_delay: Self::UNBOUNDED_MAX_DELAY,
                jitter: 0.2,
            },
            Retries::Rapid => Self {
                max_retries: 12,
                backoff: Backoff::Linear {
                    step: Duration::from_secs(1),
                },
                max_delay: Self::UNBOUNDED_MAX_DELAY,
                jitter: 0.0,
            },
        }
    }

    /// Curves used for API method calls with a token.
    ///
    /// - `0`: no retries
    /// - `5`: five retries growing by 3.86x from 1s (about five minutes total)
    /// - `10`: ten retries growing by 1.96x from 1s, each stretched by a
    ///   random factor up to 2x (about thirty minutes total)
    /// - `RAPID`: ten retries, 1ms apart
    #[must_use]
    pub const fn api(retries: Retries) -> Self {
        match retries {
            Retries::Zero => Self::none(),
            Retries::Five => Self {
                max_retries: 5,
                backoff: Backoff::Exponential {
                    initial: Duration::from_secs(1),
                    multiplier: 3.86,
                },
                max_delay: Self::UNBOUNDED_MAX_DELAY,
                jitter: 0.0,
            },
            Retries::Ten => Self {
                max_retries: 10,
                backoff: Backoff::Exponential {
                    initial: Duration::from_secs(1),
                    multiplier: 1.96,
                },
                max_delay: Self::UNBOUNDED_MAX_DELAY,
                jitter: 1.0,
            },
            Retries::Rapid => Self {
                max_retries: 10,
                backoff: Backoff::Linear {
                    step: Duration::from_millis(1),
                },
                max_delay: Duration::from_millis(1),
                jitter: 0.0,
            },
        }
    }

    /// Sets the maximum number of retries.
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the jitter fraction.
    ///
    /// Negative and non-finite values disable jitter.
    #[must_use]
    pub fn with_jitter(mut self, jitter: f64) -> Self {
        self.jitter = if jitter.is_finite() { jitter.max(0.0) } else { 0.0 };
        self
    }

    /// Computes the delay before the given retry (1-based), with fresh jitter.
    #[must_use]
    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        let sample = if self.jitter > 0.0 {
            rand::random::<f64>()
        } else {
            0.0
        };
        self.delay_with_sample(retry, sample)
    }

    /// Computes the delay before the given retry for a jitter sample in `[0, 1)`.
    #[must_use]
    pub fn delay_with_sample(&self, retry: u32, sample: f64) -> Duration {
        let retry = retry.max(1);
        let base_secs = match &self.backoff {
            Backoff::Linear { step } => step.as_secs_f64() * f64::from(retry),
            Backoff::Exponential {
                initial,
                multiplier,
            } => {
                // Safe cast: retry counts are at most a dozen
                #[allow(clippy::cast_possible_wrap)]
                let growth = multiplier.powi((retry - 1) as i32);
                initial.as_secs_f64() * growth
            }
        };

        let stretched = base_secs * self.jitter.mul_add(sample.clamp(0.0, 1.0), 1.0);
        Duration::from_secs_f64(stretched.min(self.max_delay.as_secs_f64()))
    }

    /// Returns true if another retry is allowed after `retries_done` retries.
    #[must_use]
    pub const fn should_retry(&self, retries_done: u32) -> bool {
        retries_done < self.max_retries
    }

    /// Runs `attempt` until it succeeds, fails permanently, or retries run out.
    ///
    /// Between attempts the policy delay is slept, or the failure's
    /// `wait_at_least` when that is longer.
    pub(crate) async fn run<S, F, Fut, T>(
        &self,
        sleeper: &S,
        mut attempt: F,
    ) -> Result<T, DeliveryError>
    where
        S: Sleeper,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, Failure>>,
    {
        let mut retries_done = 0;

        loop {
            let failure = match attempt().await {
                Ok(value) => return Ok(value),
                Err(failure) => failure,
            };

            if !failure.retryable || !self.should_retry(retries_done) {
                return Err(failure.error);
            }

            retries_done += 1;
            let delay = self
                .delay_for_retry(retries_done)
                .max(failure.wait_at_least.unwrap_or_default());
            tracing::warn!(
                "Attempt failed ({}), retry {retries_done}/{} in {:.1}s",
                failure.error,
                self.max_retries,
                delay.as_secs_f64()
            );
            sleeper.sleep(delay).await;
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::webhook(Retries::default())
    }
}

/// A failed attempt and whether it is worth repeating.
#[derive(Debug)]
pub(crate) struct Failure {
    pub error: DeliveryError,
    pub retryable: bool,
    /// Minimum wait requested by the server, e.g. `Retry-After`
    pub wait_at_least: Option<Duration>,
}

impl Failure {
    pub(crate) const fn retryable(error: DeliveryError) -> Self {
        Self {
            error,
            retryable: true,
            wait_at_least: None,
        }
    }

    pub(crate) const fn permanent(error: DeliveryError) -> Self {
        Self {
            error,
            retryable: false,
            wait_at_least: None,
        }
    }
}
