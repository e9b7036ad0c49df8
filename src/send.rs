//! Dispatcher: performs the delivery and projects it into step outputs.

use serde_json::Value;
use thiserror::Error;

use crate::delivery::{Delivery, DeliveryError, DeliveryResult};
use crate::runner::Runner;
use crate::time::{Clock, SystemClock};

/// Output names set by the dispatcher.
pub mod output {
    /// Whether the delivery succeeded
    pub const OK: &str = "ok";
    /// JSON text of the remote response or error body
    pub const RESPONSE: &str = "response";
    /// Channel the message was posted to
    pub const CHANNEL_ID: &str = "channel_id";
    /// Thread of the posted message
    pub const THREAD_TS: &str = "thread_ts";
    /// Timestamp of the posted message
    pub const TS: &str = "ts";
    /// Unix seconds when the delivery completed
    pub const TIME: &str = "time";
}

/// A failure that ends the step.
#[derive(Debug, Error)]
pub enum SendError {
    /// The delivery failed and failures are not swallowed.
    #[error("Failed to send the payload: {0}")]
    Delivery(#[source] DeliveryError),

    /// A step output could not be written.
    #[error("Failed to write the '{name}' output: {source}")]
    Output {
        /// Output name
        name: &'static str,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// How a dispatch ended when it did not fail the step.
#[derive(Debug)]
pub enum Outcome {
    /// The payload was delivered.
    Delivered(DeliveryResult),
    /// The delivery failed but failures are swallowed.
    Swallowed(DeliveryError),
}

/// Runs one delivery and records its outputs through a [`Runner`].
///
/// On success `ok`, `response`, any message IDs and `time` are set. On
/// failure `ok=false` and the classified error body are set before the
/// error is either returned or swallowed.
#[derive(Debug)]
pub struct Dispatcher<'a, D, R: ?Sized, C = SystemClock> {
    delivery: D,
    runner: &'a R,
    clock: C,
    fail_on_error: bool,
}

impl<'a, D, R: ?Sized> Dispatcher<'a, D, R, SystemClock> {
    /// Creates a dispatcher using the system clock.
    #[must_use]
    pub const fn new(delivery: D, runner: &'a R, fail_on_error: bool) -> Self {
        Self {
            delivery,
            runner,
            clock: SystemClock,
            fail_on_error,
        }
    }
}

impl<'a, D, R: ?Sized, C> Dispatcher<'a, D, R, C> {
    /// Replaces the clock used for the `time` output.
    #[must_use]
    pub fn with_clock<C2>(self, clock: C2) -> Dispatcher<'a, D, R, C2> {
        Dispatcher {
            delivery: self.delivery,
            runner: self.runner,
            clock,
            fail_on_error: self.fail_on_error,
        }
    }
}

impl<D: Delivery, R: Runner + ?Sized, C: Clock> Dispatcher<'_, D, R, C> {
    /// Delivers `content` and sets the step outputs.
    ///
    /// # Errors
    ///
    /// - [`SendError::Delivery`] when delivery fails and failures are not swallowed
    /// - [`SendError::Output`] when an output cannot be written
    pub async fn send(&self, content: &Value) -> Result<Outcome, SendError> {
        match self.delivery.post(content).await {
            Ok(result) => {
                self.record_success(&result)?;
                Ok(Outcome::Delivered(result))
            }
            Err(error) => {
                self.set(output::OK, "false")?;
                self.set(output::RESPONSE, &error.response_body().to_string())?;

                if self.fail_on_error {
                    return Err(SendError::Delivery(error));
                }
                tracing::error!("{error}");
                tracing::info!("Continuing because errors are not set to fail the step");
                Ok(Outcome::Swallowed(error))
            }
        }
    }

    fn record_success(&self, result: &DeliveryResult) -> Result<(), SendError> {
        self.set(output::OK, if result.ok { "true" } else { "false" })?;
        self.set(output::RESPONSE, &result.response.to_string())?;

        let ids = [
            (output::CHANNEL_ID, &result.channel_id),
            (output::THREAD_TS, &result.thread_ts),
            (output::TS, &result.ts),
        ];
        for (name, value) in ids {
            if let Some(value) = value {
                self.set(name, value)?;
            }
        }

        self.set(output::TIME, &self.clock.unix_seconds().to_string())
    }

    fn set(&self, name: &'static str, value: &str) -> Result<(), SendError> {
        self.runner
            .set_output(name, value)
            .map_err(|source| SendError::Output { name, source })
    }
}

#[cfg(test)]
#[path = "send_tests.rs"]
mod tests;
