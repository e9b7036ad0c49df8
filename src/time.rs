//! Time abstraction for testability.
//!
//! This module provides a [`Clock`] trait for reading the completion time
//! reported in the `time` output, and a [`Sleeper`] trait for the delays
//! between delivery retries. Tests inject controlled implementations
//! while production uses the system clock and tokio timers.

use std::time::{Duration, SystemTime};

/// Abstraction over system time for testability.
///
/// # Example
///
/// ```
/// use slack_send::time::{Clock, SystemClock};
///
/// let clock = SystemClock;
/// assert!(clock.unix_seconds() > 0);
/// ```
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> SystemTime;

    /// Returns whole seconds since the Unix epoch.
    ///
    /// Pre-epoch clocks report 0.
    fn unix_seconds(&self) -> u64 {
        self.now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map_or(0, |d| d.as_secs())
    }
}

/// Production clock using actual system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Abstraction over async sleeping between retry attempts.
pub trait Sleeper: Send + Sync {
    /// Waits for the given duration.
    fn sleep(&self, duration: Duration) -> impl std::future::Future<Output = ()> + Send;
}

/// Production sleeper backed by [`tokio::time::sleep`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
