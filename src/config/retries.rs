//! Named retry policies selectable through the `retries` input.

use std::fmt;

/// Retry policy chosen by the workflow author.
///
/// Each delivery strategy maps these names onto its own delay curve; see
/// [`crate::delivery::RetryPolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Retries {
    /// No retries
    Zero,
    /// Five retries within about five minutes
    #[default]
    Five,
    /// Ten retries within about thirty minutes, with jitter
    Ten,
    /// A quick burst of retries within seconds
    Rapid,
}

impl Retries {
    /// Matches one of the known input tokens exactly (`0`, `5`, `10`, `RAPID`).
    ///
    /// Surrounding whitespace is ignored.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "0" => Some(Self::Zero),
            "5" => Some(Self::Five),
            "10" => Some(Self::Ten),
            "RAPID" => Some(Self::Rapid),
            _ => None,
        }
    }

    /// Returns the input token for this policy.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Zero => "0",
            Self::Five => "5",
            Self::Ten => "10",
            Self::Rapid => "RAPID",
        }
    }
}

impl fmt::Display for Retries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
