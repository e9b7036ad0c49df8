//! Configuration layer for slack-send.
//!
//! This module provides:
//! - Input parsing ([`Cli`]), bound to both long options and the
//!   `INPUT_*` variables the Actions runner exports
//! - Validated configuration ([`ValidatedConfig`])
//! - Named retry policies ([`Retries`])
//! - Default values ([`defaults`])
//!
//! # Priority
//!
//! Inputs win over environment fallbacks:
//!
//! 1. **Inputs** - `--token` / `INPUT_TOKEN`, `--webhook` / `INPUT_WEBHOOK`, ...
//! 2. **Environment fallbacks** - `SLACK_TOKEN`, `SLACK_WEBHOOK_URL`,
//!    `SLACK_WEBHOOK_TYPE`, `HTTPS_PROXY` then `https_proxy`
//! 3. **Built-in defaults** - retries `5`, `errors` true, templating off
//!
//! Empty inputs count as unset.
//!
//! # Validation Order
//!
//! Credentials are resolved first and masked the moment they are found.
//! Supplying both a token and a webhook masks both and then fails. A token
//! requires a method. An unknown `retries` value is not an error: it
//! produces a warning and the default policy.

mod cli;
pub mod defaults;
mod error;
mod retries;
mod validated;

#[cfg(test)]
mod validated_tests;

pub use cli::Cli;
pub use error::{ConfigError, input};
pub use retries::Retries;
pub use validated::{Auth, PayloadInputs, ValidatedConfig, WebhookKind};

// Credentials are held as `SecretString`; re-exported so callers can read them.
pub use secrecy::{ExposeSecret, SecretString};
