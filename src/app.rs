//! Application startup and utilities.
//!
//! This module contains exit codes, tracing setup, and error hints
//! that support the main entry point.

use slack_send::config::{ConfigError, defaults};
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Application exit codes.
pub mod exit_code {
    use std::process::ExitCode;

    /// Success (exit code 0), including swallowed delivery failures.
    pub const SUCCESS: ExitCode = ExitCode::SUCCESS;

    /// Configuration or content error (exit code 1).
    pub const CONFIG_ERROR: ExitCode = ExitCode::FAILURE;

    /// Delivery error (exit code 2) while `errors` is true.
    ///
    /// Note: This is a function rather than a constant because `ExitCode::from()` is not `const fn`.
    pub fn runtime_error() -> ExitCode {
        ExitCode::from(2)
    }
}

/// Prints helpful hints for common configuration errors.
pub fn print_config_hint(error: &ConfigError) {
    match error {
        ConfigError::MissingCredentials => {
            eprintln!(
                "\nSet the 'token' or 'webhook' input, or export {} or {}.",
                defaults::TOKEN_ENV,
                defaults::WEBHOOK_ENV
            );
        }
        ConfigError::MissingMethod => {
            eprintln!("\nSet the 'method' input, e.g. chat.postMessage.");
        }
        _ => {}
    }
}

/// Sets up the tracing subscriber for logging.
pub fn setup_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
