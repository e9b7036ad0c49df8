//! Tests for validated configuration.

use super::ConfigError;
use super::cli::Cli;
use super::validated::{Auth, ValidatedConfig, WebhookKind};
use crate::runner::Environment;
use crate::runner::testing::RecordingRunner;

/// Helper to create an environment snapshot from pairs
fn env(pairs: &[(&str, &str)]) -> Environment {
    pairs.iter().copied().collect()
}

/// Helper for inputs in token mode
fn token_cli() -> Cli {
    Cli {
        token: Some("xoxb-token".to_string()),
        method: Some("chat.postMessage".to_string()),
        ..Cli::default()
    }
}

/// Helper for inputs in webhook mode
fn webhook_cli() -> Cli {
    Cli {
        webhook: Some("https://hooks.slack.com/services/T000/B000/XXXX".to_string()),
        ..Cli::default()
    }
}

/// Resolves with an empty environment and a fresh recording runner
fn resolve(cli: &Cli) -> (Result<ValidatedConfig, ConfigError>, RecordingRunner) {
    let runner = RecordingRunner::new();
    let result = ValidatedConfig::from_raw(cli, &env(&[]), &runner);
    (result, runner)
}

mod proxy_tests;
