//! Application execution logic.
//!
//! Wires one invocation: configuration, content, strategy, dispatch.

use serde_json::Value;
use thiserror::Error;

use slack_send::config::{Auth, Cli, ConfigError, ValidatedConfig, WebhookKind};
use slack_send::content::{ContentError, ContentResolver};
use slack_send::delivery::{DeliveryError, Strategy};
use slack_send::runner::{Environment, Runner, TriggerContext};
use slack_send::send::{Dispatcher, Outcome, SendError};

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for one invocation.
#[derive(Debug, Error)]
pub enum RunError {
    /// The inputs are invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The payload could not be resolved.
    #[error(transparent)]
    Content(#[from] ContentError),

    /// The delivery strategy could not be built.
    #[error(transparent)]
    Strategy(DeliveryError),

    /// The delivery failed, or its outputs could not be written.
    #[error(transparent)]
    Send(#[from] SendError),
}

impl RunError {
    /// True for errors raised before any network call.
    #[must_use]
    pub const fn is_input_error(&self) -> bool {
        matches!(self, Self::Config(_) | Self::Content(_))
    }
}

/// Executes one invocation.
///
/// This function:
/// 1. Validates the inputs (masking credentials as they are found)
/// 2. Resolves the payload from the inputs or the trigger event
/// 3. Builds the delivery strategy for the credential supplied
/// 4. Delivers the payload and records the step outputs
///
/// # Errors
///
/// Returns an error for invalid inputs, an unresolvable payload, or a
/// delivery failure while `errors` is true.
pub async fn execute<R: Runner>(cli: &Cli, env: &Environment, runner: &R) -> Result<(), RunError> {
    let config = ValidatedConfig::from_raw(cli, env, runner)?;
    tracing::info!("{config}");

    let context = TriggerContext::from_env(env);
    let content = ContentResolver::new(&context, env)
        .resolve(&config.payload)
        .await?;
    warn_on_nested_trigger_payload(&config, &content);

    let strategy = Strategy::from_config(&config, runner).map_err(RunError::Strategy)?;
    let dispatcher = Dispatcher::new(strategy, runner, config.fail_on_error);

    match dispatcher.send(&content).await? {
        Outcome::Delivered(_) => tracing::info!("Payload delivered"),
        Outcome::Swallowed(_) => tracing::warn!("Payload not delivered"),
    }
    Ok(())
}

/// Workflow triggers only accept flat string fields.
fn warn_on_nested_trigger_payload(config: &ValidatedConfig, content: &Value) {
    let is_trigger = matches!(
        config.auth,
        Auth::Webhook {
            kind: WebhookKind::WebhookTrigger,
            ..
        }
    );
    let nested = content
        .as_object()
        .is_some_and(|fields| fields.values().any(|v| !v.is_string()));

    if is_trigger && nested {
        tracing::warn!(
            "Webhook triggers expect string values; set payload-delimiter to flatten the payload"
        );
    }
}
