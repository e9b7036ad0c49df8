//! Error types for input resolution and validation.

use thiserror::Error;

/// Error type for configuration operations.
///
/// Every variant is fatal and is raised before any network call. Messages
/// are shown to the workflow author verbatim and never contain secrets.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Both a token and a webhook were supplied.
    #[error("Invalid input! Either the token or webhook is required — not both.")]
    TokenAndWebhook,

    /// A token was supplied without an API method to call.
    #[error("Missing input! A method must be decided to use the token provided.")]
    MissingMethod,

    /// Neither a token nor a webhook was supplied.
    #[error("Missing input! Either a token or webhook is required to take action.")]
    MissingCredentials,

    /// The webhook type is not one of the known kinds.
    #[error(
        "Missing input! The webhook type must be 'incoming-webhook' or 'webhook-trigger'."
    )]
    InvalidWebhookType {
        /// The rejected value
        value: String,
    },

    /// A URL input could not be parsed.
    ///
    /// The URL itself is left out of the message since webhook URLs are secret.
    #[error("Invalid input! The {input} could not be parsed as a URL: {reason}")]
    InvalidUrl {
        /// Name of the input holding the URL
        input: &'static str,
        /// Reason for invalidity
        reason: String,
    },

    /// A boolean input did not follow the YAML 1.2 core schema.
    #[error(
        "Invalid input! The {input} value must be one of true, True, TRUE, false, False or FALSE but was '{value}'."
    )]
    InvalidBoolean {
        /// Name of the input
        input: &'static str,
        /// The rejected value
        value: String,
    },
}

/// Well-known input names.
///
/// Use these constants for compile-time safety when naming inputs in errors.
pub mod input {
    /// The webhook URL input.
    pub const WEBHOOK: &str = "webhook";
    /// The custom API URL input.
    pub const API: &str = "api";
    /// The payload templating toggle.
    pub const PAYLOAD_TEMPLATED: &str = "payload-templated";
    /// The fail-on-error toggle.
    pub const ERRORS: &str = "errors";
}
