//! Validated configuration resolved from inputs and environment fallbacks.
//!
//! This module contains the final, immutable configuration used for one
//! invocation. All validation is performed during construction and every
//! environment fallback is read here, once.

use std::fmt;
use std::path::PathBuf;

use secrecy::SecretString;
use url::Url;

use crate::runner::{Environment, Runner};

use super::cli::{Cli, non_empty};
use super::defaults;
use super::error::{ConfigError, input};
use super::retries::Retries;

/// Style of webhook the payload is posted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WebhookKind {
    /// Incoming webhook: accepts arbitrary nested JSON
    #[default]
    IncomingWebhook,
    /// Workflow Builder trigger: expects flat, string-valued fields
    WebhookTrigger,
}

impl WebhookKind {
    fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "incoming-webhook" => Some(Self::IncomingWebhook),
            "webhook-trigger" => Some(Self::WebhookTrigger),
            _ => None,
        }
    }

    /// Returns the input token for this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::IncomingWebhook => "incoming-webhook",
            Self::WebhookTrigger => "webhook-trigger",
        }
    }
}

/// Credential and destination for the delivery.
///
/// Exactly one mode exists per invocation.
#[derive(Debug)]
pub enum Auth {
    /// Call an API method with a token.
    Token {
        /// Bot or user token
        token: SecretString,
        /// API method name, e.g. `chat.postMessage`
        method: String,
        /// Base URL that method names are joined onto (ends with `/`)
        api: Url,
    },
    /// POST the payload to a webhook URL.
    Webhook {
        /// Webhook URL, already checked to parse
        url: SecretString,
        /// Webhook style
        kind: WebhookKind,
    },
}

/// Inputs that decide the message content.
///
/// Mutual exclusion between `inline` and `file_path` is enforced by the
/// content resolver, not here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PayloadInputs {
    /// Inline JSON or YAML payload
    pub inline: Option<String>,
    /// Path to a payload file
    pub file_path: Option<PathBuf>,
    /// Whether `${{ }}` expressions in string values are substituted
    pub templated: bool,
    /// Delimiter for flattening nested keys, if flattening is requested
    pub delimiter: Option<String>,
}

/// Fully validated configuration ready for use by the application.
///
/// # Construction
///
/// Use [`ValidatedConfig::from_raw`] with the parsed inputs, the
/// environment snapshot and the runner used to mask secrets and surface
/// warnings.
#[derive(Debug)]
pub struct ValidatedConfig {
    /// Delivery mode and its credential
    pub auth: Auth,

    /// Payload inputs for the content resolver
    pub payload: PayloadInputs,

    /// Named retry policy
    pub retries: Retries,

    /// Proxy URL for HTTPS destinations, not yet validated
    pub proxy: Option<String>,

    /// Whether a delivery failure fails the step
    pub fail_on_error: bool,

    /// Verbose logging enabled
    pub verbose: bool,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = match &self.auth {
            Auth::Token { method, api, .. } => format!("token, method: {method}, api: {api}"),
            Auth::Webhook { kind, .. } => format!("webhook, type: {}", kind.as_str()),
        };
        let payload = match (&self.payload.inline, &self.payload.file_path) {
            (Some(_), _) => "inline".to_string(),
            (None, Some(path)) => path.display().to_string(),
            (None, None) => "trigger context".to_string(),
        };

        write!(
            f,
            "Config {{ mode: {mode}, payload: {payload}, templated: {}, delimiter: {}, \
             retries: {}, proxy: {}, errors: {} }}",
            self.payload.templated,
            self.payload.delimiter.as_deref().unwrap_or("none"),
            self.retries,
            if self.proxy.is_some() { "set" } else { "none" },
            self.fail_on_error,
        )
    }
}

impl ValidatedConfig {
    /// Resolves and validates the configuration.
    ///
    /// Credentials are masked through `runner` as soon as they are found,
    /// including on paths that fail validation right after.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Both or neither of token and webhook are supplied
    /// - A token is supplied without a method
    /// - The webhook type is unknown
    /// - The webhook or API URL cannot be parsed
    /// - A boolean input is not a YAML 1.2 boolean
    pub fn from_raw<R: Runner>(
        cli: &Cli,
        env: &Environment,
        runner: &R,
    ) -> Result<Self, ConfigError> {
        let auth = Self::resolve_auth(cli, env, runner)?;
        let retries = Self::resolve_retries(cli, runner);
        let proxy = Self::resolve_proxy(cli, env);

        let templated = parse_bool(
            input::PAYLOAD_TEMPLATED,
            cli.payload_templated.as_deref(),
            defaults::PAYLOAD_TEMPLATED,
        )?;
        let fail_on_error =
            parse_bool(input::ERRORS, cli.errors.as_deref(), defaults::FAIL_ON_ERROR)?;

        let payload = PayloadInputs {
            inline: non_empty(cli.payload.as_deref()).map(ToString::to_string),
            file_path: non_empty(cli.payload_file_path.as_deref()).map(expand_home),
            templated,
            delimiter: cli
                .payload_delimiter
                .clone()
                .filter(|d| !d.is_empty()),
        };

        Ok(Self {
            auth,
            payload,
            retries,
            proxy,
            fail_on_error,
            verbose: cli.verbose,
        })
    }

    fn resolve_auth<R: Runner>(
        cli: &Cli,
        env: &Environment,
        runner: &R,
    ) -> Result<Auth, ConfigError> {
        let token = non_empty(cli.token.as_deref())
            .or_else(|| env.get(defaults::TOKEN_ENV))
            .map(str::trim);
        let webhook =
            non_empty(cli.webhook.as_deref()).or_else(|| env.get(defaults::WEBHOOK_ENV));

        match (token, webhook) {
            (Some(token), Some(webhook)) => {
                runner.mask(token);
                runner.mask(webhook);
                Err(ConfigError::TokenAndWebhook)
            }
            (Some(token), None) => {
                runner.mask(token);
                let method = non_empty(cli.method.as_deref())
                    .map(str::trim)
                    .ok_or(ConfigError::MissingMethod)?;
                Ok(Auth::Token {
                    token: SecretString::new(token.to_string()),
                    method: method.to_string(),
                    api: resolve_api(cli)?,
                })
            }
            (None, Some(webhook)) => {
                runner.mask(webhook);
                let kind = resolve_webhook_kind(cli, env)?;
                let url = Url::parse(webhook.trim()).map_err(|e| ConfigError::InvalidUrl {
                    input: input::WEBHOOK,
                    reason: e.to_string(),
                })?;
                Ok(Auth::Webhook {
                    url: SecretString::new(url.into()),
                    kind,
                })
            }
            (None, None) => Err(ConfigError::MissingCredentials),
        }
    }

    fn resolve_retries<R: Runner>(cli: &Cli, runner: &R) -> Retries {
        let Some(value) = non_empty(cli.retries.as_deref()) else {
            return Retries::default();
        };

        Retries::parse(value).unwrap_or_else(|| {
            let message = format!("Invalid input! An unknown \"retries\" value was used: {value}");
            tracing::warn!("{message}");
            runner.warning(&message);
            Retries::default()
        })
    }

    fn resolve_proxy(cli: &Cli, env: &Environment) -> Option<String> {
        non_empty(cli.proxy.as_deref())
            .or_else(|| env.first_of(&defaults::PROXY_ENV))
            .map(|p| p.trim().to_string())
    }
}

fn resolve_webhook_kind(cli: &Cli, env: &Environment) -> Result<WebhookKind, ConfigError> {
    let Some(value) =
        non_empty(cli.webhook_type.as_deref()).or_else(|| env.get(defaults::WEBHOOK_TYPE_ENV))
    else {
        return Ok(WebhookKind::default());
    };

    WebhookKind::parse(value).ok_or_else(|| ConfigError::InvalidWebhookType {
        value: value.to_string(),
    })
}

fn resolve_api(cli: &Cli) -> Result<Url, ConfigError> {
    let raw = non_empty(cli.api.as_deref()).map_or(defaults::API_URL, str::trim);

    // Url::join replaces the last path segment unless the base ends with '/'
    let base = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    };

    Url::parse(&base).map_err(|e| ConfigError::InvalidUrl {
        input: input::API,
        reason: e.to_string(),
    })
}

// Helper functions

fn parse_bool(name: &'static str, value: Option<&str>, default: bool) -> Result<bool, ConfigError> {
    let Some(value) = non_empty(value) else {
        return Ok(default);
    };

    match value.trim() {
        "true" | "True" | "TRUE" => Ok(true),
        "false" | "False" | "FALSE" => Ok(false),
        other => Err(ConfigError::InvalidBoolean {
            input: name,
            value: other.to_string(),
        }),
    }
}

fn expand_home(path: &str) -> PathBuf {
    let path = path.trim();
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
