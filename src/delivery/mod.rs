//! Delivery layer: sends the resolved content to its destination.
//!
//! This module provides types and traits for:
//! - Building HTTP requests ([`HttpRequest`]) and reading responses ([`HttpResponse`])
//! - Abstracting HTTP clients ([`HttpClient`]) and the production client ([`ReqwestClient`])
//! - Proxy selection ([`ProxyPlan`])
//! - Retry curves ([`RetryPolicy`])
//! - The two delivery modes ([`TokenDelivery`], [`WebhookDelivery`]) and the
//!   closed choice between them ([`Strategy`])

mod client;
mod error;
mod http;
mod proxy;
mod retry;
mod token;
mod webhook;

#[cfg(test)]
pub(crate) mod testing;

#[cfg(test)]
mod error_tests;
#[cfg(test)]
mod strategy_tests;

use secrecy::ExposeSecret;
use serde_json::Value;
use url::Url;

use crate::config::{Auth, ValidatedConfig};
use crate::runner::Runner;
use crate::time::{Sleeper, TokioSleeper};

pub use client::ReqwestClient;
pub use error::{DeliveryError, HttpError, ProxyError};
pub use http::{HttpClient, HttpRequest, HttpResponse};
pub use proxy::ProxyPlan;
pub use retry::{Backoff, RetryPolicy};
pub use token::TokenDelivery;
pub use webhook::WebhookDelivery;

/// Sends content to a destination.
///
/// Implementations retry internally under their [`RetryPolicy`] and only
/// return once the delivery has succeeded or finally failed.
pub trait Delivery: Send + Sync {
    /// Delivers `content` as the JSON request body.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError`] when the destination could not be reached,
    /// rejected the request, or reported failure.
    fn post(
        &self,
        content: &Value,
    ) -> impl std::future::Future<Output = Result<DeliveryResult, DeliveryError>> + Send;
}

/// What a successful delivery reports back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryResult {
    /// Always true for a returned result
    pub ok: bool,
    /// The destination's answer
    pub response: Value,
    /// Channel the message landed in
    pub channel_id: Option<String>,
    /// Thread the message belongs to
    pub thread_ts: Option<String>,
    /// Timestamp identifying the message
    pub ts: Option<String>,
}

impl DeliveryResult {
    /// Builds a result from an API method response.
    ///
    /// `channel` may be either an object with an `id` or the ID itself.
    #[must_use]
    pub fn from_api_response(response: Value) -> Self {
        let channel_id = match response.get("channel") {
            Some(Value::Object(channel)) => channel.get("id").and_then(text),
            Some(channel) => text(channel),
            None => None,
        };
        let thread_ts = response
            .get("message")
            .and_then(|message| message.get("thread_ts"))
            .and_then(text);
        let ts = response.get("ts").and_then(text);

        Self {
            ok: true,
            response,
            channel_id,
            thread_ts,
            ts,
        }
    }

    /// Builds a result from a webhook response, which carries no message IDs.
    #[must_use]
    pub const fn from_webhook_response(response: Value) -> Self {
        Self {
            ok: true,
            response,
            channel_id: None,
            thread_ts: None,
            ts: None,
        }
    }
}

fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// The delivery mode chosen for this invocation.
#[derive(Debug)]
pub enum Strategy<H = ReqwestClient, S = TokioSleeper> {
    /// API method call with a token
    Token(TokenDelivery<H, S>),
    /// Webhook POST
    Webhook(WebhookDelivery<H, S>),
}

impl Strategy {
    /// Builds the strategy for a validated configuration.
    ///
    /// A proxy that cannot be applied is reported through `runner` and the
    /// client falls back to default proxy handling.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError`] if the strategy cannot be constructed from
    /// the configured credentials.
    pub fn from_config<R: Runner + ?Sized>(
        config: &ValidatedConfig,
        runner: &R,
    ) -> Result<Self, DeliveryError> {
        let proxy = config.proxy.as_deref();
        match &config.auth {
            Auth::Token { token, method, api } => {
                let client = client_for(ProxyPlan::for_api(proxy), runner);
                let delivery = TokenDelivery::new(client, api, token.expose_secret(), method)?
                    .with_retry_policy(RetryPolicy::api(config.retries));
                Ok(Self::Token(delivery))
            }
            Auth::Webhook { url, kind } => {
                let destination = Url::parse(url.expose_secret())
                    .map_err(|e| DeliveryError::Request(format!("invalid webhook URL: {e}")))?;
                let client = client_for(ProxyPlan::for_webhook(&destination, proxy), runner);
                tracing::debug!("Webhook type: {}", kind.as_str());
                let delivery = WebhookDelivery::new(client, destination.as_str())?
                    .with_retry_policy(RetryPolicy::webhook(config.retries));
                Ok(Self::Webhook(delivery))
            }
        }
    }
}

fn client_for<R: Runner + ?Sized>(
    plan: Result<ProxyPlan, ProxyError>,
    runner: &R,
) -> ReqwestClient {
    match plan.and_then(|plan| ReqwestClient::with_proxy(&plan)) {
        Ok(client) => client,
        Err(e) => {
            let message = format!("Failed to configure the HTTPS proxy agent so using default configurations: {e}");
            tracing::warn!("{message}");
            runner.warning(&message);
            ReqwestClient::new()
        }
    }
}

impl<H, S> Strategy<H, S> {
    /// Replaces the sleeper used between retries.
    #[must_use]
    pub fn with_sleeper<S2>(self, sleeper: S2) -> Strategy<H, S2> {
        match self {
            Self::Token(delivery) => Strategy::Token(delivery.with_sleeper(sleeper)),
            Self::Webhook(delivery) => Strategy::Webhook(delivery.with_sleeper(sleeper)),
        }
    }

    /// Returns the retry policy of the chosen mode.
    #[must_use]
    pub const fn retry_policy(&self) -> &RetryPolicy {
        match self {
            Self::Token(delivery) => delivery.retry_policy(),
            Self::Webhook(delivery) => delivery.retry_policy(),
        }
    }
}

impl<H: HttpClient, S: Sleeper> Delivery for Strategy<H, S> {
    async fn post(&self, content: &Value) -> Result<DeliveryResult, DeliveryError> {
        match self {
            Self::Token(delivery) => delivery.post(content).await,
            Self::Webhook(delivery) => delivery.post(content).await,
        }
    }
}
