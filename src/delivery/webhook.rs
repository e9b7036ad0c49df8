//! Webhook POSTs.

use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use url::Url;

use crate::time::{Sleeper, TokioSleeper};

use super::retry::Failure;
use super::{Delivery, DeliveryError, DeliveryResult, HttpClient, HttpRequest, RetryPolicy};

/// POSTs the content as JSON to a webhook URL.
///
/// Transport failures, 5xx, 429 and 408 answers are retried under the
/// policy. Any other non-2xx answer is final.
///
/// # Example
///
/// ```
/// use slack_send::delivery::{ReqwestClient, WebhookDelivery};
///
/// let delivery = WebhookDelivery::new(
///     ReqwestClient::new(),
///     "https://hooks.slack.com/triggers/T000/1/abc",
/// )
/// .unwrap();
/// assert_eq!(delivery.retry_policy().max_retries, 0);
/// ```
#[derive(Debug)]
pub struct WebhookDelivery<H, S = TokioSleeper> {
    client: H,
    sleeper: S,
    url: SecretString,
    retry_policy: RetryPolicy,
}

impl<H> WebhookDelivery<H, TokioSleeper> {
    /// Creates a delivery posting to `url`, without retries.
    ///
    /// # Errors
    ///
    /// - [`DeliveryError::MissingWebhook`] for a blank URL
    /// - [`DeliveryError::Request`] if the URL cannot be parsed
    pub fn new(client: H, url: &str) -> Result<Self, DeliveryError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(DeliveryError::MissingWebhook);
        }
        let url = parse_url(url)?;

        Ok(Self {
            client,
            sleeper: TokioSleeper,
            url: SecretString::new(url.into()),
            retry_policy: RetryPolicy::none(),
        })
    }
}

fn parse_url(url: &str) -> Result<Url, DeliveryError> {
    Url::parse(url).map_err(|e| DeliveryError::Request(format!("invalid webhook URL: {e}")))
}

impl<H, S> WebhookDelivery<H, S> {
    /// Sets a custom sleeper for retry delays.
    #[must_use]
    pub fn with_sleeper<S2>(self, sleeper: S2) -> WebhookDelivery<H, S2> {
        WebhookDelivery {
            client: self.client,
            sleeper,
            url: self.url,
            retry_policy: self.retry_policy,
        }
    }

    /// Sets the retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Returns the configured retry policy.
    #[must_use]
    pub const fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }
}

impl<H: HttpClient, S: Sleeper> WebhookDelivery<H, S> {
    async fn post_once(&self, request: &HttpRequest) -> Result<Value, Failure> {
        let response = self
            .client
            .request(request.clone())
            .await
            .map_err(|e| Failure {
                retryable: e.is_retryable(),
                error: DeliveryError::Transport(e),
                wait_at_least: None,
            })?;

        let text = response.body_text();
        if response.is_success() {
            tracing::debug!("Webhook response: {text}");
            return Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)));
        }

        let status = response.status;
        let error = DeliveryError::Http {
            status,
            headers: response.headers,
            body: text,
        };
        if status.is_server_error()
            || status == http::StatusCode::TOO_MANY_REQUESTS
            || status == http::StatusCode::REQUEST_TIMEOUT
        {
            Err(Failure::retryable(error))
        } else {
            Err(Failure::permanent(error))
        }
    }
}

impl<H: HttpClient, S: Sleeper> Delivery for WebhookDelivery<H, S> {
    async fn post(&self, content: &Value) -> Result<DeliveryResult, DeliveryError> {
        let request = HttpRequest::post(parse_url(self.url.expose_secret())?)
            .with_json(content)
            .map_err(|e| DeliveryError::Request(e.to_string()))?;
        tracing::debug!("Posting to webhook");

        let response = self
            .retry_policy
            .run(&self.sleeper, || self.post_once(&request))
            .await?;

        tracing::info!("Webhook accepted the payload");
        Ok(DeliveryResult::from_webhook_response(response))
    }
}
