//! API method calls authenticated with a bot or user token.

use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use url::Url;

use crate::time::{Sleeper, TokioSleeper};

use super::retry::Failure;
use super::{
    Delivery, DeliveryError, DeliveryResult, HttpClient, HttpRequest, HttpResponse, RetryPolicy,
};

/// Calls one API method with the content as its JSON arguments.
///
/// Every non-200 answer and every transport failure is retried under the
/// policy; a 429 waits at least as long as its `Retry-After`. A 200 answer
/// with `ok: false` is final.
///
/// # Type Parameters
///
/// - `H`: The HTTP client implementation
/// - `S`: The sleeper used between retries (defaults to [`TokioSleeper`])
#[derive(Debug)]
pub struct TokenDelivery<H, S = TokioSleeper> {
    client: H,
    sleeper: S,
    token: SecretString,
    method: String,
    endpoint: Url,
    retry_policy: RetryPolicy,
}

impl<H> TokenDelivery<H, TokioSleeper> {
    /// Creates a delivery calling `method` under the `api` base URL.
    ///
    /// Never retries until [`with_retry_policy`](Self::with_retry_policy)
    /// says otherwise.
    ///
    /// # Errors
    ///
    /// - [`DeliveryError::MissingMethod`] for a blank method
    /// - [`DeliveryError::MissingToken`] for a blank token
    /// - [`DeliveryError::Request`] if the method does not form a URL
    pub fn new(client: H, api: &Url, token: &str, method: &str) -> Result<Self, DeliveryError> {
        let method = method.trim();
        if method.is_empty() {
            return Err(DeliveryError::MissingMethod);
        }
        let token = token.trim();
        if token.is_empty() {
            return Err(DeliveryError::MissingToken);
        }
        let endpoint = api
            .join(method)
            .map_err(|e| DeliveryError::Request(format!("invalid API method URL: {e}")))?;

        Ok(Self {
            client,
            sleeper: TokioSleeper,
            token: SecretString::new(token.to_string()),
            method: method.to_string(),
            endpoint,
            retry_policy: RetryPolicy::none(),
        })
    }
}

impl<H, S> TokenDelivery<H, S> {
    /// Sets a custom sleeper for retry delays.
    #[must_use]
    pub fn with_sleeper<S2>(self, sleeper: S2) -> TokenDelivery<H, S2> {
        TokenDelivery {
            client: self.client,
            sleeper,
            token: self.token,
            method: self.method,
            endpoint: self.endpoint,
            retry_policy: self.retry_policy,
        }
    }

    /// Sets the retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Returns the API method name.
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Returns the full URL the method is called at.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Returns the configured retry policy.
    #[must_use]
    pub const fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }
}

impl<H: HttpClient, S: Sleeper> TokenDelivery<H, S> {
    fn build_request(&self, content: &Value) -> Result<HttpRequest, DeliveryError> {
        let mut authorization =
            http::HeaderValue::try_from(format!("Bearer {}", self.token.expose_secret()))
            .map_err(|_| DeliveryError::Request("the token is not a valid header value".into()))?;
        authorization.set_sensitive(true);

        HttpRequest::post(self.endpoint.clone())
            .with_header(http::header::AUTHORIZATION, authorization)
            .with_json(content)
            .map_err(|e| DeliveryError::Request(e.to_string()))
    }

    async fn call_once(&self, request: &HttpRequest) -> Result<Value, Failure> {
        let response = self
            .client
            .request(request.clone())
            .await
            .map_err(|e| Failure {
                retryable: e.is_retryable(),
                error: DeliveryError::Transport(e),
                wait_at_least: None,
            })?;

        if response.status == http::StatusCode::TOO_MANY_REQUESTS {
            let wait = response.retry_after();
            return Err(Failure {
                error: DeliveryError::RateLimited {
                    retry_after: wait.map(|d| d.as_secs()),
                },
                retryable: true,
                wait_at_least: wait,
            });
        }

        if response.status != http::StatusCode::OK {
            return Err(Failure::retryable(http_error(response)));
        }

        response
            .body_json()
            .map_err(|e| Failure::permanent(DeliveryError::InvalidResponse(e)))
    }
}

fn http_error(response: HttpResponse) -> DeliveryError {
    let body = response.body_text();
    DeliveryError::Http {
        status: response.status,
        headers: response.headers,
        body,
    }
}

impl<H: HttpClient, S: Sleeper> Delivery for TokenDelivery<H, S> {
    async fn post(&self, content: &Value) -> Result<DeliveryResult, DeliveryError> {
        let request = self.build_request(content)?;
        tracing::debug!("Calling API method {} at {}", self.method, self.endpoint);

        let data = self
            .retry_policy
            .run(&self.sleeper, || self.call_once(&request))
            .await?;

        if data.get("ok").and_then(Value::as_bool) != Some(true) {
            let code = data
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("unknown_error")
                .to_string();
            return Err(DeliveryError::Platform { code, data });
        }

        if let Some(warning) = data.get("warning").and_then(Value::as_str) {
            tracing::warn!("API method {} warned: {warning}", self.method);
        }
        tracing::info!("API method {} succeeded", self.method);

        Ok(DeliveryResult::from_api_response(data))
    }
}
