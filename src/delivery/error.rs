//! Error types for delivery.

use serde_json::{Map, Value, json};
use thiserror::Error;

/// Error type for HTTP operations.
///
/// Describes what went wrong below the HTTP layer. Any status code,
/// including 5xx, is a response and never an `HttpError`.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Network connection failed.
    ///
    /// This includes DNS resolution failures, refused connections,
    /// TLS failures and proxy failures.
    #[error("Connection error: {0}")]
    Connection(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Request timed out.
    #[error("Request timed out")]
    Timeout,

    /// The request could not be built for its URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl HttpError {
    /// Whether a later attempt might succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::Timeout)
    }

    const fn name(&self) -> &'static str {
        match self {
            Self::Connection(_) => "ConnectionError",
            Self::Timeout => "TimeoutError",
            Self::InvalidUrl(_) => "InvalidUrlError",
        }
    }
}

/// A failed delivery, after any retries.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// Token delivery was built without a method.
    #[error("No API method was provided for use")]
    MissingMethod,

    /// Token delivery was built without a token.
    #[error("No token was provided to post with")]
    MissingToken,

    /// Webhook delivery was built without a URL.
    #[error("No webhook was provided to post to")]
    MissingWebhook,

    /// The request could not be assembled.
    #[error("Failed to build the request: {0}")]
    Request(String),

    /// No response was received.
    #[error("A request error occurred: {0}")]
    Transport(#[source] HttpError),

    /// The server answered with an unsuccessful status.
    #[error("An HTTP protocol error occurred: statusCode = {}", .status.as_u16())]
    Http {
        /// Response status
        status: http::StatusCode,
        /// Response headers
        headers: http::HeaderMap,
        /// Response body text
        body: String,
    },

    /// The API answered but reported `ok: false`.
    #[error("An API error occurred: {code}")]
    Platform {
        /// The `error` field of the response
        code: String,
        /// The full response
        data: Value,
    },

    /// Retries ran out while the API kept answering 429.
    #[error(
        "A rate-limit has been reached, you may retry this request in {} seconds",
        .retry_after.map_or_else(|| "some".to_string(), |secs| secs.to_string())
    )]
    RateLimited {
        /// Seconds from the last `Retry-After` header
        retry_after: Option<u64>,
    },

    /// A 200 response whose body is not JSON.
    #[error("Failed to parse the API response: {0}")]
    InvalidResponse(#[source] serde_json::Error),
}

impl DeliveryError {
    /// The JSON published as the `response` output for this failure.
    ///
    /// API errors publish the response data itself. Everything else
    /// publishes a description of the error.
    #[must_use]
    pub fn response_body(&self) -> Value {
        match self {
            Self::Platform { data, .. } => data.clone(),
            Self::Transport(source) => json!({
                "name": source.name(),
                "message": source.to_string(),
            }),
            Self::Http {
                status,
                headers,
                body,
            } => json!({
                "message": self.to_string(),
                "statusCode": status.as_u16(),
                "statusMessage": status.canonical_reason().unwrap_or_default(),
                "headers": headers_to_json(headers),
                "body": serde_json::from_str::<Value>(body)
                    .unwrap_or_else(|_| Value::String(body.clone())),
            }),
            Self::RateLimited { retry_after } => json!({
                "message": self.to_string(),
                "retryAfter": retry_after,
            }),
            Self::MissingMethod
            | Self::MissingToken
            | Self::MissingWebhook
            | Self::Request(_)
            | Self::InvalidResponse(_) => json!({ "message": self.to_string() }),
        }
    }
}

fn headers_to_json(headers: &http::HeaderMap) -> Value {
    let mut map = Map::new();
    for name in headers.keys() {
        let joined = headers
            .get_all(name)
            .iter()
            .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
            .collect::<Vec<_>>()
            .join(", ");
        map.insert(name.as_str().to_string(), Value::String(joined));
    }
    Value::Object(map)
}

/// Proxy settings that could not be applied.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// The proxy value is not a URL.
    #[error("Failed to parse the proxy URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The HTTP client rejected the proxy.
    #[error("Failed to configure the proxy: {0}")]
    Client(#[from] reqwest::Error),
}
