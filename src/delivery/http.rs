//! HTTP request/response types and client trait.

use std::time::Duration;

use serde::Serialize;

use super::HttpError;

/// An HTTP request to be sent.
///
/// A value type passed to any [`HttpClient`] implementation, built from
/// `http` crate types so mocks and the production client agree on shape.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// HTTP method
    pub method: http::Method,
    /// Target URL
    pub url: url::Url,
    /// HTTP headers to send
    pub headers: http::HeaderMap,
    /// Optional request body
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// Creates a POST request to the given URL with no headers and no body.
    #[must_use]
    pub fn post(url: url::Url) -> Self {
        Self {
            method: http::Method::POST,
            url,
            headers: http::HeaderMap::new(),
            body: None,
        }
    }

    /// Serializes `body` as the JSON request body and sets the content type.
    ///
    /// # Errors
    ///
    /// Returns the serializer error if `body` cannot be represented as JSON.
    pub fn with_json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, serde_json::Error> {
        self.body = Some(serde_json::to_vec(body)?);
        self.headers.insert(
            http::header::CONTENT_TYPE,
            http::HeaderValue::from_static("application/json; charset=utf-8"),
        );
        Ok(self)
    }

    /// Adds a header to the request, keeping earlier values of the same name.
    #[must_use]
    pub fn with_header(mut self, name: http::HeaderName, value: http::HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }
}

/// An HTTP response with a fully buffered body.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: http::StatusCode,
    /// Response headers
    pub headers: http::HeaderMap,
    /// Response body
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Creates a new HTTP response.
    #[must_use]
    pub const fn new(status: http::StatusCode, headers: http::HeaderMap, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Returns true if the status code indicates success (2xx).
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Returns the body as a UTF-8 string, replacing invalid sequences.
    #[must_use]
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Parses the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns the parser error when the body is not valid JSON.
    pub fn body_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    /// Reads a `Retry-After` header given in whole seconds.
    ///
    /// HTTP-date values are ignored.
    #[must_use]
    pub fn retry_after(&self) -> Option<Duration> {
        self.headers
            .get(http::header::RETRY_AFTER)?
            .to_str()
            .ok()?
            .trim()
            .parse::<u64>()
            .ok()
            .map(Duration::from_secs)
    }
}

/// Trait for making HTTP requests.
///
/// Abstracts the HTTP library so delivery strategies can be driven by a
/// mock client in tests.
///
/// # Example
///
/// ```ignore
/// use slack_send::delivery::{HttpClient, HttpRequest, HttpResponse, HttpError};
///
/// struct FixedClient {
///     response: HttpResponse,
/// }
///
/// impl HttpClient for FixedClient {
///     async fn request(&self, _req: HttpRequest) -> Result<HttpResponse, HttpError> {
///         Ok(self.response.clone())
///     }
/// }
/// ```
pub trait HttpClient: Send + Sync {
    /// Sends an HTTP request and returns the response.
    ///
    /// Any status code is a successful response at this layer.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] when:
    /// - Network connection fails ([`HttpError::Connection`])
    /// - Request times out ([`HttpError::Timeout`])
    /// - URL is invalid ([`HttpError::InvalidUrl`])
    fn request(
        &self,
        req: HttpRequest,
    ) -> impl std::future::Future<Output = Result<HttpResponse, HttpError>> + Send;
}
