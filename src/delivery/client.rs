//! Production HTTP client implementation using reqwest.

use super::{HttpClient, HttpError, HttpRequest, HttpResponse, ProxyError, ProxyPlan};

/// Production HTTP client using reqwest.
///
/// A thin wrapper around `reqwest::Client` implementing [`HttpClient`].
///
/// # Example
///
/// ```no_run
/// use slack_send::delivery::{HttpClient, HttpRequest, ReqwestClient};
/// use url::Url;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ReqwestClient::new();
/// let url = Url::parse("https://hooks.slack.com/services/T000/B000/XXXX")?;
/// let request = HttpRequest::post(url).with_json(&serde_json::json!({"text": "hi"}))?;
/// let response = client.request(request).await?;
/// println!("Status: {}", response.status);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    inner: reqwest::Client,
}

impl ReqwestClient {
    /// Creates a new HTTP client with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: reqwest::Client::new(),
        }
    }

    /// Creates an HTTP client from an existing reqwest client.
    #[must_use]
    pub const fn from_client(client: reqwest::Client) -> Self {
        Self { inner: client }
    }

    /// Creates an HTTP client that follows the given proxy plan.
    ///
    /// A tunnel replaces any proxy picked up from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ProxyError::Client`] if reqwest rejects the proxy.
    pub fn with_proxy(plan: &ProxyPlan) -> Result<Self, ProxyError> {
        match plan {
            ProxyPlan::Default => Ok(Self::new()),
            ProxyPlan::Tunnel(proxy) => {
                let client = reqwest::Client::builder()
                    .no_proxy()
                    .proxy(reqwest::Proxy::https(proxy.as_str())?)
                    .build()?;
                Ok(Self::from_client(client))
            }
        }
    }
}

impl Default for ReqwestClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient for ReqwestClient {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        let mut builder = self.inner.request(req.method, req.url.as_str());

        for (name, value) in &req.headers {
            builder = builder.header(name, value);
        }

        if let Some(body) = req.body {
            builder = builder.body(body);
        }

        // Webhook URLs are credentials; keep them out of error text.
        let response = builder.send().await.map_err(|e| {
            let e = e.without_url();
            if e.is_timeout() {
                HttpError::Timeout
            } else if e.is_builder() {
                HttpError::InvalidUrl(e.to_string())
            } else {
                HttpError::Connection(Box::new(e))
            }
        })?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| HttpError::Connection(Box::new(e.without_url())))?
            .to_vec();

        Ok(HttpResponse::new(status, headers, body))
    }
}
