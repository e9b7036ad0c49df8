//! Test doubles for the delivery layer.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::time::Sleeper;

use super::{HttpClient, HttpError, HttpRequest, HttpResponse};

/// HTTP client that replays a scripted sequence of results.
///
/// The last result repeats once the script runs out.
#[derive(Debug)]
pub struct MockClient {
    responses: Mutex<Vec<Result<HttpResponse, HttpError>>>,
    requests: Mutex<Vec<HttpRequest>>,
    call_count: AtomicUsize,
}

impl MockClient {
    pub fn new(responses: Vec<Result<HttpResponse, HttpError>>) -> Arc<Self> {
        assert!(!responses.is_empty(), "script at least one response");
        Arc::new(Self {
            responses: Mutex::new(responses),
            requests: Mutex::new(Vec::new()),
            call_count: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    pub fn captured_requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_body_json(&self) -> serde_json::Value {
        let requests = self.captured_requests();
        let body = requests.last().unwrap().body.as_ref().unwrap();
        serde_json::from_slice(body).unwrap()
    }
}

impl HttpClient for Arc<MockClient> {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(req);
        let mut responses = self.responses.lock().unwrap();
        if responses.len() > 1 {
            responses.remove(0)
        } else {
            replay(&responses[0])
        }
    }
}

fn replay(result: &Result<HttpResponse, HttpError>) -> Result<HttpResponse, HttpError> {
    match result {
        Ok(response) => Ok(response.clone()),
        Err(HttpError::Timeout) => Err(HttpError::Timeout),
        Err(HttpError::InvalidUrl(url)) => Err(HttpError::InvalidUrl(url.clone())),
        Err(HttpError::Connection(e)) => Err(HttpError::Connection(e.to_string().into())),
    }
}

/// Response with the given status and body.
pub fn response(status: u16, body: &str) -> Result<HttpResponse, HttpError> {
    Ok(HttpResponse::new(
        http::StatusCode::from_u16(status).unwrap(),
        http::HeaderMap::new(),
        body.as_bytes().to_vec(),
    ))
}

/// 200 response with a JSON body.
pub fn json_ok(body: &serde_json::Value) -> Result<HttpResponse, HttpError> {
    response(200, &body.to_string())
}

/// 429 response carrying `Retry-After`.
pub fn rate_limited(retry_after_secs: u64) -> Result<HttpResponse, HttpError> {
    let mut headers = http::HeaderMap::new();
    headers.insert(
        http::header::RETRY_AFTER,
        http::HeaderValue::from_str(&retry_after_secs.to_string()).unwrap(),
    );
    Ok(HttpResponse::new(
        http::StatusCode::TOO_MANY_REQUESTS,
        headers,
        b"ratelimited".to_vec(),
    ))
}

pub fn connection_refused() -> Result<HttpResponse, HttpError> {
    Err(HttpError::Connection("connection refused".into()))
}

/// Sleeper that returns immediately and remembers every delay.
#[derive(Debug, Clone, Default)]
pub struct RecordingSleeper {
    delays: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingSleeper {
    pub fn delays(&self) -> Vec<Duration> {
        self.delays.lock().unwrap().clone()
    }
}

impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.delays.lock().unwrap().push(duration);
    }
}
