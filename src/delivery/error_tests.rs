//! Tests for delivery error reporting.

use serde_json::json;

use super::{DeliveryError, HttpError};

#[test]
fn platform_error_publishes_response_data() {
    let data = json!({"ok": false, "error": "invalid_auth", "warning": "missing_charset"});
    let err = DeliveryError::Platform {
        code: "invalid_auth".to_string(),
        data: data.clone(),
    };

    assert_eq!(err.response_body(), data);
}

#[test]
fn transport_error_publishes_underlying_error() {
    let err = DeliveryError::Transport(HttpError::Connection("connection refused".into()));

    assert_eq!(
        err.response_body(),
        json!({"name": "ConnectionError", "message": "Connection error: connection refused"})
    );
    assert_eq!(
        err.to_string(),
        "A request error occurred: Connection error: connection refused"
    );
}

#[test]
fn http_error_publishes_status_headers_and_body() {
    let mut headers = http::HeaderMap::new();
    headers.insert("x-slack-req-id", http::HeaderValue::from_static("abc"));
    headers.append("vary", http::HeaderValue::from_static("Accept"));
    headers.append("vary", http::HeaderValue::from_static("Origin"));
    let err = DeliveryError::Http {
        status: http::StatusCode::BAD_GATEWAY,
        headers,
        body: r#"{"detail":"upstream"}"#.to_string(),
    };

    assert_eq!(
        err.response_body(),
        json!({
            "message": "An HTTP protocol error occurred: statusCode = 502",
            "statusCode": 502,
            "statusMessage": "Bad Gateway",
            "headers": {"x-slack-req-id": "abc", "vary": "Accept, Origin"},
            "body": {"detail": "upstream"},
        })
    );
}

#[test]
fn http_error_keeps_text_body() {
    let err = DeliveryError::Http {
        status: http::StatusCode::FORBIDDEN,
        headers: http::HeaderMap::new(),
        body: "invalid_token".to_string(),
    };

    assert_eq!(err.response_body()["body"], "invalid_token");
}

#[test]
fn rate_limit_message_names_wait() {
    let err = DeliveryError::RateLimited {
        retry_after: Some(30),
    };
    assert_eq!(
        err.to_string(),
        "A rate-limit has been reached, you may retry this request in 30 seconds"
    );

    let unknown = DeliveryError::RateLimited { retry_after: None };
    assert_eq!(unknown.response_body()["retryAfter"], serde_json::Value::Null);
}

#[test]
fn defensive_errors_publish_their_message() {
    for err in [
        DeliveryError::MissingMethod,
        DeliveryError::MissingToken,
        DeliveryError::MissingWebhook,
    ] {
        assert_eq!(err.response_body(), json!({"message": err.to_string()}));
    }
}

#[test]
fn transport_retryability() {
    assert!(HttpError::Timeout.is_retryable());
    assert!(HttpError::Connection("reset".into()).is_retryable());
    assert!(!HttpError::InvalidUrl("x".into()).is_retryable());
}
