//! Default values and well-known environment variables.
//!
//! Centralized constants to avoid magic strings scattered across the codebase.

/// Default base URL for token method calls.
pub const API_URL: &str = "https://slack.com/api/";

/// Default for the `payload-templated` input.
pub const PAYLOAD_TEMPLATED: bool = false;

/// Default for the `errors` input (fail the step on delivery errors).
pub const FAIL_ON_ERROR: bool = true;

/// Environment fallback for the `token` input.
pub const TOKEN_ENV: &str = "SLACK_TOKEN";

/// Environment fallback for the `webhook` input.
pub const WEBHOOK_ENV: &str = "SLACK_WEBHOOK_URL";

/// Environment fallback for the `webhook-type` input.
pub const WEBHOOK_TYPE_ENV: &str = "SLACK_WEBHOOK_TYPE";

/// Environment fallbacks for the `proxy` input, in lookup order.
pub const PROXY_ENV: [&str; 2] = ["HTTPS_PROXY", "https_proxy"];
