//! CLI argument parsing using clap.
//!
//! Every option doubles as a GitHub Actions input: the runner exports
//! step inputs as `INPUT_<NAME>` variables, which clap reads as the
//! environment source for the matching option.

use clap::Parser;

/// slack-send: send data to Slack from a workflow step
///
/// Posts a payload through a Slack API method (with a bot token) or to a
/// Slack webhook URL.
#[derive(Debug, Default, Parser)]
#[command(name = "slack-send")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Bot or user token for API method calls (fallback: `SLACK_TOKEN`)
    #[arg(long, env = "INPUT_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Webhook URL to POST the payload to (fallback: `SLACK_WEBHOOK_URL`)
    #[arg(long, env = "INPUT_WEBHOOK", hide_env_values = true)]
    pub webhook: Option<String>,

    /// Webhook style: incoming-webhook or webhook-trigger
    #[arg(long = "webhook-type", env = "INPUT_WEBHOOK-TYPE")]
    pub webhook_type: Option<String>,

    /// API method to call with the token, e.g. chat.postMessage
    #[arg(long, env = "INPUT_METHOD")]
    pub method: Option<String>,

    /// Custom base URL for API method calls
    #[arg(long, env = "INPUT_API")]
    pub api: Option<String>,

    /// Inline payload as JSON or YAML
    #[arg(long, env = "INPUT_PAYLOAD", allow_hyphen_values = true)]
    pub payload: Option<String>,

    /// Path to a .json, .yaml or .yml payload file
    #[arg(long = "payload-file-path", env = "INPUT_PAYLOAD-FILE-PATH")]
    pub payload_file_path: Option<String>,

    /// Substitute ${{ }} expressions in payload strings (true/false)
    #[arg(long = "payload-templated", env = "INPUT_PAYLOAD-TEMPLATED")]
    pub payload_templated: Option<String>,

    /// Flatten nested payload keys with this delimiter
    #[arg(long = "payload-delimiter", env = "INPUT_PAYLOAD-DELIMITER")]
    pub payload_delimiter: Option<String>,

    /// Retry policy: 0, 5, 10 or RAPID
    #[arg(long, env = "INPUT_RETRIES")]
    pub retries: Option<String>,

    /// Proxy URL for HTTPS destinations (fallback: `HTTPS_PROXY`)
    #[arg(long, env = "INPUT_PROXY")]
    pub proxy: Option<String>,

    /// Fail the step when delivery fails (true/false)
    #[arg(long, env = "INPUT_ERRORS")]
    pub errors: Option<String>,

    /// Enable verbose logging
    #[arg(long, short)]
    pub verbose: bool,
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }
}

/// Returns the value when it is present and not blank.
///
/// The runner exports every declared input, so unset inputs arrive as
/// empty strings.
pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
