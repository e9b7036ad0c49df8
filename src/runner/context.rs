//! Trigger context: the event that caused the job to run.

use std::path::Path;

use serde::Serialize;
use serde_json::{Map, Value};

use super::Environment;

const DEFAULT_SERVER_URL: &str = "https://github.com";
const DEFAULT_API_URL: &str = "https://api.github.com";
const DEFAULT_GRAPHQL_URL: &str = "https://api.github.com/graphql";

/// Owner and name of the repository the workflow runs in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoRef {
    /// Account or organization owning the repository
    pub owner: String,
    /// Repository name
    pub repo: String,
}

/// Description of the workflow run and the event that triggered it.
///
/// `payload` is the webhook event body GitHub writes to `GITHUB_EVENT_PATH`.
/// It is the default message content and is exposed to payload templates
/// as `github.payload` next to the other run fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerContext {
    pub payload: Value,
    pub event_name: String,
    pub sha: String,
    #[serde(rename = "ref")]
    pub git_ref: String,
    pub workflow: String,
    pub action: String,
    pub actor: String,
    pub job: String,
    pub run_number: u64,
    pub run_id: u64,
    pub server_url: String,
    pub api_url: String,
    pub graphql_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo: Option<RepoRef>,
}

impl Default for TriggerContext {
    fn default() -> Self {
        Self {
            payload: Value::Object(Map::new()),
            event_name: String::new(),
            sha: String::new(),
            git_ref: String::new(),
            workflow: String::new(),
            action: String::new(),
            actor: String::new(),
            job: String::new(),
            run_number: 0,
            run_id: 0,
            server_url: DEFAULT_SERVER_URL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            graphql_url: DEFAULT_GRAPHQL_URL.to_string(),
            repo: None,
        }
    }
}

impl TriggerContext {
    /// Builds the context from the environment snapshot.
    ///
    /// A missing, unreadable or malformed event file is logged and leaves
    /// `payload` as an empty object.
    #[must_use]
    pub fn from_env(env: &Environment) -> Self {
        let text = |key: &str| env.get(key).unwrap_or_default().to_string();
        let number = |key: &str| env.get(key).and_then(|v| v.parse().ok()).unwrap_or(0);

        let payload = env
            .get("GITHUB_EVENT_PATH")
            .map_or_else(|| Value::Object(Map::new()), |path| load_payload(Path::new(path)));

        Self {
            payload,
            event_name: text("GITHUB_EVENT_NAME"),
            sha: text("GITHUB_SHA"),
            git_ref: text("GITHUB_REF"),
            workflow: text("GITHUB_WORKFLOW"),
            action: text("GITHUB_ACTION"),
            actor: text("GITHUB_ACTOR"),
            job: text("GITHUB_JOB"),
            run_number: number("GITHUB_RUN_NUMBER"),
            run_id: number("GITHUB_RUN_ID"),
            server_url: env
                .get("GITHUB_SERVER_URL")
                .unwrap_or(DEFAULT_SERVER_URL)
                .to_string(),
            api_url: env
                .get("GITHUB_API_URL")
                .unwrap_or(DEFAULT_API_URL)
                .to_string(),
            graphql_url: env
                .get("GITHUB_GRAPHQL_URL")
                .unwrap_or(DEFAULT_GRAPHQL_URL)
                .to_string(),
            repo: env.get("GITHUB_REPOSITORY").and_then(parse_repo),
        }
    }

    /// Creates a context carrying only the given event payload.
    #[must_use]
    pub fn with_payload(payload: Value) -> Self {
        Self {
            payload,
            ..Self::default()
        }
    }
}

fn load_payload(path: &Path) -> Value {
    let parsed = std::fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|text| serde_json::from_str(&text).map_err(|e| e.to_string()));

    match parsed {
        Ok(value) => value,
        Err(reason) => {
            tracing::warn!(
                "Event payload at '{}' could not be loaded: {reason}",
                path.display()
            );
            Value::Object(Map::new())
        }
    }
}

fn parse_repo(full_name: &str) -> Option<RepoRef> {
    let (owner, repo) = full_name.split_once('/')?;
    Some(RepoRef {
        owner: owner.to_string(),
        repo: repo.to_string(),
    })
}
