//! Error types for payload resolution.

use std::path::PathBuf;

use thiserror::Error;

/// Error type for content resolution.
///
/// Every variant is fatal and is raised before any delivery attempt.
#[derive(Debug, Error)]
pub enum ContentError {
    /// Both an inline payload and a payload file were supplied.
    #[error("Invalid input! Just the payload or payload file path is required.")]
    AmbiguousSource,

    /// The inline payload could not be parsed by any strategy.
    #[error("Invalid input! Failed to parse contents of the provided payload")]
    Payload(#[source] ParseAttempts),

    /// The payload file could not be read or parsed.
    #[error("Invalid input! Failed to parse contents of the provided payload file")]
    PayloadFile {
        /// Path of the payload file
        path: PathBuf,
        /// Underlying failure
        #[source]
        source: PayloadFileError,
    },

    /// A string value could not be rendered as a template.
    #[error("Invalid input! Failed to template the contents of the provided payload: {0}")]
    Template(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Both failed attempts at parsing an inline payload.
///
/// The lenient JSON attempt runs last and is reported first; it is also
/// the [`source`](std::error::Error::source) of this error.
#[derive(Debug, Error)]
#[error("JSON: {json}; YAML: {yaml}")]
pub struct ParseAttempts {
    /// Lenient JSON attempt (most recent)
    #[source]
    pub json: serde_json::Error,
    /// Structured YAML attempt
    pub yaml: serde_yaml::Error,
}

/// Failure while loading a payload file.
#[derive(Debug, Error)]
pub enum PayloadFileError {
    /// The file could not be read.
    #[error("Failed to read file: {0}")]
    Read(#[from] std::io::Error),

    /// The file extension is not `.json`, `.yaml` or `.yml`.
    #[error("Failed to parse file extension '{0}'")]
    UnsupportedExtension(String),

    /// The `.json` file is not valid JSON.
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The `.yaml`/`.yml` file is not valid YAML.
    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
