//! Content layer: turns payload inputs into the JSON object to send.
//!
//! This module provides:
//! - Inline and file payload parsing ([`parse_inline`], [`parse_file`])
//! - Variable substitution in string values ([`Templater`], [`templatize`])
//! - Flattening to single-level string fields ([`flatten`])
//! - The resolution pipeline tying them together ([`ContentResolver`])
//!
//! # Sources
//!
//! Exactly one source is used: the inline `payload`, the file at
//! `payload-file-path`, or, when neither is given, the payload of the
//! event that triggered the job. Supplying both inputs is an error.
//!
//! # Post-processing
//!
//! Templating runs before flattening, each only when requested.

mod error;
mod flatten;
mod parse;
mod template;

#[cfg(test)]
mod resolver_tests;

pub use error::{ContentError, ParseAttempts, PayloadFileError};
pub use flatten::{flatten, stringify};
pub use parse::{parse_file, parse_inline};
pub use template::{HandlebarsTemplater, Templater, templatize, unescape_expressions};

use serde_json::{Value, json};

use crate::config::PayloadInputs;
use crate::runner::{Environment, TriggerContext};

/// Resolves payload inputs into the content to deliver.
///
/// Holds the trigger context (default content and template data) and the
/// environment snapshot (template data).
///
/// # Type Parameters
///
/// - `T`: The template engine (defaults to [`HandlebarsTemplater`])
#[derive(Debug)]
pub struct ContentResolver<'a, T = HandlebarsTemplater> {
    context: &'a TriggerContext,
    env: &'a Environment,
    templater: T,
}

impl<'a> ContentResolver<'a, HandlebarsTemplater> {
    /// Creates a resolver using Handlebars for templating.
    #[must_use]
    pub fn new(context: &'a TriggerContext, env: &'a Environment) -> Self {
        Self {
            context,
            env,
            templater: HandlebarsTemplater::new(),
        }
    }
}

impl<'a, T> ContentResolver<'a, T> {
    /// Sets a custom template engine.
    #[must_use]
    pub fn with_templater<T2>(self, templater: T2) -> ContentResolver<'a, T2> {
        ContentResolver {
            context: self.context,
            env: self.env,
            templater,
        }
    }

    /// Returns the data exposed to templates: `env` and `github`.
    #[must_use]
    pub fn template_context(&self) -> Value {
        json!({
            "env": self.env,
            "github": self.context,
        })
    }
}

impl<T: Templater> ContentResolver<'_, T> {
    /// Produces the content for the given inputs.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Both an inline payload and a payload file are given
    /// - The selected source cannot be read or parsed
    /// - A string value fails to render as a template
    pub async fn resolve(&self, inputs: &PayloadInputs) -> Result<Value, ContentError> {
        let mut content = match (&inputs.inline, &inputs.file_path) {
            (Some(_), Some(_)) => return Err(ContentError::AmbiguousSource),
            (Some(text), None) => parse_inline(text)?,
            (None, Some(path)) => parse_file(path).await?,
            (None, None) => {
                tracing::debug!("No payload given, sending the trigger event payload");
                self.context.payload.clone()
            }
        };

        if inputs.templated {
            content = templatize(content, &self.templater, &self.template_context())?;
        }

        if let Some(delimiter) = &inputs.delimiter {
            content = flatten(content, delimiter);
        }

        Ok(content)
    }
}
