//! Variable substitution in payload string values.

use std::sync::LazyLock;

use handlebars::Handlebars;
use regex::Regex;
use serde_json::Value;

use super::ContentError;

/// Matches `${{ expression }}`, the workflow expression syntax authors
/// also write inside payload files.
static DOLLAR_EXPRESSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{\{(.*?)\}\}").expect("expression pattern is valid"));

/// Renders a template string against a context object.
///
/// Implementations are pure: the same template and context always render
/// the same string.
pub trait Templater: Send + Sync {
    /// Renders `template` with values from `context`.
    ///
    /// # Errors
    ///
    /// Returns the engine's error when the template is malformed.
    fn render(
        &self,
        template: &str,
        context: &Value,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>>;
}

/// Handlebars-backed [`Templater`].
///
/// HTML escaping is disabled since the output is JSON text for Slack, not
/// HTML. Missing variables render as empty strings.
#[derive(Debug)]
pub struct HandlebarsTemplater {
    engine: Handlebars<'static>,
}

impl HandlebarsTemplater {
    /// Creates a templater with escaping disabled.
    #[must_use]
    pub fn new() -> Self {
        let mut engine = Handlebars::new();
        engine.register_escape_fn(handlebars::no_escape);
        Self { engine }
    }
}

impl Default for HandlebarsTemplater {
    fn default() -> Self {
        Self::new()
    }
}

impl Templater for HandlebarsTemplater {
    fn render(
        &self,
        template: &str,
        context: &Value,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.engine.render_template(template, context)?)
    }
}

/// Rewrites every `${{ expr }}` to `{{ expr }}`.
#[must_use]
pub fn unescape_expressions(text: &str) -> String {
    DOLLAR_EXPRESSION.replace_all(text, "{{$1}}").into_owned()
}

/// Recursively renders every string leaf of `value`.
///
/// Object values and array elements are walked; numbers, booleans and
/// null pass through unchanged. Object keys are never rendered.
///
/// # Errors
///
/// Returns [`ContentError::Template`] on the first string that fails to render.
pub fn templatize<T: Templater + ?Sized>(
    value: Value,
    templater: &T,
    context: &Value,
) -> Result<Value, ContentError> {
    match value {
        Value::String(text) => templater
            .render(&unescape_expressions(&text), context)
            .map(Value::String)
            .map_err(ContentError::Template),
        Value::Array(items) => items
            .into_iter()
            .map(|item| templatize(item, templater, context))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        Value::Object(map) => map
            .into_iter()
            .map(|(key, item)| Ok((key, templatize(item, templater, context)?)))
            .collect::<Result<serde_json::Map<_, _>, ContentError>>()
            .map(Value::Object),
        other => Ok(other),
    }
}
