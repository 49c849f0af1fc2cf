//! Cloud-config template rendering
//!
//! Renders `cloud-config.yaml.template` with the deployment parameters.
//!
//! Templates follow Go `text/template` delimiters: only `{{ ... }}` actions
//! are live. The expression inside is evaluated by minijinja, so both
//! `{{.NumberOfNodes.Value}}` and `{{ numberOfNodes.value }}` work. Jinja
//! block and comment openers in plain text (`{%`, `{#`, as in `${#VAR}`)
//! are emitted literally, and Go comments `{{/* ... */}}` render as nothing.

pub mod context;

pub use context::build_context;

use crate::ParamGenError;
use crate::params::ParameterSet;
use minijinja::{Environment, UndefinedBehavior};
use std::collections::HashMap;
use tracing::debug;

/// Check if this looks like a cloud-config (starts with #cloud-config)
pub fn is_cloud_config(data: &str) -> bool {
    data.trim_start().starts_with("#cloud-config")
}

/// Parse rendered cloud-config as YAML to catch broken templates early
pub fn validate_cloud_config(rendered: &str) -> Result<(), serde_yaml::Error> {
    serde_yaml::from_str::<serde_yaml::Value>(rendered).map(|_| ())
}

/// Translate a Go-delimited template into minijinja source.
///
/// - `{{.Field.Sub}}` becomes `{{Field.Sub}}`
/// - `{{/* comment */}}` is dropped, keeping `{{-`/`-}}` trim markers
/// - `{%` and `{#` outside actions are escaped as string literals
pub fn translate_go_template(template: &str) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find('{') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        if let Some(after) = tail.strip_prefix("{{") {
            if let Some((replacement, consumed)) = go_comment(after) {
                out.push_str(&replacement);
                rest = &after[consumed..];
            } else if let Some(end) = after.find("}}") {
                out.push_str("{{");
                out.push_str(&strip_leading_dot(&after[..end]));
                out.push_str("}}");
                rest = &after[end + 2..];
            } else {
                // Unterminated action, left for the parser to report
                out.push_str(tail);
                rest = "";
            }
        } else if tail.starts_with("{%") || tail.starts_with("{#") {
            out.push_str("{{ \"");
            out.push_str(&tail[..2]);
            out.push_str("\" }}");
            rest = &tail[2..];
        } else {
            out.push('{');
            rest = &tail[1..];
        }
    }

    out.push_str(rest);
    out
}

/// Match a Go comment action following `{{`.
///
/// Returns the replacement text and how many bytes of `after` it covers.
fn go_comment(after: &str) -> Option<(String, usize)> {
    let (trim_left, body) = match after.strip_prefix('-') {
        Some(body) => (true, body),
        None => (false, after),
    };

    let comment = body.trim_start().strip_prefix("/*")?;
    let end = comment.find("*/")?;

    let closing = comment[end + 2..].trim_start();
    let (trim_right, closing) = match closing.strip_prefix('-') {
        Some(closing) => (true, closing.trim_start()),
        None => (false, closing),
    };
    let remaining = closing.strip_prefix("}}")?;

    let replacement = if trim_left || trim_right {
        format!(
            "{{{{{} \"\" {}}}}}",
            if trim_left { "-" } else { "" },
            if trim_right { "-" } else { "" }
        )
    } else {
        String::new()
    };

    Some((replacement, after.len() - remaining.len()))
}

fn strip_leading_dot(expr: &str) -> String {
    // Keep a `{{-` trim marker in place
    let body = expr.strip_prefix('-').unwrap_or(expr);
    let marker = &expr[..expr.len() - body.len()];
    let trimmed = body.trim_start();
    let ws = &body[..body.len() - trimmed.len()];

    match trimmed.strip_prefix('.') {
        Some(field) if field.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_') => {
            format!("{}{}{}", marker, ws, field)
        }
        _ => expr.to_string(),
    }
}

/// Render a cloud-config template with the parameter set
pub fn render_cloud_config(
    template: &str,
    params: &ParameterSet,
) -> Result<String, ParamGenError> {
    render_template_with_context(template, &build_context(params))
}

/// Render a template with a custom context
pub fn render_template_with_context(
    template: &str,
    context: &HashMap<String, minijinja::Value>,
) -> Result<String, ParamGenError> {
    debug!("Rendering cloud-config template");

    let source = translate_go_template(template);

    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.set_keep_trailing_newline(true);

    env.add_template("cloud-config", &source)
        .map_err(|e| ParamGenError::Template(format!("Template parse error: {}", e)))?;

    let tmpl = env
        .get_template("cloud-config")
        .map_err(|e| ParamGenError::Template(format!("Template error: {}", e)))?;

    tmpl.render(context)
        .map_err(|e| ParamGenError::Template(format!("Template render error: {}", e)))
}
