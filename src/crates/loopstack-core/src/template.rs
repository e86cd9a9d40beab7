//! Placeholder rendering for transition inputs
//!
//! Transition configurations carry templated values in their `with:` blocks.
//! Before a tool is invoked, every string in the block is rendered against a
//! [`TemplateScope`] holding the validated workflow arguments and the current
//! run state.
//!
//! # Syntax
//!
//! - `{subject}` resolves a workflow argument by name.
//! - `{state.llmResponse}` resolves a run-state field; deeper dotted paths
//!   walk nested objects.
//! - `{{` and `}}` produce literal braces.
//!
//! A string that consists of exactly one placeholder resolves to the
//! referenced JSON value unchanged, so an object or array can be forwarded
//! into a tool input without stringification. Placeholders embedded in a
//! larger string interpolate strings, numbers, and booleans; embedding a
//! null, object, or array value is an error, as is a path that resolves to
//! nothing.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::error::{FlowError, Result};
use crate::schema::value_kind;

static PLACEHOLDER_PATH_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][\w]*(?:\.[A-Za-z_][\w]*)*$").unwrap());

/// Resolution scope for placeholder paths
///
/// Arguments resolve at the top level; run state resolves under the
/// `state.` prefix. Both are borrowed for the duration of one rendering
/// pass.
#[derive(Debug, Clone, Copy)]
pub struct TemplateScope<'a> {
    arguments: &'a Value,
    state: &'a Value,
}

impl<'a> TemplateScope<'a> {
    /// Create a scope over validated arguments and current run state
    pub fn new(arguments: &'a Value, state: &'a Value) -> Self {
        Self { arguments, state }
    }

    /// Resolve a dotted path to a value in this scope
    pub fn resolve(&self, path: &str) -> Option<&'a Value> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut current = if first == "state" {
            self.state
        } else {
            self.arguments.get(first)?
        };
        for segment in segments {
            current = current.get(segment)?;
        }
        Some(current)
    }
}

/// Render every string in a JSON value against the scope
///
/// Objects and arrays are rendered recursively; non-string scalars pass
/// through unchanged.
pub fn render_value(template: &Value, scope: &TemplateScope<'_>) -> Result<Value> {
    match template {
        Value::String(text) => render_string(text, scope),
        Value::Array(items) => {
            let rendered = items
                .iter()
                .map(|item| render_value(item, scope))
                .collect::<Result<Vec<_>>>()?;
            Ok(Value::Array(rendered))
        }
        Value::Object(map) => {
            let mut rendered = Map::with_capacity(map.len());
            for (key, value) in map {
                rendered.insert(key.clone(), render_value(value, scope)?);
            }
            Ok(Value::Object(rendered))
        }
        other => Ok(other.clone()),
    }
}

/// Render one string, splicing or interpolating placeholders
pub fn render_string(input: &str, scope: &TemplateScope<'_>) -> Result<Value> {
    if !input.contains('{') && !input.contains('}') {
        return Ok(Value::String(input.to_string()));
    }

    // Whole-string placeholder: splice the referenced value unchanged.
    if let Some(path) = whole_placeholder(input) {
        let value = scope
            .resolve(path)
            .ok_or_else(|| FlowError::template(format!("unknown path '{}'", path)))?;
        return Ok(value.clone());
    }

    let mut output = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(pos) = rest.find(|c| c == '{' || c == '}') {
        output.push_str(&rest[..pos]);
        let brace = rest.as_bytes()[pos];
        let after = &rest[pos + 1..];
        match brace {
            b'{' if after.starts_with('{') => {
                output.push('{');
                rest = &after[1..];
            }
            b'}' if after.starts_with('}') => {
                output.push('}');
                rest = &after[1..];
            }
            b'{' => {
                let close = after.find('}').ok_or_else(|| {
                    FlowError::template(format!("unterminated placeholder in '{}'", input))
                })?;
                let path = &after[..close];
                if !PLACEHOLDER_PATH_REGEX.is_match(path) {
                    return Err(FlowError::template(format!(
                        "invalid placeholder '{{{}}}'",
                        path
                    )));
                }
                let value = scope
                    .resolve(path)
                    .ok_or_else(|| FlowError::template(format!("unknown path '{}'", path)))?;
                match value {
                    Value::String(text) => output.push_str(text),
                    Value::Number(number) => output.push_str(&number.to_string()),
                    Value::Bool(flag) => output.push_str(if *flag { "true" } else { "false" }),
                    other => {
                        return Err(FlowError::template(format!(
                            "cannot embed {} value '{}' in a string",
                            value_kind(other),
                            path
                        )));
                    }
                }
                rest = &after[close + 1..];
            }
            _ => {
                return Err(FlowError::template(format!(
                    "unmatched '}}' in '{}'",
                    input
                )));
            }
        }
    }
    output.push_str(rest);

    Ok(Value::String(output))
}

/// Path of a string that is exactly one placeholder, `None` otherwise
fn whole_placeholder(input: &str) -> Option<&str> {
    let inner = input.strip_prefix('{')?.strip_suffix('}')?;
    if PLACEHOLDER_PATH_REGEX.is_match(inner) {
        Some(inner)
    } else {
        None
    }
}
