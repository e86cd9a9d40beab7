//! Declarative schemas for workflow arguments and run state
//!
//! A [`Schema`] describes the shape a workflow expects for its arguments and
//! its run state: named fields with a [`FieldKind`], an optional default, and
//! a required flag. Applying a schema to a raw JSON payload substitutes
//! defaults for missing fields, rejects values of the wrong kind, and strips
//! keys the schema does not declare.
//!
//! Validation happens before a run starts, so a workflow body always sees
//! fully resolved arguments.
//!
//! # Examples
//!
//! ```rust
//! use loopstack_core::schema::{Field, Schema};
//! use serde_json::json;
//!
//! let arguments = Schema::new()
//!     .field("subject", Field::string().with_default("coffee"));
//!
//! let resolved = arguments.apply(&json!({})).unwrap();
//! assert_eq!(resolved, json!({"subject": "coffee"}));
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors produced when a payload does not satisfy a [`Schema`]
#[derive(Debug, Error, Clone, PartialEq, Serialize, Deserialize)]
pub enum SchemaError {
    /// The payload was not a JSON object
    #[error("Payload must be a JSON object")]
    NotAnObject,

    /// A required field without a default was absent
    #[error("Missing required field '{0}'")]
    MissingField(String),

    /// A present field had the wrong JSON kind
    #[error("Field '{field}' expected {expected}, got {actual}")]
    InvalidType {
        field: String,
        expected: FieldKind,
        actual: String,
    },
}

/// JSON kind accepted by a schema field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    String,
    Number,
    Boolean,
    Object,
    Array,
    /// Accepts every JSON value, including `null`
    Any,
}

impl FieldKind {
    /// Check whether a JSON value has this kind
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            FieldKind::String => value.is_string(),
            FieldKind::Number => value.is_number(),
            FieldKind::Boolean => value.is_boolean(),
            FieldKind::Object => value.is_object(),
            FieldKind::Array => value.is_array(),
            FieldKind::Any => true,
        }
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FieldKind::String => "string",
            FieldKind::Number => "number",
            FieldKind::Boolean => "boolean",
            FieldKind::Object => "object",
            FieldKind::Array => "array",
            FieldKind::Any => "any",
        };
        f.write_str(name)
    }
}

/// One named slot in a [`Schema`]
///
/// Fields are optional by default. A field with a default is filled in when
/// the payload omits it; a `required` field without a default rejects the
/// payload instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Field {
    /// JSON kind this field accepts
    pub kind: FieldKind,

    /// Value substituted when the payload omits the field
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    /// Reject payloads that omit this field (ignored when a default exists)
    #[serde(default)]
    pub required: bool,

    /// Human-readable description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Field {
    /// Create a field of the given kind, optional and without a default
    pub fn new(kind: FieldKind) -> Self {
        Self {
            kind,
            default: None,
            required: false,
            description: None,
        }
    }

    /// A field accepting strings
    pub fn string() -> Self {
        Self::new(FieldKind::String)
    }

    /// A field accepting numbers
    pub fn number() -> Self {
        Self::new(FieldKind::Number)
    }

    /// A field accepting booleans
    pub fn boolean() -> Self {
        Self::new(FieldKind::Boolean)
    }

    /// A field accepting objects
    pub fn object() -> Self {
        Self::new(FieldKind::Object)
    }

    /// A field accepting arrays
    pub fn array() -> Self {
        Self::new(FieldKind::Array)
    }

    /// A field accepting any JSON value
    pub fn any() -> Self {
        Self::new(FieldKind::Any)
    }

    /// Set the default substituted for a missing value
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Mark the field required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Attach a description
    pub fn describe(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }
}

/// Ordered collection of named fields
///
/// Built by chaining [`Schema::field`]; applied to payloads with
/// [`Schema::apply`].
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<(String, Field)>,
}

impl Schema {
    /// Create an empty schema (accepts `{}` and strips everything else)
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a named field
    pub fn field(mut self, name: impl Into<String>, field: Field) -> Self {
        self.fields.push((name.into(), field));
        self
    }

    /// Look up a field by name
    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields
            .iter()
            .find(|(field_name, _)| field_name == name)
            .map(|(_, field)| field)
    }

    /// Declared field names, in declaration order
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Number of declared fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when no fields are declared
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Resolve a raw payload against this schema
    ///
    /// Returns a new object containing only declared fields: present values
    /// are kind-checked and copied, missing values fall back to their
    /// defaults, and undeclared keys are dropped.
    ///
    /// # Errors
    ///
    /// - [`SchemaError::NotAnObject`] when the payload is not an object
    /// - [`SchemaError::InvalidType`] when a present value has the wrong kind
    /// - [`SchemaError::MissingField`] when a required field has no value and
    ///   no default
    pub fn apply(&self, raw: &Value) -> Result<Value, SchemaError> {
        let payload = raw.as_object().ok_or(SchemaError::NotAnObject)?;
        let mut resolved = Map::new();

        for (name, field) in &self.fields {
            match payload.get(name) {
                Some(value) => {
                    if !field.kind.matches(value) {
                        return Err(SchemaError::InvalidType {
                            field: name.clone(),
                            expected: field.kind,
                            actual: value_kind(value).to_string(),
                        });
                    }
                    resolved.insert(name.clone(), value.clone());
                }
                None => {
                    if let Some(default) = &field.default {
                        resolved.insert(name.clone(), default.clone());
                    } else if field.required {
                        return Err(SchemaError::MissingField(name.clone()));
                    }
                }
            }
        }

        Ok(Value::Object(resolved))
    }
}

/// Name of a JSON value's kind, for error messages
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
