//! Tool abstraction for workflow transitions
//!
//! Every transition in a workflow configuration names a tool. Tools are the
//! only way a workflow touches the outside world: generating text, storing a
//! document, calling an API. The runtime resolves the name through a
//! [`ToolRegistry`], renders the transition's templated input, and invokes
//! the handler with a per-invocation [`ToolContext`].
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────┐
//! │  WorkflowProcessor                             │
//! │  • picks the transition leaving the current    │
//! │    place                                       │
//! │  • renders `with:` against arguments + state   │
//! └───────────────────┬────────────────────────────┘
//!                     │ call: "aiGenerateText"
//!                     ↓
//! ┌────────────────────────────────────────────────┐
//! │  ToolRegistry                                  │
//! │  • lookup by binding name                      │
//! │  • `override_tool` swaps in mocks for tests    │
//! └───────────────────┬────────────────────────────┘
//!                     │ Arc<dyn ToolHandler>
//!                     ↓
//! ┌────────────────────────────────────────────────┐
//! │  ToolHandler::execute(input, ctx)              │
//! │  • validates / deserializes its input          │
//! │  • returns a JSON result or a ToolError        │
//! └────────────────────────────────────────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`ToolHandler`] - Trait implemented by every tool
//! - [`ToolContext`] - Runtime context for one invocation
//! - [`ToolRegistry`] - Collection of registered tools
//! - [`ToolError`] - Tool invocation errors
//!
//! # Defining a tool
//!
//! ```rust
//! use async_trait::async_trait;
//! use loopstack_core::tool::{ToolContext, ToolError, ToolHandler};
//! use serde_json::{json, Value};
//!
//! struct Echo;
//!
//! #[async_trait]
//! impl ToolHandler for Echo {
//!     fn name(&self) -> &str {
//!         "echo"
//!     }
//!
//!     async fn execute(&self, input: Value, _ctx: &ToolContext) -> Result<Value, ToolError> {
//!         Ok(json!({ "data": input }))
//!     }
//! }
//! ```
//!
//! # Input Validation
//!
//! A handler may publish a JSON Schema via [`ToolHandler::input_schema`].
//! Full schema validation requires the `json-validation` feature; without it
//! only the object-shape check runs and handlers validate during
//! deserialization.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

/// Tool invocation result
pub type ToolResult = std::result::Result<Value, ToolError>;

/// Errors that can occur while resolving or invoking tools
#[derive(Debug, Error, Clone, Serialize, Deserialize)]
pub enum ToolError {
    /// Tool not found in registry
    #[error("Tool '{0}' not found. Available tools: {1}")]
    NotFound(String, String),

    /// Tool input did not deserialize into the tool's expected shape
    #[error("Invalid arguments for tool '{tool}': {error}")]
    InvalidArguments { tool: String, error: String },

    /// Tool ran and failed
    #[error("Tool '{tool}' execution failed: {error}")]
    ExecutionFailed { tool: String, error: String },

    /// Tool input rejected by schema validation
    #[error("Validation error for tool '{tool}': {error}")]
    ValidationError { tool: String, error: String },
}

impl ToolError {
    /// Create an execution failure with tool context
    pub fn execution_failed(tool: impl Into<String>, error: impl Into<String>) -> Self {
        Self::ExecutionFailed {
            tool: tool.into(),
            error: error.into(),
        }
    }

    /// Create an invalid-arguments error with tool context
    pub fn invalid_arguments(tool: impl Into<String>, error: impl Into<String>) -> Self {
        Self::InvalidArguments {
            tool: tool.into(),
            error: error.into(),
        }
    }
}

/// Runtime context for one tool invocation
///
/// Carries run identity, the place being entered, the transition's document
/// binding, and a read-only snapshot of run state. Tools never mutate run
/// state directly; the processor applies their results.
#[derive(Debug, Clone)]
pub struct ToolContext {
    /// Run this invocation belongs to
    pub run_id: Uuid,

    /// Name of the executing workflow
    pub workflow: String,

    /// Place the firing transition enters
    pub place: String,

    /// Transition firing this invocation
    pub transition: String,

    /// Document binding declared on the transition, if any
    pub document: Option<String>,

    /// Snapshot of run state before the invocation
    pub state: Value,

    /// Caller-supplied metadata, forwarded from the execution context
    pub metadata: HashMap<String, Value>,
}

impl ToolContext {
    /// Create a context for a workflow run
    pub fn new(run_id: Uuid, workflow: impl Into<String>) -> Self {
        Self {
            run_id,
            workflow: workflow.into(),
            place: String::new(),
            transition: String::new(),
            document: None,
            state: Value::Object(serde_json::Map::new()),
            metadata: HashMap::new(),
        }
    }

    /// Set the place being entered
    pub fn with_place(mut self, place: impl Into<String>) -> Self {
        self.place = place.into();
        self
    }

    /// Set the firing transition's name
    pub fn with_transition(mut self, transition: impl Into<String>) -> Self {
        self.transition = transition.into();
        self
    }

    /// Set the document binding
    pub fn with_document(mut self, document: impl Into<String>) -> Self {
        self.document = Some(document.into());
        self
    }

    /// Set the state snapshot
    pub fn with_state(mut self, state: Value) -> Self {
        self.state = state;
        self
    }

    /// Add a metadata value
    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Get a metadata value
    pub fn get_metadata(&self, key: &str) -> Option<&Value> {
        self.metadata.get(key)
    }
}

/// Trait implemented by every tool a workflow can call
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// Binding name workflows use to reference this tool
    fn name(&self) -> &str;

    /// Human-readable description
    fn description(&self) -> &str {
        ""
    }

    /// JSON Schema for the tool's input, when the tool publishes one
    fn input_schema(&self) -> Option<Value> {
        None
    }

    /// Execute the tool with rendered input
    async fn execute(&self, input: Value, ctx: &ToolContext) -> ToolResult;

    /// Validate rendered input before execution
    ///
    /// The input must be a JSON object. Full JSON Schema validation against
    /// [`ToolHandler::input_schema`] requires the `json-validation` feature;
    /// without it only the shape check runs.
    fn validate_input(&self, input: &Value) -> Result<(), ToolError> {
        if !input.is_object() {
            return Err(ToolError::ValidationError {
                tool: self.name().to_string(),
                error: "Input must be an object".to_string(),
            });
        }

        #[cfg(feature = "json-validation")]
        if let Some(schema) = self.input_schema() {
            use jsonschema::JSONSchema;

            let compiled_schema =
                JSONSchema::compile(&schema).map_err(|e| ToolError::ValidationError {
                    tool: self.name().to_string(),
                    error: format!("Invalid JSON Schema: {}", e),
                })?;

            // Collect messages while the compiled schema is still alive.
            let error_messages = match compiled_schema.validate(input) {
                Ok(()) => None,
                Err(errors) => Some(
                    errors
                        .map(|e| format!("{}: {}", e.instance_path, e))
                        .collect::<Vec<String>>(),
                ),
            };

            if let Some(messages) = error_messages {
                return Err(ToolError::ValidationError {
                    tool: self.name().to_string(),
                    error: messages.join("; "),
                });
            }
        }

        #[cfg(not(feature = "json-validation"))]
        if self.input_schema().is_some() {
            tracing::debug!(
                tool = %self.name(),
                "JSON Schema validation skipped (enable 'json-validation' feature for full validation)"
            );
        }

        Ok(())
    }
}

/// Registry of tools available to workflows
///
/// Modules register tools under their binding names; workflow definitions
/// resolve bindings at construction time. [`ToolRegistry::override_tool`]
/// replaces an existing registration and is the seam test harnesses use to
/// substitute mocks.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn ToolHandler>>,
}

impl ToolRegistry {
    /// Create a new empty tool registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool under its binding name
    ///
    /// Re-registering a name replaces the previous handler.
    pub fn register(&mut self, tool: Arc<dyn ToolHandler>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Replace an existing registration
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::NotFound`] when no tool with that name was
    /// registered, so a mistyped override fails instead of silently adding
    /// a tool no workflow binds.
    pub fn override_tool(&mut self, tool: Arc<dyn ToolHandler>) -> Result<(), ToolError> {
        let name = tool.name().to_string();
        if !self.tools.contains_key(&name) {
            return Err(ToolError::NotFound(name, self.tool_names().join(", ")));
        }
        self.tools.insert(name, tool);
        Ok(())
    }

    /// Get a tool by binding name
    pub fn get(&self, name: &str) -> Option<Arc<dyn ToolHandler>> {
        self.tools.get(name).cloned()
    }

    /// Check if a tool is registered
    pub fn has_tool(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// All registered binding names, sorted
    pub fn tool_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// True when no tools are registered
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.tool_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Doubler;

    #[async_trait]
    impl ToolHandler for Doubler {
        fn name(&self) -> &str {
            "doubler"
        }

        fn input_schema(&self) -> Option<Value> {
            Some(json!({
                "type": "object",
                "required": ["x"],
                "properties": {
                    "x": { "type": "number" }
                }
            }))
        }

        async fn execute(&self, input: Value, _ctx: &ToolContext) -> Result<Value, ToolError> {
            let x = input["x"]
                .as_i64()
                .ok_or_else(|| ToolError::invalid_arguments("doubler", "x must be a number"))?;
            Ok(json!({ "data": x * 2 }))
        }
    }

    fn context() -> ToolContext {
        ToolContext::new(Uuid::new_v4(), "test")
    }

    #[tokio::test]
    async fn executes_through_registry() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(Doubler));

        let tool = registry.get("doubler").unwrap();
        let result = tool.execute(json!({"x": 21}), &context()).await.unwrap();
        assert_eq!(result, json!({"data": 42}));
    }

    #[tokio::test]
    async fn registry_tracks_names() {
        let mut registry = ToolRegistry::new();
        assert!(registry.is_empty());

        registry.register(Arc::new(Doubler));
        assert!(registry.has_tool("doubler"));
        assert!(!registry.has_tool("tripler"));
        assert_eq!(registry.tool_names(), vec!["doubler"]);
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn override_replaces_existing_registration() {
        struct Stub;

        #[async_trait]
        impl ToolHandler for Stub {
            fn name(&self) -> &str {
                "doubler"
            }

            async fn execute(&self, _input: Value, _ctx: &ToolContext) -> Result<Value, ToolError> {
                Ok(json!({"data": "stubbed"}))
            }
        }

        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(Doubler));
        registry.override_tool(Arc::new(Stub)).unwrap();

        let tool = registry.get("doubler").unwrap();
        let result = tool.execute(json!({}), &context()).await.unwrap();
        assert_eq!(result, json!({"data": "stubbed"}));
    }

    #[test]
    fn override_of_unregistered_tool_fails() {
        let mut registry = ToolRegistry::new();
        let err = registry.override_tool(Arc::new(Doubler)).unwrap_err();
        assert!(matches!(err, ToolError::NotFound(name, _) if name == "doubler"));
    }

    #[test]
    fn non_object_input_is_rejected() {
        let err = Doubler.validate_input(&json!([1, 2])).unwrap_err();
        match err {
            ToolError::ValidationError { tool, error } => {
                assert_eq!(tool, "doubler");
                assert!(error.contains("must be an object"));
            }
            other => panic!("expected ValidationError, got {other:?}"),
        }
    }

    #[cfg(feature = "json-validation")]
    #[test]
    fn schema_violations_are_rejected() {
        let err = Doubler
            .validate_input(&json!({"x": "not a number"}))
            .unwrap_err();
        assert!(matches!(err, ToolError::ValidationError { .. }));

        assert!(Doubler.validate_input(&json!({"x": 3})).is_ok());
    }

    #[test]
    fn context_builders_compose() {
        let ctx = context()
            .with_place("prompt_executed")
            .with_transition("generate_haiku")
            .with_document("aiMessageDocument")
            .with_state(json!({"llmResponse": null}))
            .with_metadata("caller", json!("tests"));

        assert_eq!(ctx.place, "prompt_executed");
        assert_eq!(ctx.transition, "generate_haiku");
        assert_eq!(ctx.document.as_deref(), Some("aiMessageDocument"));
        assert_eq!(ctx.get_metadata("caller"), Some(&json!("tests")));
    }
}
