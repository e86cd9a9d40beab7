//! Workflow definitions
//!
//! A [`WorkflowDefinition`] bundles everything one workflow needs: argument
//! and state schemas, the place/transition configuration, and the tools and
//! document shapes it binds from a [`Registry`]. Bindings are resolved when
//! the definition is built, so a workflow that refers to a missing tool
//! fails at construction rather than mid-run, and the definition owns its
//! resolved handlers for its whole lifetime.
//!
//! The [`Workflow`] trait is the surface the processor executes against.
//! Application workflow types wrap a definition and expose it through
//! [`Workflow::definition`]; everything else is provided.
//!
//! # Examples
//!
//! ```rust
//! use async_trait::async_trait;
//! use loopstack_core::module::Registry;
//! use loopstack_core::schema::{Field, Schema};
//! use loopstack_core::tool::{ToolContext, ToolHandler, ToolResult};
//! use loopstack_core::workflow::{Workflow, WorkflowDefinition};
//! use serde_json::{json, Value};
//! use std::sync::Arc;
//!
//! struct Shout;
//!
//! #[async_trait]
//! impl ToolHandler for Shout {
//!     fn name(&self) -> &str {
//!         "shout"
//!     }
//!
//!     async fn execute(&self, input: Value, _ctx: &ToolContext) -> ToolResult {
//!         let text = input["text"].as_str().unwrap_or_default();
//!         Ok(json!({ "data": text.to_uppercase() }))
//!     }
//! }
//!
//! let mut registry = Registry::new();
//! registry.register_tool(Arc::new(Shout));
//!
//! let definition = WorkflowDefinition::builder("greeting")
//!     .arguments(Schema::new().field("name", Field::string().with_default("world")))
//!     .config_yaml(
//!         r#"
//! name: greeting
//! start: start
//! places: [start, end]
//! transitions:
//!   - name: shout_name
//!     from: start
//!     to: end
//!     call: shout
//!     with:
//!       text: "hello {name}"
//!     assign: greeting
//! "#,
//!     )
//!     .bind_tool("shout")
//!     .build(&registry)
//!     .unwrap();
//!
//! assert_eq!(definition.validate(&json!({})).unwrap(), json!({"name": "world"}));
//! assert_eq!(definition.tools(), vec!["shout".to_string()]);
//! ```

use std::sync::Arc;

use serde_json::Value;

use crate::config::WorkflowConfig;
use crate::document::DocumentDescriptor;
use crate::error::{FlowError, Result};
use crate::module::Registry;
use crate::schema::Schema;
use crate::tool::ToolHandler;

/// Fully resolved workflow: schemas, configuration, and bound collaborators
pub struct WorkflowDefinition {
    name: String,
    arguments: Schema,
    state: Schema,
    config: WorkflowConfig,
    tools: Vec<(String, Arc<dyn ToolHandler>)>,
    documents: Vec<(String, DocumentDescriptor)>,
}

impl WorkflowDefinition {
    /// Start building a definition with the given name
    pub fn builder(name: impl Into<String>) -> WorkflowDefinitionBuilder {
        WorkflowDefinitionBuilder::new(name)
    }

    /// Workflow name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Argument schema
    pub fn arguments(&self) -> &Schema {
        &self.arguments
    }

    /// Run-state schema
    pub fn state_schema(&self) -> &Schema {
        &self.state
    }

    /// Place/transition configuration
    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    /// Bound tool names, in binding order
    pub fn tool_names(&self) -> Vec<String> {
        self.tools.iter().map(|(name, _)| name.clone()).collect()
    }

    /// Bound document names, in binding order
    pub fn document_names(&self) -> Vec<String> {
        self.documents
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Resolve a bound tool by name
    pub fn tool(&self, name: &str) -> Option<Arc<dyn ToolHandler>> {
        self.tools
            .iter()
            .find(|(tool_name, _)| tool_name == name)
            .map(|(_, tool)| Arc::clone(tool))
    }

    /// Resolve a bound document shape by name
    pub fn document(&self, name: &str) -> Option<&DocumentDescriptor> {
        self.documents
            .iter()
            .find(|(doc_name, _)| doc_name == name)
            .map(|(_, descriptor)| descriptor)
    }
}

impl std::fmt::Debug for WorkflowDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowDefinition")
            .field("name", &self.name)
            .field("tools", &self.tool_names())
            .field("documents", &self.document_names())
            .field("config", &self.config.name)
            .finish()
    }
}

/// The surface the processor executes against
///
/// One required method; the rest delegates to the definition.
pub trait Workflow: Send + Sync {
    /// Definition backing this workflow
    fn definition(&self) -> &WorkflowDefinition;

    /// Workflow name
    fn name(&self) -> &str {
        self.definition().name()
    }

    /// Argument schema
    fn arguments(&self) -> &Schema {
        self.definition().arguments()
    }

    /// Run-state schema
    fn state_schema(&self) -> &Schema {
        self.definition().state_schema()
    }

    /// Place/transition configuration
    fn config(&self) -> &WorkflowConfig {
        self.definition().config()
    }

    /// Bound tool names, for introspection
    fn tools(&self) -> Vec<String> {
        self.definition().tool_names()
    }

    /// Bound document names, for introspection
    fn documents(&self) -> Vec<String> {
        self.definition().document_names()
    }

    /// Resolve a bound tool
    fn resolve_tool(&self, name: &str) -> Option<Arc<dyn ToolHandler>> {
        self.definition().tool(name)
    }

    /// Resolve a bound document shape
    fn resolve_document(&self, name: &str) -> Option<&DocumentDescriptor> {
        self.definition().document(name)
    }

    /// Validate raw arguments against the argument schema
    ///
    /// Returns the resolved arguments with defaults substituted and unknown
    /// keys stripped.
    fn validate(&self, raw: &Value) -> Result<Value> {
        Ok(self.definition().arguments().apply(raw)?)
    }
}

impl Workflow for WorkflowDefinition {
    fn definition(&self) -> &WorkflowDefinition {
        self
    }
}

enum ConfigSource {
    Missing,
    Parsed(WorkflowConfig),
    Yaml(String),
}

/// Builder for [`WorkflowDefinition`]
///
/// Collects schemas, configuration, and binding names; [`build`] resolves
/// the bindings against a [`Registry`] and validates that the configuration
/// only calls what was bound.
///
/// [`build`]: WorkflowDefinitionBuilder::build
pub struct WorkflowDefinitionBuilder {
    name: String,
    arguments: Schema,
    state: Schema,
    config: ConfigSource,
    tool_bindings: Vec<String>,
    document_bindings: Vec<String>,
}

impl WorkflowDefinitionBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: Schema::new(),
            state: Schema::new(),
            config: ConfigSource::Missing,
            tool_bindings: Vec::new(),
            document_bindings: Vec::new(),
        }
    }

    /// Set the argument schema
    pub fn arguments(mut self, schema: Schema) -> Self {
        self.arguments = schema;
        self
    }

    /// Set the run-state schema
    pub fn state(mut self, schema: Schema) -> Self {
        self.state = schema;
        self
    }

    /// Set an already-parsed configuration
    pub fn config(mut self, config: WorkflowConfig) -> Self {
        self.config = ConfigSource::Parsed(config);
        self
    }

    /// Set the configuration from YAML text
    ///
    /// Parsing is deferred to [`build`](WorkflowDefinitionBuilder::build) so
    /// the builder chain stays infallible.
    pub fn config_yaml(mut self, yaml: impl Into<String>) -> Self {
        self.config = ConfigSource::Yaml(yaml.into());
        self
    }

    /// Bind a tool by registry name
    pub fn bind_tool(mut self, name: impl Into<String>) -> Self {
        self.tool_bindings.push(name.into());
        self
    }

    /// Bind a document shape by registry name
    pub fn bind_document(mut self, name: impl Into<String>) -> Self {
        self.document_bindings.push(name.into());
        self
    }

    /// Resolve bindings and validate the configuration
    ///
    /// # Errors
    ///
    /// - [`FlowError::Configuration`] when no configuration was provided,
    ///   or when a transition calls a tool or references a document the
    ///   definition never bound
    /// - [`FlowError::UnknownTool`] / [`FlowError::UnknownDocument`] when a
    ///   binding is absent from the registry
    /// - [`FlowError::Yaml`] when deferred YAML parsing fails
    /// - Any error from [`WorkflowConfig::validate`]
    pub fn build(self, registry: &Registry) -> Result<WorkflowDefinition> {
        let config = match self.config {
            ConfigSource::Missing => {
                return Err(FlowError::Configuration(format!(
                    "Workflow '{}' has no configuration",
                    self.name
                )));
            }
            ConfigSource::Parsed(config) => config,
            ConfigSource::Yaml(yaml) => WorkflowConfig::from_str(&yaml)?,
        };
        config.validate()?;

        let mut tools = Vec::with_capacity(self.tool_bindings.len());
        for name in self.tool_bindings {
            let tool = registry
                .tools()
                .get(&name)
                .ok_or_else(|| FlowError::UnknownTool(name.clone()))?;
            tools.push((name, tool));
        }

        let mut documents = Vec::with_capacity(self.document_bindings.len());
        for name in self.document_bindings {
            let descriptor = registry
                .documents()
                .get(&name)
                .cloned()
                .ok_or_else(|| FlowError::UnknownDocument(name.clone()))?;
            documents.push((name, descriptor));
        }

        for transition in &config.transitions {
            if !tools.iter().any(|(name, _)| *name == transition.call) {
                return Err(FlowError::Configuration(format!(
                    "Transition '{}' calls tool '{}' which the workflow does not bind",
                    transition.name, transition.call
                )));
            }
            if let Some(document) = &transition.document {
                if !documents.iter().any(|(name, _)| name == document) {
                    return Err(FlowError::Configuration(format!(
                        "Transition '{}' references document '{}' which the workflow does not bind",
                        transition.name, document
                    )));
                }
            }
        }

        Ok(WorkflowDefinition {
            name: self.name,
            arguments: self.arguments,
            state: self.state,
            config,
            tools,
            documents,
        })
    }
}
