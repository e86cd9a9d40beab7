//! # loopstack-core - Declarative Tool-Calling Workflows
//!
//! **A Rust port of Loopstack** - Build backend AI workflows from declarative
//! state-machine configs, with tools, documents and modules wired together at
//! runtime.
//!
//! ## Overview
//!
//! `loopstack-core` is the foundation for building workflow applications in
//! Rust. It provides:
//!
//! - **Declarative workflows** - Places and transitions described in YAML
//! - **Tool execution** - Async handlers resolved by name at each transition
//! - **Template rendering** - `{path}` placeholders resolved from arguments and run state
//! - **Schema validation** - Typed argument and state schemas with defaults
//! - **Run history** - Memento snapshots recorded after every step
//! - **Module composition** - Reusable bundles of tools and document types
//!
//! ## Core Concepts
//!
//! ### 1. Workflow - Declarative State Machine
//!
//! A [`Workflow`] pairs a linear state-machine config with the tools it calls.
//! Each transition names a tool, carries a templated `with:` payload, and may
//! assign the tool's result into run state:
//!
//! - **Places**: The states a run moves through, starting at `start`
//! - **Transitions**: One outgoing arc per place, each bound to a tool call
//! - **Arguments**: Validated caller input, spliced into templates by name
//! - **State**: Values produced by tools, addressable as `{state.field}`
//!
//! ### 2. Tools and Modules
//!
//! Tools implement [`ToolHandler`] and live in a [`ToolRegistry`]. Modules
//! implement [`Module`] and install their tools and document types into a
//! shared [`Registry`], pulling in the modules they import first.
//!
//! ### 3. Processing
//!
//! The [`WorkflowProcessor`] drives a run: validate arguments, then walk the
//! transition chain, rendering each payload and awaiting each tool in turn.
//! Tool failures do not abort the run with an `Err`; they halt it and flag
//! the returned [`RunResult`].
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use loopstack_core::{
//!     CoreModule, ExecutionContext, Field, Registry, Schema,
//!     WorkflowDefinition, WorkflowProcessor,
//! };
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> loopstack_core::Result<()> {
//!     let mut registry = Registry::new();
//!     registry.install(&CoreModule)?;
//!     registry.register_tool(Arc::new(MyTool));
//!
//!     let workflow = WorkflowDefinition::builder("greeter")
//!         .arguments(Schema::new().field("name", Field::string().with_default(json!("world"))))
//!         .config_yaml(
//!             r#"
//!             name: greeter
//!             start: start
//!             places: [start, end]
//!             transitions:
//!               - name: greet
//!                 from: start
//!                 to: end
//!                 call: myTool
//!                 with:
//!                   message: "Hello, {name}!"
//!             "#,
//!         )
//!         .bind_tool("myTool")
//!         .build(&registry)?;
//!
//!     let processor = WorkflowProcessor::new();
//!     let result = processor
//!         .process(&workflow, json!({}), ExecutionContext::new())
//!         .await?;
//!     assert!(result.succeeded());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//!          ┌──────────────────────────────────────┐
//!          │            Registry                  │
//!          │  • install(Module) • tools()         │
//!          │  • documents() • override_tool()     │
//!          └───────────────┬──────────────────────┘
//!                          │ resolves bindings
//!                          ▼
//!          ┌──────────────────────────────────────┐
//!          │      WorkflowDefinition (built)      │
//!          │  • arguments/state schemas           │
//!          │  • validated config                  │
//!          │  • bound tools and documents         │
//!          └───────────────┬──────────────────────┘
//!                          │ process()
//!                          ▼
//!          ┌──────────────────────────────────────┐
//!          │         WorkflowProcessor            │
//!          │  • validate arguments                │
//!          │  • render templates per transition   │
//!          │  • await tools, assign state         │
//!          │  • record history, report RunResult  │
//!          └──────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! ### Core APIs (Start Here)
//! - [`workflow`] - [`WorkflowDefinition`], its builder, and the [`Workflow`] trait
//! - [`processor`] - [`WorkflowProcessor`] runtime and [`RunResult`]
//! - [`module`] - [`Module`] trait, [`Registry`], and [`CoreModule`]
//!
//! ### Building Blocks
//! - [`schema`] - [`Schema`] and [`Field`] argument/state definitions
//! - [`config`] - YAML workflow config and its validation rules
//! - [`template`] - Placeholder rendering against arguments and state
//! - [`tool`] - [`ToolHandler`] trait, [`ToolContext`], [`ToolRegistry`]
//! - [`document`] - Document type descriptors and their registry
//! - [`caretaker`] - Run history mementos
//!
//! ### Support
//! - [`error`] - [`FlowError`] and the crate [`Result`] alias
//! - [`testing`] - [`MockTool`] and the [`WorkflowTest`] harness

pub mod caretaker;
pub mod config;
pub mod document;
pub mod error;
pub mod module;
pub mod processor;
pub mod schema;
pub mod template;
pub mod testing;
pub mod tool;
pub mod workflow;

// Re-export main types
pub use caretaker::{Caretaker, Memento, MementoMetadata};
pub use config::{PlaceId, TransitionConfig, WorkflowConfig};
pub use document::{DocumentDescriptor, DocumentRegistry};
pub use error::{FlowError, Result};
pub use module::{CoreModule, Module, Registry};
pub use processor::{
    ExecutionContext, RunResult, RunState, RuntimeFlags, WorkflowProcessor, DEFAULT_MAX_STEPS,
};
pub use schema::{Field, FieldKind, Schema, SchemaError};
pub use template::TemplateScope;
pub use testing::{MockTool, WorkflowTest, WorkflowTestBuilder};
pub use tool::{ToolContext, ToolError, ToolHandler, ToolRegistry, ToolResult};
pub use workflow::{Workflow, WorkflowDefinition, WorkflowDefinitionBuilder};
