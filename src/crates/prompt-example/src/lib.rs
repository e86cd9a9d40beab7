//! Example loopstack-rs application.
//!
//! A two-step workflow: ask an LLM for a haiku about a subject, then store
//! the completion message as an `aiMessageDocument`. The workflow logic
//! lives entirely in `prompt.workflow.yaml`; the Rust side declares the
//! argument schema and binds the tools.
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use loopstack_ai::HttpLlmClient;
//! use loopstack_core::{ExecutionContext, Registry, WorkflowProcessor};
//! use loopstack_documents::InMemoryDocumentStore;
//! use prompt_example::{PromptExampleModule, PromptWorkflow};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let mut registry = Registry::new();
//! registry.install(&PromptExampleModule::new(
//!     Arc::new(HttpLlmClient::new()),
//!     Arc::new(InMemoryDocumentStore::new()),
//! ))?;
//!
//! let workflow = PromptWorkflow::new(&registry)?;
//! let result = WorkflowProcessor::new()
//!     .process(&workflow, json!({ "subject": "rust" }), ExecutionContext::new())
//!     .await?;
//! assert!(result.succeeded());
//! ```

pub mod module;
pub mod workflow;

pub use module::PromptExampleModule;
pub use workflow::PromptWorkflow;
