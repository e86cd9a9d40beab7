//! Test support for workflow applications
//!
//! Downstream crates test workflows by installing their real modules and
//! swapping individual tools for mocks. [`MockTool`] records every
//! invocation and replays queued responses; [`WorkflowTest`] builds a
//! registry from modules plus overrides and hands out a processor.
//!
//! ```rust,ignore
//! let generate = Arc::new(
//!     MockTool::new("aiGenerateText").with_response(json!({ "data": message })),
//! );
//!
//! let harness = WorkflowTest::builder()
//!     .with_module(PromptExampleModule::new(...))
//!     .with_tool_override(Arc::clone(&generate) as Arc<dyn ToolHandler>)
//!     .build()?;
//!
//! let workflow = PromptWorkflow::new(harness.registry())?;
//! let result = harness.run(&workflow, json!({"subject": "spring"})).await?;
//! assert_eq!(generate.call_count(), 1);
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::Result;
use crate::module::{Module, Registry};
use crate::processor::{ExecutionContext, RunResult, WorkflowProcessor};
use crate::tool::{ToolContext, ToolError, ToolHandler, ToolResult};
use crate::workflow::Workflow;

/// Lock that survives a panicking test elsewhere in the process
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Recording stand-in for a registered tool
///
/// Queued responses are replayed in order, one per invocation; when the
/// queue is empty the fallback value (an empty object unless configured) is
/// returned. Every invocation's input and [`ToolContext`] are recorded.
pub struct MockTool {
    name: String,
    responses: Mutex<VecDeque<ToolResult>>,
    fallback: Value,
    calls: Mutex<Vec<Value>>,
    contexts: Mutex<Vec<ToolContext>>,
}

impl MockTool {
    /// Create a mock answering with an empty object
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            responses: Mutex::new(VecDeque::new()),
            fallback: Value::Object(Map::new()),
            calls: Mutex::new(Vec::new()),
            contexts: Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful response
    pub fn with_response(self, response: Value) -> Self {
        lock(&self.responses).push_back(Ok(response));
        self
    }

    /// Queue a failure
    pub fn with_failure(self, message: impl Into<String>) -> Self {
        let error = ToolError::execution_failed(self.name.clone(), message);
        lock(&self.responses).push_back(Err(error));
        self
    }

    /// Set the value returned once the queue is empty
    pub fn with_fallback(mut self, fallback: Value) -> Self {
        self.fallback = fallback;
        self
    }

    /// Number of recorded invocations
    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    /// Recorded inputs, in invocation order
    pub fn calls(&self) -> Vec<Value> {
        lock(&self.calls).clone()
    }

    /// Input of the most recent invocation
    pub fn last_call(&self) -> Option<Value> {
        lock(&self.calls).last().cloned()
    }

    /// Recorded invocation contexts, in invocation order
    pub fn contexts(&self) -> Vec<ToolContext> {
        lock(&self.contexts).clone()
    }
}

#[async_trait]
impl ToolHandler for MockTool {
    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> ToolResult {
        lock(&self.calls).push(input);
        lock(&self.contexts).push(ctx.clone());
        match lock(&self.responses).pop_front() {
            Some(result) => result,
            None => Ok(self.fallback.clone()),
        }
    }
}

impl std::fmt::Debug for MockTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockTool")
            .field("name", &self.name)
            .field("queued", &lock(&self.responses).len())
            .field("calls", &self.call_count())
            .finish()
    }
}

/// Harness wiring modules and overrides into a runnable registry
#[derive(Debug)]
pub struct WorkflowTest {
    registry: Registry,
    processor: WorkflowProcessor,
}

impl WorkflowTest {
    /// Start building a harness
    pub fn builder() -> WorkflowTestBuilder {
        WorkflowTestBuilder::new()
    }

    /// The registry with modules installed and overrides applied
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// The processor runs execute on
    pub fn processor(&self) -> &WorkflowProcessor {
        &self.processor
    }

    /// Execute one run with a fresh execution context
    pub async fn run(&self, workflow: &dyn Workflow, arguments: Value) -> Result<RunResult> {
        self.processor
            .process(workflow, arguments, ExecutionContext::new())
            .await
    }
}

/// Builder for [`WorkflowTest`]
#[derive(Default)]
pub struct WorkflowTestBuilder {
    modules: Vec<Box<dyn Module>>,
    overrides: Vec<Arc<dyn ToolHandler>>,
}

impl WorkflowTestBuilder {
    fn new() -> Self {
        Self::default()
    }

    /// Install a module (and its imports) into the harness registry
    pub fn with_module(mut self, module: impl Module + 'static) -> Self {
        self.modules.push(Box::new(module));
        self
    }

    /// Replace a registered tool after all modules install
    ///
    /// Pass an `Arc` and keep a clone to assert on recorded calls.
    pub fn with_tool_override(mut self, tool: Arc<dyn ToolHandler>) -> Self {
        self.overrides.push(tool);
        self
    }

    /// Install modules, apply overrides, and produce the harness
    ///
    /// # Errors
    ///
    /// Fails when a module's registration fails or an override names a tool
    /// no module registered.
    pub fn build(self) -> Result<WorkflowTest> {
        let mut registry = Registry::new();
        for module in &self.modules {
            registry.install(module.as_ref())?;
        }
        for tool in self.overrides {
            registry.override_tool(tool)?;
        }
        Ok(WorkflowTest {
            registry,
            processor: WorkflowProcessor::new(),
        })
    }
}
