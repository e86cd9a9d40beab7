//! Workflow run execution
//!
//! The [`WorkflowProcessor`] drives one run of a [`Workflow`]: it validates
//! the raw arguments, then walks the place/transition chain from the
//! configured start place, firing each transition's tool with its rendered
//! input until the run reaches a place with no outgoing transition.
//!
//! # Run lifecycle
//!
//! 1. Arguments are validated against the workflow's argument schema.
//!    Failure returns `Err` before any transition fires; no history exists.
//! 2. For each transition leaving the current place, the `with:` block is
//!    rendered against the validated arguments and current run state, the
//!    tool input is validated, and the tool is invoked.
//! 3. On success the tool result's `data` is written to the transition's
//!    `assign` field (when one is declared), a history entry is recorded
//!    for the place entered, and the run advances.
//! 4. On tool failure the run halts where it stands: the result carries
//!    `runtime.error = true` with the failure message, the place entered by
//!    the failing transition never appears in history, and no further
//!    transitions fire. This is an `Ok` return; tool failures are part of
//!    the recorded outcome, not an error of the processor itself.
//!
//! Every run owns its state and history exclusively. The processor is
//! stateless and cheap to clone; concurrent runs share nothing mutable, and
//! tool calls within one run are awaited sequentially in configured order.
//! There is no retry, no backoff, and no cancellation surface.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::caretaker::{Caretaker, Memento};
use crate::error::{FlowError, Result};
use crate::template::{render_value, TemplateScope};
use crate::tool::ToolContext;
use crate::workflow::Workflow;

/// Default ceiling on transitions fired per run
pub const DEFAULT_MAX_STEPS: u32 = 64;

/// Outcome flags for one run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuntimeFlags {
    /// True when a tool failed and the run halted early
    pub error: bool,

    /// Failure message from the halting tool
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// Final state of one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunState {
    /// Run-state values accumulated by `assign` transitions
    pub values: Value,

    /// History of fired transitions
    pub caretaker: Caretaker,
}

impl RunState {
    /// Look up a run-state field
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }
}

/// Result of one workflow run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    /// Run identity
    pub run_id: Uuid,

    /// Name of the executed workflow
    pub workflow: String,

    /// Place the run ended in
    pub place: String,

    /// Outcome flags
    pub runtime: RuntimeFlags,

    /// Final run state and history
    pub state: RunState,
}

impl RunResult {
    /// True when the run reached a terminal place without a tool failure
    pub fn succeeded(&self) -> bool {
        !self.runtime.error
    }

    /// History entries, in execution order
    pub fn history(&self) -> &[Memento] {
        self.state.caretaker.history()
    }
}

/// Caller-supplied context for one run
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    /// Run identity; generated when the caller does not supply one
    pub run_id: Uuid,

    /// Metadata forwarded to every tool invocation in the run
    pub metadata: HashMap<String, Value>,
}

impl ExecutionContext {
    /// Create a context with a fresh run id
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            metadata: HashMap::new(),
        }
    }

    /// Set the run id
    pub fn with_run_id(mut self, run_id: Uuid) -> Self {
        self.run_id = run_id;
        self
    }

    /// Add a metadata value
    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Stateless executor of workflow runs
#[derive(Debug, Clone)]
pub struct WorkflowProcessor {
    max_steps: u32,
}

impl WorkflowProcessor {
    /// Create a processor with the default step ceiling
    pub fn new() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
        }
    }

    /// Set the ceiling on transitions fired per run
    ///
    /// Configurations are validated against loops when definitions are
    /// built; the ceiling is the backstop for workflows constructed outside
    /// the builder.
    pub fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Execute one run of a workflow
    ///
    /// # Errors
    ///
    /// Returns `Err` only for failures that precede or escape the run
    /// itself: argument validation, template rendering, unresolvable tool
    /// bindings, and the step ceiling. A tool failing during the run
    /// returns `Ok` with [`RuntimeFlags::error`] set.
    #[tracing::instrument(
        skip(self, workflow, raw_arguments, ctx),
        fields(workflow = %workflow.name(), run_id = %ctx.run_id)
    )]
    pub async fn process(
        &self,
        workflow: &dyn Workflow,
        raw_arguments: Value,
        ctx: ExecutionContext,
    ) -> Result<RunResult> {
        tracing::info!("Starting workflow run");

        let arguments = workflow.validate(&raw_arguments).map_err(|e| {
            tracing::error!(error = %e, "Argument validation failed");
            e
        })?;

        let config = workflow.config();
        let mut state_values = Value::Object(Map::new());
        let mut caretaker = Caretaker::new();
        let mut place = config.start.clone();
        let mut steps = 0u32;

        while let Some(transition) = config.transition_from(&place) {
            if steps >= self.max_steps {
                return Err(FlowError::Execution(format!(
                    "Run exceeded {} transitions at place '{}'",
                    self.max_steps, place
                )));
            }
            steps += 1;

            tracing::debug!(
                transition = %transition.name,
                tool = %transition.call,
                "Firing transition"
            );

            let scope = TemplateScope::new(&arguments, &state_values);
            let input = render_value(&transition.with, &scope)?;

            let tool = workflow
                .resolve_tool(&transition.call)
                .ok_or_else(|| FlowError::UnknownTool(transition.call.clone()))?;

            let mut tool_ctx = ToolContext::new(ctx.run_id, workflow.name())
                .with_place(transition.to.as_str())
                .with_transition(transition.name.as_str())
                .with_state(state_values.clone());
            if let Some(document) = &transition.document {
                tool_ctx = tool_ctx.with_document(document.as_str());
            }
            for (key, value) in &ctx.metadata {
                tool_ctx = tool_ctx.with_metadata(key.as_str(), value.clone());
            }

            let outcome = match tool.validate_input(&input) {
                Ok(()) => tool.execute(input, &tool_ctx).await,
                Err(e) => Err(e),
            };

            match outcome {
                Ok(result) => {
                    if let Some(field) = &transition.assign {
                        let assigned = extract_data(&result);
                        if let Value::Object(map) = &mut state_values {
                            map.insert(field.clone(), assigned);
                        }
                    }
                    place = transition.to.clone();
                    caretaker.record(
                        place.as_str(),
                        transition.name.as_str(),
                        state_values.clone(),
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        transition = %transition.name,
                        tool = %transition.call,
                        error = %e,
                        "Tool failed, halting run"
                    );
                    return Ok(RunResult {
                        run_id: ctx.run_id,
                        workflow: workflow.name().to_string(),
                        place,
                        runtime: RuntimeFlags {
                            error: true,
                            error_message: Some(e.to_string()),
                        },
                        state: RunState {
                            values: state_values,
                            caretaker,
                        },
                    });
                }
            }
        }

        tracing::info!(place = %place, steps, "Workflow run completed");
        Ok(RunResult {
            run_id: ctx.run_id,
            workflow: workflow.name().to_string(),
            place,
            runtime: RuntimeFlags::default(),
            state: RunState {
                values: state_values,
                caretaker,
            },
        })
    }
}

impl Default for WorkflowProcessor {
    fn default() -> Self {
        Self::new()
    }
}

/// Value assigned to run state from a tool result
///
/// Tools wrap their payload as `{ "data": ... }`; the wrapper is unwrapped
/// so state holds the payload itself. Results without the wrapper are
/// assigned whole.
fn extract_data(result: &Value) -> Value {
    match result.get("data") {
        Some(data) => data.clone(),
        None => result.clone(),
    }
}
