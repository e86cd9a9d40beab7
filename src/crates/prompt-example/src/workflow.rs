//! The haiku prompt workflow.

use loopstack_ai::{AI_GENERATE_TEXT, AI_MESSAGE_DOCUMENT};
use loopstack_core::schema::{Field, Schema};
use loopstack_core::workflow::{Workflow, WorkflowDefinition};
use loopstack_core::{Registry, Result};
use loopstack_documents::CREATE_DOCUMENT;
use serde_json::json;

/// Generates a haiku about a subject and stores the response as a document.
///
/// Arguments: `subject` (string, defaults to "coffee"). The generation step
/// assigns the completion message to `llmResponse` in run state; the storage
/// step forwards it unchanged as document content.
#[derive(Debug)]
pub struct PromptWorkflow {
    definition: WorkflowDefinition,
}

impl PromptWorkflow {
    /// Build the workflow against an installed registry.
    ///
    /// Fails if the registry is missing the `aiGenerateText` or
    /// `createDocument` tools or the `aiMessageDocument` document type.
    pub fn new(registry: &Registry) -> Result<Self> {
        let definition = WorkflowDefinition::builder("prompt")
            .arguments(
                Schema::new().field("subject", Field::string().with_default(json!("coffee"))),
            )
            .state(Schema::new().field("llmResponse", Field::any()))
            .config_yaml(include_str!("prompt.workflow.yaml"))
            .bind_tool(AI_GENERATE_TEXT)
            .bind_tool(CREATE_DOCUMENT)
            .bind_document(AI_MESSAGE_DOCUMENT)
            .build(registry)?;

        Ok(Self { definition })
    }
}

impl Workflow for PromptWorkflow {
    fn definition(&self) -> &WorkflowDefinition {
        &self.definition
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loopstack_core::FlowError;

    #[test]
    fn construction_requires_installed_tools() {
        let registry = Registry::new();
        let err = PromptWorkflow::new(&registry).unwrap_err();
        assert!(matches!(err, FlowError::UnknownTool(_)));
    }
}
