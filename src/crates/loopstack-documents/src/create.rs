//! The `createDocument` tool.

use crate::store::{Document, DocumentStore};
use async_trait::async_trait;
use loopstack_core::tool::{ToolContext, ToolError, ToolHandler, ToolResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::sync::Arc;

/// Binding name of the document-creation tool.
pub const CREATE_DOCUMENT: &str = "createDocument";

/// Content update carried by a create request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentUpdate {
    /// The document content to store.
    pub content: Value,
}

/// Input accepted by [`CreateDocument`]. Unknown keys are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateDocumentInput {
    /// The update to apply.
    pub update: DocumentUpdate,
}

/// Tool that persists a document and returns its id.
///
/// The document type comes from the transition's `document:` binding; calls
/// without a binding store a plain "document".
pub struct CreateDocument {
    store: Arc<dyn DocumentStore>,
}

impl CreateDocument {
    /// Create the tool backed by the given store.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

impl fmt::Debug for CreateDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateDocument").finish_non_exhaustive()
    }
}

#[async_trait]
impl ToolHandler for CreateDocument {
    fn name(&self) -> &str {
        CREATE_DOCUMENT
    }

    fn description(&self) -> &str {
        "Persist a document and return its id"
    }

    fn input_schema(&self) -> Option<Value> {
        Some(json!({
            "type": "object",
            "properties": {
                "update": {
                    "type": "object",
                    "properties": {
                        "content": {},
                    },
                    "required": ["content"],
                },
            },
            "required": ["update"],
        }))
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> ToolResult {
        let input: CreateDocumentInput = serde_json::from_value(input)
            .map_err(|e| ToolError::invalid_arguments(CREATE_DOCUMENT, e.to_string()))?;

        let doc_type = ctx
            .document
            .clone()
            .unwrap_or_else(|| "document".to_string());

        let document = Document::new(doc_type, input.update.content);
        let id = self
            .store
            .insert(document)
            .await
            .map_err(|e| ToolError::execution_failed(CREATE_DOCUMENT, e.to_string()))?;

        tracing::debug!(document_id = %id, "document stored");

        Ok(json!({ "id": id }))
    }
}
