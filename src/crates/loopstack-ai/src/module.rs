//! Module wiring for AI tools and document types.

use crate::client::{HttpLlmClient, LlmClient};
use crate::generate::AiGenerateText;
use loopstack_core::document::DocumentDescriptor;
use loopstack_core::module::{CoreModule, Module, Registry};
use loopstack_core::Result;
use serde_json::json;
use std::fmt;
use std::sync::Arc;

/// Document type for stored LLM completion messages.
pub const AI_MESSAGE_DOCUMENT: &str = "aiMessageDocument";

/// Installs the AI tools and the `aiMessageDocument` type.
///
/// Workflows that bind [`AI_GENERATE_TEXT`](crate::generate::AI_GENERATE_TEXT)
/// pull this module in; the client behind the tool is chosen here.
pub struct AiModule {
    client: Arc<dyn LlmClient>,
}

impl AiModule {
    /// Create the module backed by the given client.
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self { client }
    }
}

impl Default for AiModule {
    /// Module backed by [`HttpLlmClient`] with provider defaults.
    fn default() -> Self {
        Self::new(Arc::new(HttpLlmClient::new()))
    }
}

impl fmt::Debug for AiModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AiModule").finish_non_exhaustive()
    }
}

impl Module for AiModule {
    fn name(&self) -> &str {
        "ai"
    }

    fn imports(&self) -> Vec<Box<dyn Module>> {
        vec![Box::new(CoreModule)]
    }

    fn register(&self, registry: &mut Registry) -> Result<()> {
        registry.register_tool(Arc::new(AiGenerateText::new(Arc::clone(&self.client))));
        registry.register_document(
            DocumentDescriptor::new(AI_MESSAGE_DOCUMENT)
                .with_title("AI Message")
                .with_content_schema(json!({
                    "type": "object",
                    "properties": {
                        "role": { "type": "string" },
                        "parts": {
                            "type": "array",
                            "items": {
                                "type": "object",
                                "properties": {
                                    "type": { "type": "string" },
                                    "text": { "type": "string" },
                                },
                                "required": ["type"],
                            },
                        },
                    },
                    "required": ["role", "parts"],
                })),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::LlmSettings;
    use crate::error::Result as LlmResult;
    use crate::generate::AI_GENERATE_TEXT;
    use crate::message::AiMessage;
    use async_trait::async_trait;

    struct NullClient;

    #[async_trait]
    impl LlmClient for NullClient {
        async fn generate(&self, _settings: &LlmSettings, _prompt: &str) -> LlmResult<AiMessage> {
            Ok(AiMessage::assistant(""))
        }
    }

    #[test]
    fn installs_tool_and_document_type() {
        let mut registry = Registry::new();
        registry.install(&AiModule::new(Arc::new(NullClient))).unwrap();

        assert!(registry.is_installed("core"));
        assert!(registry.is_installed("ai"));
        assert!(registry.tools().has_tool(AI_GENERATE_TEXT));
        assert!(registry.documents().has_document(AI_MESSAGE_DOCUMENT));

        let descriptor = registry.documents().get(AI_MESSAGE_DOCUMENT).unwrap();
        assert_eq!(descriptor.title.as_deref(), Some("AI Message"));
        assert!(descriptor.content_schema.is_some());
    }
}
