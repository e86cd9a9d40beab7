//! The `aiGenerateText` tool.

use crate::client::{LlmClient, LlmSettings};
use async_trait::async_trait;
use loopstack_core::tool::{ToolContext, ToolError, ToolHandler, ToolResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::sync::Arc;

/// Binding name of the text-generation tool.
pub const AI_GENERATE_TEXT: &str = "aiGenerateText";

/// Input accepted by [`AiGenerateText`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateTextInput {
    /// Provider and model selection.
    pub llm: LlmSettings,
    /// The rendered prompt to complete.
    pub prompt: String,
}

/// Tool that sends a prompt to an LLM and returns the completion message.
///
/// The result wraps the message in a `data` envelope, so transitions that
/// assign it put the bare message into run state:
///
/// ```json
/// { "data": { "role": "assistant", "parts": [{ "type": "text", "text": "..." }] } }
/// ```
pub struct AiGenerateText {
    client: Arc<dyn LlmClient>,
}

impl AiGenerateText {
    /// Create the tool backed by the given client.
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self { client }
    }
}

impl fmt::Debug for AiGenerateText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AiGenerateText").finish_non_exhaustive()
    }
}

#[async_trait]
impl ToolHandler for AiGenerateText {
    fn name(&self) -> &str {
        AI_GENERATE_TEXT
    }

    fn description(&self) -> &str {
        "Generate text from a prompt using the configured LLM provider"
    }

    fn input_schema(&self) -> Option<Value> {
        Some(json!({
            "type": "object",
            "properties": {
                "llm": {
                    "type": "object",
                    "properties": {
                        "provider": { "type": "string", "enum": ["openai", "openrouter", "deepseek"] },
                        "model": { "type": "string" },
                    },
                    "required": ["provider", "model"],
                },
                "prompt": { "type": "string" },
            },
            "required": ["llm", "prompt"],
        }))
    }

    async fn execute(&self, input: Value, _ctx: &ToolContext) -> ToolResult {
        let input: GenerateTextInput = serde_json::from_value(input)
            .map_err(|e| ToolError::invalid_arguments(AI_GENERATE_TEXT, e.to_string()))?;

        let message = self
            .client
            .generate(&input.llm, &input.prompt)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "text generation failed");
                ToolError::execution_failed(AI_GENERATE_TEXT, e.to_string())
            })?;

        let message = serde_json::to_value(&message)
            .map_err(|e| ToolError::execution_failed(AI_GENERATE_TEXT, e.to_string()))?;

        Ok(json!({ "data": message }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::LlmProvider;
    use crate::error::{LlmError, Result as LlmResult};
    use crate::message::AiMessage;
    use loopstack_core::tool::ToolContext;
    use uuid::Uuid;

    struct FixedClient {
        reply: String,
    }

    #[async_trait]
    impl LlmClient for FixedClient {
        async fn generate(&self, _settings: &LlmSettings, _prompt: &str) -> LlmResult<AiMessage> {
            Ok(AiMessage::assistant(self.reply.clone()))
        }
    }

    struct FailingClient;

    #[async_trait]
    impl LlmClient for FailingClient {
        async fn generate(&self, settings: &LlmSettings, _prompt: &str) -> LlmResult<AiMessage> {
            Err(LlmError::Provider {
                provider: settings.provider.to_string(),
                message: "boom".to_string(),
            })
        }
    }

    fn ctx() -> ToolContext {
        ToolContext::new(Uuid::new_v4(), "test")
    }

    #[tokio::test]
    async fn wraps_the_completion_in_a_data_envelope() {
        let tool = AiGenerateText::new(Arc::new(FixedClient {
            reply: "Steam curls from the cup".to_string(),
        }));

        let result = tool
            .execute(
                json!({
                    "llm": { "provider": "openai", "model": "gpt-4o" },
                    "prompt": "Write a haiku about coffee",
                }),
                &ctx(),
            )
            .await
            .unwrap();

        assert_eq!(
            result,
            json!({
                "data": {
                    "role": "assistant",
                    "parts": [{ "type": "text", "text": "Steam curls from the cup" }],
                }
            })
        );
    }

    #[tokio::test]
    async fn malformed_input_is_an_argument_error() {
        let tool = AiGenerateText::new(Arc::new(FixedClient {
            reply: String::new(),
        }));

        let err = tool
            .execute(json!({ "prompt": "no llm settings" }), &ctx())
            .await
            .unwrap_err();

        assert!(matches!(err, ToolError::InvalidArguments { .. }));
    }

    #[tokio::test]
    async fn client_failures_become_execution_errors() {
        let tool = AiGenerateText::new(Arc::new(FailingClient));

        let err = tool
            .execute(
                json!({
                    "llm": { "provider": "deepseek", "model": "deepseek-chat" },
                    "prompt": "hello",
                }),
                &ctx(),
            )
            .await
            .unwrap_err();

        match err {
            ToolError::ExecutionFailed { tool, error } => {
                assert_eq!(tool, AI_GENERATE_TEXT);
                assert!(error.contains("deepseek"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn input_parses_provider_settings() {
        let input: GenerateTextInput = serde_json::from_value(json!({
            "llm": { "provider": "openrouter", "model": "gpt-4o-mini" },
            "prompt": "hi",
        }))
        .unwrap();
        assert_eq!(input.llm.provider, LlmProvider::OpenRouter);
        assert_eq!(input.prompt, "hi");
    }
}
