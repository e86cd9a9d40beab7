//! LLM client trait and the HTTP implementation.
//!
//! Providers share the OpenAI-compatible `/chat/completions` wire format, so
//! one HTTP client covers all of them. Which provider a request goes to is
//! not fixed at construction; it arrives per call in [`LlmSettings`], the
//! shape workflow configs use under the `llm:` key.
//!
//! # Example
//!
//! ```rust,ignore
//! use loopstack_ai::{HttpLlmClient, LlmClient, LlmProvider, LlmSettings};
//!
//! let client = HttpLlmClient::new();
//! let settings = LlmSettings::new(LlmProvider::OpenAi, "gpt-4o");
//! let message = client.generate(&settings, "Write a haiku about rust").await?;
//! ```

use crate::error::{LlmError, Result};
use crate::message::AiMessage;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Supported LLM providers.
///
/// All of these speak the OpenAI chat-completions protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    OpenAi,
    OpenRouter,
    Deepseek,
}

impl LlmProvider {
    /// Default API base URL for this provider.
    pub fn base_url(&self) -> &'static str {
        match self {
            LlmProvider::OpenAi => "https://api.openai.com/v1",
            LlmProvider::OpenRouter => "https://openrouter.ai/api/v1",
            LlmProvider::Deepseek => "https://api.deepseek.com",
        }
    }

    /// Environment variable holding this provider's API key.
    pub fn api_key_env(&self) -> &'static str {
        match self {
            LlmProvider::OpenAi => "OPENAI_API_KEY",
            LlmProvider::OpenRouter => "OPENROUTER_API_KEY",
            LlmProvider::Deepseek => "DEEPSEEK_API_KEY",
        }
    }
}

impl fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LlmProvider::OpenAi => "openai",
            LlmProvider::OpenRouter => "openrouter",
            LlmProvider::Deepseek => "deepseek",
        };
        f.write_str(name)
    }
}

/// Per-call provider selection, as it appears in workflow configs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmSettings {
    /// Which provider to send the request to.
    pub provider: LlmProvider,
    /// Model name/identifier, e.g. "gpt-4o".
    pub model: String,
}

impl LlmSettings {
    /// Create settings for the given provider and model.
    pub fn new(provider: LlmProvider, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }
}

/// A client that can turn a prompt into a completion message.
///
/// Implemented by [`HttpLlmClient`] for real providers; tests substitute
/// their own implementations.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Generate a completion for `prompt` using the given settings.
    async fn generate(&self, settings: &LlmSettings, prompt: &str) -> Result<AiMessage>;
}

/// HTTP client for OpenAI-compatible chat-completion APIs.
///
/// Resolves the base URL from the provider and the API key from the
/// provider's environment variable, unless overridden.
#[derive(Clone)]
pub struct HttpLlmClient {
    client: Client,
    base_url: Option<String>,
    api_key: Option<String>,
}

impl HttpLlmClient {
    /// Create a new client with the default request timeout.
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: None,
            api_key: None,
        }
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");
        self
    }

    /// Override the provider's base URL. Useful for proxies and test servers.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Use a fixed API key instead of reading the provider's environment variable.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    fn resolve_base_url(&self, provider: LlmProvider) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| provider.base_url().to_string())
    }

    fn resolve_api_key(&self, provider: LlmProvider) -> Result<String> {
        if let Some(key) = &self.api_key {
            return Ok(key.clone());
        }
        std::env::var(provider.api_key_env()).map_err(|_| {
            LlmError::ApiKeyNotFound(format!("Environment variable: {}", provider.api_key_env()))
        })
    }
}

impl Default for HttpLlmClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LlmClient for HttpLlmClient {
    async fn generate(&self, settings: &LlmSettings, prompt: &str) -> Result<AiMessage> {
        let base_url = self.resolve_base_url(settings.provider);
        let api_key = self.resolve_api_key(settings.provider)?;
        let url = format!("{}/chat/completions", base_url);

        let req_body = ChatCompletionRequest {
            model: settings.model.clone(),
            messages: vec![ChatCompletionMessage {
                role: "user".to_string(),
                content: Some(prompt.to_string()),
            }],
            stream: false,
        };

        tracing::debug!(
            provider = %settings.provider,
            model = %settings.model,
            "sending chat completion request"
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&req_body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(LlmError::Provider {
                provider: settings.provider.to_string(),
                message: format!("{}: {}", status, error_text),
            });
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or(LlmError::EmptyResponse)?;
        let content = choice.message.content.unwrap_or_default();

        Ok(AiMessage::assistant(content))
    }
}

// Chat-completions API types
#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatCompletionMessage>,
    stream: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatCompletionMessage {
    role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatCompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionChoice {
    message: ChatCompletionMessage,
}
