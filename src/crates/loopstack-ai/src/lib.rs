//! AI module for loopstack-rs.
//!
//! This crate provides the `aiGenerateText` tool, the `aiMessageDocument`
//! document type, and the LLM clients behind them.
//!
//! # Providers
//!
//! The bundled [`HttpLlmClient`] speaks the OpenAI chat-completions protocol
//! and covers:
//! - **OpenAI** - GPT-4o and friends
//! - **OpenRouter** - Unified API for multiple providers
//! - **Deepseek** - Deepseek chat and reasoner models
//!
//! The provider is selected per call from the `llm:` block of a workflow
//! transition, not at client construction.
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use loopstack_ai::AiModule;
//! use loopstack_core::Registry;
//!
//! let mut registry = Registry::new();
//! registry.install(&AiModule::default())?;
//!
//! // Workflows can now bind "aiGenerateText" and "aiMessageDocument":
//! //
//! //   - name: generate_haiku
//! //     from: start
//! //     to: prompt_executed
//! //     call: aiGenerateText
//! //     with:
//! //       llm:
//! //         provider: openai
//! //         model: gpt-4o
//! //       prompt: "Write a haiku about {subject}"
//! ```
//!
//! Tests substitute their own [`LlmClient`] implementation via
//! [`AiModule::new`] or override the tool entirely with a mock.

pub mod client;
pub mod error;
pub mod generate;
pub mod message;
pub mod module;

// Re-export commonly used types
pub use client::{HttpLlmClient, LlmClient, LlmProvider, LlmSettings};
pub use error::{LlmError, Result};
pub use generate::{AiGenerateText, GenerateTextInput, AI_GENERATE_TEXT};
pub use message::{AiMessage, MessagePart};
pub use module::{AiModule, AI_MESSAGE_DOCUMENT};
