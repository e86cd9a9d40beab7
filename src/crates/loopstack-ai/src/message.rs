//! Message types exchanged with LLM providers.
//!
//! An [`AiMessage`] is a role plus a list of typed parts. The part list keeps
//! the shape open for future part kinds (tool calls, images) while the wire
//! format stays stable: each part carries a `type` tag.

use serde::{Deserialize, Serialize};

/// One typed segment of a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessagePart {
    /// Plain text content.
    Text { text: String },
}

/// A message produced by or sent to an LLM.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiMessage {
    /// Speaker role, e.g. "assistant" or "user".
    pub role: String,
    /// Ordered message parts.
    pub parts: Vec<MessagePart>,
}

impl AiMessage {
    /// Create an assistant message with a single text part.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            parts: vec![MessagePart::Text { text: text.into() }],
        }
    }

    /// Create a user message with a single text part.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            parts: vec![MessagePart::Text { text: text.into() }],
        }
    }

    /// The first text part, if any.
    pub fn text(&self) -> Option<&str> {
        self.parts.iter().find_map(|part| match part {
            MessagePart::Text { text } => Some(text.as_str()),
        })
    }
}
