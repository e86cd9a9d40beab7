//! Error types for LLM provider integrations.

use thiserror::Error;

/// Result type for LLM operations.
pub type Result<T> = std::result::Result<T, LlmError>;

/// Errors that can occur when talking to an LLM provider.
#[derive(Debug, Error)]
pub enum LlmError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// API key not found in environment.
    #[error("API key not found: {0}")]
    ApiKeyNotFound(String),

    /// The provider rejected the request or reported a failure.
    #[error("Provider error from {provider}: {message}")]
    Provider { provider: String, message: String },

    /// Response body did not match the expected completion shape.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The provider returned a completion with no choices.
    #[error("Provider returned an empty completion")]
    EmptyResponse,

    /// Failed to serialize/deserialize data.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl LlmError {
    /// Check if this error is due to authentication.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, LlmError::ApiKeyNotFound(_))
    }
}

impl From<serde_json::Error> for LlmError {
    fn from(err: serde_json::Error) -> Self {
        LlmError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_is_an_auth_error() {
        let err = LlmError::ApiKeyNotFound("OPENAI_API_KEY".to_string());
        assert!(err.is_auth_error());
        assert_eq!(err.to_string(), "API key not found: OPENAI_API_KEY");

        let err = LlmError::EmptyResponse;
        assert!(!err.is_auth_error());
    }

    #[test]
    fn provider_error_names_the_provider() {
        let err = LlmError::Provider {
            provider: "openai".to_string(),
            message: "429 Too Many Requests".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Provider error from openai: 429 Too Many Requests"
        );
    }
}
