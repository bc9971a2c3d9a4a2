//! Text-Generation Providers
//!
//! Defines the core TextProvider trait and error type, plus sub-modules for
//! routing, cost estimation, background health monitoring, and the concrete
//! adapters (OpenAI-compatible remote, Ollama local fallback).

pub mod estimate;
pub mod monitor;
pub mod ollama;
pub mod openai;
pub mod router;
pub mod traits;
pub mod types;

// Re-exports for convenience.
pub use self::router::ProviderRouter;
pub use self::traits::TextProvider;

// ---------------------------------------------------------------------------
// ProviderError
// ---------------------------------------------------------------------------

/// Errors that can occur while speaking a provider's protocol.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),

    #[error("Empty completion from {provider}")]
    EmptyCompletion { provider: String },

    #[error("{0}")]
    Other(String),
}

impl ProviderError {
    /// Extract the upstream HTTP status code, if this error maps to one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_display() {
        let err = ProviderError::Api {
            status: 503,
            message: "overloaded".into(),
        };
        assert_eq!(err.to_string(), "API error (503): overloaded");
    }

    #[test]
    fn test_provider_error_empty_completion() {
        let err = ProviderError::EmptyCompletion {
            provider: "openai".into(),
        };
        assert_eq!(err.to_string(), "Empty completion from openai");
    }

    #[test]
    fn test_provider_error_status_codes() {
        assert_eq!(
            ProviderError::Api {
                status: 429,
                message: "slow down".into()
            }
            .status_code(),
            Some(429)
        );
        assert_eq!(
            ProviderError::ResponseParsing("bad json".into()).status_code(),
            None
        );
        assert_eq!(ProviderError::Other("boom".into()).status_code(), None);
    }
}
