//! Model provider errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Missing {0}.")]
    MissingApiKey(String),

    #[error("{provider} error {status}: {message}")]
    ApiError {
        provider: String,
        status: u16,
        message: String,
    },

    #[error("No usable model: {0}")]
    NoModel(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    /// Build an API error for the named provider.
    pub fn api(provider: impl Into<String>, status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            provider: provider.into(),
            status,
            message: message.into(),
        }
    }

    /// Whether the error means the requested model does not exist or cannot
    /// serve `generateContent`, so the next candidate model may be tried.
    pub fn is_model_not_found(&self) -> bool {
        match self {
            Self::ApiError { status, message, .. } => {
                let lower = message.to_lowercase();
                *status == 404
                    || message.contains("NOT_FOUND")
                    || lower.contains("not found")
                    || lower.contains("not supported")
            }
            _ => false,
        }
    }
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;
