//! Analysis transport errors.

use thiserror::Error;

/// Errors surfaced by an [`Analyzer`](crate::Analyzer).
///
/// Malformed model output is never an error: it is absorbed by
/// normalization. Only configuration and transport failures reach callers.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("AI proxy URL is not configured. Set client.proxy_url or AI_PROXY_URL.")]
    NotConfigured,

    #[error("Proxy error {status}: {body}")]
    Transport { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl AnalysisError {
    /// Configuration errors stay broken until the client is reconfigured.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::NotConfigured)
    }
}
