//! Model backend trait used by the proxy.

use async_trait::async_trait;

use crate::error::ProviderError;

/// Default sampling temperature for quiz prompts.
pub const DEFAULT_TEMPERATURE: f32 = 0.2;

/// A single prompt sent to a model.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub max_output_tokens: u32,
    pub temperature: f32,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>, max_output_tokens: u32) -> Self {
        Self {
            prompt: prompt.into(),
            max_output_tokens,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

/// An LLM provider that answers a prompt with raw text, expected to be JSON.
#[async_trait]
pub trait ModelBackend: Send + Sync {
    /// Returns the provider ID.
    fn id(&self) -> &str;

    /// Generate text for the prompt.
    async fn generate(&self, request: GenerationRequest) -> Result<String, ProviderError>;
}
