//! OpenAI backend implementation.

use std::time::Duration;

use async_trait::async_trait;
use quizlens_protocols::{GenerationRequest, ModelBackend, ProviderError};
use tracing::{debug, warn};

use crate::api::{ApiMessage, ApiRequest, ApiResponse, ResponseFormat};

pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

const PROVIDER: &str = "OpenAI";

/// OpenAI chat completions backend in JSON mode.
pub struct OpenAIBackend {
    api_key: Option<String>,
    api_url: String,
    model: String,
    client: reqwest::Client,
}

impl OpenAIBackend {
    pub fn new(api_key: Option<String>, model: Option<String>) -> Self {
        Self::with_url(api_key, model, DEFAULT_API_URL.to_string())
    }

    /// Backend for an OpenAI-compatible endpoint.
    pub fn with_url(api_key: Option<String>, model: Option<String>, api_url: String) -> Self {
        Self {
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            api_url,
            model: model
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            client: reqwest::Client::new(),
        }
    }

    /// Apply a whole-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        match reqwest::Client::builder().timeout(timeout).build() {
            Ok(client) => self.client = client,
            Err(e) => warn!("Keeping default OpenAI HTTP client: {}", e),
        }
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request(&self, request: GenerationRequest) -> ApiRequest {
        ApiRequest {
            model: self.model.clone(),
            messages: vec![ApiMessage::user(request.prompt)],
            max_tokens: Some(request.max_output_tokens),
            temperature: Some(request.temperature),
            response_format: Some(ResponseFormat::json_object()),
        }
    }
}

#[async_trait]
impl ModelBackend for OpenAIBackend {
    fn id(&self) -> &str {
        "openai"
    }

    async fn generate(&self, request: GenerationRequest) -> Result<String, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ProviderError::MissingApiKey("OPENAI_API_KEY".to_string()))?;

        debug!("OpenAI chat completion: model={}", self.model);
        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(&self.build_request(request))
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let text = response.text().await.unwrap_or_default();
            return Err(ProviderError::api(PROVIDER, status, text));
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;
        Ok(api_response.first_content())
    }
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;
