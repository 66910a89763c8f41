//! Gemini API client.

use std::time::Duration;

use quizlens_protocols::ProviderError;
use reqwest::Client;
use tracing::debug;

use crate::types::*;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

const PROVIDER: &str = "Gemini";

/// Gemini API client.
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    /// Create a new Gemini client.
    pub fn new(api_key: String, timeout: Duration) -> Result<Self, ProviderError> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string(), timeout)
    }

    /// Create a client against a custom endpoint.
    pub fn with_base_url(
        api_key: String,
        base_url: String,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Network(e.to_string()))?;
        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Generate content (non-streaming).
    pub async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ProviderError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, model);
        debug!("Gemini generate_content: model={}", model);

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(request)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let body = Self::read_body(response).await?;
        serde_json::from_str(&body)
            .map_err(|e| ProviderError::InvalidResponse(format!("Failed to parse response: {}", e)))
    }

    /// Names of models that support `generateContent`, without the
    /// `models/` prefix.
    pub async fn list_models(&self) -> Result<Vec<String>, ProviderError> {
        let url = format!("{}/models", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let body = Self::read_body(response).await?;
        let list: ListModelsResponse = serde_json::from_str(&body)
            .map_err(|e| ProviderError::InvalidResponse(format!("Failed to parse model list: {}", e)))?;

        Ok(list
            .models
            .iter()
            .filter(|model| model.supports_generate_content())
            .map(|model| normalize_model_name(&model.name))
            .filter(|name| !name.is_empty())
            .collect())
    }

    async fn read_body(response: reqwest::Response) -> Result<String, ProviderError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        if status.is_success() {
            return Ok(body);
        }

        // Keep the API status code word in the message; fallback decisions
        // look for NOT_FOUND.
        let message = match serde_json::from_str::<GeminiError>(&body) {
            Ok(e) if !e.error.status.is_empty() => {
                format!("{} ({})", e.error.message, e.error.status)
            }
            Ok(e) => e.error.message,
            Err(_) => body,
        };
        Err(ProviderError::api(PROVIDER, status.as_u16(), message))
    }
}
