//! Gemini model backend.

use std::time::Duration;

use async_trait::async_trait;
use quizlens_protocols::{GenerationRequest, ModelBackend, ProviderError};
use tracing::{debug, warn};

use crate::catalog::{ModelCatalog, order_candidates};
use crate::client::GeminiClient;
use crate::types::*;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Gemini backend.
///
/// Tries the preferred model first, then the models reported by
/// `models.list` (or built-in defaults), moving on only when a model is
/// missing or cannot serve `generateContent`.
pub struct GeminiBackend {
    /// `None` when no API key is configured; every call then fails.
    client: Option<GeminiClient>,
    preferred_model: Option<String>,
    catalog: ModelCatalog,
}

impl GeminiBackend {
    pub fn new(api_key: Option<String>) -> Result<Self, ProviderError> {
        Self::with_options(api_key, None, DEFAULT_TIMEOUT)
    }

    /// Backend against a custom API base URL.
    pub fn with_base_url(api_key: Option<String>, base_url: String) -> Result<Self, ProviderError> {
        Self::with_options(api_key, Some(base_url), DEFAULT_TIMEOUT)
    }

    /// Backend with an optional base URL override and a request timeout.
    pub fn with_options(
        api_key: Option<String>,
        base_url: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let api_key = api_key.filter(|key| !key.trim().is_empty());
        let client = match (api_key, base_url) {
            (Some(key), Some(url)) => Some(GeminiClient::with_base_url(key, url, timeout)?),
            (Some(key), None) => Some(GeminiClient::new(key, timeout)?),
            (None, _) => None,
        };
        Ok(Self {
            client,
            preferred_model: None,
            catalog: ModelCatalog::default(),
        })
    }

    /// Model tried before any discovered or default model.
    pub fn with_model(mut self, model: Option<String>) -> Self {
        self.preferred_model = model
            .map(|m| normalize_model_name(&m))
            .filter(|m| !m.is_empty());
        self
    }

    pub fn with_catalog(mut self, catalog: ModelCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    async fn candidate_models(&self, client: &GeminiClient) -> Vec<String> {
        let discovered = match self.catalog.fresh() {
            Some(models) => Some(models),
            None => match client.list_models().await {
                Ok(models) => {
                    self.catalog.store(models.clone());
                    Some(models)
                }
                Err(e) => {
                    debug!("Gemini model discovery failed, using defaults: {}", e);
                    None
                }
            },
        };
        order_candidates(self.preferred_model.as_deref(), discovered)
    }
}

#[async_trait]
impl ModelBackend for GeminiBackend {
    fn id(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, request: GenerationRequest) -> Result<String, ProviderError> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| ProviderError::MissingApiKey("GEMINI_API_KEY".to_string()))?;

        let body = GenerateContentRequest {
            contents: vec![Content::user(request.prompt)],
            generation_config: Some(GenerationConfig {
                temperature: Some(request.temperature),
                max_output_tokens: Some(request.max_output_tokens),
                response_mime_type: Some("application/json".to_string()),
            }),
        };

        let mut last_error = None;
        for model in self.candidate_models(client).await {
            match client.generate_content(&model, &body).await {
                Ok(response) => return Ok(response.text()),
                Err(e) if e.is_model_not_found() => {
                    warn!("Gemini model {} unavailable, trying next: {}", model, e);
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| ProviderError::NoModel("Gemini request failed.".to_string())))
    }
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;
