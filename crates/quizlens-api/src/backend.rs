//! Provider selection.

use std::sync::Arc;
use std::time::Duration;

use quizlens_config::{ProviderKind, ProviderSettings};
use quizlens_protocols::{ModelBackend, ProviderError};
use quizlens_provider_gemini::GeminiBackend;
use quizlens_provider_openai::{DEFAULT_API_URL, OpenAIBackend};
use tracing::info;

/// Build the backend for the effective provider.
///
/// OpenAI is used only when it is selected and has a key; everything else
/// goes to Gemini, which reports a missing key on the first request.
pub fn build_backend(settings: &ProviderSettings) -> Result<Arc<dyn ModelBackend>, ProviderError> {
    let timeout = Duration::from_secs(settings.request_timeout_secs);

    match settings.effective_kind() {
        ProviderKind::OpenAi => {
            let api_url = settings
                .openai_api_url
                .clone()
                .unwrap_or_else(|| DEFAULT_API_URL.to_string());
            let backend = OpenAIBackend::with_url(
                settings.openai_api_key.clone(),
                Some(settings.openai_model.clone()),
                api_url,
            )
            .with_timeout(timeout);
            info!("Using OpenAI backend (model {})", backend.model());
            Ok(Arc::new(backend))
        }
        ProviderKind::Gemini => {
            let backend = GeminiBackend::with_options(
                settings.gemini_api_key.clone(),
                settings.gemini_base_url.clone(),
                timeout,
            )?
            .with_model(settings.gemini_model.clone());
            info!("Using Gemini backend");
            Ok(Arc::new(backend))
        }
    }
}

#[cfg(test)]
#[path = "backend_tests.rs"]
mod tests;
