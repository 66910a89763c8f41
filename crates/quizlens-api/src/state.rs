//! Application state.

use quizlens_config::ProviderSettings;
use quizlens_protocols::ProviderError;

use crate::backend::build_backend;
use crate::pipeline::AnalysisPipeline;

/// State shared across handlers.
pub struct AppState {
    pub pipeline: AnalysisPipeline,
}

impl AppState {
    pub fn new(pipeline: AnalysisPipeline) -> Self {
        Self { pipeline }
    }

    /// Build the pipeline for the configured provider.
    pub fn from_settings(settings: &ProviderSettings) -> Result<Self, ProviderError> {
        let backend = build_backend(settings)?;
        Ok(Self::new(
            AnalysisPipeline::new(backend).with_temperature(settings.temperature),
        ))
    }
}
