//! Configuration validation.

use crate::error::ConfigError;
use crate::schema::Config;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Turn the first error into a [`ConfigError`].
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        match self.errors.into_iter().next() {
            Some(error) => Err(ConfigError::InvalidValue {
                field: error.path,
                message: error.message,
            }),
            None => Ok(self.warnings),
        }
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> Result<ValidationResult, ConfigError> {
        let mut result = ValidationResult::default();

        Self::validate_server(config, &mut result);
        Self::validate_provider(config, &mut result);
        Self::validate_client(config, &mut result);
        Self::validate_storage(config, &mut result);

        Ok(result)
    }

    fn validate_server(config: &Config, result: &mut ValidationResult) {
        if config.server.port == 0 {
            result.add_error(ValidationError::new("server.port", "Port cannot be 0"));
        }

        if config.server.host.trim().is_empty() {
            result.add_error(ValidationError::new("server.host", "Host cannot be empty"));
        }
    }

    fn validate_provider(config: &Config, result: &mut ValidationResult) {
        let provider = &config.provider;

        if !(0.0..=2.0).contains(&provider.temperature) {
            result.add_error(ValidationError::new(
                "provider.temperature",
                "Temperature must be between 0 and 2",
            ));
        }

        if !provider.has_key_for_selected() {
            result.add_warning(ValidationWarning::new(
                "provider",
                format!(
                    "No API key configured for provider '{}'",
                    provider.kind.as_str()
                ),
            ));
        }

        for (path, value) in [
            ("provider.gemini_base_url", &provider.gemini_base_url),
            ("provider.openai_api_url", &provider.openai_api_url),
        ] {
            if let Some(url) = value {
                Self::check_url(path, url, result);
            }
        }
    }

    fn validate_client(config: &Config, result: &mut ValidationResult) {
        let client = &config.client;

        match client.proxy_url.as_deref() {
            Some(url) => Self::check_url("client.proxy_url", url, result),
            None => result.add_warning(ValidationWarning::new(
                "client.proxy_url",
                "Proxy URL is not set; analysis requests will fail",
            )),
        }

        if client.observer_debounce_ms == 0 {
            result.add_warning(ValidationWarning::new(
                "client.observer_debounce_ms",
                "A zero debounce checks the page on every event",
            ));
        }

        if client.hotkey.trim().is_empty() {
            result.add_error(ValidationError::new("client.hotkey", "Hotkey cannot be empty"));
        }
    }

    fn validate_storage(config: &Config, result: &mut ValidationResult) {
        if config.storage.cache_prefix.is_empty() {
            result.add_error(ValidationError::new(
                "storage.cache_prefix",
                "Cache prefix cannot be empty",
            ));
        }

        if config.storage.path.trim().is_empty() {
            result.add_error(ValidationError::new("storage.path", "Storage path cannot be empty"));
        }
    }

    fn check_url(path: &str, value: &str, result: &mut ValidationResult) {
        match url::Url::parse(value) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => result.add_error(ValidationError::new(
                path,
                format!("Unsupported URL scheme '{}'", url.scheme()),
            )),
            Err(e) => result.add_error(ValidationError::new(path, format!("Invalid URL: {}", e))),
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
