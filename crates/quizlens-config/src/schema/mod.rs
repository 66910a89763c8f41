//! Configuration schema definitions.

mod schema_client;

pub use schema_client::*;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub provider: ProviderSettings,

    #[serde(default)]
    pub client: ClientConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub identity: IdentityConfig,
}

impl Config {
    /// Apply overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|name| std::env::var(name).ok());
    }

    /// Apply overrides from an arbitrary variable lookup. Empty values are
    /// treated as unset.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        if let Some(kind) = get("AI_PROVIDER") {
            self.provider.kind = ProviderKind::from_name(&kind);
        }
        if let Some(key) = get("GEMINI_API_KEY") {
            self.provider.gemini_api_key = Some(key);
        }
        if let Some(model) = get("GEMINI_MODEL") {
            self.provider.gemini_model = Some(model);
        }
        if let Some(key) = get("OPENAI_API_KEY") {
            self.provider.openai_api_key = Some(key);
        }
        if let Some(model) = get("OPENAI_MODEL") {
            self.provider.openai_model = model;
        }
        if let Some(url) = get("AI_PROXY_URL") {
            self.client.proxy_url = Some(url);
        }
    }
}

/// Proxy server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8787
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Which model provider the proxy talks to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Gemini,
    #[serde(rename = "openai")]
    OpenAi,
}

impl ProviderKind {
    /// Lenient name lookup; anything other than `openai` selects Gemini.
    pub fn from_name(name: &str) -> Self {
        if name.trim().eq_ignore_ascii_case("openai") {
            Self::OpenAi
        } else {
            Self::Gemini
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::OpenAi => "openai",
        }
    }
}

/// Model provider settings used by the proxy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSettings {
    #[serde(default)]
    pub kind: ProviderKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gemini_api_key: Option<String>,

    /// Tried before the discovered and default models.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gemini_model: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gemini_base_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openai_api_key: Option<String>,

    #[serde(default = "default_openai_model")]
    pub openai_model: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openai_api_url: Option<String>,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_temperature() -> f32 {
    0.2
}

fn default_request_timeout() -> u64 {
    60
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            kind: ProviderKind::default(),
            gemini_api_key: None,
            gemini_model: None,
            gemini_base_url: None,
            openai_api_key: None,
            openai_model: default_openai_model(),
            openai_api_url: None,
            temperature: default_temperature(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl ProviderSettings {
    /// Provider actually used: OpenAI only when selected and keyed.
    pub fn effective_kind(&self) -> ProviderKind {
        match self.kind {
            ProviderKind::OpenAi if has_value(&self.openai_api_key) => ProviderKind::OpenAi,
            _ => ProviderKind::Gemini,
        }
    }

    /// Whether the selected provider has an API key.
    pub fn has_key_for_selected(&self) -> bool {
        match self.kind {
            ProviderKind::Gemini => has_value(&self.gemini_api_key),
            ProviderKind::OpenAi => has_value(&self.openai_api_key),
        }
    }
}

fn has_value(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
