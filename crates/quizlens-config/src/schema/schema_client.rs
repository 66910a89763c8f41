//! Client-side configuration: proxy endpoint, timings, storage and identity.

use serde::{Deserialize, Serialize};

/// Suggestion client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the analyzer proxy. Analysis fails with a configuration
    /// error while this is unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy_url: Option<String>,

    /// Delay before a fast request for a newly identified question.
    #[serde(default = "default_fast_debounce")]
    pub fast_debounce_ms: u64,

    /// Window coalescing page events into one check.
    #[serde(default = "default_observer_debounce")]
    pub observer_debounce_ms: u64,

    /// Minimum gap before re-announcing an unchanged question.
    #[serde(default = "default_renotify")]
    pub renotify_ms: u64,

    #[serde(default = "default_hotkey")]
    pub hotkey: String,
}

fn default_fast_debounce() -> u64 {
    300
}

fn default_observer_debounce() -> u64 {
    200
}

fn default_renotify() -> u64 {
    500
}

fn default_hotkey() -> String {
    "Alt+A".to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            proxy_url: None,
            fast_debounce_ms: default_fast_debounce(),
            observer_debounce_ms: default_observer_debounce(),
            renotify_ms: default_renotify(),
            hotkey: default_hotkey(),
        }
    }
}

/// Local key-value storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_storage_path")]
    pub path: String,

    #[serde(default = "default_cache_prefix")]
    pub cache_prefix: String,
}

fn default_storage_path() -> String {
    "~/.quizlens/storage.json".to_string()
}

fn default_cache_prefix() -> String {
    "quizlens-cache:".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
            cache_prefix: default_cache_prefix(),
        }
    }
}

/// Digest used for question identity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentityAlgorithm {
    #[default]
    Sha256,
    /// 32-bit rolling checksum.
    Rolling,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdentityConfig {
    #[serde(default)]
    pub algorithm: IdentityAlgorithm,
}
