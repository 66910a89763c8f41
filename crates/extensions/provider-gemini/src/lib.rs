//! # QuizLens Provider - Gemini
//!
//! Google Gemini `generateContent` backend with model fallback.

mod catalog;
mod client;
mod provider;
mod types;

pub use catalog::{DEFAULT_MODELS, MODEL_LIST_TTL, ModelCatalog};
pub use client::{DEFAULT_BASE_URL, GeminiClient};
pub use provider::GeminiBackend;
pub use types::*;
