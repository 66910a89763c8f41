//! OpenAI chat completions backend for QuizLens.

mod api;
mod provider;

pub use provider::{DEFAULT_API_URL, DEFAULT_MODEL, OpenAIBackend};
