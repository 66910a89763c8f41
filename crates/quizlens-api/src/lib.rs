//! # QuizLens API
//!
//! Analysis proxy between the quiz client and the model provider.
//!
//! The proxy keeps provider API keys off the client, runs the fast and deep
//! prompts, and normalizes whatever the model returns into the
//! `{choiceIndex, confidence, explanation, wrongAnswers}` contract.
//!
//! ```text
//! GET  /health   - "ok"
//! POST /analyze  - { question, answers, mode?, choiceIndex?, confidence? }
//! ```

pub mod backend;
pub mod error;
pub mod http;
pub mod pipeline;
pub mod prompt;
pub mod server;
pub mod state;

#[cfg(test)]
pub(crate) mod test_support;

pub use backend::build_backend;
pub use error::ApiError;
pub use pipeline::AnalysisPipeline;
pub use server::ProxyServer;
pub use state::AppState;
