//! # QuizLens Protocols
//!
//! Core protocol definitions for the QuizLens suggestion pipeline.
//! Contains the value types exchanged between components, the traits every
//! collaborator implements, and the lenient JSON normalization shared by the
//! analysis client and the provider proxy.
//!
//! ## Core Traits
//!
//! - [`Analyzer`] - Remote analysis transport (fast / deep)
//! - [`PageSource`] - Page scraping collaborator (question candidates, parsing)
//! - [`MarkerSink`] / [`PanelSink`] - Rendering sinks
//! - [`KeyValueStore`] - Durable local key-value storage
//! - [`ModelBackend`] - LLM provider backend used by the proxy

pub mod analyzer;
pub mod error;
pub mod normalize;
pub mod page;
pub mod provider;
pub mod sink;
pub mod store;
pub mod types;

pub use analyzer::Analyzer;
pub use error::{AnalysisError, ProviderError, StoreError};
pub use page::{BoundingBox, CandidateElement, PageEvent, PageSource, Viewport};
pub use provider::{GenerationRequest, ModelBackend};
pub use sink::{MarkerSink, PanelSink, UpdateOptions};
pub use store::{KeyValueStore, StorageChange};
pub use types::*;
