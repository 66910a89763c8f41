//! # QuizLens Store
//!
//! Host-local key-value storage and the typed views built on it.
//!
//! - [`MemoryStore`] / [`FileStore`] - [`KeyValueStore`] implementations
//! - [`ResultCache`] - suggestion results keyed by identity hash
//! - [`Settings`] - user settings such as `aiEnabled`
//!
//! [`KeyValueStore`]: quizlens_protocols::KeyValueStore

mod cache;
mod settings;
mod store;

pub use cache::{DEFAULT_CACHE_PREFIX, ResultCache};
pub use settings::{AI_ENABLED_KEY, Settings};
pub use store::{FileStore, MemoryStore};
