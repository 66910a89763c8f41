//! Error types for the QuizLens protocol layer.

mod analysis;
mod provider;
mod store;

pub use analysis::*;
pub use provider::*;
pub use store::*;
