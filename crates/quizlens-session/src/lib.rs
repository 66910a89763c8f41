//! # QuizLens Session
//!
//! The question-detection-and-suggestion pipeline:
//!
//! - [`identity`] - content hash of a question and its answers
//! - [`observer`] - picks the current question and debounces page events
//! - [`client`] - HTTP transport to the analyzer proxy
//! - [`engine`] - the fast/deep request state machine with fencing
//! - [`hotkey`] - panel toggle chord matching

pub mod client;
pub mod engine;
pub mod hotkey;
pub mod identity;
pub mod observer;

pub use client::AnalysisClient;
pub use engine::{EngineOptions, SuggestionEngine};
pub use hotkey::{Hotkey, HotkeyError, KeyEvent};
pub use identity::{IdentityHash, compute_identity};
pub use observer::{ObserverHandle, ObserverTimings, QuestionObserver, find_current_question};
