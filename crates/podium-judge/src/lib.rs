//! # podium-judge
//!
//! The external capabilities an evaluation depends on:
//! - [`ScoringEngine`]: turns a prompt into a raw verdict. [`ChatEngine`]
//!   talks to any OpenAI-compatible chat-completions endpoint;
//!   [`DisabledEngine`] always fails so every evaluation is degraded.
//! - [`ContentStore`]: resolves `file` and `image` references into text.
//!   [`FsContentStore`] reads from a local upload directory.

pub mod chat;
pub mod content;
pub mod engine;
mod error;
mod http;
pub mod verdict;

pub use chat::ChatEngine;
pub use content::{ContentStore, FsContentStore};
pub use engine::{DisabledEngine, JudgeEngine, ScoringEngine};
pub use error::{ContentError, EngineError};
pub use verdict::{RawVerdict, parse_verdict};
