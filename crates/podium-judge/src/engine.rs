//! The scoring engine seam.

use std::future::Future;

use podium_config::ScoringConfig;

use crate::chat::ChatEngine;
use crate::error::EngineError;
use crate::verdict::RawVerdict;

/// An external capability that turns a prompt into a raw verdict.
///
/// Implementations do not need to enforce a deadline themselves; callers wrap
/// every call in a timeout.
pub trait ScoringEngine: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    fn score(&self, prompt: &str) -> impl Future<Output = Result<RawVerdict, EngineError>> + Send;
}

/// Engine used when no scoring backend is configured. Every call fails, so
/// every evaluation takes the fallback path.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledEngine;

impl ScoringEngine for DisabledEngine {
    fn name(&self) -> &'static str {
        "disabled"
    }

    async fn score(&self, _prompt: &str) -> Result<RawVerdict, EngineError> {
        Err(EngineError::Unavailable("no scoring engine configured".into()))
    }
}

/// The engine selected from configuration.
pub enum JudgeEngine {
    Chat(ChatEngine),
    Disabled(DisabledEngine),
}

impl JudgeEngine {
    /// Pick the chat engine when `[scoring]` is configured, else the disabled one.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Http` if the HTTP client cannot be built.
    pub fn from_config(config: &ScoringConfig) -> Result<Self, EngineError> {
        if config.is_configured() {
            tracing::debug!(model = %config.model, "using chat scoring engine");
            Ok(Self::Chat(ChatEngine::from_config(config)?))
        } else {
            tracing::warn!("scoring engine not configured; evaluations will be degraded");
            Ok(Self::Disabled(DisabledEngine))
        }
    }
}

impl ScoringEngine for JudgeEngine {
    fn name(&self) -> &str {
        match self {
            Self::Chat(engine) => engine.name(),
            Self::Disabled(engine) => engine.name(),
        }
    }

    async fn score(&self, prompt: &str) -> Result<RawVerdict, EngineError> {
        match self {
            Self::Chat(engine) => engine.score(prompt).await,
            Self::Disabled(engine) => engine.score(prompt).await,
        }
    }
}
