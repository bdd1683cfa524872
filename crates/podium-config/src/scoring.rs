//! Scoring engine (chat-completions endpoint) configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

const fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScoringConfig {
    /// Base URL of an OpenAI-compatible API, e.g. `https://api.openai.com/v1`.
    #[serde(default)]
    pub base_url: String,

    /// Bearer token sent with every request. May be empty for local gateways.
    #[serde(default)]
    pub api_key: String,

    /// Model identifier passed in the request body.
    #[serde(default)]
    pub model: String,

    /// Upper bound on a single scoring call, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Sampling temperature. Zero keeps scoring as repeatable as the model allows.
    #[serde(default)]
    pub temperature: f32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_key: String::new(),
            model: String::new(),
            timeout_secs: default_timeout_secs(),
            temperature: 0.0,
        }
    }
}

impl ScoringConfig {
    /// Check if the engine has the minimum required fields to be called.
    pub fn is_configured(&self) -> bool {
        !self.base_url.is_empty() && !self.model.is_empty()
    }

    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Full URL of the chat-completions endpoint.
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}
