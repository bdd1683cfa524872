//! Evaluation orchestrator tuning.

use std::time::Duration;

use serde::{Deserialize, Serialize};

const fn default_context_entries() -> usize {
    3
}

const fn default_prompt_char_limit() -> usize {
    12_000
}

const fn default_commit_max_attempts() -> u32 {
    4
}

const fn default_commit_base_delay_ms() -> u64 {
    100
}

const fn default_commit_max_delay_ms() -> u64 {
    2_000
}

const fn default_store_timeout_ms() -> u64 {
    5_000
}

const fn default_stale_pending_secs() -> u64 {
    300
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct EvaluationConfig {
    /// How many prior entries of the same project go into the prompt context.
    #[serde(default = "default_context_entries")]
    pub context_entries: usize,

    /// Hard cap on the assembled prompt, in characters.
    #[serde(default = "default_prompt_char_limit")]
    pub prompt_char_limit: usize,

    /// Attempts (including the first) at committing an evaluation.
    #[serde(default = "default_commit_max_attempts")]
    pub commit_max_attempts: u32,

    #[serde(default = "default_commit_base_delay_ms")]
    pub commit_base_delay_ms: u64,

    #[serde(default = "default_commit_max_delay_ms")]
    pub commit_max_delay_ms: u64,

    /// Deadline for a single commit attempt against the ledger.
    #[serde(default = "default_store_timeout_ms")]
    pub store_timeout_ms: u64,

    /// Pending entries older than this are picked up by the reprocessing sweep.
    #[serde(default = "default_stale_pending_secs")]
    pub stale_pending_secs: u64,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            context_entries: default_context_entries(),
            prompt_char_limit: default_prompt_char_limit(),
            commit_max_attempts: default_commit_max_attempts(),
            commit_base_delay_ms: default_commit_base_delay_ms(),
            commit_max_delay_ms: default_commit_max_delay_ms(),
            store_timeout_ms: default_store_timeout_ms(),
            stale_pending_secs: default_stale_pending_secs(),
        }
    }
}

impl EvaluationConfig {
    pub const fn commit_base_delay(&self) -> Duration {
        Duration::from_millis(self.commit_base_delay_ms)
    }

    pub const fn commit_max_delay(&self) -> Duration {
        Duration::from_millis(self.commit_max_delay_ms)
    }

    pub const fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }

    pub const fn stale_pending(&self) -> Duration {
        Duration::from_secs(self.stale_pending_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_are_correct() {
        let config = EvaluationConfig::default();
        assert_eq!(config.context_entries, 3);
        assert_eq!(config.prompt_char_limit, 12_000);
        assert_eq!(config.commit_max_attempts, 4);
        assert_eq!(config.commit_base_delay(), Duration::from_millis(100));
        assert_eq!(config.commit_max_delay(), Duration::from_secs(2));
        assert_eq!(config.store_timeout(), Duration::from_secs(5));
        assert_eq!(config.stale_pending(), Duration::from_secs(300));
    }
}
