//! Runtime knobs for the pipeline, resolved once from configuration.

use std::time::Duration;

use podium_config::PodiumConfig;
use podium_core::validation::SubmissionLimits;
use podium_db::retry::RetryConfig;

#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// Prior entries of the same project included in the prompt.
    pub context_entries: u32,
    /// Prompt size cap, in characters.
    pub prompt_char_limit: usize,
    /// Deadline for a single scoring engine call.
    pub engine_timeout: Duration,
    /// Backoff policy for committing an evaluation.
    pub commit_retry: RetryConfig,
    /// Deadline for a single commit attempt.
    pub store_timeout: Duration,
    /// Age after which a pending entry is considered stuck.
    pub stale_pending: Duration,
    pub limits: SubmissionLimits,
}

impl PipelineSettings {
    #[must_use]
    pub fn from_config(config: &PodiumConfig) -> Self {
        let eval = &config.evaluation;
        Self {
            context_entries: u32::try_from(eval.context_entries).unwrap_or(u32::MAX),
            prompt_char_limit: eval.prompt_char_limit,
            engine_timeout: config.scoring.timeout(),
            commit_retry: RetryConfig {
                max_attempts: eval.commit_max_attempts.max(1),
                base_delay: eval.commit_base_delay(),
                max_delay: eval.commit_max_delay(),
            },
            store_timeout: eval.store_timeout(),
            stale_pending: eval.stale_pending(),
            limits: SubmissionLimits {
                max_content_bytes: config.ingest.max_content_bytes,
            },
        }
    }
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self::from_config(&PodiumConfig::default())
    }
}
