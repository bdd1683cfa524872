//! The evaluation orchestrator: scores one timeline entry and commits the result.
//!
//! One run per entry, with no coordination across entries:
//! 1. Assemble a bounded, deterministically truncated prompt.
//! 2. Call the scoring engine under a timeout and validate its verdict.
//! 3. Fall back to the deterministic heuristic on any engine problem.
//! 4. Measure the delta against the latest evaluated entry with a lower
//!    sequence, read immediately before each commit attempt.
//! 5. Commit atomically, retrying with backoff; when every attempt fails,
//!    flag the entry for the reprocessing sweep.
//!
//! Re-running on an evaluated entry is a no-op.

pub mod context;
pub mod fallback;
pub mod verdict;

use std::sync::Arc;

use chrono::Utc;

use podium_core::entities::{Delta, Evaluation, TimelineEntry};
use podium_core::rubric::round1;
use podium_db::error::DatabaseError;
use podium_db::repos::CommitResult;
use podium_judge::{ContentStore, EngineError, ScoringEngine};

use crate::error::PipelineError;
use crate::settings::PipelineSettings;
use crate::store::LedgerStore;
use crate::tracker::EvaluationOutcome;

use self::fallback::fallback_verdict;
use self::verdict::Verdict;

/// Signed change between `final_score` and the baseline entry, if any.
#[must_use]
pub fn compute_delta(final_score: f64, baseline: Option<&TimelineEntry>) -> Delta {
    match baseline.and_then(|b| b.final_score().map(|score| (b, score))) {
        Some((previous, previous_score)) => Delta {
            total_change: round1(final_score - previous_score),
            previous_entry_id: Some(previous.id.clone()),
            previous_sequence: Some(previous.sequence),
        },
        None => Delta::initial(),
    }
}

pub struct EvaluationOrchestrator<S, E, C> {
    store: Arc<S>,
    engine: Arc<E>,
    content: Arc<C>,
    settings: Arc<PipelineSettings>,
}

impl<S, E, C> Clone for EvaluationOrchestrator<S, E, C> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            engine: Arc::clone(&self.engine),
            content: Arc::clone(&self.content),
            settings: Arc::clone(&self.settings),
        }
    }
}

impl<S, E, C> EvaluationOrchestrator<S, E, C>
where
    S: LedgerStore,
    E: ScoringEngine + 'static,
    C: ContentStore + 'static,
{
    pub const fn new(
        store: Arc<S>,
        engine: Arc<E>,
        content: Arc<C>,
        settings: Arc<PipelineSettings>,
    ) -> Self {
        Self {
            store,
            engine,
            content,
            settings,
        }
    }

    /// Load an entry by id and evaluate it.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::NotFound` for an unknown entry, or
    /// `PipelineError::Persistence` if the entry cannot be read.
    pub async fn evaluate(&self, entry_id: &str) -> Result<EvaluationOutcome, PipelineError> {
        let entry = self
            .store
            .get_entry(entry_id)
            .await
            .map_err(PipelineError::lookup("entry", entry_id))?;
        Ok(self.evaluate_entry(&entry).await)
    }

    /// Evaluate an already-loaded entry. Never fails: every problem ends in a
    /// degraded evaluation or a flagged entry.
    pub async fn evaluate_entry(&self, entry: &TimelineEntry) -> EvaluationOutcome {
        if entry.is_evaluated() {
            tracing::debug!(entry_id = %entry.id, "entry already evaluated, skipping");
            return EvaluationOutcome::AlreadyEvaluated;
        }

        let (prompt, body) = self.build_prompt(entry).await;
        let (verdict, degraded) = match self.judge(&prompt).await {
            Ok(verdict) => (verdict, false),
            Err(reason) => {
                tracing::warn!(
                    entry_id = %entry.id,
                    engine = self.engine.name(),
                    %reason,
                    "scoring failed, using fallback evaluation"
                );
                (fallback_verdict(entry, &body, &reason), true)
            }
        };

        self.commit_with_retry(entry, verdict, degraded).await
    }

    /// Returns the prompt together with the resolved submission body.
    async fn build_prompt(&self, entry: &TimelineEntry) -> (String, String) {
        let body = context::resolve_body(entry, self.content.as_ref()).await;
        let priors = if self.settings.context_entries == 0 {
            Vec::new()
        } else {
            self.store
                .recent_entries_before(&entry.project_id, entry.sequence, self.settings.context_entries)
                .await
                .unwrap_or_else(|e| {
                    tracing::warn!(entry_id = %entry.id, error = %e, "prior entries unavailable");
                    Vec::new()
                })
        };
        let prompt = context::assemble(entry, &body, &priors, self.settings.prompt_char_limit);
        (prompt, body)
    }

    /// Call the engine under the configured timeout and validate its output.
    async fn judge(&self, prompt: &str) -> Result<Verdict, String> {
        let timeout = self.settings.engine_timeout;
        let raw = match tokio::time::timeout(timeout, self.engine.score(prompt)).await {
            Ok(Ok(raw)) => raw,
            Ok(Err(e)) => return Err(e.to_string()),
            Err(_) => return Err(EngineError::Timeout(timeout).to_string()),
        };
        verdict::validate(&raw).map_err(|issue| format!("invalid verdict: {issue}"))
    }

    async fn commit_with_retry(
        &self,
        entry: &TimelineEntry,
        verdict: Verdict,
        degraded: bool,
    ) -> EvaluationOutcome {
        let retry = self.settings.commit_retry;
        let store_timeout = self.settings.store_timeout;
        let mut last_error = String::new();

        for attempt in 1..=retry.max_attempts {
            let result =
                match tokio::time::timeout(store_timeout, self.try_commit(entry, &verdict, degraded))
                    .await
                {
                    Ok(result) => result.map_err(|e| e.to_string()),
                    Err(_) => Err(format!("commit timed out after {store_timeout:?}")),
                };
            match result {
                Ok(CommitResult::Committed) => {
                    tracing::info!(
                        entry_id = %entry.id,
                        project_id = %entry.project_id,
                        sequence = entry.sequence,
                        final_score = verdict.scores.final_score,
                        degraded,
                        attempt,
                        "evaluation committed"
                    );
                    return EvaluationOutcome::Committed { degraded };
                }
                Ok(CommitResult::AlreadyEvaluated) => {
                    tracing::debug!(entry_id = %entry.id, "evaluation lost the commit race");
                    return EvaluationOutcome::AlreadyEvaluated;
                }
                Err(e) => {
                    if attempt < retry.max_attempts {
                        let delay = retry.delay_for(attempt);
                        tracing::warn!(entry_id = %entry.id, attempt, ?delay, error = %e, "commit failed, retrying");
                        tokio::time::sleep(delay).await;
                    }
                    last_error = e;
                }
            }
        }

        let reason = format!(
            "commit failed after {} attempts: {last_error}",
            retry.max_attempts
        );
        match self.store.mark_failed(&entry.id, &reason).await {
            Ok(()) => EvaluationOutcome::Flagged,
            // A timed-out commit may still have landed.
            Err(DatabaseError::InvalidState(state)) => {
                tracing::debug!(entry_id = %entry.id, %state, "entry evaluated while its commit was retried");
                EvaluationOutcome::AlreadyEvaluated
            }
            Err(e) => {
                tracing::error!(entry_id = %entry.id, error = %e, "could not flag entry for reprocessing");
                EvaluationOutcome::Flagged
            }
        }
    }

    /// One commit attempt: read the baseline, build the evaluation, write it.
    async fn try_commit(
        &self,
        entry: &TimelineEntry,
        verdict: &Verdict,
        degraded: bool,
    ) -> Result<CommitResult, PipelineError> {
        let baseline = self
            .store
            .latest_evaluated_before(&entry.project_id, entry.sequence)
            .await?;
        let evaluation = Evaluation {
            scores: verdict.scores,
            evidence: verdict.evidence.clone(),
            gaps: verdict.gaps.clone(),
            delta: compute_delta(verdict.scores.final_score, baseline.as_ref()),
            degraded,
            evaluated_at: Utc::now(),
        };
        Ok(self.store.commit_evaluation(&entry.id, &evaluation).await?)
    }
}
