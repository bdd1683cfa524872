//! Reprocessing sweep for entries left without an evaluation.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use podium_judge::{ContentStore, ScoringEngine};

use crate::error::PipelineError;
use crate::orchestrator::EvaluationOrchestrator;
use crate::store::LedgerStore;
use crate::tracker::EvaluationOutcome;

/// Summary of one sweep pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct SweepReport {
    /// Entries picked up by the sweep.
    pub examined: usize,
    /// Entries that now carry an evaluation.
    pub evaluated: usize,
    /// Entries whose commit failed again and remain flagged.
    pub still_failed: usize,
}

pub struct Sweeper<S, E, C> {
    store: Arc<S>,
    orchestrator: EvaluationOrchestrator<S, E, C>,
    stale_pending: std::time::Duration,
}

impl<S, E, C> Sweeper<S, E, C>
where
    S: LedgerStore,
    E: ScoringEngine + 'static,
    C: ContentStore + 'static,
{
    pub const fn new(
        store: Arc<S>,
        orchestrator: EvaluationOrchestrator<S, E, C>,
        stale_pending: std::time::Duration,
    ) -> Self {
        Self {
            store,
            orchestrator,
            stale_pending,
        }
    }

    /// Re-run the orchestrator on every failed entry and every pending entry
    /// older than the stale threshold, oldest sequence first per project.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Persistence` if the candidates cannot be listed.
    pub async fn sweep(&self) -> Result<SweepReport, PipelineError> {
        let age = chrono::Duration::from_std(self.stale_pending).unwrap_or(chrono::Duration::MAX);
        let cutoff = Utc::now()
            .checked_sub_signed(age)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        let candidates = self.store.entries_needing_evaluation(cutoff).await?;

        let mut report = SweepReport {
            examined: candidates.len(),
            ..SweepReport::default()
        };
        for entry in &candidates {
            match self.orchestrator.evaluate_entry(entry).await {
                EvaluationOutcome::Committed { .. } | EvaluationOutcome::AlreadyEvaluated => {
                    report.evaluated += 1;
                }
                EvaluationOutcome::Flagged => report.still_failed += 1,
            }
        }

        tracing::info!(
            examined = report.examined,
            evaluated = report.evaluated,
            still_failed = report.still_failed,
            "reprocessing sweep finished"
        );
        Ok(report)
    }
}
