//! The ingestion gateway: durable append plus asynchronous scheduling.

use std::sync::Arc;

use podium_core::enums::EntryKind;
use podium_core::responses::SubmitResponse;
use podium_core::validation::{SubmissionLimits, validate_submission};
use podium_judge::{ContentStore, ScoringEngine};

use crate::error::PipelineError;
use crate::orchestrator::EvaluationOrchestrator;
use crate::store::LedgerStore;
use crate::tracker::TaskTracker;

pub struct IngestionGateway<S, E, C> {
    store: Arc<S>,
    orchestrator: EvaluationOrchestrator<S, E, C>,
    tracker: Arc<TaskTracker>,
    limits: SubmissionLimits,
}

impl<S, E, C> IngestionGateway<S, E, C>
where
    S: LedgerStore,
    E: ScoringEngine + 'static,
    C: ContentStore + 'static,
{
    pub const fn new(
        store: Arc<S>,
        orchestrator: EvaluationOrchestrator<S, E, C>,
        tracker: Arc<TaskTracker>,
        limits: SubmissionLimits,
    ) -> Self {
        Self {
            store,
            orchestrator,
            tracker,
            limits,
        }
    }

    /// Record a submission and schedule its evaluation.
    ///
    /// Returns as soon as the entry is durable; scoring happens in a tracked
    /// background task.
    ///
    /// # Errors
    ///
    /// - `PipelineError::Validation` if the payload is rejected.
    /// - `PipelineError::NotFound` if the project does not exist.
    /// - `PipelineError::Persistence` if the entry cannot be written.
    pub async fn submit(
        &self,
        project_id: &str,
        kind: EntryKind,
        content: &str,
    ) -> Result<SubmitResponse, PipelineError> {
        validate_submission(kind, content, &self.limits).into_result()?;
        let content = match kind {
            EntryKind::Text => content,
            EntryKind::File | EntryKind::Image | EntryKind::Link => content.trim(),
        };

        let sequence = self
            .store
            .next_sequence(project_id)
            .await
            .map_err(PipelineError::lookup("project", project_id))?;
        let entry = self
            .store
            .insert_entry(project_id, sequence, kind, content)
            .await?;

        tracing::info!(entry_id = %entry.id, project_id, sequence, kind = %kind, "submission accepted");

        let response = SubmitResponse {
            entry_id: entry.id.clone(),
            project_id: entry.project_id.clone(),
            sequence,
        };

        let orchestrator = self.orchestrator.clone();
        self.tracker
            .spawn(async move { orchestrator.evaluate_entry(&entry).await });

        Ok(response)
    }
}
