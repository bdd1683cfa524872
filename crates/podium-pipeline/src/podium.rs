//! The `Podium` facade: one explicitly constructed handle wiring the ledger,
//! engine, and content store into every pipeline component.

use std::path::Path;
use std::sync::Arc;

use podium_config::PodiumConfig;
use podium_core::entities::Project;
use podium_core::enums::EntryKind;
use podium_core::responses::{EntryView, LeaderboardRow, SubmitResponse, TimelineResponse};
use podium_core::validation::validate_registration;
use podium_db::service::Ledger;
use podium_judge::{ContentStore, FsContentStore, JudgeEngine, ScoringEngine};

use crate::error::PipelineError;
use crate::gateway::IngestionGateway;
use crate::leaderboard::LeaderboardResolver;
use crate::orchestrator::EvaluationOrchestrator;
use crate::settings::PipelineSettings;
use crate::store::LedgerStore;
use crate::sweep::{SweepReport, Sweeper};
use crate::tracker::{EvaluationOutcome, TaskTracker};

pub struct Podium<S = Ledger, E = JudgeEngine, C = FsContentStore> {
    store: Arc<S>,
    tracker: Arc<TaskTracker>,
    orchestrator: EvaluationOrchestrator<S, E, C>,
    gateway: IngestionGateway<S, E, C>,
    resolver: LeaderboardResolver<S>,
    sweeper: Sweeper<S, E, C>,
}

impl Podium {
    /// Open the configured ledger and build the configured engine and content store.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Persistence` if the ledger cannot be opened, or
    /// `PipelineError::Setup` if the engine client or ledger directory cannot
    /// be created.
    pub async fn open(config: &PodiumConfig) -> Result<Self, PipelineError> {
        if !config.ledger.is_in_memory()
            && let Some(parent) = Path::new(&config.ledger.path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                PipelineError::Setup(format!("cannot create {}: {e}", parent.display()))
            })?;
        }

        let ledger = Ledger::new_local(&config.ledger.path).await?;
        let engine = JudgeEngine::from_config(&config.scoring)
            .map_err(|e| PipelineError::Setup(e.to_string()))?;
        let content = FsContentStore::from_config(&config.content);
        Ok(Self::new(
            ledger,
            engine,
            content,
            PipelineSettings::from_config(config),
        ))
    }
}

impl<S, E, C> Podium<S, E, C>
where
    S: LedgerStore,
    E: ScoringEngine + 'static,
    C: ContentStore + 'static,
{
    pub fn new(store: S, engine: E, content: C, settings: PipelineSettings) -> Self {
        let store = Arc::new(store);
        let tracker = Arc::new(TaskTracker::new());
        let limits = settings.limits;
        let stale_pending = settings.stale_pending;
        let orchestrator = EvaluationOrchestrator::new(
            Arc::clone(&store),
            Arc::new(engine),
            Arc::new(content),
            Arc::new(settings),
        );

        Self {
            gateway: IngestionGateway::new(
                Arc::clone(&store),
                orchestrator.clone(),
                Arc::clone(&tracker),
                limits,
            ),
            resolver: LeaderboardResolver::new(Arc::clone(&store)),
            sweeper: Sweeper::new(Arc::clone(&store), orchestrator.clone(), stale_pending),
            orchestrator,
            tracker,
            store,
        }
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub const fn orchestrator(&self) -> &EvaluationOrchestrator<S, E, C> {
        &self.orchestrator
    }

    /// Register a new project after validating its fields.
    ///
    /// # Errors
    ///
    /// `PipelineError::Validation` for bad input, `Persistence` on write failure.
    pub async fn register_project(
        &self,
        team_name: &str,
        email: &str,
    ) -> Result<Project, PipelineError> {
        validate_registration(team_name, email).into_result()?;
        Ok(self.store.create_project(team_name, email).await?)
    }

    /// # Errors
    ///
    /// `PipelineError::NotFound` for an unknown project.
    pub async fn get_project(&self, project_id: &str) -> Result<Project, PipelineError> {
        self.store
            .get_project(project_id)
            .await
            .map_err(PipelineError::lookup("project", project_id))
    }

    /// # Errors
    ///
    /// `PipelineError::Persistence` if the ledger cannot be read.
    pub async fn list_projects(&self, limit: u32) -> Result<Vec<Project>, PipelineError> {
        Ok(self.store.list_projects(limit).await?)
    }

    /// Accept a submission; see [`IngestionGateway::submit`].
    ///
    /// # Errors
    ///
    /// `Validation`, `NotFound`, or `Persistence`, all surfaced synchronously.
    pub async fn submit(
        &self,
        project_id: &str,
        kind: EntryKind,
        content: &str,
    ) -> Result<SubmitResponse, PipelineError> {
        self.gateway.submit(project_id, kind, content).await
    }

    /// A project's entries, most recent sequence first.
    ///
    /// # Errors
    ///
    /// `PipelineError::NotFound` for an unknown project.
    pub async fn get_timeline(&self, project_id: &str) -> Result<TimelineResponse, PipelineError> {
        self.get_project(project_id).await?;
        let entries = self.store.entries_for(project_id).await?;
        Ok(TimelineResponse {
            project_id: project_id.to_string(),
            entries: entries.into_iter().map(EntryView::from).collect(),
        })
    }

    /// A single entry with its polling status.
    ///
    /// # Errors
    ///
    /// `PipelineError::NotFound` for an unknown entry.
    pub async fn get_entry(&self, entry_id: &str) -> Result<EntryView, PipelineError> {
        self.store
            .get_entry(entry_id)
            .await
            .map(EntryView::from)
            .map_err(PipelineError::lookup("entry", entry_id))
    }

    /// # Errors
    ///
    /// `PipelineError::Persistence` if the ledger cannot be read.
    pub async fn get_leaderboard(&self) -> Result<Vec<LeaderboardRow>, PipelineError> {
        self.resolver.get_leaderboard().await
    }

    /// # Errors
    ///
    /// `PipelineError::Persistence` if the candidates cannot be listed.
    pub async fn sweep(&self) -> Result<SweepReport, PipelineError> {
        self.sweeper.sweep().await
    }

    /// Wait for every scheduled evaluation to finish.
    pub async fn drain(&self) -> Vec<EvaluationOutcome> {
        self.tracker.drain().await
    }

    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.tracker.in_flight()
    }
}
