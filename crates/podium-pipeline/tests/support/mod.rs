//! Shared fixtures for pipeline integration tests.
//!
//! `ScriptedEngine` reads directives from the latest submission's text:
//! - `score:<n>`  every sub-score becomes `n / 10`, so the final score is `n`
//! - `gate:<name>` block until the test calls `release(name)`
//! - `!slow`      never answer within any test timeout
//! - `!fail`      return an API error
//! - `!garbage`   return an out-of-range verdict

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::Notify;

use podium_core::entities::{Evaluation, Project, TimelineEntry};
use podium_core::enums::EntryKind;
use podium_core::responses::EntryView;
use podium_core::rubric::Dimension;
use podium_db::error::DatabaseError;
use podium_db::repos::{CommitResult, ProjectStanding};
use podium_db::retry::RetryConfig;
use podium_db::service::Ledger;
use podium_judge::{EngineError, FsContentStore, RawVerdict, ScoringEngine};
use podium_pipeline::{LedgerStore, PipelineSettings, Podium};

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

#[derive(Clone, Default)]
pub struct ScriptedEngine {
    gates: Arc<Mutex<HashMap<String, Arc<Notify>>>>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        Self::default()
    }

    fn gate(&self, name: &str) -> Arc<Notify> {
        let mut gates = self.gates.lock().unwrap();
        Arc::clone(gates.entry(name.to_string()).or_default())
    }

    /// Let the evaluation waiting on `gate:<name>` proceed (now or later).
    pub fn release(&self, name: &str) {
        self.gate(name).notify_one();
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

/// The part of the prompt describing the entry being scored.
fn latest_submission(prompt: &str) -> &str {
    prompt
        .split("\nEarlier submissions")
        .next()
        .unwrap_or(prompt)
}

fn token<'a>(text: &'a str, key: &str) -> Option<&'a str> {
    text.split_whitespace()
        .find_map(|word| word.strip_prefix(key)?.strip_prefix(':'))
}

impl ScoringEngine for ScriptedEngine {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn score(&self, prompt: &str) -> Result<RawVerdict, EngineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let latest = latest_submission(prompt);

        if let Some(name) = token(latest, "gate") {
            self.gate(name).notified().await;
        }
        if latest.contains("!slow") {
            tokio::time::sleep(Duration::from_secs(30)).await;
        }
        if latest.contains("!fail") {
            return Err(EngineError::Api {
                status: 500,
                message: "scripted failure".into(),
            });
        }
        if latest.contains("!garbage") {
            return Ok(RawVerdict::from_pairs([("clarity", 42.0)]));
        }

        let score: f64 = token(latest, "score")
            .and_then(|v| v.parse().ok())
            .ok_or_else(|| EngineError::Malformed("no score directive".into()))?;
        let subs = Dimension::ALL
            .into_iter()
            .map(Dimension::as_str)
            .zip(std::iter::repeat(score / 10.0));
        Ok(RawVerdict::from_pairs(subs).with_evidence(["scripted"]))
    }
}

// ---------------------------------------------------------------------------
// Store wrapper with injected commit failures
// ---------------------------------------------------------------------------

/// Delegates to a real ledger but fails the first `n` commits.
pub struct FlakyStore {
    inner: Ledger,
    failing_commits: AtomicUsize,
    stalled_commits: AtomicUsize,
    commit_calls: AtomicUsize,
}

impl FlakyStore {
    pub async fn new(failing_commits: usize) -> Self {
        Self {
            inner: Ledger::new_local(":memory:").await.unwrap(),
            failing_commits: AtomicUsize::new(failing_commits),
            stalled_commits: AtomicUsize::new(0),
            commit_calls: AtomicUsize::new(0),
        }
    }

    /// A store whose first `n` commits hang instead of failing.
    pub async fn stalling(stalled_commits: usize) -> Self {
        let store = Self::new(0).await;
        store.stalled_commits.store(stalled_commits, Ordering::SeqCst);
        store
    }

    pub fn commit_calls(&self) -> usize {
        self.commit_calls.load(Ordering::SeqCst)
    }
}

impl LedgerStore for FlakyStore {
    async fn create_project(&self, team_name: &str, email: &str) -> Result<Project, DatabaseError> {
        self.inner.create_project(team_name, email).await
    }

    async fn get_project(&self, id: &str) -> Result<Project, DatabaseError> {
        self.inner.get_project(id).await
    }

    async fn list_projects(&self, limit: u32) -> Result<Vec<Project>, DatabaseError> {
        self.inner.list_projects(limit).await
    }

    async fn next_sequence(&self, project_id: &str) -> Result<i64, DatabaseError> {
        self.inner.next_sequence(project_id).await
    }

    async fn insert_entry(
        &self,
        project_id: &str,
        sequence: i64,
        kind: EntryKind,
        content: &str,
    ) -> Result<TimelineEntry, DatabaseError> {
        self.inner.insert_entry(project_id, sequence, kind, content).await
    }

    async fn get_entry(&self, id: &str) -> Result<TimelineEntry, DatabaseError> {
        self.inner.get_entry(id).await
    }

    async fn entries_for(&self, project_id: &str) -> Result<Vec<TimelineEntry>, DatabaseError> {
        self.inner.entries_for(project_id).await
    }

    async fn recent_entries_before(
        &self,
        project_id: &str,
        sequence: i64,
        limit: u32,
    ) -> Result<Vec<TimelineEntry>, DatabaseError> {
        self.inner
            .recent_entries_before(project_id, sequence, limit)
            .await
    }

    async fn latest_evaluated_before(
        &self,
        project_id: &str,
        sequence: i64,
    ) -> Result<Option<TimelineEntry>, DatabaseError> {
        self.inner.latest_evaluated_before(project_id, sequence).await
    }

    async fn commit_evaluation(
        &self,
        entry_id: &str,
        evaluation: &Evaluation,
    ) -> Result<CommitResult, DatabaseError> {
        self.commit_calls.fetch_add(1, Ordering::SeqCst);
        let should_fail = self
            .failing_commits
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if should_fail {
            return Err(DatabaseError::Query("store unavailable".into()));
        }
        let should_stall = self
            .stalled_commits
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if should_stall {
            tokio::time::sleep(Duration::from_secs(30)).await;
        }
        self.inner.commit_evaluation(entry_id, evaluation).await
    }

    async fn mark_failed(&self, entry_id: &str, reason: &str) -> Result<(), DatabaseError> {
        self.inner.mark_failed(entry_id, reason).await
    }

    async fn entries_needing_evaluation(
        &self,
        stale_before: DateTime<Utc>,
    ) -> Result<Vec<TimelineEntry>, DatabaseError> {
        self.inner.entries_needing_evaluation(stale_before).await
    }

    async fn standings(&self) -> Result<Vec<ProjectStanding>, DatabaseError> {
        self.inner.standings().await
    }
}

// ---------------------------------------------------------------------------
// Construction helpers
// ---------------------------------------------------------------------------

pub type TestPodium<S = Ledger> = Podium<S, ScriptedEngine, FsContentStore>;

/// Short timeouts and near-instant backoff.
pub fn fast_settings() -> PipelineSettings {
    PipelineSettings {
        engine_timeout: Duration::from_millis(200),
        store_timeout: Duration::from_millis(500),
        commit_retry: RetryConfig {
            max_attempts: 3,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(4),
        },
        ..PipelineSettings::default()
    }
}

pub struct Harness<S: LedgerStore = Ledger> {
    pub podium: TestPodium<S>,
    pub engine: ScriptedEngine,
    pub uploads: tempfile::TempDir,
}

pub async fn harness() -> Harness {
    let store = Ledger::new_local(":memory:").await.unwrap();
    harness_with(store, fast_settings())
}

pub fn harness_with<S: LedgerStore>(store: S, settings: PipelineSettings) -> Harness<S> {
    let engine = ScriptedEngine::new();
    let uploads = tempfile::tempdir().unwrap();
    let content = FsContentStore::new(uploads.path(), 64 * 1024);
    Harness {
        podium: Podium::new(store, engine.clone(), content, settings),
        engine,
        uploads,
    }
}

impl<S: LedgerStore> Harness<S> {
    pub async fn project(&self, team: &str) -> Project {
        self.podium
            .register_project(team, &format!("{}@example.com", team.to_lowercase()))
            .await
            .unwrap()
    }

    pub async fn submit_text(&self, project_id: &str, text: &str) -> String {
        self.podium
            .submit(project_id, EntryKind::Text, text)
            .await
            .unwrap()
            .entry_id
    }

    /// Submit and wait for this submission's evaluation to land.
    pub async fn submit_and_settle(&self, project_id: &str, text: &str) -> EntryView {
        let id = self.submit_text(project_id, text).await;
        self.podium.drain().await;
        self.podium.get_entry(&id).await.unwrap()
    }

    /// Poll until `entry_id` carries an evaluation, without draining other tasks.
    pub async fn wait_for_evaluation(&self, entry_id: &str) -> EntryView {
        for _ in 0..400 {
            let view = self.podium.get_entry(entry_id).await.unwrap();
            if view.entry.is_evaluated() {
                return view;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("entry {entry_id} was never evaluated");
    }

    pub async fn score_of(&self, project_id: &str) -> f64 {
        self.podium
            .get_leaderboard()
            .await
            .unwrap()
            .into_iter()
            .find(|row| row.project_id == project_id)
            .map(|row| row.scores.final_score)
            .unwrap()
    }
}

pub fn final_score(view: &EntryView) -> f64 {
    view.entry.final_score().unwrap()
}

pub fn evaluation(view: &EntryView) -> &Evaluation {
    view.entry.evaluation.as_ref().unwrap()
}
