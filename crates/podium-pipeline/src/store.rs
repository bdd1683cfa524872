//! The durable-store seam used by every pipeline component.
//!
//! [`Ledger`] is the production implementation. Tests wrap it to inject
//! commit failures without touching the database.

use std::future::Future;

use chrono::{DateTime, Utc};

use podium_core::entities::{Evaluation, Project, TimelineEntry};
use podium_core::enums::EntryKind;
use podium_db::error::DatabaseError;
use podium_db::repos::{CommitResult, ProjectStanding};
use podium_db::service::Ledger;

pub trait LedgerStore: Send + Sync + 'static {
    fn create_project(
        &self,
        team_name: &str,
        email: &str,
    ) -> impl Future<Output = Result<Project, DatabaseError>> + Send;

    fn get_project(&self, id: &str)
    -> impl Future<Output = Result<Project, DatabaseError>> + Send;

    fn list_projects(
        &self,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<Project>, DatabaseError>> + Send;

    fn next_sequence(
        &self,
        project_id: &str,
    ) -> impl Future<Output = Result<i64, DatabaseError>> + Send;

    fn insert_entry(
        &self,
        project_id: &str,
        sequence: i64,
        kind: EntryKind,
        content: &str,
    ) -> impl Future<Output = Result<TimelineEntry, DatabaseError>> + Send;

    fn get_entry(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<TimelineEntry, DatabaseError>> + Send;

    fn entries_for(
        &self,
        project_id: &str,
    ) -> impl Future<Output = Result<Vec<TimelineEntry>, DatabaseError>> + Send;

    fn recent_entries_before(
        &self,
        project_id: &str,
        sequence: i64,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<TimelineEntry>, DatabaseError>> + Send;

    fn latest_evaluated_before(
        &self,
        project_id: &str,
        sequence: i64,
    ) -> impl Future<Output = Result<Option<TimelineEntry>, DatabaseError>> + Send;

    fn commit_evaluation(
        &self,
        entry_id: &str,
        evaluation: &Evaluation,
    ) -> impl Future<Output = Result<CommitResult, DatabaseError>> + Send;

    fn mark_failed(
        &self,
        entry_id: &str,
        reason: &str,
    ) -> impl Future<Output = Result<(), DatabaseError>> + Send;

    fn entries_needing_evaluation(
        &self,
        stale_before: DateTime<Utc>,
    ) -> impl Future<Output = Result<Vec<TimelineEntry>, DatabaseError>> + Send;

    fn standings(&self) -> impl Future<Output = Result<Vec<ProjectStanding>, DatabaseError>> + Send;
}

impl LedgerStore for Ledger {
    async fn create_project(&self, team_name: &str, email: &str) -> Result<Project, DatabaseError> {
        Self::create_project(self, team_name, email).await
    }

    async fn get_project(&self, id: &str) -> Result<Project, DatabaseError> {
        Self::get_project(self, id).await
    }

    async fn list_projects(&self, limit: u32) -> Result<Vec<Project>, DatabaseError> {
        Self::list_projects(self, limit).await
    }

    async fn next_sequence(&self, project_id: &str) -> Result<i64, DatabaseError> {
        Self::next_sequence(self, project_id).await
    }

    async fn insert_entry(
        &self,
        project_id: &str,
        sequence: i64,
        kind: EntryKind,
        content: &str,
    ) -> Result<TimelineEntry, DatabaseError> {
        Self::insert_entry(self, project_id, sequence, kind, content).await
    }

    async fn get_entry(&self, id: &str) -> Result<TimelineEntry, DatabaseError> {
        Self::get_entry(self, id).await
    }

    async fn entries_for(&self, project_id: &str) -> Result<Vec<TimelineEntry>, DatabaseError> {
        Self::entries_for(self, project_id).await
    }

    async fn recent_entries_before(
        &self,
        project_id: &str,
        sequence: i64,
        limit: u32,
    ) -> Result<Vec<TimelineEntry>, DatabaseError> {
        Self::recent_entries_before(self, project_id, sequence, limit).await
    }

    async fn latest_evaluated_before(
        &self,
        project_id: &str,
        sequence: i64,
    ) -> Result<Option<TimelineEntry>, DatabaseError> {
        Self::latest_evaluated_before(self, project_id, sequence).await
    }

    async fn commit_evaluation(
        &self,
        entry_id: &str,
        evaluation: &Evaluation,
    ) -> Result<CommitResult, DatabaseError> {
        Self::commit_evaluation(self, entry_id, evaluation).await
    }

    async fn mark_failed(&self, entry_id: &str, reason: &str) -> Result<(), DatabaseError> {
        Self::mark_failed(self, entry_id, reason).await
    }

    async fn entries_needing_evaluation(
        &self,
        stale_before: DateTime<Utc>,
    ) -> Result<Vec<TimelineEntry>, DatabaseError> {
        Self::entries_needing_evaluation(self, stale_before).await
    }

    async fn standings(&self) -> Result<Vec<ProjectStanding>, DatabaseError> {
        Self::standings(self).await
    }
}
