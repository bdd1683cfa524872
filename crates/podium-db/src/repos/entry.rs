//! Timeline entry repository: append, read, and the one-shot evaluation commit.

use chrono::{DateTime, Utc};

use podium_core::entities::{Evaluation, Project, TimelineEntry};
use podium_core::enums::{EntryKind, EvaluationState};
use podium_core::ids::PREFIX_ENTRY;

use crate::error::DatabaseError;
use crate::helpers::{
    format_timestamp, get_opt_string, get_u32, parse_datetime, parse_enum, parse_optional_json,
};
use crate::repos::project::row_to_project;
use crate::service::Ledger;

const ENTRY_COLUMNS: &str =
    "id, project_id, sequence, kind, content, evaluation, state, attempts, last_error, created_at";

fn row_to_entry(row: &libsql::Row) -> Result<TimelineEntry, DatabaseError> {
    entry_from_offset(row, 0)
}

/// Parse the ten entry columns starting at `offset`.
fn entry_from_offset(row: &libsql::Row, offset: i32) -> Result<TimelineEntry, DatabaseError> {
    let evaluation: Option<Evaluation> =
        parse_optional_json(get_opt_string(row, offset + 5)?.as_deref())?;
    Ok(TimelineEntry {
        id: row.get::<String>(offset)?,
        project_id: row.get::<String>(offset + 1)?,
        sequence: row.get::<i64>(offset + 2)?,
        kind: parse_enum(&row.get::<String>(offset + 3)?)?,
        content: row.get::<String>(offset + 4)?,
        evaluation,
        state: parse_enum(&row.get::<String>(offset + 6)?)?,
        attempts: get_u32(row, offset + 7)?,
        last_error: get_opt_string(row, offset + 8)?,
        created_at: parse_datetime(&row.get::<String>(offset + 9)?)?,
    })
}

async fn collect_entries(mut rows: libsql::Rows) -> Result<Vec<TimelineEntry>, DatabaseError> {
    let mut entries = Vec::new();
    while let Some(row) = rows.next().await? {
        entries.push(row_to_entry(&row)?);
    }
    Ok(entries)
}

/// Outcome of an attempt to attach an evaluation to an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitResult {
    /// The evaluation was written by this call.
    Committed,
    /// The entry already carried an evaluation; nothing changed.
    AlreadyEvaluated,
}

/// A project paired with its most recent evaluated entry, if any.
#[derive(Debug, Clone)]
pub struct ProjectStanding {
    pub project: Project,
    pub latest_evaluated: Option<TimelineEntry>,
}

impl Ledger {
    /// Append a new entry with no evaluation.
    ///
    /// `sequence` must come from [`Ledger::next_sequence`] for the same project.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::LibSql` if the project does not exist or the
    /// sequence is already taken.
    pub async fn insert_entry(
        &self,
        project_id: &str,
        sequence: i64,
        kind: EntryKind,
        content: &str,
    ) -> Result<TimelineEntry, DatabaseError> {
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_ENTRY).await?;
        let ts = format_timestamp(now);

        self.db()
            .execute_with(
                "INSERT INTO timeline_entries (id, project_id, sequence, kind, content, state, attempts, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, ?7)",
                || {
                    libsql::params![
                        id.as_str(),
                        project_id,
                        sequence,
                        kind.as_str(),
                        content,
                        EvaluationState::Pending.as_str(),
                        ts.as_str()
                    ]
                },
            )
            .await?;

        tracing::debug!(entry_id = %id, project_id, sequence, kind = %kind, "entry appended");

        Ok(TimelineEntry {
            id,
            project_id: project_id.to_string(),
            sequence,
            kind,
            content: content.to_string(),
            evaluation: None,
            state: EvaluationState::Pending,
            attempts: 0,
            last_error: None,
            created_at: now,
        })
    }

    pub async fn get_entry(&self, id: &str) -> Result<TimelineEntry, DatabaseError> {
        let mut rows = self
            .db()
            .query(
                &format!("SELECT {ENTRY_COLUMNS} FROM timeline_entries WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_entry(&row)
    }

    /// Every entry of a project, most recent sequence first.
    pub async fn entries_for(&self, project_id: &str) -> Result<Vec<TimelineEntry>, DatabaseError> {
        let rows = self
            .db()
            .query(
                &format!(
                    "SELECT {ENTRY_COLUMNS} FROM timeline_entries
                     WHERE project_id = ?1 ORDER BY sequence DESC"
                ),
                [project_id],
            )
            .await?;
        collect_entries(rows).await
    }

    /// Up to `limit` entries preceding `sequence`, nearest first.
    pub async fn recent_entries_before(
        &self,
        project_id: &str,
        sequence: i64,
        limit: u32,
    ) -> Result<Vec<TimelineEntry>, DatabaseError> {
        let rows = self
            .db()
            .query(
                &format!(
                    "SELECT {ENTRY_COLUMNS} FROM timeline_entries
                     WHERE project_id = ?1 AND sequence < ?2
                     ORDER BY sequence DESC LIMIT ?3"
                ),
                libsql::params![project_id, sequence, i64::from(limit)],
            )
            .await?;
        collect_entries(rows).await
    }

    /// The evaluated entry with the highest sequence, if any.
    pub async fn latest_evaluated(
        &self,
        project_id: &str,
    ) -> Result<Option<TimelineEntry>, DatabaseError> {
        let mut rows = self
            .db()
            .query(
                &format!(
                    "SELECT {ENTRY_COLUMNS} FROM timeline_entries
                     WHERE project_id = ?1 AND evaluation IS NOT NULL
                     ORDER BY sequence DESC LIMIT 1"
                ),
                [project_id],
            )
            .await?;
        rows.next().await?.map(|row| row_to_entry(&row)).transpose()
    }

    /// The evaluated entry with the highest sequence strictly below `sequence`.
    ///
    /// This is the baseline a delta is measured against.
    pub async fn latest_evaluated_before(
        &self,
        project_id: &str,
        sequence: i64,
    ) -> Result<Option<TimelineEntry>, DatabaseError> {
        let mut rows = self
            .db()
            .query(
                &format!(
                    "SELECT {ENTRY_COLUMNS} FROM timeline_entries
                     WHERE project_id = ?1 AND sequence < ?2 AND evaluation IS NOT NULL
                     ORDER BY sequence DESC LIMIT 1"
                ),
                libsql::params![project_id, sequence],
            )
            .await?;
        rows.next().await?.map(|row| row_to_entry(&row)).transpose()
    }

    /// Attach `evaluation` to an entry that has none.
    ///
    /// A single conditional `UPDATE ... WHERE evaluation IS NULL`, so at most
    /// one writer ever succeeds. Losing writers get `AlreadyEvaluated` and the
    /// stored evaluation is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if the entry does not exist, or
    /// `DatabaseError::LibSql` if the write itself fails.
    pub async fn commit_evaluation(
        &self,
        entry_id: &str,
        evaluation: &Evaluation,
    ) -> Result<CommitResult, DatabaseError> {
        let doc = serde_json::to_string(evaluation).map_err(|e| DatabaseError::Other(e.into()))?;
        let evaluated_at = format_timestamp(evaluation.evaluated_at);
        let final_score = evaluation.scores.final_score;
        let degraded = i64::from(evaluation.degraded);

        let changed = self
            .db()
            .execute_with(
                "UPDATE timeline_entries
                 SET evaluation = ?1, final_score = ?2, degraded = ?3, state = ?4,
                     evaluated_at = ?5, last_error = NULL
                 WHERE id = ?6 AND evaluation IS NULL",
                || {
                    libsql::params![
                        doc.as_str(),
                        final_score,
                        degraded,
                        EvaluationState::Evaluated.as_str(),
                        evaluated_at.as_str(),
                        entry_id
                    ]
                },
            )
            .await?;

        if changed == 1 {
            tracing::debug!(entry_id, final_score, degraded = evaluation.degraded, "evaluation committed");
            return Ok(CommitResult::Committed);
        }

        // Nothing changed: either someone else won, or the entry is unknown.
        self.get_entry(entry_id).await?;
        tracing::debug!(entry_id, "evaluation already present, commit ignored");
        Ok(CommitResult::AlreadyEvaluated)
    }

    /// Record a failed evaluation attempt so the sweep picks the entry up.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidState` once the entry is evaluated, and
    /// `DatabaseError::NoResult` for an unknown entry.
    pub async fn mark_failed(&self, entry_id: &str, reason: &str) -> Result<(), DatabaseError> {
        let current = self.get_entry(entry_id).await?;
        if !current.state.can_transition_to(EvaluationState::Failed) {
            return Err(DatabaseError::InvalidState(format!(
                "entry {entry_id} is {} and cannot be marked failed",
                current.state
            )));
        }

        let changed = self
            .db()
            .execute_with(
                "UPDATE timeline_entries
                 SET state = ?1, attempts = attempts + 1, last_error = ?2
                 WHERE id = ?3 AND evaluation IS NULL",
                || libsql::params![EvaluationState::Failed.as_str(), reason, entry_id],
            )
            .await?;
        // A commit can land between the read and the update.
        if changed == 0 {
            return Err(DatabaseError::InvalidState(format!(
                "entry {entry_id} was evaluated before it could be marked failed"
            )));
        }
        tracing::warn!(entry_id, reason, "entry flagged for reprocessing");
        Ok(())
    }

    /// Entries still lacking an evaluation that the sweep should retry.
    ///
    /// Includes every `failed` entry and every `pending` entry created before
    /// `stale_before`. Ordered by project, then sequence ascending.
    pub async fn entries_needing_evaluation(
        &self,
        stale_before: DateTime<Utc>,
    ) -> Result<Vec<TimelineEntry>, DatabaseError> {
        let cutoff = format_timestamp(stale_before);
        let rows = self
            .db()
            .query(
                &format!(
                    "SELECT {ENTRY_COLUMNS} FROM timeline_entries
                     WHERE evaluation IS NULL
                       AND (state = ?1 OR (state = ?2 AND created_at < ?3))
                     ORDER BY project_id ASC, sequence ASC"
                ),
                libsql::params![
                    EvaluationState::Failed.as_str(),
                    EvaluationState::Pending.as_str(),
                    cutoff.as_str()
                ],
            )
            .await?;
        collect_entries(rows).await
    }

    /// Every project paired with its latest evaluated entry, read in one statement.
    pub async fn standings(&self) -> Result<Vec<ProjectStanding>, DatabaseError> {
        let mut rows = self
            .db()
            .query(
                "SELECT p.id, p.team_name, p.email, p.status, p.created_at, p.updated_at,
                        e.id, e.project_id, e.sequence, e.kind, e.content, e.evaluation,
                        e.state, e.attempts, e.last_error, e.created_at
                 FROM projects p
                 LEFT JOIN timeline_entries e ON e.id = (
                     SELECT id FROM timeline_entries
                     WHERE project_id = p.id AND evaluation IS NOT NULL
                     ORDER BY sequence DESC LIMIT 1
                 )
                 ORDER BY p.id ASC",
                (),
            )
            .await?;

        let mut standings = Vec::new();
        while let Some(row) = rows.next().await? {
            let project = row_to_project(&row)?;
            let latest_evaluated = if get_opt_string(&row, 6)?.is_some() {
                Some(entry_from_offset(&row, 6)?)
            } else {
                None
            };
            standings.push(ProjectStanding {
                project,
                latest_evaluated,
            });
        }
        Ok(standings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{evaluation_with, register_test_project, test_ledger};
    use podium_core::entities::Delta;
    use podium_core::enums::ProjectStatus;
    use pretty_assertions::assert_eq;

    async fn append(ledger: &Ledger, project_id: &str, content: &str) -> TimelineEntry {
        let seq = ledger.next_sequence(project_id).await.unwrap();
        ledger
            .insert_entry(project_id, seq, EntryKind::Text, content)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn insert_entry_roundtrip() {
        let ledger = test_ledger().await;
        let project = register_test_project(&ledger, "Alpha").await;
        let entry = append(&ledger, &project.id, "Pitch v1").await;

        assert!(entry.id.starts_with("ent-"));
        assert_eq!(entry.sequence, 1);
        assert!(entry.evaluation.is_none());

        let fetched = ledger.get_entry(&entry.id).await.unwrap();
        assert_eq!(fetched.content, "Pitch v1");
        assert_eq!(fetched.kind, EntryKind::Text);
        assert_eq!(fetched.state, EvaluationState::Pending);
        assert_eq!(fetched.attempts, 0);
        assert!(fetched.evaluation.is_none());
    }

    #[tokio::test]
    async fn first_entry_marks_project_submitted() {
        let ledger = test_ledger().await;
        let project = register_test_project(&ledger, "Alpha").await;
        append(&ledger, &project.id, "Pitch").await;

        let project = ledger.get_project(&project.id).await.unwrap();
        assert_eq!(project.status, ProjectStatus::Submitted);
    }

    #[tokio::test]
    async fn duplicate_sequence_is_rejected() {
        let ledger = test_ledger().await;
        let project = register_test_project(&ledger, "Alpha").await;
        ledger
            .insert_entry(&project.id, 1, EntryKind::Text, "a")
            .await
            .unwrap();
        let err = ledger.insert_entry(&project.id, 1, EntryKind::Text, "b").await;
        assert!(err.is_err());
    }

    #[tokio::test]
    async fn entry_for_unknown_project_is_rejected() {
        let ledger = test_ledger().await;
        let err = ledger
            .insert_entry("prj-00000000", 1, EntryKind::Text, "orphan")
            .await;
        assert!(err.is_err());
    }

    #[tokio::test]
    async fn commit_is_write_once() {
        let ledger = test_ledger().await;
        let project = register_test_project(&ledger, "Alpha").await;
        let entry = append(&ledger, &project.id, "Pitch").await;

        let first = evaluation_with(7.0, Delta::initial());
        let second = evaluation_with(2.0, Delta::initial());

        assert_eq!(
            ledger.commit_evaluation(&entry.id, &first).await.unwrap(),
            CommitResult::Committed
        );
        assert_eq!(
            ledger.commit_evaluation(&entry.id, &second).await.unwrap(),
            CommitResult::AlreadyEvaluated
        );

        let stored = ledger.get_entry(&entry.id).await.unwrap();
        assert_eq!(stored.state, EvaluationState::Evaluated);
        assert_eq!(stored.final_score(), Some(70.0));
        assert_eq!(stored.evaluation.unwrap().evidence, first.evidence);

        let project = ledger.get_project(&project.id).await.unwrap();
        assert_eq!(project.status, ProjectStatus::Evaluated);
    }

    #[tokio::test]
    async fn commit_on_unknown_entry_is_no_result() {
        let ledger = test_ledger().await;
        let err = ledger
            .commit_evaluation("ent-00000000", &evaluation_with(5.0, Delta::initial()))
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::NoResult));
    }

    #[tokio::test]
    async fn raw_overwrite_of_evaluation_is_aborted() {
        let ledger = test_ledger().await;
        let project = register_test_project(&ledger, "Alpha").await;
        let entry = append(&ledger, &project.id, "Pitch").await;
        ledger
            .commit_evaluation(&entry.id, &evaluation_with(5.0, Delta::initial()))
            .await
            .unwrap();

        let result = ledger
            .db()
            .conn()
            .execute(
                "UPDATE timeline_entries SET evaluation = '{}' WHERE id = ?1",
                [entry.id.as_str()],
            )
            .await;
        assert!(result.is_err(), "trigger must block overwriting an evaluation");
    }

    #[tokio::test]
    async fn concurrent_commits_have_one_winner() {
        let ledger = std::sync::Arc::new(test_ledger().await);
        let project = register_test_project(&ledger, "Alpha").await;
        let entry = append(&ledger, &project.id, "Pitch").await;

        let mut handles = Vec::new();
        for sub in 1..=8 {
            let ledger = ledger.clone();
            let id = entry.id.clone();
            handles.push(tokio::spawn(async move {
                let eval = evaluation_with(f64::from(sub), Delta::initial());
                ledger.commit_evaluation(&id, &eval).await.unwrap()
            }));
        }
        let mut committed = 0;
        for handle in handles {
            if handle.await.unwrap() == CommitResult::Committed {
                committed += 1;
            }
        }
        assert_eq!(committed, 1);
    }

    #[tokio::test]
    async fn latest_evaluated_uses_sequence_not_commit_order() {
        let ledger = test_ledger().await;
        let project = register_test_project(&ledger, "Alpha").await;
        let e1 = append(&ledger, &project.id, "v1").await;
        let e2 = append(&ledger, &project.id, "v2").await;
        let e3 = append(&ledger, &project.id, "v3").await;

        // e3 finishes before e1; e2 never does.
        ledger
            .commit_evaluation(&e3.id, &evaluation_with(8.0, Delta::initial()))
            .await
            .unwrap();
        ledger
            .commit_evaluation(&e1.id, &evaluation_with(6.0, Delta::initial()))
            .await
            .unwrap();

        let latest = ledger.latest_evaluated(&project.id).await.unwrap().unwrap();
        assert_eq!(latest.id, e3.id);

        let before_e3 = ledger
            .latest_evaluated_before(&project.id, e3.sequence)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(before_e3.id, e1.id);

        assert!(
            ledger
                .latest_evaluated_before(&project.id, e1.sequence)
                .await
                .unwrap()
                .is_none()
        );
        assert!(ledger.get_entry(&e2.id).await.unwrap().evaluation.is_none());
    }

    #[tokio::test]
    async fn entries_for_is_newest_first() {
        let ledger = test_ledger().await;
        let project = register_test_project(&ledger, "Alpha").await;
        for n in 1..=3 {
            append(&ledger, &project.id, &format!("v{n}")).await;
        }
        let seqs: Vec<i64> = ledger
            .entries_for(&project.id)
            .await
            .unwrap()
            .iter()
            .map(|e| e.sequence)
            .collect();
        assert_eq!(seqs, vec![3, 2, 1]);

        let before: Vec<i64> = ledger
            .recent_entries_before(&project.id, 3, 1)
            .await
            .unwrap()
            .iter()
            .map(|e| e.sequence)
            .collect();
        assert_eq!(before, vec![2]);
    }

    #[tokio::test]
    async fn mark_failed_flags_and_counts_attempts() {
        let ledger = test_ledger().await;
        let project = register_test_project(&ledger, "Alpha").await;
        let entry = append(&ledger, &project.id, "Pitch").await;

        ledger.mark_failed(&entry.id, "ledger unavailable").await.unwrap();
        ledger.mark_failed(&entry.id, "still unavailable").await.unwrap();

        let stored = ledger.get_entry(&entry.id).await.unwrap();
        assert_eq!(stored.state, EvaluationState::Failed);
        assert_eq!(stored.attempts, 2);
        assert_eq!(stored.last_error.as_deref(), Some("still unavailable"));

        ledger
            .commit_evaluation(&entry.id, &evaluation_with(5.0, Delta::initial()))
            .await
            .unwrap();
        let stored = ledger.get_entry(&entry.id).await.unwrap();
        assert_eq!(stored.state, EvaluationState::Evaluated);
        assert!(stored.last_error.is_none());

    }

    #[tokio::test]
    async fn mark_failed_refuses_to_leave_evaluated() {
        let ledger = test_ledger().await;
        let project = register_test_project(&ledger, "Alpha").await;
        let entry = append(&ledger, &project.id, "Pitch").await;
        ledger
            .commit_evaluation(&entry.id, &evaluation_with(5.0, Delta::initial()))
            .await
            .unwrap();

        let err = ledger.mark_failed(&entry.id, "late").await.unwrap_err();
        assert!(matches!(err, DatabaseError::InvalidState(_)), "{err:?}");

        let stored = ledger.get_entry(&entry.id).await.unwrap();
        assert_eq!(stored.state, EvaluationState::Evaluated);
        assert_eq!(stored.attempts, 0);
        assert!(stored.last_error.is_none());
    }

    #[tokio::test]
    async fn mark_failed_on_unknown_entry_is_not_found() {
        let ledger = test_ledger().await;
        let err = ledger.mark_failed("ent-00000000", "x").await.unwrap_err();
        assert!(matches!(err, DatabaseError::NoResult), "{err:?}");
    }

    #[tokio::test]
    async fn sweep_candidates_include_failed_and_stale_pending() {
        let ledger = test_ledger().await;
        let project = register_test_project(&ledger, "Alpha").await;
        let fresh = append(&ledger, &project.id, "fresh").await;
        let failed = append(&ledger, &project.id, "failed").await;
        ledger.mark_failed(&failed.id, "boom").await.unwrap();

        let past = Utc::now() - chrono::Duration::hours(1);
        let ids: Vec<String> = ledger
            .entries_needing_evaluation(past)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec![failed.id.clone()]);

        let future = Utc::now() + chrono::Duration::hours(1);
        let ids: Vec<String> = ledger
            .entries_needing_evaluation(future)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec![fresh.id, failed.id]);
    }

    #[tokio::test]
    async fn standings_pick_highest_evaluated_sequence() {
        let ledger = test_ledger().await;
        let alpha = register_test_project(&ledger, "Alpha").await;
        let beta = register_test_project(&ledger, "Beta").await;

        let a1 = append(&ledger, &alpha.id, "v1").await;
        let a2 = append(&ledger, &alpha.id, "v2").await;
        append(&ledger, &alpha.id, "v3 pending").await;
        ledger
            .commit_evaluation(&a2.id, &evaluation_with(4.0, Delta::initial()))
            .await
            .unwrap();
        ledger
            .commit_evaluation(&a1.id, &evaluation_with(9.0, Delta::initial()))
            .await
            .unwrap();

        let standings = ledger.standings().await.unwrap();
        assert_eq!(standings.len(), 2);

        let alpha_row = standings.iter().find(|s| s.project.id == alpha.id).unwrap();
        let latest = alpha_row.latest_evaluated.as_ref().unwrap();
        assert_eq!(latest.id, a2.id);
        assert_eq!(latest.final_score(), Some(40.0));

        let beta_row = standings.iter().find(|s| s.project.id == beta.id).unwrap();
        assert!(beta_row.latest_evaluated.is_none());
    }
}
