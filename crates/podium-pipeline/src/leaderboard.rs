//! Leaderboard resolution.
//!
//! Each project's score is the `final_score` of its evaluated entry with the
//! highest sequence. Projects with no evaluated entry are still listed, with
//! zero scores, after every evaluated project. Ordering is by score
//! descending, then project id ascending.

use std::cmp::Ordering;
use std::sync::Arc;

use podium_core::entities::Scores;
use podium_core::responses::LeaderboardRow;
use podium_db::repos::ProjectStanding;

use crate::error::PipelineError;
use crate::store::LedgerStore;

pub struct LeaderboardResolver<S> {
    store: Arc<S>,
}

impl<S: LedgerStore> LeaderboardResolver<S> {
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Read every project's standing and rank them. Read-only.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Persistence` if the ledger cannot be read.
    pub async fn get_leaderboard(&self) -> Result<Vec<LeaderboardRow>, PipelineError> {
        let standings = self.store.standings().await?;
        Ok(rank(standings))
    }
}

fn to_row(standing: ProjectStanding) -> LeaderboardRow {
    let ProjectStanding {
        project,
        latest_evaluated,
    } = standing;
    let evaluation = latest_evaluated
        .as_ref()
        .and_then(|entry| entry.evaluation.as_ref().map(|e| (entry.sequence, e)));

    LeaderboardRow {
        rank: 0,
        project_id: project.id,
        team_name: project.team_name,
        scores: evaluation.map_or_else(Scores::zero, |(_, e)| e.scores),
        last_evaluated_sequence: evaluation.map(|(seq, _)| seq),
        evaluated: evaluation.is_some(),
        degraded: evaluation.is_some_and(|(_, e)| e.degraded),
    }
}

fn compare(a: &LeaderboardRow, b: &LeaderboardRow) -> Ordering {
    b.evaluated
        .cmp(&a.evaluated)
        .then_with(|| b.scores.final_score.total_cmp(&a.scores.final_score))
        .then_with(|| a.project_id.cmp(&b.project_id))
}

/// Turn standings into ranked rows. Pure and deterministic.
#[must_use]
pub fn rank(standings: Vec<ProjectStanding>) -> Vec<LeaderboardRow> {
    let mut rows: Vec<LeaderboardRow> = standings.into_iter().map(to_row).collect();
    rows.sort_by(compare);
    for (position, row) in (1_u32..).zip(rows.iter_mut()) {
        row.rank = position;
    }
    rows
}
