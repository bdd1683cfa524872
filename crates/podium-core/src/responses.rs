//! Response types returned to callers of the pipeline and as JSON by the CLI.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{Scores, TimelineEntry};
use crate::enums::EvaluationState;

/// Acknowledgement returned by a submission, before any scoring happens.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SubmitResponse {
    pub entry_id: String,
    pub project_id: String,
    pub sequence: i64,
}

/// Polling status of an entry as seen by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    Pending,
    Evaluated,
}

/// An entry together with its caller-facing status.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct EntryView {
    pub status: EntryStatus,
    /// Set when the entry is waiting for the reprocessing sweep.
    pub flagged_for_reprocessing: bool,
    pub entry: TimelineEntry,
}

impl From<TimelineEntry> for EntryView {
    fn from(entry: TimelineEntry) -> Self {
        let status = if entry.is_evaluated() {
            EntryStatus::Evaluated
        } else {
            EntryStatus::Pending
        };
        Self {
            status,
            flagged_for_reprocessing: !entry.is_evaluated()
                && entry.state == EvaluationState::Failed,
            entry,
        }
    }
}

/// One ranked leaderboard row.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct LeaderboardRow {
    /// 1-based position.
    pub rank: u32,
    pub project_id: String,
    pub team_name: String,
    pub scores: Scores,
    /// Sequence of the entry the scores came from; `None` if never evaluated.
    pub last_evaluated_sequence: Option<i64>,
    /// `false` for projects without any evaluated entry.
    pub evaluated: bool,
    pub degraded: bool,
}

impl LeaderboardRow {
    #[must_use]
    pub const fn is_evaluated(&self) -> bool {
        self.evaluated
    }
}

/// Response from `podium timeline`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct TimelineResponse {
    pub project_id: String,
    /// Most recent sequence first.
    pub entries: Vec<EntryView>,
}
