use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::Evaluation;
use crate::enums::{EntryKind, EvaluationState};

/// One append-only event in a project's history, optionally carrying a score.
///
/// `sequence` is the only ordering key. `created_at` is informational.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct TimelineEntry {
    pub id: String,
    pub project_id: String,
    pub sequence: i64,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub content: String,
    pub evaluation: Option<Evaluation>,
    pub state: EvaluationState,
    pub attempts: u32,
    pub last_error: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TimelineEntry {
    #[must_use]
    pub const fn is_evaluated(&self) -> bool {
        self.evaluation.is_some()
    }

    /// `final_score` of the embedded evaluation, if any.
    #[must_use]
    pub fn final_score(&self) -> Option<f64> {
        self.evaluation.as_ref().map(|e| e.scores.final_score)
    }
}
