use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Per-dimension sub-scores in `[0, 10]` plus the `[0, 100]` final score.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Scores {
    pub clarity: f64,
    pub problem_value: f64,
    pub feasibility_signal: f64,
    pub originality: f64,
    pub impact_convert: f64,
    pub submission_readiness: f64,
    pub final_score: f64,
}

impl Scores {
    /// The defined zero value used for projects without an evaluated entry.
    #[must_use]
    pub const fn zero() -> Self {
        Self {
            clarity: 0.0,
            problem_value: 0.0,
            feasibility_signal: 0.0,
            originality: 0.0,
            impact_convert: 0.0,
            submission_readiness: 0.0,
            final_score: 0.0,
        }
    }
}

/// Signed score change against the nearest preceding evaluated entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Delta {
    pub total_change: f64,
    /// Entry the change was measured against. `None` for a first evaluation.
    pub previous_entry_id: Option<String>,
    pub previous_sequence: Option<i64>,
}

impl Delta {
    /// Delta for an entry with no evaluated predecessor.
    #[must_use]
    pub const fn initial() -> Self {
        Self {
            total_change: 0.0,
            previous_entry_id: None,
            previous_sequence: None,
        }
    }
}

/// The structured score and feedback attached to an entry, genuine or fallback.
///
/// Created once and never mutated after it is committed to the ledger.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Evaluation {
    pub scores: Scores,
    pub evidence: Vec<String>,
    pub gaps: Vec<String>,
    pub delta: Delta,
    /// `true` when produced by the deterministic fallback rather than the engine.
    pub degraded: bool,
    pub evaluated_at: DateTime<Utc>,
}
