//! Status enums and entry kinds for Podium.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.
//! `EvaluationState` carries its state machine in `allowed_next_states()`;
//! project status moves are driven by ledger triggers.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// ProjectStatus
// ---------------------------------------------------------------------------

/// Lifecycle of a competing project.
///
/// ```text
/// active → submitted → evaluated
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Active,
    Submitted,
    Evaluated,
}

impl ProjectStatus {
    /// Return the string representation used in SQL storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Submitted => "submitted",
            Self::Evaluated => "evaluated",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// EntryKind
// ---------------------------------------------------------------------------

/// What a timeline entry carries.
///
/// `text` and `link` entries hold their payload inline. `file` and `image`
/// entries hold a reference resolved through the content store at scoring time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Text,
    File,
    Image,
    Link,
}

impl EntryKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::File => "file",
            Self::Image => "image",
            Self::Link => "link",
        }
    }

    /// Whether the entry content is a reference into the content store.
    #[must_use]
    pub const fn is_reference(self) -> bool {
        matches!(self, Self::File | Self::Image)
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// EvaluationState
// ---------------------------------------------------------------------------

/// Evaluation progress of a single timeline entry.
///
/// ```text
/// pending → evaluated
///         → failed → evaluated (reprocessing sweep)
/// ```
///
/// `failed` entries still have no evaluation; callers see them as pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationState {
    Pending,
    Evaluated,
    Failed,
}

impl EvaluationState {
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::Evaluated, Self::Failed],
            Self::Failed => &[Self::Evaluated, Self::Failed],
            Self::Evaluated => &[],
        }
    }

    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Evaluated => "evaluated",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for EvaluationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
