//! Pipeline error types.
//!
//! Only caller-facing failures live here. Scoring engine failures never
//! surface: the orchestrator turns them into degraded evaluations.

use thiserror::Error;

use podium_db::error::DatabaseError;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Caller input was rejected before any write. Never retried.
    #[error("Validation error: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// The referenced project or entry does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// The ledger could not be read or written.
    #[error("Persistence error: {0}")]
    Persistence(#[from] DatabaseError),

    /// A collaborator could not be constructed from configuration.
    #[error("Setup error: {0}")]
    Setup(String),
}

impl PipelineError {
    /// Map a ledger error, turning a missing row into `NotFound`.
    pub(crate) fn lookup(entity: &'static str, id: &str) -> impl FnOnce(DatabaseError) -> Self {
        let id = id.to_string();
        move |err| match err {
            DatabaseError::NoResult => Self::NotFound { entity, id },
            other => Self::Persistence(other),
        }
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<podium_core::errors::CoreError> for PipelineError {
    fn from(err: podium_core::errors::CoreError) -> Self {
        use podium_core::errors::CoreError;
        match err {
            CoreError::Validation(reasons) => Self::Validation(reasons),
            CoreError::NotFound { id, .. } => Self::NotFound {
                entity: "entity",
                id,
            },
            other => Self::Persistence(DatabaseError::InvalidState(other.to_string())),
        }
    }
}
