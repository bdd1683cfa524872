//! Ledger service wrapping the raw database handle.
//!
//! `Ledger` is the single owner of the `PodiumDb`. All repo methods are
//! implemented as `impl Ledger` in `crate::repos`.

use crate::PodiumDb;
use crate::error::DatabaseError;
use crate::retry::RetryConfig;

/// The score ledger: durable storage for projects and timeline entries.
pub struct Ledger {
    db: PodiumDb,
}

impl Ledger {
    /// Open a ledger backed by a local database file, or `":memory:"` for tests.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or migrated.
    pub async fn new_local(db_path: &str) -> Result<Self, DatabaseError> {
        let db = PodiumDb::open_local(db_path).await?;
        tracing::debug!(path = db_path, "ledger opened");
        Ok(Self { db })
    }

    /// Open a local ledger with a custom lock-retry policy.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or migrated.
    pub async fn new_local_with_retry(
        db_path: &str,
        retry: RetryConfig,
    ) -> Result<Self, DatabaseError> {
        let db = PodiumDb::open_local(db_path).await?.with_retry(retry);
        Ok(Self { db })
    }

    /// Create from an existing `PodiumDb` (for testing).
    #[must_use]
    pub const fn from_db(db: PodiumDb) -> Self {
        Self { db }
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &PodiumDb {
        &self.db
    }
}
