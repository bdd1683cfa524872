//! # podium-db
//!
//! libSQL score ledger for Podium.
//!
//! Holds projects and their append-only timelines. Each timeline entry is
//! written once without an evaluation and later receives exactly one
//! evaluation through an atomic conditional update. Ordering is by the
//! per-project `sequence` counter, never by wall-clock time.
//!
//! Uses the `libsql` crate (C `SQLite` fork, v0.9.29) in local embedded mode.

pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
pub mod retry;
pub mod service;
mod test_support;

use error::DatabaseError;
use libsql::Builder;
use libsql::params::IntoParams;

use crate::retry::{RetryConfig, is_transient_error};

/// Central database handle for all ledger operations.
///
/// Wraps a libSQL database and a single connection. `:memory:` databases are
/// per-connection, so every query goes through this one connection.
pub struct PodiumDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
    retry: RetryConfig,
}

impl PodiumDb {
    /// Open a local database at the given path.
    ///
    /// Runs migrations automatically on first open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        // Enable foreign keys (must be per-connection in SQLite)
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let podium_db = Self {
            db,
            conn,
            retry: RetryConfig::default(),
        };
        podium_db.run_migrations().await?;
        Ok(podium_db)
    }

    /// Replace the retry policy used for transient lock errors.
    #[must_use]
    pub const fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Generate a prefixed ID via libSQL. Returns e.g., `"ent-a3f8b2c1"`.
    ///
    /// Uses `randomblob(4)` in SQL to produce 8-char hex, then prepends the prefix.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or returns no rows.
    pub async fn generate_id(&self, prefix: &str) -> Result<String, DatabaseError> {
        let mut rows = self
            .conn
            .query(
                &format!("SELECT '{prefix}-' || lower(hex(randomblob(4)))"),
                (),
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<String>(0)?)
    }

    /// Run a read query once.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::LibSql` if the query fails.
    pub async fn query(
        &self,
        sql: &str,
        params: impl IntoParams,
    ) -> Result<libsql::Rows, DatabaseError> {
        Ok(self.conn.query(sql, params).await?)
    }

    /// Execute a write statement, retrying transient lock errors.
    ///
    /// Parameters are produced by a closure because libSQL consumes them on
    /// every attempt.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::LibSql` once attempts are exhausted or on any
    /// non-transient error.
    pub async fn execute_with<F, P>(&self, sql: &str, params: F) -> Result<u64, DatabaseError>
    where
        F: Fn() -> P,
        P: IntoParams,
    {
        let mut attempt = 1;
        loop {
            match self.conn.execute(sql, params()).await {
                Ok(changed) => return Ok(changed),
                Err(e) if attempt < self.retry.max_attempts && is_transient_error(&e) => {
                    let delay = self.retry.delay_for(attempt);
                    tracing::warn!(attempt, ?delay, error = %e, "transient ledger error, retrying");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Run a query that writes (e.g. `UPDATE ... RETURNING`), retrying
    /// transient lock errors.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::LibSql` once attempts are exhausted or on any
    /// non-transient error.
    pub async fn query_with<F, P>(&self, sql: &str, params: F) -> Result<libsql::Rows, DatabaseError>
    where
        F: Fn() -> P,
        P: IntoParams,
    {
        let mut attempt = 1;
        loop {
            match self.conn.query(sql, params()).await {
                Ok(rows) => return Ok(rows),
                Err(e) if attempt < self.retry.max_attempts && is_transient_error(&e) => {
                    let delay = self.retry.delay_for(attempt);
                    tracing::warn!(attempt, ?delay, error = %e, "transient ledger error, retrying");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    async fn test_db() -> PodiumDb {
        PodiumDb::open_local(":memory:").await.unwrap()
    }

    #[tokio::test]
    async fn open_local_creates_schema() {
        let db = test_db().await;

        for table in ["projects", "timeline_entries"] {
            let mut rows = db
                .conn()
                .query(
                    "SELECT name FROM sqlite_master WHERE type='table' AND name=?1",
                    [table],
                )
                .await
                .unwrap();
            let row = rows.next().await.unwrap();
            assert!(row.is_some(), "table '{table}' should exist");
        }

        for trigger in [
            "trg_timeline_evaluation_immutable",
            "trg_project_submitted",
            "trg_project_evaluated",
        ] {
            let mut rows = db
                .conn()
                .query(
                    "SELECT name FROM sqlite_master WHERE type='trigger' AND name=?1",
                    [trigger],
                )
                .await
                .unwrap();
            assert!(rows.next().await.unwrap().is_some(), "trigger '{trigger}' should exist");
        }
    }

    #[tokio::test]
    async fn migrations_are_idempotent() {
        let db = test_db().await;
        db.run_migrations().await.unwrap();
    }

    #[tokio::test]
    async fn generate_id_is_prefixed_and_unique() {
        let db = test_db().await;
        let mut seen = HashSet::new();
        for _ in 0..50 {
            let id = db.generate_id("ent").await.unwrap();
            assert!(podium_core::ids::has_prefix(&id, "ent"), "bad id {id}");
            assert_eq!(id.len(), "ent-".len() + 8);
            assert!(seen.insert(id));
        }
    }

    #[tokio::test]
    async fn open_file_database_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.db");
        let path = path.to_str().unwrap();

        {
            let db = PodiumDb::open_local(path).await.unwrap();
            db.execute_with(
                "INSERT INTO projects (id, team_name, email, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?4)",
                || libsql::params!["prj-00000001", "Team", "t@example.com", "2026-01-01T00:00:00Z"],
            )
            .await
            .unwrap();
        }

        let db = PodiumDb::open_local(path).await.unwrap();
        let mut rows = db
            .query("SELECT team_name FROM projects WHERE id = ?1", ["prj-00000001"])
            .await
            .unwrap();
        let row = rows.next().await.unwrap().unwrap();
        assert_eq!(row.get::<String>(0).unwrap(), "Team");
    }
}
