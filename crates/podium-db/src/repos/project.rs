//! Project repository: registration, lookup, and the sequence counter.

use chrono::Utc;

use podium_core::entities::Project;
use podium_core::enums::ProjectStatus;
use podium_core::ids::PREFIX_PROJECT;

use crate::error::DatabaseError;
use crate::helpers::{format_timestamp, parse_datetime, parse_enum};
use crate::service::Ledger;

pub(crate) const PROJECT_COLUMNS: &str = "id, team_name, email, status, created_at, updated_at";

pub(crate) fn row_to_project(row: &libsql::Row) -> Result<Project, DatabaseError> {
    Ok(Project {
        id: row.get::<String>(0)?,
        team_name: row.get::<String>(1)?,
        email: row.get::<String>(2)?,
        status: parse_enum(&row.get::<String>(3)?)?,
        created_at: parse_datetime(&row.get::<String>(4)?)?,
        updated_at: parse_datetime(&row.get::<String>(5)?)?,
    })
}

impl Ledger {
    pub async fn create_project(&self, team_name: &str, email: &str) -> Result<Project, DatabaseError> {
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_PROJECT).await?;
        let ts = format_timestamp(now);
        let team_name = team_name.trim();
        let email = email.trim();

        self.db()
            .execute_with(
                "INSERT INTO projects (id, team_name, email, status, last_sequence, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, 0, ?5, ?6)",
                || {
                    libsql::params![
                        id.as_str(),
                        team_name,
                        email,
                        ProjectStatus::Active.as_str(),
                        ts.as_str(),
                        ts.as_str()
                    ]
                },
            )
            .await?;

        tracing::info!(project_id = %id, team = team_name, "project registered");

        Ok(Project {
            id,
            team_name: team_name.to_string(),
            email: email.to_string(),
            status: ProjectStatus::Active,
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn get_project(&self, id: &str) -> Result<Project, DatabaseError> {
        let mut rows = self
            .db()
            .query(
                &format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_project(&row)
    }

    pub async fn list_projects(&self, limit: u32) -> Result<Vec<Project>, DatabaseError> {
        let mut rows = self
            .db()
            .query(
                &format!(
                    "SELECT {PROJECT_COLUMNS} FROM projects ORDER BY created_at ASC, id ASC LIMIT ?1"
                ),
                [i64::from(limit)],
            )
            .await?;
        let mut projects = Vec::new();
        while let Some(row) = rows.next().await? {
            projects.push(row_to_project(&row)?);
        }
        Ok(projects)
    }

    /// Reserve the next sequence number for a project.
    ///
    /// A single `UPDATE ... RETURNING` on the project's counter, so concurrent
    /// callers always receive distinct values. A reserved number whose entry is
    /// never written leaves a gap; numbers are never reused.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if the project does not exist.
    pub async fn next_sequence(&self, project_id: &str) -> Result<i64, DatabaseError> {
        let ts = format_timestamp(Utc::now());
        let mut rows = self
            .db()
            .query_with(
                "UPDATE projects
                 SET last_sequence = last_sequence + 1, updated_at = ?1
                 WHERE id = ?2
                 RETURNING last_sequence",
                || libsql::params![ts.as_str(), project_id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<i64>(0)?)
    }
}
