//! Shared test utilities for podium-db tests.

#[cfg(test)]
pub(crate) mod helpers {
    use podium_core::entities::{Delta, Evaluation, Project, Scores};

    use crate::PodiumDb;
    use crate::service::Ledger;

    /// Create an in-memory ledger.
    pub async fn test_ledger() -> Ledger {
        let db = PodiumDb::open_local(":memory:").await.unwrap();
        Ledger::from_db(db)
    }

    /// Register a project with throwaway contact details.
    pub async fn register_test_project(ledger: &Ledger, team: &str) -> Project {
        ledger
            .create_project(team, &format!("{}@example.com", team.to_lowercase()))
            .await
            .unwrap()
    }

    /// A genuine evaluation with every sub-score set to `sub` and the given delta.
    pub fn evaluation_with(sub: f64, delta: Delta) -> Evaluation {
        Evaluation {
            scores: Scores::from_sub_scores([sub; 6]),
            evidence: vec!["clear problem statement".into()],
            gaps: vec!["no pricing".into()],
            delta,
            degraded: false,
            evaluated_at: chrono::Utc::now(),
        }
    }
}
