//! # podium-pipeline
//!
//! The asynchronous evaluation and leaderboard-consistency pipeline.
//!
//! ```text
//! IngestionGateway ──append──▶ Ledger ◀──commit── EvaluationOrchestrator
//!        └──────── spawn (tracked) ──────────────────────▲
//! LeaderboardResolver ──read──▶ Ledger
//! Sweeper ──re-run──▶ EvaluationOrchestrator
//! ```
//!
//! [`Podium`] wires the pieces together around one shared store handle.

pub mod error;
pub mod gateway;
pub mod leaderboard;
pub mod orchestrator;
pub mod podium;
pub mod settings;
pub mod store;
pub mod sweep;
pub mod tracker;

pub use error::PipelineError;
pub use podium::Podium;
pub use settings::PipelineSettings;
pub use store::LedgerStore;
pub use sweep::SweepReport;
pub use tracker::EvaluationOutcome;
