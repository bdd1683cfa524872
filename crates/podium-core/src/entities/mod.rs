//! Entity structs for all Podium domain objects.
//!
//! Each entity maps to a table in the libSQL ledger. All structs derive
//! `Serialize`, `Deserialize`, and `JsonSchema` for JSON output and schema
//! validation.

mod entry;
mod evaluation;
mod project;

pub use entry::TimelineEntry;
pub use evaluation::{Delta, Evaluation, Scores};
pub use project::Project;
