//! Repository methods on `Ledger`, one module per table.

pub mod entry;
pub mod project;

pub use entry::{CommitResult, ProjectStanding};
