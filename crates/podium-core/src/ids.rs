//! ID prefix constants.
//!
//! IDs are generated by the database layer as `{prefix}-{8 hex chars}`,
//! e.g. `prj-a3f8b2c1`.

pub const PREFIX_PROJECT: &str = "prj";
pub const PREFIX_ENTRY: &str = "ent";

/// Check whether `id` looks like an ID carrying `prefix`.
#[must_use]
pub fn has_prefix(id: &str, prefix: &str) -> bool {
    id.strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('-'))
        .is_some_and(|hex| !hex.is_empty() && hex.chars().all(|c| c.is_ascii_hexdigit()))
}
