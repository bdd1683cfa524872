//! Ledger (libSQL) storage configuration.

use serde::{Deserialize, Serialize};

fn default_path() -> String {
    ".podium/podium.db".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LedgerConfig {
    /// Path of the local libSQL database file. `:memory:` for a throwaway ledger.
    #[serde(default = "default_path")]
    pub path: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
        }
    }
}

impl LedgerConfig {
    pub fn is_in_memory(&self) -> bool {
        self.path == ":memory:"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_path_is_project_local() {
        let config = LedgerConfig::default();
        assert_eq!(config.path, ".podium/podium.db");
        assert!(!config.is_in_memory());
    }
}
