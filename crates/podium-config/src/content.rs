//! Content store configuration (where file and image references resolve).

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_root() -> String {
    ".podium/uploads".to_string()
}

const fn default_max_file_bytes() -> u64 {
    256 * 1024
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ContentConfig {
    /// Directory that file references are resolved against.
    #[serde(default = "default_root")]
    pub root: String,

    /// Files larger than this are read only up to the limit.
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            max_file_bytes: default_max_file_bytes(),
        }
    }
}

impl ContentConfig {
    pub fn root_path(&self) -> PathBuf {
        PathBuf::from(&self.root)
    }
}
