//! Submission intake limits.

use serde::{Deserialize, Serialize};

const fn default_max_content_bytes() -> usize {
    64 * 1024
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IngestConfig {
    /// Largest accepted submission payload, in bytes.
    #[serde(default = "default_max_content_bytes")]
    pub max_content_bytes: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            max_content_bytes: default_max_content_bytes(),
        }
    }
}
