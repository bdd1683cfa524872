//! # podium-config
//!
//! Layered configuration loading for Podium using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`PODIUM_*` prefix, `__` as separator)
//! 2. Project-level `.podium/config.toml`
//! 3. User-level `~/.config/podium/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `PODIUM_SCORING__BASE_URL` -> `scoring.base_url`,
//! `PODIUM_EVALUATION__CONTEXT_ENTRIES` -> `evaluation.context_entries`, etc.
//! The `__` (double underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use podium_config::PodiumConfig;
//!
//! let config = PodiumConfig::load_with_dotenv().expect("config");
//! if config.scoring.is_configured() {
//!     println!("Scoring model: {}", config.scoring.model);
//! }
//! ```

mod content;
mod error;
mod evaluation;
mod general;
mod ingest;
mod ledger;
mod scoring;

pub use content::ContentConfig;
pub use error::ConfigError;
pub use evaluation::EvaluationConfig;
pub use general::GeneralConfig;
pub use ingest::IngestConfig;
pub use ledger::LedgerConfig;
pub use scoring::ScoringConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PodiumConfig {
    #[serde(default)]
    pub ledger: LedgerConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub evaluation: EvaluationConfig,
    #[serde(default)]
    pub ingest: IngestConfig,
    #[serde(default)]
    pub content: ContentConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl PodiumConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source cannot be parsed or a value is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source cannot be parsed or a value is invalid.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add providers on top.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".podium/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("PODIUM_").split("__"))
    }

    /// Reject values that would make the pipeline unable to make progress.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.evaluation.commit_max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "evaluation.commit_max_attempts".into(),
                reason: "must be at least 1".into(),
            });
        }
        if self.evaluation.prompt_char_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "evaluation.prompt_char_limit".into(),
                reason: "must be greater than 0".into(),
            });
        }
        if self.scoring.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "scoring.timeout_secs".into(),
                reason: "must be greater than 0".into(),
            });
        }
        if self.evaluation.store_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "evaluation.store_timeout_ms".into(),
                reason: "must be greater than 0".into(),
            });
        }
        if self.ingest.max_content_bytes == 0 {
            return Err(ConfigError::InvalidValue {
                field: "ingest.max_content_bytes".into(),
                reason: "must be greater than 0".into(),
            });
        }
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("podium").join("config.toml"))
    }

    /// Load `.env` from the workspace root.
    ///
    /// Walks up from `CARGO_MANIFEST_DIR` (if available) looking for a `.env`
    /// file, then falls back to the current directory.
    fn load_dotenv_from_workspace() {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            // crate -> crates/ -> workspace root
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }

        let _ = dotenvy::dotenv();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_config_loads() {
        let config = PodiumConfig::default();
        assert!(!config.scoring.is_configured());
        assert_eq!(config.ledger.path, ".podium/podium.db");
        assert_eq!(config.ingest.max_content_bytes, 64 * 1024);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn figment_builds_without_files() {
        let config: PodiumConfig = PodiumConfig::figment()
            .extract()
            .expect("should extract defaults");
        assert_eq!(config.general.default_limit, 20);
        assert_eq!(config.evaluation.context_entries, 3);
    }

    #[test]
    fn zero_attempts_is_rejected() {
        let mut config = PodiumConfig::default();
        config.evaluation.commit_max_attempts = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("evaluation.commit_max_attempts"));
    }
}
