use anyhow::Context;

use podium_config::PodiumConfig;

use crate::cli::GlobalFlags;

/// Load `.env`, then the layered configuration, then apply CLI overrides.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<PodiumConfig> {
    load_dotenv()?;
    let mut config = PodiumConfig::load().context("failed to load podium configuration")?;
    apply_overrides(&mut config, flags);
    Ok(config)
}

fn load_dotenv() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().context("failed to determine current directory")?;
    let env_path = cwd.join(".env");
    if env_path.exists() {
        dotenvy::from_path(&env_path)
            .with_context(|| format!("failed to load dotenv file at {}", env_path.display()))?;
    }
    Ok(())
}

fn apply_overrides(config: &mut PodiumConfig, flags: &GlobalFlags) {
    if let Some(ledger) = &flags.ledger {
        config.ledger.path.clone_from(ledger);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::apply_overrides;
    use crate::cli::{ColorMode, GlobalFlags, OutputFormat};

    fn flags(ledger: Option<&str>) -> GlobalFlags {
        GlobalFlags {
            format: OutputFormat::Json,
            color: ColorMode::Never,
            limit: None,
            quiet: false,
            ledger: ledger.map(str::to_string),
        }
    }

    #[test]
    fn ledger_flag_replaces_configured_path() {
        let mut config = podium_config::PodiumConfig::default();
        apply_overrides(&mut config, &flags(Some("/tmp/other.db")));
        assert_eq!(config.ledger.path, "/tmp/other.db");
    }

    #[test]
    fn no_flag_keeps_configured_path() {
        let mut config = podium_config::PodiumConfig::default();
        apply_overrides(&mut config, &flags(None));
        assert_eq!(config.ledger.path, ".podium/podium.db");
    }
}
