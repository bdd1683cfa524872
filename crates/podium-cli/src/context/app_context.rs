use anyhow::Context;

use podium_config::PodiumConfig;
use podium_pipeline::Podium;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub podium: Podium,
    pub config: PodiumConfig,
}

impl AppContext {
    pub async fn init(config: PodiumConfig) -> anyhow::Result<Self> {
        let podium = Podium::open(&config)
            .await
            .with_context(|| format!("failed to open ledger at {}", config.ledger.path))?;
        tracing::debug!(ledger = %config.ledger.path, "podium context ready");
        Ok(Self { podium, config })
    }
}
