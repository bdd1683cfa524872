use podium_config::PodiumConfig;

/// Emit warnings for likely mistyped env var keys that silently fell back to defaults.
pub fn warn_unconfigured(config: &PodiumConfig) {
    for warning in collect_unconfigured_warnings(config, std::env::vars()) {
        tracing::warn!("{warning}");
    }
}

fn collect_unconfigured_warnings<I>(config: &PodiumConfig, env: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let env_keys = env.into_iter().map(|(key, _)| key).collect::<Vec<_>>();
    let mut warnings = Vec::new();

    if !config.scoring.is_configured() {
        if has_single_underscore_key(&env_keys, "PODIUM_SCORING") {
            warnings.push(
                "Scoring config appears default while PODIUM_SCORING_* env vars exist. Use double underscores (example: PODIUM_SCORING__BASE_URL)."
                    .to_string(),
            );
        } else {
            warnings.push(
                "No scoring engine configured; every evaluation will use the fallback heuristic."
                    .to_string(),
            );
        }
    }

    warnings
}

fn has_single_underscore_key(keys: &[String], prefix: &str) -> bool {
    keys.iter().any(|key| {
        key.strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('_') && !rest.starts_with("__"))
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::collect_unconfigured_warnings;
    use podium_config::PodiumConfig;

    fn env(keys: &[&str]) -> Vec<(String, String)> {
        keys.iter().map(|k| ((*k).to_string(), "x".to_string())).collect()
    }

    #[test]
    fn flags_single_underscore_scoring_keys() {
        let warnings =
            collect_unconfigured_warnings(&PodiumConfig::default(), env(&["PODIUM_SCORING_BASE_URL"]));
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("PODIUM_SCORING__BASE_URL"));
    }

    #[test]
    fn notes_missing_engine_without_env_hints() {
        let warnings = collect_unconfigured_warnings(&PodiumConfig::default(), env(&["HOME"]));
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("fallback heuristic"));
    }

    #[test]
    fn configured_engine_produces_no_warnings() {
        let mut config = PodiumConfig::default();
        config.scoring.base_url = "https://llm.example.com/v1".into();
        config.scoring.model = "judge-small".into();
        assert!(collect_unconfigured_warnings(&config, env(&[])).is_empty());
    }
}
