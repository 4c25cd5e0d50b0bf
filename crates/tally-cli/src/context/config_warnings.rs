use tally_config::{GeneralConfig, ReorderConfig, TallyConfig};

/// Emit warnings for likely mistyped env var keys that silently fell back to defaults.
pub fn warn_unconfigured(config: &TallyConfig) {
    for warning in collect_unconfigured_warnings(config, std::env::vars()) {
        tracing::warn!("{warning}");
    }
}

fn collect_unconfigured_warnings<I>(config: &TallyConfig, env: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let env_keys = env.into_iter().map(|(key, _)| key).collect::<Vec<_>>();

    let mut warnings = Vec::new();

    if !config.backend.is_configured() && has_env_prefix(&env_keys, "TALLY_BACKEND") {
        warnings.push(
            "Backend config appears default while TALLY_BACKEND* env vars exist. Use double underscores (example: TALLY_BACKEND__URL)."
                .to_string(),
        );
    }

    if general_is_default(&config.general) && has_env_prefix(&env_keys, "TALLY_GENERAL") {
        warnings.push(
            "General config appears default while TALLY_GENERAL* env vars exist. Use double underscores (example: TALLY_GENERAL__OPERATOR)."
                .to_string(),
        );
    }

    if reorder_is_default(&config.reorder) && has_env_prefix(&env_keys, "TALLY_REORDER") {
        warnings.push(
            "Reorder config appears default while TALLY_REORDER* env vars exist. Use double underscores (example: TALLY_REORDER__TARGET_MULTIPLIER)."
                .to_string(),
        );
    }

    warnings
}

fn general_is_default(general: &GeneralConfig) -> bool {
    let defaults = GeneralConfig::default();
    general.default_limit == defaults.default_limit
        && general.operator == defaults.operator
        && general.shop_location == defaults.shop_location
        && general.export_dir == defaults.export_dir
}

fn reorder_is_default(reorder: &ReorderConfig) -> bool {
    let defaults = ReorderConfig::default();
    reorder.target_multiplier == defaults.target_multiplier && reorder.top_items == defaults.top_items
}

fn has_env_prefix(keys: &[String], prefix: &str) -> bool {
    keys.iter().any(|key| key.starts_with(prefix))
}

#[cfg(test)]
mod tests {
    use tally_config::{BackendConfig, GeneralConfig, TallyConfig};

    use super::collect_unconfigured_warnings;

    #[test]
    fn warns_for_unconfigured_sections_with_env_prefixes() {
        let config = TallyConfig::default();
        let warnings = collect_unconfigured_warnings(
            &config,
            vec![
                ("TALLY_BACKEND_URL".to_string(), "libsql://shop".to_string()),
                ("TALLY_GENERAL_OPERATOR".to_string(), "dana".to_string()),
                ("TALLY_REORDER_TOP_ITEMS".to_string(), "5".to_string()),
            ],
        );

        assert_eq!(warnings.len(), 3);
        assert!(warnings[0].contains("TALLY_BACKEND__URL"));
    }

    #[test]
    fn does_not_warn_when_sections_are_configured() {
        let config = TallyConfig {
            backend: BackendConfig {
                url: "libsql://shop.turso.io".to_string(),
                auth_token: "token".to_string(),
                ..Default::default()
            },
            general: GeneralConfig {
                operator: "dana".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };

        let warnings = collect_unconfigured_warnings(
            &config,
            vec![
                ("TALLY_BACKEND__URL".to_string(), "libsql://shop.turso.io".to_string()),
                ("TALLY_GENERAL__OPERATOR".to_string(), "dana".to_string()),
            ],
        );

        assert!(warnings.is_empty());
    }

    #[test]
    fn ignores_unrelated_env_vars() {
        let warnings = collect_unconfigured_warnings(
            &TallyConfig::default(),
            vec![
                ("TALLY_LOG".to_string(), "debug".to_string()),
                ("HOME".to_string(), "/home/dana".to_string()),
            ],
        );

        assert!(warnings.is_empty());
    }
}
