use figment::Jail;
use tally_config::{BackendMode, TallyConfig};

#[test]
fn env_vars_configure_remote_backend() {
    Jail::expect_with(|jail| {
        jail.set_env("TALLY_BACKEND__URL", "libsql://shop.turso.io");
        jail.set_env("TALLY_BACKEND__AUTH_TOKEN", "token");

        let config = TallyConfig::load().expect("config loads");
        assert!(config.backend.is_configured());
        assert_eq!(config.backend.mode(), BackendMode::Remote);
        Ok(())
    });
}

#[test]
fn single_underscore_keys_leave_defaults() {
    Jail::expect_with(|jail| {
        jail.set_env("TALLY_BACKEND_URL", "libsql://shop.turso.io");

        let config = TallyConfig::load().expect("config loads");
        assert!(!config.backend.is_configured());
        Ok(())
    });
}

#[test]
fn numeric_env_values_parse() {
    Jail::expect_with(|jail| {
        jail.set_env("TALLY_REORDER__TOP_ITEMS", "3");
        jail.set_env("TALLY_GENERAL__DEFAULT_LIMIT", "100");

        let config = TallyConfig::load().expect("config loads");
        assert_eq!(config.reorder.top_items, 3);
        assert_eq!(config.general.default_limit, 100);
        Ok(())
    });
}

#[test]
fn backend_url_without_token_fails_to_load() {
    Jail::expect_with(|jail| {
        jail.set_env("TALLY_BACKEND__URL", "libsql://shop.turso.io");

        let error = TallyConfig::load().expect_err("token is required");
        assert!(error.to_string().contains("auth_token"));
        Ok(())
    });
}
