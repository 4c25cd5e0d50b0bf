//! libSQL backend configuration.
//!
//! An empty `url` means the local `.tally/tally.db` file. A `libsql://` URL
//! with an auth token means a hosted Turso database, and adding
//! `local_replica_path` turns that into an embedded replica.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Default sync interval in seconds.
const fn default_sync_interval_secs() -> u64 {
    60
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendConfig {
    /// Database URL (e.g., `libsql://shop-inventory.turso.io`).
    #[serde(default)]
    pub url: String,

    /// Database auth token.
    #[serde(default)]
    pub auth_token: String,

    /// Local replica path for embedded replica mode.
    #[serde(default)]
    pub local_replica_path: String,

    /// Sync interval for embedded replicas, in seconds.
    #[serde(default = "default_sync_interval_secs")]
    pub sync_interval_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            auth_token: String::new(),
            local_replica_path: String::new(),
            sync_interval_secs: default_sync_interval_secs(),
        }
    }
}

/// Which libSQL mode a [`BackendConfig`] resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendMode {
    Local,
    Remote,
    Replica,
}

impl BackendConfig {
    /// Check if the backend has the minimum required fields for remote access.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.url.is_empty() && !self.auth_token.is_empty()
    }

    /// Check if embedded replica mode is enabled.
    #[must_use]
    pub fn has_local_replica(&self) -> bool {
        !self.local_replica_path.is_empty()
    }

    #[must_use]
    pub fn mode(&self) -> BackendMode {
        match (self.is_configured(), self.has_local_replica()) {
            (false, _) => BackendMode::Local,
            (true, false) => BackendMode::Remote,
            (true, true) => BackendMode::Replica,
        }
    }

    /// # Errors
    ///
    /// Returns `ConfigError::MissingAuthToken` when a URL is set without a token.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.url.is_empty() && self.auth_token.is_empty() {
            return Err(ConfigError::MissingAuthToken {
                url: self.url.clone(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_without_token_is_rejected() {
        let config = BackendConfig {
            url: "libsql://shop.turso.io".into(),
            ..BackendConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingAuthToken { .. })
        ));
        assert!(BackendConfig::default().validate().is_ok());
    }

    #[test]
    fn default_is_local() {
        let config = BackendConfig::default();
        assert!(!config.is_configured());
        assert_eq!(config.sync_interval_secs, 60);
        assert_eq!(config.mode(), BackendMode::Local);
    }

    #[test]
    fn remote_when_url_and_token_set() {
        let config = BackendConfig {
            url: "libsql://shop.turso.io".into(),
            auth_token: "token123".into(),
            ..Default::default()
        };
        assert!(config.is_configured());
        assert_eq!(config.mode(), BackendMode::Remote);
    }

    #[test]
    fn replica_requires_remote_fields() {
        let mut config = BackendConfig {
            local_replica_path: "./replica.db".into(),
            ..Default::default()
        };
        assert_eq!(config.mode(), BackendMode::Local);

        config.url = "libsql://shop.turso.io".into();
        config.auth_token = "token123".into();
        assert_eq!(config.mode(), BackendMode::Replica);
    }
}
