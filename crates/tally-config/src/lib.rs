//! # tally-config
//!
//! Layered configuration loading for Tally using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`TALLY_*` prefix, `__` as separator)
//! 2. Project-level `.tally/config.toml`
//! 3. User-level `~/.config/tally/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `TALLY_BACKEND__URL` -> `backend.url`,
//! `TALLY_GENERAL__OPERATOR` -> `general.operator`, etc.
//! The `__` (double underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use tally_config::TallyConfig;
//!
//! let config = TallyConfig::load_with_dotenv().expect("config");
//!
//! if config.backend.is_configured() {
//!     println!("Turso URL: {}", config.backend.url);
//! }
//! ```

mod backend;
mod error;
mod general;
mod reorder;

pub use backend::{BackendConfig, BackendMode};
pub use error::ConfigError;
pub use general::GeneralConfig;
pub use reorder::ReorderConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Project directory holding the database and project config.
pub const PROJECT_DIR: &str = ".tally";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TallyConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub reorder: ReorderConfig,
}

impl TallyConfig {
    /// Load configuration from all sources, reading the project config from
    /// `.tally/config.toml` relative to the current directory.
    ///
    /// Does NOT call `dotenvy`. Use [`Self::load_with_dotenv`] for `.env` loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source fails to parse or a value is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment())
    }

    /// Load configuration for the project rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source fails to parse or a value is invalid.
    pub fn load_for_project(root: &Path) -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment_for(Some(root)))
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source fails to parse or a value is invalid.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.backend.validate()?;
        config.reorder.validate()?;
        Ok(config)
    }

    /// Build the figment provider chain using the current directory as the
    /// project root.
    #[must_use]
    pub fn figment() -> Figment {
        Self::figment_for(None)
    }

    /// Build the figment provider chain.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    #[must_use]
    pub fn figment_for(project_root: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        // Layer 2: Project-local config
        let local_path = project_root.map_or_else(
            || PathBuf::from(PROJECT_DIR).join("config.toml"),
            |root| root.join(PROJECT_DIR).join("config.toml"),
        );
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("TALLY_").split("__"))
    }

    /// Path to the user-global config file.
    #[must_use]
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("tally").join("config.toml"))
    }

    /// Directory exports are written to when `--out` is not given.
    #[must_use]
    pub fn export_dir(&self) -> PathBuf {
        if self.general.export_dir.is_empty() {
            PathBuf::from(".")
        } else {
            PathBuf::from(&self.general.export_dir)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_loads() {
        let config = TallyConfig::default();
        assert!(!config.backend.is_configured());
        assert_eq!(config.backend.mode(), BackendMode::Local);
        assert_eq!(config.general.shop_location, "shop");
        assert_eq!(config.reorder.target_multiplier, 2);
        assert_eq!(config.export_dir(), PathBuf::from("."));
    }

    #[test]
    fn figment_builds_without_files() {
        figment::Jail::expect_with(|_jail| {
            let config: TallyConfig = TallyConfig::figment().extract()?;
            assert!(!config.backend.is_configured());
            assert_eq!(config.general.default_limit, 20);
            assert_eq!(config.reorder.top_items, 10);
            Ok(())
        });
    }
}
