use std::path::{Path, PathBuf};

use anyhow::Context;
use tally_config::{BackendMode, PROJECT_DIR, TallyConfig};
use tally_db::service::TallyService;

/// File name of the local database inside `.tally/`.
pub const DB_FILE: &str = "tally.db";

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub service: TallyService,
    pub config: TallyConfig,
    pub project_root: PathBuf,
}

impl AppContext {
    /// Open the configured backend for the project at `project_root`.
    ///
    /// A hosted backend that cannot be reached falls back to the local
    /// database file, with a notice on stderr.
    pub async fn init(project_root: PathBuf, config: TallyConfig) -> anyhow::Result<Self> {
        let db_path = project_root.join(PROJECT_DIR).join(DB_FILE);

        let service = match TallyService::from_config(&config, &db_path).await {
            Ok(service) => service,
            Err(error) if config.backend.mode() != BackendMode::Local => {
                tracing::debug!(?error, "hosted backend open failed");
                // Printed even under --quiet: writes now land in the local file.
                eprintln!("{}", fallback_notice(&error, &db_path));
                TallyService::new_local(&db_path.to_string_lossy())
                    .await
                    .context("failed to initialize tally-db service")?
                    .with_shop_location(&config.general.shop_location)
            }
            Err(error) => {
                return Err(error).context("failed to initialize tally-db service");
            }
        };

        Ok(Self {
            service,
            config,
            project_root,
        })
    }

    /// Where export files go when `--out` is not given. Relative export
    /// directories resolve against the project root.
    #[must_use]
    pub fn export_dir(&self) -> PathBuf {
        let dir = self.config.export_dir();
        if dir.is_absolute() {
            dir
        } else {
            self.project_root.join(dir)
        }
    }
}

fn fallback_notice(error: &impl std::fmt::Display, db_path: &Path) -> String {
    format!(
        "tly: hosted database unreachable ({error}); using local {} until it is back",
        db_path.display()
    )
}
