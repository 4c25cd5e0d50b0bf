use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Serialize;
use tally_config::PROJECT_DIR;
use tally_db::service::TallyService;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::InitArgs;
use crate::output::output;

#[derive(Debug, Serialize)]
struct InitResponse {
    project_root: PathBuf,
    database: PathBuf,
    already_initialized: bool,
    config_written: Option<PathBuf>,
}

/// Handle `tly init`.
pub async fn handle(args: &InitArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let root = match &flags.project {
        Some(path) => PathBuf::from(path),
        None => std::env::current_dir().context("failed to read current directory")?,
    };
    let tally_dir = root.join(PROJECT_DIR);
    let already_initialized = tally_dir.is_dir();
    std::fs::create_dir_all(&tally_dir)
        .with_context(|| format!("failed to create {}", tally_dir.display()))?;

    let config_written = write_project_config(&tally_dir, args)?;

    let database = tally_dir.join(crate::context::DB_FILE);
    TallyService::new_local(&database.to_string_lossy())
        .await
        .with_context(|| format!("failed to create database at {}", database.display()))?;
    tracing::debug!(root = %root.display(), "project initialized");

    output(
        &InitResponse {
            project_root: root,
            database,
            already_initialized,
            config_written,
        },
        flags.format,
    )
}

/// Write `.tally/config.toml` from the init flags. An existing file is left
/// alone.
fn write_project_config(tally_dir: &Path, args: &InitArgs) -> anyhow::Result<Option<PathBuf>> {
    let Some(contents) = project_config(args)? else {
        return Ok(None);
    };
    let path = tally_dir.join("config.toml");
    if path.exists() {
        tracing::warn!(path = %path.display(), "config.toml exists; not overwriting");
        return Ok(None);
    }
    std::fs::write(&path, contents)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(Some(path))
}

fn project_config(args: &InitArgs) -> anyhow::Result<Option<String>> {
    let mut lines = Vec::new();
    if let Some(operator) = &args.operator {
        lines.push(format!("operator = {}", serde_json::to_string(operator.trim())?));
    }
    if let Some(shop) = &args.shop_location {
        lines.push(format!("shop_location = {}", serde_json::to_string(shop.trim())?));
    }
    if lines.is_empty() {
        return Ok(None);
    }
    Ok(Some(format!("[general]\n{}\n", lines.join("\n"))))
}

#[cfg(test)]
mod tests {
    use tally_config::TallyConfig;
    use tempfile::TempDir;

    use super::*;

    fn args(operator: Option<&str>, shop: Option<&str>) -> InitArgs {
        InitArgs {
            operator: operator.map(String::from),
            shop_location: shop.map(String::from),
        }
    }

    #[test]
    fn no_flags_means_no_config_file() {
        assert!(project_config(&args(None, None)).expect("render").is_none());
    }

    #[test]
    fn written_config_loads_through_figment() {
        let temp = TempDir::new().expect("tempdir should create");
        let tally_dir = temp.path().join(PROJECT_DIR);
        std::fs::create_dir(&tally_dir).expect(".tally should create");

        let written = write_project_config(&tally_dir, &args(Some("Dana \"D\" Ruiz"), Some("Warehouse")))
            .expect("write should succeed");
        assert!(written.is_some());

        let config: TallyConfig = TallyConfig::figment_for(Some(temp.path()))
            .extract()
            .expect("config should load");
        assert_eq!(config.general.operator, "Dana \"D\" Ruiz");
        assert_eq!(config.general.shop_location, "Warehouse");
    }

    #[test]
    fn existing_config_is_not_overwritten() {
        let temp = TempDir::new().expect("tempdir should create");
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[general]\noperator = \"kim\"\n").expect("seed config");

        let written = write_project_config(temp.path(), &args(Some("dana"), None))
            .expect("write should succeed");

        assert!(written.is_none());
        assert!(std::fs::read_to_string(&path).expect("read").contains("kim"));
    }
}
