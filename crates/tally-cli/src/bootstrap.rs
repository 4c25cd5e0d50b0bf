use std::path::{Path, PathBuf};

use anyhow::Context;
use tally_config::{PROJECT_DIR, TallyConfig};

use crate::cli::GlobalFlags;

/// Load `.env` for the selected project, then the layered config.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<TallyConfig> {
    let root = load_project_dotenv(flags)?;
    let config = match root {
        Some(root) => TallyConfig::load_for_project(&root),
        None => TallyConfig::load(),
    };
    config.context("failed to load tally configuration")
}

/// Returns the project root the dotenv lookup settled on, if any.
fn load_project_dotenv(flags: &GlobalFlags) -> anyhow::Result<Option<PathBuf>> {
    if let Some(project) = &flags.project {
        let root = strip_project_dir(PathBuf::from(project));
        load_env_file(&root)?;
        return Ok(Some(root));
    }

    let cwd = std::env::current_dir().context("failed to determine current directory")?;
    if let Some(project_root) = crate::context::find_project_root(&cwd) {
        if !load_env_file(&project_root)? {
            dotenvy::dotenv().ok();
        }
        return Ok(Some(project_root));
    }

    dotenvy::dotenv().ok();
    Ok(None)
}

fn load_env_file(root: &Path) -> anyhow::Result<bool> {
    let env_path = root.join(".env");
    if !env_path.exists() {
        return Ok(false);
    }
    dotenvy::from_path(&env_path)
        .with_context(|| format!("failed to load dotenv file at {}", env_path.display()))?;
    Ok(true)
}

fn strip_project_dir(path: PathBuf) -> PathBuf {
    if path
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name == PROJECT_DIR)
    {
        return path.parent().map(Path::to_path_buf).unwrap_or(path);
    }
    path
}
