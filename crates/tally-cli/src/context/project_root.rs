use std::path::{Path, PathBuf};

use anyhow::Context;
use tally_config::PROJECT_DIR;

/// Project root for `--project`, or the nearest `.tally` above `cwd`.
///
/// `--project` may name the root itself or its `.tally` directory.
pub fn resolve_project_root(project_override: Option<&str>, cwd: &Path) -> anyhow::Result<PathBuf> {
    let Some(raw) = project_override else {
        return find_project_root(cwd)
            .context("not a tally project (no .tally directory found). Run 'tly init' first.");
    };

    let explicit = PathBuf::from(raw);
    if explicit.file_name().is_some_and(|name| name == PROJECT_DIR) {
        return explicit
            .parent()
            .map(Path::to_path_buf)
            .context("invalid --project path: '.tally' directory has no parent");
    }
    if !explicit.is_dir() {
        anyhow::bail!("invalid --project '{raw}': directory does not exist");
    }
    Ok(explicit)
}

/// Walk upwards from `start` until a `.tally` directory is found.
#[must_use]
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(PROJECT_DIR).is_dir() {
            return Some(current);
        }
        if !current.pop() {
            return None;
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::{find_project_root, resolve_project_root};

    #[test]
    fn finds_project_root_in_current_directory() {
        let temp = TempDir::new().expect("tempdir should create");
        std::fs::create_dir(temp.path().join(".tally")).expect(".tally should create");

        let found = find_project_root(temp.path());
        assert_eq!(found.as_deref(), Some(temp.path()));
    }

    #[test]
    fn finds_project_root_in_parent_directory() {
        let temp = TempDir::new().expect("tempdir should create");
        std::fs::create_dir(temp.path().join(".tally")).expect(".tally should create");
        std::fs::create_dir_all(temp.path().join("bids/2026/q3")).expect("nested dirs should create");

        let found = find_project_root(&temp.path().join("bids/2026/q3"));
        assert_eq!(found.as_deref(), Some(temp.path()));
    }

    #[test]
    fn returns_none_when_not_found() {
        let temp = TempDir::new().expect("tempdir should create");
        std::fs::create_dir_all(temp.path().join("a/b")).expect("nested dirs should create");

        assert!(find_project_root(&temp.path().join("a/b")).is_none());
    }

    #[test]
    fn plain_file_named_tally_is_ignored() {
        let temp = TempDir::new().expect("tempdir should create");
        std::fs::write(temp.path().join(".tally"), "").expect("file should write");

        assert!(find_project_root(temp.path()).is_none());
    }

    #[test]
    fn explicit_tally_dir_resolves_to_its_parent() {
        let temp = TempDir::new().expect("tempdir should create");
        let dot = temp.path().join(".tally");
        let raw = dot.to_string_lossy().to_string();

        let root = resolve_project_root(Some(&raw), temp.path()).expect("root should resolve");
        assert_eq!(root, temp.path());
    }

    #[test]
    fn missing_explicit_dir_is_an_error() {
        let temp = TempDir::new().expect("tempdir should create");
        let raw = temp.path().join("nope").to_string_lossy().to_string();

        let err = resolve_project_root(Some(&raw), temp.path()).expect_err("should fail");
        assert!(err.to_string().contains("does not exist"));
    }
}
