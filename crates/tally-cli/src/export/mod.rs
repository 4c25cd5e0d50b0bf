//! File exports: CSV for sheets and reports, printable HTML for the reorder
//! sheet.

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::NaiveDate;
use serde::Serialize;
use tally_core::reports::DateRange;

pub mod csv;
pub mod print;

/// Report printed after a file is written.
#[derive(Debug, Serialize)]
pub struct ExportResponse {
    pub path: PathBuf,
    pub rows: usize,
}

/// `reorder-sheet-YYYY-MM-DD.{ext}`.
#[must_use]
pub fn reorder_file_name(date: NaiveDate, ext: &str) -> String {
    format!("reorder-sheet-{date}.{ext}")
}

/// `{report}-{start}-to-{end}.csv`.
#[must_use]
pub fn report_file_name(report: &str, range: &DateRange) -> String {
    format!("{report}-{}.csv", range.file_suffix())
}

/// `--out` when given, otherwise `file_name` inside `dir`.
#[must_use]
pub fn target_path(out: Option<&Path>, dir: &Path, file_name: &str) -> PathBuf {
    out.map_or_else(|| dir.join(file_name), Path::to_path_buf)
}

/// Write `contents` to `path`, creating parent directories.
pub fn write_file(path: &Path, contents: &str, rows: usize) -> anyhow::Result<ExportResponse> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create export directory {}", parent.display()))?;
    }
    std::fs::write(path, contents)
        .with_context(|| format!("failed to write export file {}", path.display()))?;
    tracing::debug!(path = %path.display(), rows, "export written");
    Ok(ExportResponse {
        path: path.to_path_buf(),
        rows,
    })
}
