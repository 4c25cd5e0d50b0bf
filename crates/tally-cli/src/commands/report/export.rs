use std::path::Path;

use tally_core::reports::UsageReport;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::export;
use crate::output::output;

fn write(
    report: &UsageReport,
    name: &str,
    contents: &str,
    rows: usize,
    out: Option<&Path>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let file_name = export::report_file_name(name, &report.range);
    let path = export::target_path(out, &ctx.export_dir(), &file_name);
    let response = export::write_file(&path, contents, rows)?;
    output(&response, flags.format)
}

pub fn most_used(
    report: &UsageReport,
    out: Option<&Path>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let contents = export::csv::most_used_items(&report.most_used_items)?;
    let rows = report.most_used_items.len();
    write(report, "most-used-items", &contents, rows, out, ctx, flags)
}

pub fn project_expenses(
    report: &UsageReport,
    out: Option<&Path>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let contents = export::csv::project_expenses(&report.project_expenses)?;
    let rows = report.project_expenses.len();
    write(report, "project-expenses", &contents, rows, out, ctx, flags)
}

pub fn monthly(
    report: &UsageReport,
    out: Option<&Path>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let contents = export::csv::monthly_usage(&report.monthly_usage)?;
    let rows = report.monthly_usage.len();
    write(report, "monthly-usage", &contents, rows, out, ctx, flags)
}
