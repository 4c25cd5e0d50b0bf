mod export;

use chrono::Utc;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::ReportCommands;
use crate::commands::shared::parse::parse_range;
use crate::context::AppContext;
use crate::output::output;

/// Handle `tly report`.
pub async fn handle(
    action: &ReportCommands,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let today = Utc::now().date_naive();
    let top_items = ctx.config.reorder.top_items;

    match action {
        ReportCommands::Usage { range } => {
            let range = parse_range(range, today)?;
            let report = ctx.service.usage_report(range, top_items).await?;
            output(&report, flags.format)
        }
        ReportCommands::MostUsed {
            range,
            top,
            csv,
            out,
        } => {
            let range = parse_range(range, today)?;
            let report = ctx
                .service
                .usage_report(range, top.unwrap_or(top_items))
                .await?;
            if *csv {
                return export::most_used(&report, out.as_deref(), ctx, flags);
            }
            output(&report.most_used_items, flags.format)
        }
        ReportCommands::ProjectExpenses { range, csv, out } => {
            let range = parse_range(range, today)?;
            let report = ctx.service.usage_report(range, top_items).await?;
            if *csv {
                return export::project_expenses(&report, out.as_deref(), ctx, flags);
            }
            output(&report.project_expenses, flags.format)
        }
        ReportCommands::Monthly { range, csv, out } => {
            let range = parse_range(range, today)?;
            let report = ctx.service.usage_report(range, top_items).await?;
            if *csv {
                return export::monthly(&report, out.as_deref(), ctx, flags);
            }
            output(&report.monthly_usage, flags.format)
        }
    }
}
