use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

/// Handle `tly dashboard`.
pub async fn run(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let stats = ctx.service.dashboard_stats().await?;
    output(&stats, flags.format)
}
