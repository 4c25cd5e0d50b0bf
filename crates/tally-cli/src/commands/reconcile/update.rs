use tally_db::updates::reconciliation::ReconciliationUpdateBuilder;

use crate::cli::GlobalFlags;
use crate::commands::shared::actor::resolve_actor;
use crate::commands::shared::lookup;
use crate::commands::shared::parse::{nullable, parse_count_line};
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    id: &str,
    by: Option<&str>,
    notes: Option<&String>,
    counts: &[String],
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let mut builder = ReconciliationUpdateBuilder::new();
    if let Some(by) = by {
        builder = builder.reconciled_by(by);
    }
    if let Some(notes) = nullable(notes) {
        builder = builder.notes(notes);
    }
    if !counts.is_empty() {
        let parsed = counts
            .iter()
            .map(String::as_str)
            .map(parse_count_line)
            .collect::<anyhow::Result<Vec<_>>>()?;
        builder = builder.counts(lookup::item_lines(ctx, parsed).await?);
    }

    let update = builder.build();
    if update.is_empty() {
        anyhow::bail!("nothing to update: pass --by, --notes or --count");
    }

    let actor = resolve_actor(flags, &ctx.config);
    let detail = ctx
        .service
        .update_reconciliation(id, update, &actor)
        .await?;
    output(&detail, flags.format)
}
