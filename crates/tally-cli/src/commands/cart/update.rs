use tally_db::updates::cart::CartUpdateBuilder;

use crate::cli::GlobalFlags;
use crate::commands::shared::actor::resolve_actor;
use crate::commands::shared::lookup;
use crate::commands::shared::parse::{nullable, parse_cart_line};
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    id: &str,
    to: Option<&str>,
    notes: Option<&String>,
    lines: &[String],
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let mut builder = CartUpdateBuilder::new();
    if let Some(to) = to {
        builder = builder.project_id(lookup::project(ctx, to).await?.id);
    }
    if let Some(notes) = nullable(notes) {
        builder = builder.notes(notes);
    }
    if !lines.is_empty() {
        let parsed = lines
            .iter()
            .map(String::as_str)
            .map(parse_cart_line)
            .collect::<anyhow::Result<Vec<_>>>()?;
        builder = builder.lines(lookup::item_lines(ctx, parsed).await?);
    }

    let update = builder.build();
    if update.is_empty() {
        anyhow::bail!("nothing to update: pass --to, --notes or --line");
    }

    let actor = resolve_actor(flags, &ctx.config);
    let response = ctx.service.update_cart(id, update, &actor).await?;
    output(&response, flags.format)
}
