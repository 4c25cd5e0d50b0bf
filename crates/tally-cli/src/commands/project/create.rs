use crate::cli::GlobalFlags;
use crate::commands::shared::actor::resolve_actor;
use crate::commands::shared::parse::parse_date;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    name: &str,
    description: Option<&str>,
    start: Option<&str>,
    end: Option<&str>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let start_date = start.map(|raw| parse_date(raw, "--start")).transpose()?;
    let end_date = end.map(|raw| parse_date(raw, "--end")).transpose()?;

    let actor = resolve_actor(flags, &ctx.config);
    let project = ctx
        .service
        .create_project(name, description, start_date, end_date, &actor)
        .await?;
    output(&project, flags.format)
}
