use chrono::NaiveDate;
use tally_db::updates::project::{ProjectUpdate, ProjectUpdateBuilder};

use crate::cli::GlobalFlags;
use crate::commands::shared::actor::resolve_actor;
use crate::commands::shared::lookup;
use crate::commands::shared::parse::{nullable, parse_date};
use crate::context::AppContext;
use crate::output::output;

pub struct UpdateParams<'a> {
    pub name: Option<&'a str>,
    pub description: Option<&'a String>,
    pub start: Option<&'a String>,
    pub end: Option<&'a String>,
}

/// `Some(None)` clears the date.
fn date_change(raw: Option<&String>, field: &str) -> anyhow::Result<Option<Option<NaiveDate>>> {
    nullable(raw)
        .map(|value| value.map(|raw| parse_date(&raw, field)).transpose())
        .transpose()
}

fn build_update(params: &UpdateParams<'_>) -> anyhow::Result<ProjectUpdate> {
    let mut builder = ProjectUpdateBuilder::new();
    if let Some(name) = params.name {
        builder = builder.name(name);
    }
    if let Some(description) = nullable(params.description) {
        builder = builder.description(description);
    }
    if let Some(start) = date_change(params.start, "--start")? {
        builder = builder.start_date(start);
    }
    if let Some(end) = date_change(params.end, "--end")? {
        builder = builder.end_date(end);
    }
    Ok(builder.build())
}

pub async fn run(
    id: &str,
    params: &UpdateParams<'_>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let update = build_update(params)?;
    if update.is_empty() {
        anyhow::bail!("nothing to update: pass at least one field flag");
    }

    let project = lookup::project(ctx, id).await?;
    let actor = resolve_actor(flags, &ctx.config);
    let project = ctx
        .service
        .update_project(&project.id, update, &actor)
        .await?;
    output(&project, flags.format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_end_clears_the_date() {
        let blank = String::new();
        let start = "2026-06-01".to_string();
        let update = build_update(&UpdateParams {
            name: None,
            description: None,
            start: Some(&start),
            end: Some(&blank),
        })
        .expect("build");

        assert_eq!(update.start_date, Some(NaiveDate::from_ymd_opt(2026, 6, 1)));
        assert_eq!(update.end_date, Some(None));
    }

    #[test]
    fn bad_date_is_rejected() {
        let bad = "June 1".to_string();
        let result = build_update(&UpdateParams {
            name: None,
            description: None,
            start: Some(&bad),
            end: None,
        });
        assert!(result.is_err());
    }
}
