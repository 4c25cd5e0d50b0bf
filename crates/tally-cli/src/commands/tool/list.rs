use tally_core::enums::ToolStatus;
use tally_db::repos::tool::ToolFilter;

use crate::cli::GlobalFlags;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

pub struct ToolListArgs<'a> {
    pub search: Option<&'a str>,
    pub location: Option<&'a str>,
    pub status: Option<&'a str>,
    pub tool_type: Option<&'a str>,
}

pub async fn run(args: &ToolListArgs<'_>, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let filter = ToolFilter {
        search: args.search.map(String::from),
        location: args.location.map(String::from),
        status: args
            .status
            .map(|value| parse_enum::<ToolStatus>(value, "status"))
            .transpose()?,
        tool_type: args.tool_type.map(String::from),
        limit: Some(effective_limit(
            None,
            flags.limit,
            ctx.config.general.default_limit,
        )),
    };
    let tools = ctx.service.list_tools(&filter).await?;
    output(&tools, flags.format)
}
