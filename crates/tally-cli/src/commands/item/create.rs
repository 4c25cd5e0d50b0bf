use tally_db::repos::item::NewItem;

use crate::cli::GlobalFlags;
use crate::commands::shared::actor::resolve_actor;
use crate::commands::shared::parse::parse_money;
use crate::context::AppContext;
use crate::output::output;

pub struct CreateParams<'a> {
    pub name: &'a str,
    pub sku: &'a str,
    pub description: Option<&'a str>,
    pub stock: i64,
    pub minimum: i64,
    pub cost: &'a str,
    pub unit: &'a str,
    pub supplier: Option<&'a str>,
    pub category: Option<&'a str>,
}

pub async fn run(params: &CreateParams<'_>, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let new = NewItem {
        name: params.name.to_string(),
        sku: params.sku.to_string(),
        description: params.description.map(String::from),
        current_stock: params.stock,
        minimum_stock: params.minimum,
        unit_cost: parse_money(params.cost, "cost")?,
        unit: params.unit.to_string(),
        supplier: params.supplier.map(String::from),
        category: params.category.map(String::from),
    };

    let actor = resolve_actor(flags, &ctx.config);
    let item = ctx.service.create_item(&new, &actor).await?;
    output(&item, flags.format)
}
