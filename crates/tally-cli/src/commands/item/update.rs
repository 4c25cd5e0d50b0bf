use tally_db::updates::item::{ItemUpdate, ItemUpdateBuilder};

use crate::cli::GlobalFlags;
use crate::commands::shared::actor::resolve_actor;
use crate::commands::shared::lookup;
use crate::commands::shared::parse::{nullable, parse_money};
use crate::context::AppContext;
use crate::output::output;

pub struct UpdateParams<'a> {
    pub name: Option<&'a String>,
    pub sku: Option<&'a String>,
    pub description: Option<&'a String>,
    pub minimum: Option<i64>,
    pub cost: Option<&'a String>,
    pub unit: Option<&'a String>,
    pub supplier: Option<&'a String>,
    pub category: Option<&'a String>,
}

fn build_update(params: &UpdateParams<'_>) -> anyhow::Result<ItemUpdate> {
    let mut builder = ItemUpdateBuilder::new();
    if let Some(name) = params.name {
        builder = builder.name(name);
    }
    if let Some(sku) = params.sku {
        builder = builder.sku(sku);
    }
    if let Some(description) = nullable(params.description) {
        builder = builder.description(description);
    }
    if let Some(minimum) = params.minimum {
        builder = builder.minimum_stock(minimum);
    }
    if let Some(cost) = params.cost {
        builder = builder.unit_cost(parse_money(cost, "cost")?);
    }
    if let Some(unit) = params.unit {
        builder = builder.unit(unit);
    }
    if let Some(supplier) = nullable(params.supplier) {
        builder = builder.supplier(supplier);
    }
    if let Some(category) = nullable(params.category) {
        builder = builder.category(category);
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

    let item = lookup::item(ctx, id).await?;
    let actor = resolve_actor(flags, &ctx.config);
    let item = ctx.service.update_item(&item.id, update, &actor).await?;
    output(&item, flags.format)
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn empty() -> UpdateParams<'static> {
        UpdateParams {
            name: None,
            sku: None,
            description: None,
            minimum: None,
            cost: None,
            unit: None,
            supplier: None,
            category: None,
        }
    }

    #[test]
    fn no_flags_is_empty() {
        assert!(build_update(&empty()).expect("build").is_empty());
    }

    #[test]
    fn empty_supplier_clears_it() {
        let blank = String::new();
        let cost = "12.5".to_string();
        let update = build_update(&UpdateParams {
            supplier: Some(&blank),
            cost: Some(&cost),
            ..empty()
        })
        .expect("build");

        assert_eq!(update.supplier, Some(None));
        assert_eq!(update.unit_cost, Some(Decimal::new(125, 1)));
        assert!(update.name.is_none());
    }
}
