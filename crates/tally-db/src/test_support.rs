//! Shared test utilities for tally-db unit tests.

pub(crate) mod helpers {
    use rust_decimal::Decimal;
    use tally_core::entities::{InventoryItem, Project};

    use crate::TallyDb;
    use crate::repos::item::NewItem;
    use crate::service::TallyService;

    pub const ACTOR: &str = "dana";

    /// Create an in-memory TallyService.
    pub async fn test_service() -> TallyService {
        let db = TallyDb::open_local(":memory:").await.unwrap();
        TallyService::from_db(db)
    }

    /// Create an item with the given stock levels and unit cost in cents.
    pub async fn seed_item(
        svc: &TallyService,
        name: &str,
        sku: &str,
        stock: i64,
        minimum: i64,
        cost_cents: i64,
    ) -> InventoryItem {
        svc.create_item(
            &NewItem {
                name: name.into(),
                sku: sku.into(),
                current_stock: stock,
                minimum_stock: minimum,
                unit_cost: Decimal::new(cost_cents, 2),
                ..NewItem::default()
            },
            ACTOR,
        )
        .await
        .unwrap()
    }

    /// Create an active project.
    pub async fn seed_project(svc: &TallyService, name: &str) -> Project {
        svc.create_project(name, None, None, None, ACTOR).await.unwrap()
    }
}
