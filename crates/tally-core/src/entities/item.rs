use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A stocked consumable (paint, tape, rollers, ...).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct InventoryItem {
    pub id: String,
    pub name: String,
    pub sku: String,
    pub description: Option<String>,
    pub current_stock: i64,
    pub minimum_stock: i64,
    pub unit_cost: Decimal,
    pub unit: String,
    pub supplier: Option<String>,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InventoryItem {
    /// At or below the reorder threshold.
    #[must_use]
    pub const fn is_low_stock(&self) -> bool {
        self.current_stock <= self.minimum_stock
    }

    /// Case-insensitive substring match over name, SKU and description.
    #[must_use]
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.name.to_lowercase().contains(&term)
            || self.sku.to_lowercase().contains(&term)
            || self
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&term))
    }
}
