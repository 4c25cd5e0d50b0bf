//! Inventory item update builder.
//!
//! Stock on hand is not editable here; it only moves through the ledger
//! (receive, checkout, void) or a reconciliation.

use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct ItemUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_stock: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_cost: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Option<String>>,
}

impl ItemUpdate {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.sku.is_none()
            && self.description.is_none()
            && self.minimum_stock.is_none()
            && self.unit_cost.is_none()
            && self.unit.is_none()
            && self.supplier.is_none()
            && self.category.is_none()
    }
}

pub struct ItemUpdateBuilder(ItemUpdate);

impl ItemUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(ItemUpdate::default())
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.0.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn sku(mut self, sku: impl Into<String>) -> Self {
        self.0.sku = Some(sku.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: Option<String>) -> Self {
        self.0.description = Some(description);
        self
    }

    #[must_use]
    pub fn minimum_stock(mut self, minimum_stock: i64) -> Self {
        self.0.minimum_stock = Some(minimum_stock);
        self
    }

    #[must_use]
    pub fn unit_cost(mut self, unit_cost: Decimal) -> Self {
        self.0.unit_cost = Some(unit_cost);
        self
    }

    #[must_use]
    pub fn unit(mut self, unit: impl Into<String>) -> Self {
        self.0.unit = Some(unit.into());
        self
    }

    #[must_use]
    pub fn supplier(mut self, supplier: Option<String>) -> Self {
        self.0.supplier = Some(supplier);
        self
    }

    #[must_use]
    pub fn category(mut self, category: Option<String>) -> Self {
        self.0.category = Some(category);
        self
    }

    #[must_use]
    pub fn build(self) -> ItemUpdate {
        self.0
    }
}

impl Default for ItemUpdateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
