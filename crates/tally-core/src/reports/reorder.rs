//! Reorder sheet: items at or below their minimum with a recommended order.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::InventoryItem;
use crate::pricing::line_total;

/// Label used when an item has no supplier.
pub const UNKNOWN_SUPPLIER: &str = "Unknown Supplier";

/// Recommended order quantity: enough to reach `multiplier × minimum`, never
/// less than one minimum's worth. Saturates at the `i64` bounds.
#[must_use]
pub fn recommended_order(current_stock: i64, minimum_stock: i64, multiplier: i64) -> i64 {
    minimum_stock
        .saturating_mul(multiplier)
        .saturating_sub(current_stock)
        .max(minimum_stock)
}

// Sheet totals are advisory, so an oversized line caps at `Decimal::MAX`.
fn capped_total(quantity: i64, unit_cost: Decimal) -> Decimal {
    line_total(quantity, unit_cost).unwrap_or(Decimal::MAX)
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ReorderLine {
    pub item_id: String,
    pub name: String,
    pub sku: String,
    pub current_stock: i64,
    pub minimum_stock: i64,
    pub recommended_order: i64,
    pub unit: String,
    pub unit_cost: Decimal,
    pub total_cost: Decimal,
    pub supplier: Option<String>,
    pub category: Option<String>,
}

impl ReorderLine {
    fn from_item(item: &InventoryItem, multiplier: i64) -> Self {
        let recommended = recommended_order(item.current_stock, item.minimum_stock, multiplier);
        Self {
            item_id: item.id.clone(),
            name: item.name.clone(),
            sku: item.sku.clone(),
            current_stock: item.current_stock,
            minimum_stock: item.minimum_stock,
            recommended_order: recommended,
            unit: item.unit.clone(),
            unit_cost: item.unit_cost,
            total_cost: capped_total(recommended, item.unit_cost),
            supplier: item.supplier.clone(),
            category: item.category.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ReorderSheet {
    pub generated_at: DateTime<Utc>,
    pub lines: Vec<ReorderLine>,
    pub total_cost: Decimal,
}

impl ReorderSheet {
    /// Build a sheet from the full item list. Non-low-stock items are skipped
    /// and lines are ordered by name.
    #[must_use]
    pub fn build(items: &[InventoryItem], multiplier: i64, generated_at: DateTime<Utc>) -> Self {
        let mut lines: Vec<ReorderLine> = items
            .iter()
            .filter(|item| item.is_low_stock())
            .map(|item| ReorderLine::from_item(item, multiplier))
            .collect();
        lines.sort_by(|a, b| a.name.cmp(&b.name));

        let mut sheet = Self {
            generated_at,
            lines,
            total_cost: Decimal::ZERO,
        };
        sheet.recompute_total();
        sheet
    }

    /// Replace the recommended quantity for one item, clamped at zero.
    ///
    /// Returns `false` if the item is not on the sheet.
    pub fn override_quantity(&mut self, item_id: &str, quantity: i64) -> bool {
        let Some(line) = self.lines.iter_mut().find(|l| l.item_id == item_id) else {
            return false;
        };
        line.recommended_order = quantity.max(0);
        line.total_cost = capped_total(line.recommended_order, line.unit_cost);
        self.recompute_total();
        true
    }

    /// Lines grouped by supplier name.
    #[must_use]
    pub fn by_supplier(&self) -> BTreeMap<String, Vec<&ReorderLine>> {
        let mut groups: BTreeMap<String, Vec<&ReorderLine>> = BTreeMap::new();
        for line in &self.lines {
            let supplier = line
                .supplier
                .clone()
                .unwrap_or_else(|| UNKNOWN_SUPPLIER.to_string());
            groups.entry(supplier).or_default().push(line);
        }
        groups
    }

    fn recompute_total(&mut self) {
        self.total_cost = self
            .lines
            .iter()
            .fold(Decimal::ZERO, |acc, l| acc.saturating_add(l.total_cost));
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn item(id: &str, name: &str, current: i64, minimum: i64, cost: &str, supplier: Option<&str>) -> InventoryItem {
        InventoryItem {
            id: id.into(),
            name: name.into(),
            sku: format!("SKU-{id}"),
            description: None,
            current_stock: current,
            minimum_stock: minimum,
            unit_cost: Decimal::from_str(cost).unwrap(),
            unit: "gal".into(),
            supplier: supplier.map(String::from),
            category: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[rstest]
    #[case(2, 5, 8)]
    #[case(5, 5, 5)]
    #[case(0, 4, 8)]
    #[case(9, 5, 5)]
    #[case(0, 0, 0)]
    fn recommendation_formula(#[case] current: i64, #[case] minimum: i64, #[case] expected: i64) {
        assert_eq!(recommended_order(current, minimum, 2), expected);
    }

    #[test]
    fn recommendation_saturates_instead_of_overflowing() {
        assert_eq!(recommended_order(0, i64::MAX, 2), i64::MAX);
        assert_eq!(recommended_order(i64::MIN, 1, 1), i64::MAX);
    }

    #[test]
    fn oversized_override_caps_total() {
        let items = vec![item("b", "Primer", 1, 4, "20.00", None)];
        let mut sheet = ReorderSheet::build(&items, 2, Utc::now());

        assert!(sheet.override_quantity("b", i64::MAX));
        assert_eq!(sheet.lines[0].recommended_order, i64::MAX);
        assert_eq!(
            sheet.total_cost,
            Decimal::from(i64::MAX) * Decimal::from_str("20.00").unwrap()
        );
    }

    #[test]
    fn sheet_filters_sorts_and_totals() {
        let items = vec![
            item("b", "Primer", 1, 4, "20.00", Some("Sherwin")),
            item("a", "Eggshell White", 10, 4, "30.00", Some("Sherwin")),
            item("c", "Blue Tape", 0, 3, "4.50", None),
        ];
        let sheet = ReorderSheet::build(&items, 2, Utc::now());

        let names: Vec<&str> = sheet.lines.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Blue Tape", "Primer"]);
        assert_eq!(sheet.lines[0].recommended_order, 6);
        assert_eq!(sheet.lines[1].recommended_order, 7);
        // 6 × 4.50 + 7 × 20.00
        assert_eq!(sheet.total_cost, Decimal::from_str("167.00").unwrap());
    }

    #[test]
    fn override_clamps_and_retotals() {
        let items = vec![item("b", "Primer", 1, 4, "20.00", None)];
        let mut sheet = ReorderSheet::build(&items, 2, Utc::now());

        assert!(sheet.override_quantity("b", -3));
        assert_eq!(sheet.lines[0].recommended_order, 0);
        assert_eq!(sheet.total_cost, Decimal::ZERO);

        assert!(sheet.override_quantity("b", 2));
        assert_eq!(sheet.total_cost, Decimal::from_str("40.00").unwrap());
        assert!(!sheet.override_quantity("missing", 1));
    }

    #[test]
    fn groups_by_supplier_with_fallback() {
        let items = vec![
            item("a", "Primer", 0, 2, "1", Some("Sherwin")),
            item("b", "Tape", 0, 2, "1", None),
            item("c", "Caulk", 0, 2, "1", Some("Sherwin")),
        ];
        let sheet = ReorderSheet::build(&items, 2, Utc::now());
        let groups = sheet.by_supplier();
        assert_eq!(groups["Sherwin"].len(), 2);
        assert_eq!(groups[UNKNOWN_SUPPLIER].len(), 1);
    }
}
