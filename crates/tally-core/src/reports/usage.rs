//! Usage and expense reports over consumption transactions.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Inclusive calendar date range. `end` covers the whole day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, CoreError> {
        if start > end {
            return Err(CoreError::Validation(format!(
                "date range start {start} is after end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// `start 00:00:00` through `end 23:59:59`, UTC.
    #[must_use]
    pub fn bounds(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        let start = self.start.and_time(NaiveTime::MIN).and_utc();
        let end = self
            .end
            .and_hms_opt(23, 59, 59)
            .unwrap_or_else(|| self.end.and_time(NaiveTime::MIN))
            .and_utc();
        (start, end)
    }

    /// Suffix used in export file names: `{start}-to-{end}`.
    #[must_use]
    pub fn file_suffix(&self) -> String {
        format!("{}-to-{}", self.start, self.end)
    }
}

/// A consumption transaction joined with its item and project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageRecord {
    pub item_name: String,
    pub item_sku: String,
    pub project_id: Option<String>,
    pub project_name: Option<String>,
    pub quantity: i64,
    pub total_cost: Decimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ItemUsage {
    pub item_name: String,
    pub item_sku: String,
    pub total_quantity: i64,
    pub total_cost: Decimal,
    pub transaction_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ProjectExpense {
    pub project_id: String,
    pub project_name: String,
    pub total_cost: Decimal,
    pub item_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct MonthlyUsage {
    /// `YYYY-MM`
    pub month: String,
    pub total_cost: Decimal,
    pub transaction_count: u64,
}

/// All three usage reports for one date range.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct UsageReport {
    pub range: DateRange,
    pub most_used_items: Vec<ItemUsage>,
    pub project_expenses: Vec<ProjectExpense>,
    pub monthly_usage: Vec<MonthlyUsage>,
}

impl UsageReport {
    #[must_use]
    pub fn build(range: DateRange, records: &[UsageRecord], top_items: usize) -> Self {
        Self {
            range,
            most_used_items: most_used_items(records, top_items),
            project_expenses: project_expenses(records),
            monthly_usage: monthly_usage(records),
        }
    }
}

/// Group by SKU, sort by total cost descending, keep the first `top`.
#[must_use]
pub fn most_used_items(records: &[UsageRecord], top: usize) -> Vec<ItemUsage> {
    let mut by_sku: BTreeMap<&str, ItemUsage> = BTreeMap::new();
    for record in records {
        let entry = by_sku
            .entry(record.item_sku.as_str())
            .or_insert_with(|| ItemUsage {
                item_name: record.item_name.clone(),
                item_sku: record.item_sku.clone(),
                total_quantity: 0,
                total_cost: Decimal::ZERO,
                transaction_count: 0,
            });
        entry.total_quantity += record.quantity;
        entry.total_cost += record.total_cost;
        entry.transaction_count += 1;
    }

    let mut usage: Vec<ItemUsage> = by_sku.into_values().collect();
    usage.sort_by(|a, b| b.total_cost.cmp(&a.total_cost));
    usage.truncate(top);
    usage
}

/// Group by project, sort by total cost descending. Records without a
/// project are not project spend and are skipped.
#[must_use]
pub fn project_expenses(records: &[UsageRecord]) -> Vec<ProjectExpense> {
    let mut by_project: BTreeMap<&str, ProjectExpense> = BTreeMap::new();
    for record in records {
        let Some(project_id) = record.project_id.as_deref() else {
            continue;
        };
        let entry = by_project
            .entry(project_id)
            .or_insert_with(|| ProjectExpense {
                project_id: project_id.to_string(),
                project_name: record.project_name.clone().unwrap_or_default(),
                total_cost: Decimal::ZERO,
                item_count: 0,
            });
        entry.total_cost += record.total_cost;
        entry.item_count += 1;
    }

    let mut expenses: Vec<ProjectExpense> = by_project.into_values().collect();
    expenses.sort_by(|a, b| b.total_cost.cmp(&a.total_cost));
    expenses
}

/// Group by calendar month of `created_at`, ascending.
#[must_use]
pub fn monthly_usage(records: &[UsageRecord]) -> Vec<MonthlyUsage> {
    let mut by_month: BTreeMap<String, MonthlyUsage> = BTreeMap::new();
    for record in records {
        let month = record.created_at.format("%Y-%m").to_string();
        let entry = by_month
            .entry(month.clone())
            .or_insert_with(|| MonthlyUsage {
                month,
                total_cost: Decimal::ZERO,
                transaction_count: 0,
            });
        entry.total_cost += record.total_cost;
        entry.transaction_count += 1;
    }
    by_month.into_values().collect()
}
