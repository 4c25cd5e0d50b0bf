//! Report queries. Rows are loaded here and aggregated in `tally_core::reports`.

use chrono::Utc;
use tally_core::reports::{DashboardStats, DateRange, ReorderSheet, UsageRecord, UsageReport};

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime, parse_decimal};
use crate::repos::item::ItemFilter;
use crate::service::TallyService;

impl TallyService {
    /// Checkout rows in `range`, oldest first, joined with item and project.
    pub async fn usage_records(&self, range: DateRange) -> Result<Vec<UsageRecord>, DatabaseError> {
        let (start, end) = range.bounds();
        let mut rows = self
            .db()
            .query_with(
                "SELECT i.name, i.sku, t.project_id, p.name, t.quantity, t.total_cost, t.created_at
                 FROM inventory_transactions t
                 JOIN inventory_items i ON i.id = t.item_id
                 LEFT JOIN projects p ON p.id = t.project_id
                 WHERE t.transaction_type = 'checkout'
                   AND t.created_at >= ?1 AND t.created_at <= ?2
                 ORDER BY t.created_at, t.rowid",
                || libsql::params![start.to_rfc3339(), end.to_rfc3339()],
            )
            .await?;

        let mut records = Vec::new();
        while let Some(row) = rows.next().await? {
            records.push(UsageRecord {
                item_name: row.get(0)?,
                item_sku: row.get(1)?,
                project_id: get_opt_string(&row, 2)?,
                project_name: get_opt_string(&row, 3)?,
                quantity: row.get(4)?,
                total_cost: parse_decimal(&row.get::<String>(5)?)?,
                created_at: parse_datetime(&row.get::<String>(6)?)?,
            });
        }
        Ok(records)
    }

    /// Most used items, project expenses and monthly usage for `range`.
    pub async fn usage_report(
        &self,
        range: DateRange,
        top_items: usize,
    ) -> Result<UsageReport, DatabaseError> {
        let records = self.usage_records(range).await?;
        tracing::debug!(records = records.len(), range = %range.file_suffix(), "usage report");
        Ok(UsageReport::build(range, &records, top_items))
    }

    /// Reorder sheet over current low-stock items.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a multiplier below one.
    pub async fn reorder_sheet(&self, multiplier: i64) -> Result<ReorderSheet, DatabaseError> {
        if multiplier < 1 {
            return Err(DatabaseError::validation(format!(
                "reorder multiplier must be at least 1: {multiplier}"
            )));
        }
        let items = self.low_stock_items().await?;
        Ok(ReorderSheet::build(&items, multiplier, Utc::now()))
    }

    pub async fn dashboard_stats(&self) -> Result<DashboardStats, DatabaseError> {
        let items = self.list_items(&ItemFilter::default()).await?;
        let total_tools = self.count("SELECT COUNT(*) FROM tools").await?;
        let active_projects = self
            .count("SELECT COUNT(*) FROM projects WHERE status = 'active'")
            .await?;
        Ok(DashboardStats::compute(&items, total_tools, active_projects))
    }

    async fn count(&self, sql: &str) -> Result<u64, DatabaseError> {
        let mut rows = self.db().query_with(sql, || ()).await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        let count: i64 = row.get(0)?;
        Ok(u64::try_from(count).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use tally_core::enums::TransactionType;

    use super::*;
    use crate::repos::tool::NewTool;
    use crate::repos::transaction::{LedgerEntry, insert_transaction};
    use crate::test_support::helpers::{ACTOR, seed_item, seed_project, test_service};

    fn today_range() -> DateRange {
        let today = Utc::now().date_naive();
        DateRange::new(today, today).unwrap()
    }

    #[tokio::test]
    async fn usage_report_aggregates_checkouts() {
        let svc = test_service().await;
        let paint = seed_item(&svc, "Eggshell White", "PNT-EW", 20, 2, 3250).await;
        let tape = seed_item(&svc, "Blue Tape", "TP-BL", 20, 5, 499).await;
        let smith = seed_project(&svc, "Smith House").await;
        let jones = seed_project(&svc, "Jones Office").await;

        svc.checkout(&smith.id, &[(paint.id.clone(), 2), (tape.id.clone(), 1)], None, ACTOR)
            .await
            .unwrap();
        svc.checkout(&jones.id, &[(paint.id.clone(), 1)], None, ACTOR)
            .await
            .unwrap();

        let report = svc.usage_report(today_range(), 10).await.unwrap();
        assert_eq!(report.most_used_items.len(), 2);
        assert_eq!(report.most_used_items[0].item_sku, "PNT-EW");
        assert_eq!(report.most_used_items[0].total_quantity, 3);
        assert_eq!(report.most_used_items[0].transaction_count, 2);

        assert_eq!(report.project_expenses[0].project_name, "Smith House");
        assert_eq!(report.project_expenses[0].total_cost, Decimal::new(6999, 2));
        assert_eq!(report.project_expenses[0].item_count, 2);
        assert_eq!(report.project_expenses[1].total_cost, Decimal::new(3250, 2));

        assert_eq!(report.monthly_usage.len(), 1);
        assert_eq!(report.monthly_usage[0].transaction_count, 3);
    }

    #[tokio::test]
    async fn usage_outside_range_is_excluded() {
        let svc = test_service().await;
        let paint = seed_item(&svc, "Eggshell White", "PNT-EW", 20, 2, 3250).await;
        let smith = seed_project(&svc, "Smith House").await;
        svc.checkout(&smith.id, &[(paint.id.clone(), 2)], None, ACTOR)
            .await
            .unwrap();

        let past = DateRange::new(
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2020, 12, 31).unwrap(),
        )
        .unwrap();
        assert!(svc.usage_records(past).await.unwrap().is_empty());
        assert_eq!(svc.usage_records(today_range()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn usage_counts_checkouts_only() {
        let svc = test_service().await;
        let paint = seed_item(&svc, "Eggshell White", "PNT-EW", 20, 2, 3250).await;
        let smith = seed_project(&svc, "Smith House").await;
        svc.checkout(&smith.id, &[(paint.id.clone(), 2)], None, ACTOR)
            .await
            .unwrap();
        insert_transaction(
            svc.db().conn(),
            &LedgerEntry {
                item_id: &paint.id,
                project_id: Some(&smith.id),
                transaction_type: TransactionType::Withdraw,
                quantity: 5,
                unit_cost: paint.unit_cost,
                notes: None,
                reconciliation_id: None,
                cart_id: None,
                created_by: ACTOR,
            },
        )
        .await
        .unwrap();

        let records = svc.usage_records(today_range()).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].quantity, 2);
    }

    #[tokio::test]
    async fn reorder_sheet_lists_low_stock() {
        let svc = test_service().await;
        seed_item(&svc, "Eggshell White", "PNT-EW", 20, 2, 3250).await;
        let tape = seed_item(&svc, "Blue Tape", "TP-BL", 2, 5, 499).await;

        let sheet = svc.reorder_sheet(2).await.unwrap();
        assert_eq!(sheet.lines.len(), 1);
        assert_eq!(sheet.lines[0].item_id, tape.id);
        assert_eq!(sheet.lines[0].recommended_order, 8);
        assert_eq!(sheet.total_cost, Decimal::new(3992, 2));

        assert!(svc.reorder_sheet(0).await.is_err());
    }

    #[tokio::test]
    async fn dashboard_counts() {
        let svc = test_service().await;
        seed_item(&svc, "Eggshell White", "PNT-EW", 20, 2, 3250).await;
        seed_item(&svc, "Blue Tape", "TP-BL", 2, 5, 499).await;
        seed_project(&svc, "Smith House").await;
        svc.create_tool(
            &NewTool {
                name: "Airless Sprayer".into(),
                ..NewTool::default()
            },
            ACTOR,
        )
        .await
        .unwrap();

        let stats = svc.dashboard_stats().await.unwrap();
        assert_eq!(
            stats,
            DashboardStats {
                total_items: 2,
                low_stock_items: 1,
                total_tools: 1,
                active_projects: 1,
            }
        );
    }
}
