//! Reconciliation: physical counts, derived quantities and count edits.
//!
//! A count overwrites stored stock and logs one `adjustment` per changed
//! item, linked to the reconciliation. Derived quantity starts from the
//! latest count for an item and replays the ledger recorded after it.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tally_core::entities::{Reconciliation, ReconciliationLine};
use tally_core::enums::{AuditAction, EntityType, TransactionType};
use tally_core::ids::PREFIX_RECONCILIATION;
use tally_core::reports::{StockEvent, derive_quantity};
use tally_core::responses::{ReconcileSheetRow, ReconciliationDetail};

use crate::error::DatabaseError;
use crate::generate_id_on;
use crate::helpers::{get_opt_string, parse_datetime, parse_enum, to_detail};
use crate::repos::audit;
use crate::repos::item::{audit_stock_change, fetch_item, set_stock};
use crate::repos::transaction::{LedgerEntry, insert_transaction};
use crate::service::{TallyService, finish};
use crate::updates::reconciliation::ReconciliationUpdate;

const HEADER_COLS: &str = "id, reconciled_by, notes, created_at";
const LINE_COLS: &str =
    "reconciliation_id, item_id, item_name, recorded_quantity, counted_quantity, created_at";

fn row_to_reconciliation(row: &libsql::Row) -> Result<Reconciliation, DatabaseError> {
    Ok(Reconciliation {
        id: row.get(0)?,
        reconciled_by: row.get(1)?,
        notes: get_opt_string(row, 2)?,
        created_at: parse_datetime(&row.get::<String>(3)?)?,
    })
}

fn row_to_line(row: &libsql::Row) -> Result<ReconciliationLine, DatabaseError> {
    Ok(ReconciliationLine {
        reconciliation_id: row.get(0)?,
        item_id: row.get(1)?,
        item_name: row.get(2)?,
        recorded_quantity: row.get(3)?,
        counted_quantity: row.get(4)?,
        created_at: parse_datetime(&row.get::<String>(5)?)?,
    })
}

/// Validate counts and collapse repeats; a later count of the same item
/// replaces the earlier one.
fn normalize_counts(counts: &[(String, i64)]) -> Result<Vec<(String, i64)>, DatabaseError> {
    if counts.is_empty() {
        return Err(DatabaseError::validation("no counts given"));
    }
    let mut normalized: Vec<(String, i64)> = Vec::with_capacity(counts.len());
    for (item_id, counted) in counts {
        if *counted < 0 {
            return Err(DatabaseError::validation(format!(
                "count for {item_id} cannot be negative: {counted}"
            )));
        }
        match normalized.iter_mut().find(|(id, _)| id == item_id) {
            Some((_, existing)) => *existing = *counted,
            None => normalized.push((item_id.clone(), *counted)),
        }
    }
    Ok(normalized)
}

async fn fetch_header(
    conn: &libsql::Connection,
    id: &str,
) -> Result<Reconciliation, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("SELECT {HEADER_COLS} FROM reconciliations WHERE id = ?1"),
            [id],
        )
        .await?;
    let row = rows
        .next()
        .await?
        .ok_or_else(|| DatabaseError::not_found("reconciliation", id))?;
    row_to_reconciliation(&row)
}

async fn fetch_lines(
    conn: &libsql::Connection,
    reconciliation_id: &str,
) -> Result<Vec<ReconciliationLine>, DatabaseError> {
    let mut rows = conn
        .query(
            &format!(
                "SELECT {LINE_COLS} FROM reconciliation_lines WHERE reconciliation_id = ?1
                 ORDER BY item_name COLLATE NOCASE"
            ),
            [reconciliation_id],
        )
        .await?;
    let mut lines = Vec::new();
    while let Some(row) = rows.next().await? {
        lines.push(row_to_line(&row)?);
    }
    Ok(lines)
}

async fn insert_line(
    conn: &libsql::Connection,
    line: &ReconciliationLine,
) -> Result<(), DatabaseError> {
    conn.execute(
        &format!("INSERT INTO reconciliation_lines ({LINE_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)"),
        libsql::params![
            line.reconciliation_id.as_str(),
            line.item_id.as_str(),
            line.item_name.as_str(),
            line.recorded_quantity,
            line.counted_quantity,
            line.created_at.to_rfc3339()
        ],
    )
    .await?;
    Ok(())
}

/// Log the adjustment for a line whose count differs from the record.
async fn log_adjustment(
    conn: &libsql::Connection,
    line: &ReconciliationLine,
    actor: &str,
) -> Result<(), DatabaseError> {
    let delta = line.difference();
    if delta == 0 {
        return Ok(());
    }
    let item = fetch_item(conn, &line.item_id).await?;
    insert_transaction(
        conn,
        &LedgerEntry {
            item_id: &line.item_id,
            project_id: None,
            transaction_type: TransactionType::Adjustment,
            quantity: delta.abs(),
            unit_cost: item.unit_cost,
            notes: Some(if delta > 0 { "Count surplus" } else { "Count shortfall" }),
            reconciliation_id: Some(&line.reconciliation_id),
            cart_id: None,
            created_by: actor,
        },
    )
    .await?;
    Ok(())
}

/// Shift stored stock by `delta`, refusing to go negative.
async fn shift_stock(
    conn: &libsql::Connection,
    item_id: &str,
    delta: i64,
    actor: &str,
    source_id: &str,
) -> Result<(), DatabaseError> {
    if delta == 0 {
        return Ok(());
    }
    let item = fetch_item(conn, item_id).await?;
    let target = item.current_stock.checked_add(delta).ok_or_else(|| {
        DatabaseError::validation(format!(
            "changing the count for {} overflows its stock",
            item.name
        ))
    })?;
    if target < 0 {
        return Err(DatabaseError::validation(format!(
            "changing the count for {} would leave {target} in stock",
            item.name
        )));
    }
    set_stock(conn, item_id, target).await?;
    audit_stock_change(conn, actor, item_id, item.current_stock, target, Some(source_id)).await
}

/// Derive one item's quantity on `conn`.
async fn derive_on(conn: &libsql::Connection, item_id: &str) -> Result<i64, DatabaseError> {
    let mut rows = conn
        .query(
            "SELECT created_at, counted_quantity FROM reconciliation_lines
             WHERE item_id = ?1 ORDER BY created_at DESC LIMIT 1",
            [item_id],
        )
        .await?;
    let latest_count = match rows.next().await? {
        Some(row) => Some((parse_datetime(&row.get::<String>(0)?)?, row.get::<i64>(1)?)),
        None => None,
    };
    drop(rows);

    let mut rows = conn
        .query(
            "SELECT transaction_type, quantity, created_at FROM inventory_transactions
             WHERE item_id = ?1",
            [item_id],
        )
        .await?;
    let mut events = Vec::new();
    while let Some(row) = rows.next().await? {
        events.push(StockEvent {
            transaction_type: parse_enum(&row.get::<String>(0)?)?,
            quantity: row.get(1)?,
            created_at: parse_datetime(&row.get::<String>(2)?)?,
        });
    }
    Ok(derive_quantity(&events, latest_count))
}

impl TallyService {
    /// Quantity on hand rebuilt from counts and the ledger.
    pub async fn derive_quantity(&self, item_id: &str) -> Result<i64, DatabaseError> {
        fetch_item(self.db().conn(), item_id).await?;
        derive_on(self.db().conn(), item_id).await
    }

    /// Every item with stored and derived quantity, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if a query fails.
    pub async fn reconciliation_sheet(&self) -> Result<Vec<ReconcileSheetRow>, DatabaseError> {
        let mut latest: HashMap<String, (DateTime<Utc>, i64)> = HashMap::new();
        let mut rows = self
            .db()
            .query_with(
                "SELECT item_id, created_at, counted_quantity FROM reconciliation_lines",
                || (),
            )
            .await?;
        while let Some(row) = rows.next().await? {
            let item_id: String = row.get(0)?;
            let at = parse_datetime(&row.get::<String>(1)?)?;
            let counted: i64 = row.get(2)?;
            latest
                .entry(item_id)
                .and_modify(|current| {
                    if at > current.0 {
                        *current = (at, counted);
                    }
                })
                .or_insert((at, counted));
        }

        let mut events: HashMap<String, Vec<StockEvent>> = HashMap::new();
        let mut rows = self
            .db()
            .query_with(
                "SELECT item_id, transaction_type, quantity, created_at FROM inventory_transactions",
                || (),
            )
            .await?;
        while let Some(row) = rows.next().await? {
            events.entry(row.get(0)?).or_default().push(StockEvent {
                transaction_type: parse_enum(&row.get::<String>(1)?)?,
                quantity: row.get(2)?,
                created_at: parse_datetime(&row.get::<String>(3)?)?,
            });
        }

        let mut rows = self
            .db()
            .query_with(
                "SELECT id, name, current_stock FROM inventory_items ORDER BY name COLLATE NOCASE, sku",
                || (),
            )
            .await?;
        let mut sheet = Vec::new();
        while let Some(row) = rows.next().await? {
            let item_id: String = row.get(0)?;
            let derived = derive_quantity(
                events.get(&item_id).map_or(&[][..], Vec::as_slice),
                latest.get(&item_id).copied(),
            );
            sheet.push(ReconcileSheetRow {
                name: row.get(1)?,
                stored_quantity: row.get(2)?,
                derived_quantity: derived,
                item_id,
            });
        }
        Ok(sheet)
    }

    /// Record a physical count and overwrite stored stock with it.
    ///
    /// # Errors
    ///
    /// Returns a validation error for no counts, a negative count or a blank
    /// counter name, or `CoreError::NotFound` for an unknown item.
    pub async fn reconcile(
        &self,
        counts: &[(String, i64)],
        reconciled_by: &str,
        notes: Option<&str>,
    ) -> Result<ReconciliationDetail, DatabaseError> {
        let reconciled_by = reconciled_by.trim();
        if reconciled_by.is_empty() {
            return Err(DatabaseError::validation("reconciled_by cannot be empty"));
        }
        let counts = normalize_counts(counts)?;

        let tx = self.begin().await?;
        let result = reconcile_in(&tx, &counts, reconciled_by, notes).await;
        let detail = finish(tx, result).await?;
        tracing::debug!(
            id = %detail.reconciliation.id,
            lines = detail.lines.len(),
            "reconciliation recorded"
        );
        Ok(detail)
    }

    /// Reconciliations newest first.
    pub async fn list_reconciliations(
        &self,
        limit: Option<u32>,
    ) -> Result<Vec<Reconciliation>, DatabaseError> {
        let sql = format!(
            "SELECT {HEADER_COLS} FROM reconciliations ORDER BY created_at DESC, rowid DESC LIMIT ?1"
        );
        let limit = i64::from(limit.unwrap_or(u32::MAX));
        let mut rows = self.db().query_with(&sql, || [limit]).await?;
        let mut reconciliations = Vec::new();
        while let Some(row) = rows.next().await? {
            reconciliations.push(row_to_reconciliation(&row)?);
        }
        Ok(reconciliations)
    }

    pub async fn get_reconciliation(&self, id: &str) -> Result<ReconciliationDetail, DatabaseError> {
        let conn = self.db().conn();
        let header = fetch_header(conn, id).await?;
        let lines = fetch_lines(conn, id).await?;
        Ok(ReconciliationDetail::new(header, lines))
    }

    /// Edit a reconciliation. Replacing counts moves stored stock only by the
    /// difference between old and new counts, and relogs the adjustments.
    ///
    /// # Errors
    ///
    /// Returns a validation error for invalid counts or when the change would
    /// leave an item with negative stock, or `CoreError::NotFound` for an
    /// unknown reconciliation or item.
    pub async fn update_reconciliation(
        &self,
        id: &str,
        update: ReconciliationUpdate,
        actor: &str,
    ) -> Result<ReconciliationDetail, DatabaseError> {
        if update.is_empty() {
            return self.get_reconciliation(id).await;
        }
        if update
            .reconciled_by
            .as_deref()
            .is_some_and(|r| r.trim().is_empty())
        {
            return Err(DatabaseError::validation("reconciled_by cannot be empty"));
        }
        let counts = update.counts.as_deref().map(normalize_counts).transpose()?;

        let tx = self.begin().await?;
        let result = update_in(&tx, id, &update, counts.as_deref(), actor).await;
        let detail = finish(tx, result).await?;
        tracing::debug!(id = %id, "reconciliation updated");
        Ok(detail)
    }

    /// Delete a reconciliation with its lines and adjustments, then re-derive
    /// stored stock for every item it counted.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotFound` for an unknown reconciliation.
    pub async fn delete_reconciliation(&self, id: &str, actor: &str) -> Result<(), DatabaseError> {
        let tx = self.begin().await?;
        let result = delete_in(&tx, id, actor).await;
        finish(tx, result).await?;
        tracing::debug!(id = %id, "reconciliation deleted");
        Ok(())
    }
}

async fn reconcile_in(
    conn: &libsql::Connection,
    counts: &[(String, i64)],
    reconciled_by: &str,
    notes: Option<&str>,
) -> Result<ReconciliationDetail, DatabaseError> {
    let now = Utc::now();
    let header = Reconciliation {
        id: generate_id_on(conn, PREFIX_RECONCILIATION).await?,
        reconciled_by: reconciled_by.to_string(),
        notes: notes.map(String::from),
        created_at: now,
    };
    conn.execute(
        &format!("INSERT INTO reconciliations ({HEADER_COLS}) VALUES (?1, ?2, ?3, ?4)"),
        libsql::params![
            header.id.as_str(),
            reconciled_by,
            notes,
            now.to_rfc3339()
        ],
    )
    .await?;

    let mut lines = Vec::with_capacity(counts.len());
    for (item_id, counted) in counts {
        let item = fetch_item(conn, item_id).await?;
        let line = ReconciliationLine {
            reconciliation_id: header.id.clone(),
            item_id: item.id.clone(),
            item_name: item.name.clone(),
            recorded_quantity: item.current_stock,
            counted_quantity: *counted,
            created_at: now,
        };
        insert_line(conn, &line).await?;
        log_adjustment(conn, &line, reconciled_by).await?;
        shift_stock(conn, &item.id, line.difference(), reconciled_by, &header.id).await?;
        lines.push(line);
    }

    audit::record(
        conn,
        reconciled_by,
        EntityType::Reconciliation,
        &header.id,
        AuditAction::Reconciled,
        Some(serde_json::json!({ "lines": lines.len() })),
    )
    .await?;

    lines.sort_by_key(|l| l.item_name.to_lowercase());
    Ok(ReconciliationDetail::new(header, lines))
}

async fn update_in(
    conn: &libsql::Connection,
    id: &str,
    update: &ReconciliationUpdate,
    counts: Option<&[(String, i64)]>,
    actor: &str,
) -> Result<ReconciliationDetail, DatabaseError> {
    let mut header = fetch_header(conn, id).await?;
    if let Some(ref reconciled_by) = update.reconciled_by {
        header.reconciled_by = reconciled_by.trim().to_string();
    }
    if let Some(ref notes) = update.notes {
        header.notes.clone_from(notes);
    }
    conn.execute(
        "UPDATE reconciliations SET reconciled_by = ?1, notes = ?2 WHERE id = ?3",
        libsql::params![header.reconciled_by.as_str(), header.notes.as_deref(), id],
    )
    .await?;

    if let Some(counts) = counts {
        replace_counts(conn, id, counts, actor).await?;
    }

    audit::record(
        conn,
        actor,
        EntityType::Reconciliation,
        id,
        AuditAction::Updated,
        Some(to_detail(update)?),
    )
    .await?;

    let lines = fetch_lines(conn, id).await?;
    Ok(ReconciliationDetail::new(header, lines))
}

async fn replace_counts(
    conn: &libsql::Connection,
    id: &str,
    counts: &[(String, i64)],
    actor: &str,
) -> Result<(), DatabaseError> {
    let old: HashMap<String, ReconciliationLine> = fetch_lines(conn, id)
        .await?
        .into_iter()
        .map(|l| (l.item_id.clone(), l))
        .collect();

    // Items dropped from the count get their original record back.
    for line in old.values() {
        if !counts.iter().any(|(item_id, _)| item_id == &line.item_id) {
            shift_stock(conn, &line.item_id, -line.difference(), actor, id).await?;
        }
    }

    let now = Utc::now();
    let mut lines = Vec::with_capacity(counts.len());
    for (item_id, counted) in counts {
        let line = match old.get(item_id) {
            Some(previous) => {
                shift_stock(conn, item_id, counted - previous.counted_quantity, actor, id).await?;
                ReconciliationLine {
                    counted_quantity: *counted,
                    ..previous.clone()
                }
            }
            None => {
                let item = fetch_item(conn, item_id).await?;
                shift_stock(conn, item_id, counted - item.current_stock, actor, id).await?;
                ReconciliationLine {
                    reconciliation_id: id.to_string(),
                    item_id: item.id,
                    item_name: item.name,
                    recorded_quantity: item.current_stock,
                    counted_quantity: *counted,
                    created_at: now,
                }
            }
        };
        lines.push(line);
    }

    conn.execute(
        "DELETE FROM inventory_transactions WHERE reconciliation_id = ?1",
        [id],
    )
    .await?;
    conn.execute(
        "DELETE FROM reconciliation_lines WHERE reconciliation_id = ?1",
        [id],
    )
    .await?;
    for line in &lines {
        insert_line(conn, line).await?;
        log_adjustment(conn, line, actor).await?;
    }
    Ok(())
}

async fn delete_in(conn: &libsql::Connection, id: &str, actor: &str) -> Result<(), DatabaseError> {
    fetch_header(conn, id).await?;
    let lines = fetch_lines(conn, id).await?;

    conn.execute(
        "DELETE FROM inventory_transactions WHERE reconciliation_id = ?1",
        [id],
    )
    .await?;
    conn.execute(
        "DELETE FROM reconciliation_lines WHERE reconciliation_id = ?1",
        [id],
    )
    .await?;
    conn.execute("DELETE FROM reconciliations WHERE id = ?1", [id])
        .await?;

    for line in &lines {
        let item = fetch_item(conn, &line.item_id).await?;
        let mut derived = derive_on(conn, &line.item_id).await?;
        if derived < 0 {
            tracing::warn!(item = %item.id, derived, "derived stock below zero, storing 0");
            derived = 0;
        }
        if derived != item.current_stock {
            set_stock(conn, &item.id, derived).await?;
            audit_stock_change(conn, actor, &item.id, item.current_stock, derived, Some(id))
                .await?;
        }
    }

    audit::record(
        conn,
        actor,
        EntityType::Reconciliation,
        id,
        AuditAction::Deleted,
        None,
    )
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::transaction::TransactionFilter;
    use crate::test_support::helpers::{ACTOR, seed_item, seed_project, test_service};
    use crate::updates::reconciliation::ReconciliationUpdateBuilder;
    use pretty_assertions::assert_eq;
    use tally_core::errors::CoreError;

    async fn adjustments(svc: &TallyService, item_id: &str) -> Vec<i64> {
        svc.list_transactions(&TransactionFilter {
            item_id: Some(item_id.to_string()),
            transaction_type: Some(TransactionType::Adjustment),
            ..Default::default()
        })
        .await
        .unwrap()
        .iter()
        .map(|t| t.quantity)
        .collect()
    }

    #[tokio::test]
    async fn derive_without_counts_replays_ledger() {
        let svc = test_service().await;
        let paint = seed_item(&svc, "Eggshell White", "PNT-EW", 10, 2, 3250).await;
        let project = seed_project(&svc, "Smith House").await;
        svc.checkout(&project.id, &[(paint.id.clone(), 4)], None, ACTOR)
            .await
            .unwrap();
        svc.receive_item(&paint.id, 3, None, ACTOR).await.unwrap();

        assert_eq!(svc.derive_quantity(&paint.id).await.unwrap(), 9);
        assert!(svc.derive_quantity("itm-missing").await.is_err());
    }

    #[tokio::test]
    async fn reconcile_overwrites_stock_and_logs_adjustments() {
        let svc = test_service().await;
        let paint = seed_item(&svc, "Eggshell White", "PNT-EW", 4, 2, 3250).await;
        let tape = seed_item(&svc, "Blue Tape", "TP-BL", 10, 5, 499).await;
        let caulk = seed_item(&svc, "Caulk", "CK-1", 6, 2, 399).await;

        let detail = svc
            .reconcile(
                &[
                    (paint.id.clone(), 3),
                    (tape.id.clone(), 12),
                    (caulk.id.clone(), 6),
                ],
                "Sam",
                Some("Friday count"),
            )
            .await
            .unwrap();

        assert!(detail.reconciliation.id.starts_with("rec-"));
        assert_eq!(detail.reconciliation.reconciled_by, "Sam");
        assert_eq!(
            detail.summary,
            "Blue Tape: 10 → 12, Caulk: 6 → 6, Eggshell White: 4 → 3"
        );

        assert_eq!(svc.get_item(&paint.id).await.unwrap().current_stock, 3);
        assert_eq!(svc.get_item(&tape.id).await.unwrap().current_stock, 12);
        assert_eq!(adjustments(&svc, &paint.id).await, vec![1]);
        assert_eq!(adjustments(&svc, &tape.id).await, vec![2]);
        assert!(adjustments(&svc, &caulk.id).await.is_empty());

        let fetched = svc.get_reconciliation(&detail.reconciliation.id).await.unwrap();
        assert_eq!(fetched, detail);
    }

    #[tokio::test]
    async fn derive_uses_latest_count_as_baseline() {
        let svc = test_service().await;
        let paint = seed_item(&svc, "Eggshell White", "PNT-EW", 10, 2, 3250).await;
        let project = seed_project(&svc, "Smith House").await;

        svc.reconcile(&[(paint.id.clone(), 7)], "Sam", None)
            .await
            .unwrap();
        svc.checkout(&project.id, &[(paint.id.clone(), 2)], None, ACTOR)
            .await
            .unwrap();

        assert_eq!(svc.derive_quantity(&paint.id).await.unwrap(), 5);
        let sheet = svc.reconciliation_sheet().await.unwrap();
        assert_eq!(
            sheet,
            vec![ReconcileSheetRow {
                item_id: paint.id.clone(),
                name: "Eggshell White".into(),
                stored_quantity: 5,
                derived_quantity: 5,
            }]
        );
    }

    #[tokio::test]
    async fn zero_count_is_recorded() {
        let svc = test_service().await;
        let tape = seed_item(&svc, "Blue Tape", "TP-BL", 3, 5, 499).await;
        svc.reconcile(&[(tape.id.clone(), 0)], "Sam", None)
            .await
            .unwrap();
        assert_eq!(svc.get_item(&tape.id).await.unwrap().current_stock, 0);
        assert_eq!(svc.derive_quantity(&tape.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn rejects_empty_or_negative_counts() {
        let svc = test_service().await;
        let tape = seed_item(&svc, "Blue Tape", "TP-BL", 3, 5, 499).await;

        let empty = svc.reconcile(&[], "Sam", None).await;
        assert!(matches!(empty, Err(DatabaseError::Core(CoreError::Validation(_)))));
        let negative = svc.reconcile(&[(tape.id.clone(), -1)], "Sam", None).await;
        assert!(matches!(negative, Err(DatabaseError::Core(CoreError::Validation(_)))));
        assert!(svc.list_reconciliations(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_applies_only_count_difference() {
        let svc = test_service().await;
        let paint = seed_item(&svc, "Eggshell White", "PNT-EW", 10, 2, 3250).await;
        let tape = seed_item(&svc, "Blue Tape", "TP-BL", 8, 5, 499).await;
        let caulk = seed_item(&svc, "Caulk", "CK-1", 6, 2, 399).await;
        let project = seed_project(&svc, "Smith House").await;

        let rec = svc
            .reconcile(&[(paint.id.clone(), 7), (tape.id.clone(), 9)], "Sam", None)
            .await
            .unwrap();
        svc.checkout(&project.id, &[(paint.id.clone(), 2)], None, ACTOR)
            .await
            .unwrap();
        assert_eq!(svc.get_item(&paint.id).await.unwrap().current_stock, 5);

        let updated = svc
            .update_reconciliation(
                &rec.reconciliation.id,
                ReconciliationUpdateBuilder::new()
                    .notes(Some("recount".into()))
                    .counts(vec![(paint.id.clone(), 8), (caulk.id.clone(), 4)])
                    .build(),
                ACTOR,
            )
            .await
            .unwrap();

        // Paint: counted 7 → 8 moves stock up by one on top of the checkout.
        assert_eq!(svc.get_item(&paint.id).await.unwrap().current_stock, 6);
        // Tape dropped: back to its recorded 8.
        assert_eq!(svc.get_item(&tape.id).await.unwrap().current_stock, 8);
        // Caulk added: recorded 6, counted 4.
        assert_eq!(svc.get_item(&caulk.id).await.unwrap().current_stock, 4);

        assert_eq!(updated.reconciliation.notes.as_deref(), Some("recount"));
        assert_eq!(updated.summary, "Caulk: 6 → 4, Eggshell White: 10 → 8");
        assert_eq!(adjustments(&svc, &paint.id).await, vec![2]);
        assert!(adjustments(&svc, &tape.id).await.is_empty());
        assert_eq!(adjustments(&svc, &caulk.id).await, vec![2]);
        assert_eq!(svc.derive_quantity(&paint.id).await.unwrap(), 6);
    }

    #[tokio::test]
    async fn update_rejects_negative_result() {
        let svc = test_service().await;
        let paint = seed_item(&svc, "Eggshell White", "PNT-EW", 10, 2, 3250).await;
        let project = seed_project(&svc, "Smith House").await;
        let rec = svc
            .reconcile(&[(paint.id.clone(), 5)], "Sam", None)
            .await
            .unwrap();
        svc.checkout(&project.id, &[(paint.id.clone(), 4)], None, ACTOR)
            .await
            .unwrap();

        let result = svc
            .update_reconciliation(
                &rec.reconciliation.id,
                ReconciliationUpdateBuilder::new()
                    .counts(vec![(paint.id.clone(), 0)])
                    .build(),
                ACTOR,
            )
            .await;
        assert!(matches!(result, Err(DatabaseError::Core(CoreError::Validation(_)))));
        assert_eq!(svc.get_item(&paint.id).await.unwrap().current_stock, 1);
    }

    #[tokio::test]
    async fn delete_rederives_stock() {
        let svc = test_service().await;
        let paint = seed_item(&svc, "Eggshell White", "PNT-EW", 10, 2, 3250).await;
        let project = seed_project(&svc, "Smith House").await;

        let rec = svc
            .reconcile(&[(paint.id.clone(), 6)], "Sam", None)
            .await
            .unwrap();
        svc.checkout(&project.id, &[(paint.id.clone(), 1)], None, ACTOR)
            .await
            .unwrap();
        assert_eq!(svc.get_item(&paint.id).await.unwrap().current_stock, 5);

        svc.delete_reconciliation(&rec.reconciliation.id, ACTOR)
            .await
            .unwrap();
        assert_eq!(svc.get_item(&paint.id).await.unwrap().current_stock, 9);
        assert!(adjustments(&svc, &paint.id).await.is_empty());
        assert!(matches!(
            svc.get_reconciliation(&rec.reconciliation.id).await,
            Err(DatabaseError::Core(CoreError::NotFound { .. }))
        ));
    }

    #[tokio::test]
    async fn list_newest_first_with_limit() {
        let svc = test_service().await;
        let paint = seed_item(&svc, "Eggshell White", "PNT-EW", 10, 2, 3250).await;
        let first = svc.reconcile(&[(paint.id.clone(), 9)], "Sam", None).await.unwrap();
        let second = svc.reconcile(&[(paint.id.clone(), 8)], "Ari", None).await.unwrap();

        let all = svc.list_reconciliations(None).await.unwrap();
        let ids: Vec<&str> = all.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                second.reconciliation.id.as_str(),
                first.reconciliation.id.as_str()
            ]
        );
        assert_eq!(svc.list_reconciliations(Some(1)).await.unwrap().len(), 1);
    }
}
