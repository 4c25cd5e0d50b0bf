//! Transaction ledger repository: inserts, filtered listing and voids.

use chrono::Utc;
use rust_decimal::Decimal;
use tally_core::entities::InventoryTransaction;
use tally_core::enums::{AuditAction, EntityType, TransactionType};
use tally_core::ids::PREFIX_TRANSACTION;
use tally_core::pricing::line_total;
use tally_core::reports::DateRange;

use crate::error::DatabaseError;
use crate::generate_id_on;
use crate::helpers::{get_opt_string, parse_datetime, parse_decimal, parse_enum, to_detail};
use crate::repos::item::{audit_stock_change, decrement_stock, fetch_item, increment_stock};
use crate::repos::{audit, cart};
use crate::service::{TallyService, finish};

pub(crate) const SELECT_COLS: &str = "id, item_id, project_id, transaction_type, quantity, \
     unit_cost, total_cost, notes, reconciliation_id, created_by, created_at, cart_id";

pub(crate) fn row_to_transaction(row: &libsql::Row) -> Result<InventoryTransaction, DatabaseError> {
    Ok(InventoryTransaction {
        id: row.get(0)?,
        item_id: row.get(1)?,
        project_id: get_opt_string(row, 2)?,
        transaction_type: parse_enum(&row.get::<String>(3)?)?,
        quantity: row.get(4)?,
        unit_cost: parse_decimal(&row.get::<String>(5)?)?,
        total_cost: parse_decimal(&row.get::<String>(6)?)?,
        notes: get_opt_string(row, 7)?,
        reconciliation_id: get_opt_string(row, 8)?,
        created_by: row.get(9)?,
        created_at: parse_datetime(&row.get::<String>(10)?)?,
        cart_id: get_opt_string(row, 11)?,
    })
}

/// One ledger row to insert. `total_cost` is derived.
pub(crate) struct LedgerEntry<'a> {
    pub item_id: &'a str,
    pub project_id: Option<&'a str>,
    pub transaction_type: TransactionType,
    pub quantity: i64,
    pub unit_cost: Decimal,
    pub notes: Option<&'a str>,
    pub reconciliation_id: Option<&'a str>,
    pub cart_id: Option<&'a str>,
    pub created_by: &'a str,
}

/// Insert a ledger row and its `created` audit entry on `conn`.
pub(crate) async fn insert_transaction(
    conn: &libsql::Connection,
    entry: &LedgerEntry<'_>,
) -> Result<InventoryTransaction, DatabaseError> {
    let now = Utc::now();
    let id = generate_id_on(conn, PREFIX_TRANSACTION).await?;
    let total_cost = line_total(entry.quantity, entry.unit_cost)?;

    conn.execute(
        &format!(
            "INSERT INTO inventory_transactions ({SELECT_COLS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)"
        ),
        libsql::params![
            id.as_str(),
            entry.item_id,
            entry.project_id,
            entry.transaction_type.as_str(),
            entry.quantity,
            entry.unit_cost.to_string(),
            total_cost.to_string(),
            entry.notes,
            entry.reconciliation_id,
            entry.created_by,
            now.to_rfc3339(),
            entry.cart_id
        ],
    )
    .await?;

    audit::record(
        conn,
        entry.created_by,
        EntityType::Transaction,
        &id,
        AuditAction::Created,
        None,
    )
    .await?;

    Ok(InventoryTransaction {
        id,
        item_id: entry.item_id.to_string(),
        project_id: entry.project_id.map(String::from),
        transaction_type: entry.transaction_type,
        quantity: entry.quantity,
        unit_cost: entry.unit_cost,
        total_cost,
        notes: entry.notes.map(String::from),
        reconciliation_id: entry.reconciliation_id.map(String::from),
        cart_id: entry.cart_id.map(String::from),
        created_by: entry.created_by.to_string(),
        created_at: now,
    })
}

/// Filter criteria for ledger queries.
#[derive(Debug, Default)]
pub struct TransactionFilter {
    pub item_id: Option<String>,
    pub project_id: Option<String>,
    pub cart_id: Option<String>,
    pub transaction_type: Option<TransactionType>,
    pub range: Option<DateRange>,
    pub limit: Option<u32>,
}

impl TallyService {
    pub async fn get_transaction(&self, id: &str) -> Result<InventoryTransaction, DatabaseError> {
        let mut rows = self
            .db()
            .query_with(
                &format!("SELECT {SELECT_COLS} FROM inventory_transactions WHERE id = ?1"),
                || [id],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found("transaction", id))?;
        row_to_transaction(&row)
    }

    /// List ledger rows, newest first.
    pub async fn list_transactions(
        &self,
        filter: &TransactionFilter,
    ) -> Result<Vec<InventoryTransaction>, DatabaseError> {
        let mut conditions = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(ref item_id) = filter.item_id {
            params.push(libsql::Value::Text(item_id.clone()));
            conditions.push(format!("item_id = ?{}", params.len()));
        }
        if let Some(ref project_id) = filter.project_id {
            params.push(libsql::Value::Text(project_id.clone()));
            conditions.push(format!("project_id = ?{}", params.len()));
        }
        if let Some(ref cart_id) = filter.cart_id {
            params.push(libsql::Value::Text(cart_id.clone()));
            conditions.push(format!("cart_id = ?{}", params.len()));
        }
        if let Some(kind) = filter.transaction_type {
            params.push(libsql::Value::Text(kind.as_str().to_string()));
            conditions.push(format!("transaction_type = ?{}", params.len()));
        }
        if let Some(range) = filter.range {
            let (start, end) = range.bounds();
            params.push(libsql::Value::Text(start.to_rfc3339()));
            conditions.push(format!("created_at >= ?{}", params.len()));
            params.push(libsql::Value::Text(end.to_rfc3339()));
            conditions.push(format!("created_at <= ?{}", params.len()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        let limit = filter.limit.unwrap_or(100);
        let sql = format!(
            "SELECT {SELECT_COLS} FROM inventory_transactions {where_clause}
             ORDER BY created_at DESC, rowid DESC LIMIT {limit}"
        );

        let mut rows = self
            .db()
            .query_with(&sql, || libsql::params_from_iter(params.clone()))
            .await?;
        let mut transactions = Vec::new();
        while let Some(row) = rows.next().await? {
            transactions.push(row_to_transaction(&row)?);
        }
        Ok(transactions)
    }

    /// Delete a ledger row and reverse its stock effect in one transaction.
    /// A cart left without lines is removed with it.
    ///
    /// # Errors
    ///
    /// Returns a validation error for adjustments (edit the reconciliation
    /// instead), or `CoreError::InsufficientStock` when reversing a receipt
    /// would drive stock negative.
    pub async fn void_transaction(
        &self,
        transaction_id: &str,
        actor: &str,
    ) -> Result<InventoryTransaction, DatabaseError> {
        let tx = self.begin().await?;
        let result = void_in(&tx, transaction_id, actor).await;
        let voided = finish(tx, result).await?;
        tracing::debug!(id = %transaction_id, kind = %voided.transaction_type, "transaction voided");
        Ok(voided)
    }
}

async fn void_in(
    conn: &libsql::Connection,
    transaction_id: &str,
    actor: &str,
) -> Result<InventoryTransaction, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("SELECT {SELECT_COLS} FROM inventory_transactions WHERE id = ?1"),
            [transaction_id],
        )
        .await?;
    let row = rows
        .next()
        .await?
        .ok_or_else(|| DatabaseError::not_found("transaction", transaction_id))?;
    let transaction = row_to_transaction(&row)?;
    drop(rows);

    let Some(sign) = transaction.transaction_type.stock_sign() else {
        return Err(DatabaseError::validation(format!(
            "{transaction_id} is a reconciliation adjustment; edit or delete its reconciliation instead"
        )));
    };

    let item = fetch_item(conn, &transaction.item_id).await?;
    if sign > 0 {
        decrement_stock(conn, &item, transaction.quantity).await?;
    } else {
        increment_stock(conn, &item, transaction.quantity).await?;
    }

    conn.execute(
        "DELETE FROM inventory_transactions WHERE id = ?1",
        [transaction_id],
    )
    .await?;
    if let Some(ref cart_id) = transaction.cart_id {
        cart::remove_if_empty(conn, cart_id, actor).await?;
    }

    let after = fetch_item(conn, &item.id).await?.current_stock;
    audit_stock_change(
        conn,
        actor,
        &item.id,
        item.current_stock,
        after,
        Some(transaction_id),
    )
    .await?;
    audit::record(
        conn,
        actor,
        EntityType::Transaction,
        transaction_id,
        AuditAction::Voided,
        Some(to_detail(&transaction)?),
    )
    .await?;

    Ok(transaction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{ACTOR, seed_item, seed_project, test_service};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use tally_core::errors::CoreError;

    #[tokio::test]
    async fn list_filters_by_item_and_type() {
        let svc = test_service().await;
        let tape = seed_item(&svc, "Blue Tape", "TP-BL", 5, 2, 499).await;
        let paint = seed_item(&svc, "Eggshell White", "PNT-EW", 8, 2, 3250).await;
        svc.receive_item(&tape.id, 3, None, ACTOR).await.unwrap();

        let tape_rows = svc
            .list_transactions(&TransactionFilter {
                item_id: Some(tape.id.clone()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(tape_rows.len(), 2);
        assert_eq!(tape_rows[0].quantity, 3, "newest first");

        let receipts = svc
            .list_transactions(&TransactionFilter {
                transaction_type: Some(TransactionType::Receive),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(receipts.len(), 3);
        assert!(receipts.iter().any(|t| t.item_id == paint.id));
    }

    #[tokio::test]
    async fn list_filters_by_date_range() {
        let svc = test_service().await;
        seed_item(&svc, "Blue Tape", "TP-BL", 5, 2, 499).await;

        let today = Utc::now().date_naive();
        let hit = svc
            .list_transactions(&TransactionFilter {
                range: Some(DateRange::new(today, today).unwrap()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(hit.len(), 1);

        let old = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let miss = svc
            .list_transactions(&TransactionFilter {
                range: Some(DateRange::new(old, old).unwrap()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(miss.is_empty());
    }

    #[tokio::test]
    async fn void_checkout_restores_stock() {
        let svc = test_service().await;
        let tape = seed_item(&svc, "Blue Tape", "TP-BL", 5, 2, 499).await;
        let project = seed_project(&svc, "Smith House").await;
        let cart = svc
            .checkout(&project.id, &[(tape.id.clone(), 3)], None, ACTOR)
            .await
            .unwrap();

        let voided = svc
            .void_transaction(&cart.transactions[0].id, ACTOR)
            .await
            .unwrap();
        assert_eq!(voided.transaction_type, TransactionType::Checkout);
        assert_eq!(svc.get_item(&tape.id).await.unwrap().current_stock, 5);
        assert!(svc.get_transaction(&voided.id).await.is_err());
    }

    #[tokio::test]
    async fn void_receipt_rejected_when_stock_already_used() {
        let svc = test_service().await;
        let tape = seed_item(&svc, "Blue Tape", "TP-BL", 0, 2, 499).await;
        let project = seed_project(&svc, "Smith House").await;
        let received = svc.receive_item(&tape.id, 4, None, ACTOR).await.unwrap();
        svc.checkout(&project.id, &[(tape.id.clone(), 3)], None, ACTOR)
            .await
            .unwrap();

        let result = svc.void_transaction(&received.transaction.id, ACTOR).await;
        assert!(matches!(
            result,
            Err(DatabaseError::Core(CoreError::InsufficientStock {
                requested: 4,
                available: 1,
                ..
            }))
        ));
        assert_eq!(svc.get_item(&tape.id).await.unwrap().current_stock, 1);
        assert!(svc.get_transaction(&received.transaction.id).await.is_ok());
    }
}
