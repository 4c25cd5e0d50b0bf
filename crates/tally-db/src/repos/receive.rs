//! Receive flow: a supplier delivery raising stock and refreshing costs.

use chrono::Utc;
use rust_decimal::Decimal;
use tally_core::entities::InventoryTransaction;
use tally_core::enums::{CartKind, TransactionType};
use tally_core::responses::CartResponse;

use crate::error::DatabaseError;
use crate::repos::cart::{cart_response, insert_cart};
use crate::repos::item::{
    audit_stock_change, fetch_item, increment_stock, validate_cost, validate_quantity,
};
use crate::repos::transaction::{LedgerEntry, insert_transaction};
use crate::service::{TallyService, finish};

/// One delivered item. A missing cost keeps the item's current cost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiveLine {
    pub item_id: String,
    pub quantity: i64,
    pub unit_cost: Option<Decimal>,
}

impl ReceiveLine {
    pub fn new(item_id: impl Into<String>, quantity: i64, unit_cost: Option<Decimal>) -> Self {
        Self {
            item_id: item_id.into(),
            quantity,
            unit_cost,
        }
    }
}

/// Merge duplicate items. Quantities add up and the last given cost wins.
fn merge_lines(lines: &[ReceiveLine]) -> Result<Vec<ReceiveLine>, DatabaseError> {
    let mut merged: Vec<ReceiveLine> = Vec::with_capacity(lines.len());
    for line in lines {
        match merged.iter_mut().find(|m| m.item_id == line.item_id) {
            Some(existing) => {
                existing.quantity = existing.quantity.checked_add(line.quantity).ok_or_else(|| {
                    DatabaseError::validation(format!(
                        "combined quantity for {} is too large",
                        line.item_id
                    ))
                })?;
                if line.unit_cost.is_some() {
                    existing.unit_cost = line.unit_cost;
                }
            }
            None => merged.push(line.clone()),
        }
    }
    Ok(merged)
}

impl TallyService {
    /// Receive a delivery. Each line logs a `restock`, raises stock and sets
    /// the item's unit cost to the received cost.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty delivery, a non-positive
    /// quantity, a negative cost or a quantity that would overflow stock, or
    /// `CoreError::NotFound` for an unknown item. Nothing is written when any
    /// line fails.
    pub async fn receive(
        &self,
        lines: &[ReceiveLine],
        notes: Option<&str>,
        actor: &str,
    ) -> Result<CartResponse, DatabaseError> {
        if lines.is_empty() {
            return Err(DatabaseError::validation("receive list is empty"));
        }
        for line in lines {
            validate_quantity(line.quantity)?;
            if let Some(cost) = line.unit_cost {
                validate_cost(cost)?;
            }
        }
        let merged = merge_lines(lines)?;

        let tx = self.begin().await?;
        let result = receive_in(&tx, &merged, notes, actor).await;
        let response = finish(tx, result).await?;
        tracing::debug!(
            cart = %response.cart.id,
            lines = response.transactions.len(),
            total = %response.total_cost,
            "delivery received"
        );
        Ok(response)
    }
}

async fn receive_in(
    conn: &libsql::Connection,
    lines: &[ReceiveLine],
    notes: Option<&str>,
    actor: &str,
) -> Result<CartResponse, DatabaseError> {
    let cart = insert_cart(conn, CartKind::Receive, None, notes, actor).await?;

    let mut transactions: Vec<InventoryTransaction> = Vec::with_capacity(lines.len());
    for line in lines {
        let item = fetch_item(conn, &line.item_id).await?;
        let unit_cost = line.unit_cost.unwrap_or(item.unit_cost);

        let after = increment_stock(conn, &item, line.quantity).await?;
        if unit_cost != item.unit_cost {
            conn.execute(
                "UPDATE inventory_items SET unit_cost = ?1, updated_at = ?2 WHERE id = ?3",
                libsql::params![unit_cost.to_string(), Utc::now().to_rfc3339(), item.id.as_str()],
            )
            .await?;
        }

        let transaction = insert_transaction(
            conn,
            &LedgerEntry {
                item_id: &item.id,
                project_id: None,
                transaction_type: TransactionType::Restock,
                quantity: line.quantity,
                unit_cost,
                notes,
                reconciliation_id: None,
                cart_id: Some(&cart.id),
                created_by: actor,
            },
        )
        .await?;
        audit_stock_change(
            conn,
            actor,
            &item.id,
            item.current_stock,
            after,
            Some(&transaction.id),
        )
        .await?;
        transactions.push(transaction);
    }

    cart_response(cart, transactions)
}
