//! Cart headers: each checkout or delivery is kept as one order.
//!
//! The header row lives in `carts`; its lines are the ledger rows carrying
//! its id. Editing a cart moves stock only by the difference between old and
//! new line quantities. Deleting one reverses every line.

use std::collections::HashMap;

use chrono::Utc;
use rust_decimal::Decimal;
use tally_core::entities::{Cart, InventoryTransaction};
use tally_core::enums::{AuditAction, CartKind, EntityType, ProjectStatus};
use tally_core::ids::PREFIX_CART;
use tally_core::pricing::line_total;
use tally_core::responses::CartResponse;

use crate::error::DatabaseError;
use crate::generate_id_on;
use crate::helpers::{get_opt_string, parse_datetime, parse_enum, to_detail};
use crate::repos::audit;
use crate::repos::item::{
    audit_stock_change, decrement_stock, fetch_item, increment_stock, validate_quantity,
};
use crate::repos::project::fetch_project;
use crate::repos::transaction::{self, LedgerEntry, insert_transaction, row_to_transaction};
use crate::service::{TallyService, finish};
use crate::updates::cart::CartUpdate;

const HEADER_COLS: &str = "id, kind, project_id, notes, created_by, created_at, updated_at";

fn row_to_cart(row: &libsql::Row) -> Result<Cart, DatabaseError> {
    Ok(Cart {
        id: row.get(0)?,
        kind: parse_enum(&row.get::<String>(1)?)?,
        project_id: get_opt_string(row, 2)?,
        notes: get_opt_string(row, 3)?,
        created_by: row.get(4)?,
        created_at: parse_datetime(&row.get::<String>(5)?)?,
        updated_at: parse_datetime(&row.get::<String>(6)?)?,
    })
}

/// Validate cart lines and merge duplicate items, keeping first-seen order.
pub(crate) fn merge_lines(lines: &[(String, i64)]) -> Result<Vec<(String, i64)>, DatabaseError> {
    if lines.is_empty() {
        return Err(DatabaseError::validation("cart has no lines"));
    }
    let mut merged: Vec<(String, i64)> = Vec::with_capacity(lines.len());
    for (item_id, quantity) in lines {
        validate_quantity(*quantity)?;
        match merged.iter_mut().find(|(id, _)| id == item_id) {
            Some((_, total)) => {
                *total = total.checked_add(*quantity).ok_or_else(|| {
                    DatabaseError::validation(format!(
                        "combined quantity for {item_id} is too large"
                    ))
                })?;
            }
            None => merged.push((item_id.clone(), *quantity)),
        }
    }
    Ok(merged)
}

/// Sum of line totals, failing rather than overflowing.
pub(crate) fn cart_response(
    cart: Cart,
    transactions: Vec<InventoryTransaction>,
) -> Result<CartResponse, DatabaseError> {
    let total_cost = transactions
        .iter()
        .try_fold(Decimal::ZERO, |acc, t| acc.checked_add(t.total_cost))
        .ok_or_else(|| {
            DatabaseError::validation(format!("total for cart {} overflows", cart.id))
        })?;
    Ok(CartResponse {
        cart,
        transactions,
        total_cost,
    })
}

/// Insert a cart header and its `created` audit entry on `conn`.
pub(crate) async fn insert_cart(
    conn: &libsql::Connection,
    kind: CartKind,
    project_id: Option<&str>,
    notes: Option<&str>,
    actor: &str,
) -> Result<Cart, DatabaseError> {
    let now = Utc::now();
    let cart = Cart {
        id: generate_id_on(conn, PREFIX_CART).await?,
        kind,
        project_id: project_id.map(String::from),
        notes: notes.map(String::from),
        created_by: actor.to_string(),
        created_at: now,
        updated_at: now,
    };
    conn.execute(
        &format!("INSERT INTO carts ({HEADER_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"),
        libsql::params![
            cart.id.as_str(),
            kind.as_str(),
            project_id,
            notes,
            actor,
            now.to_rfc3339(),
            now.to_rfc3339()
        ],
    )
    .await?;
    audit::record(
        conn,
        actor,
        EntityType::Cart,
        &cart.id,
        AuditAction::Created,
        Some(serde_json::json!({ "kind": kind })),
    )
    .await?;
    Ok(cart)
}

async fn fetch_cart(conn: &libsql::Connection, id: &str) -> Result<Cart, DatabaseError> {
    let mut rows = conn
        .query(&format!("SELECT {HEADER_COLS} FROM carts WHERE id = ?1"), [id])
        .await?;
    let row = rows
        .next()
        .await?
        .ok_or_else(|| DatabaseError::not_found("cart", id))?;
    row_to_cart(&row)
}

async fn fetch_cart_lines(
    conn: &libsql::Connection,
    cart_id: &str,
) -> Result<Vec<InventoryTransaction>, DatabaseError> {
    let mut rows = conn
        .query(
            &format!(
                "SELECT {} FROM inventory_transactions WHERE cart_id = ?1 ORDER BY rowid",
                transaction::SELECT_COLS
            ),
            [cart_id],
        )
        .await?;
    let mut lines = Vec::new();
    while let Some(row) = rows.next().await? {
        lines.push(row_to_transaction(&row)?);
    }
    Ok(lines)
}

/// Drop a cart header once its last line is gone.
pub(crate) async fn remove_if_empty(
    conn: &libsql::Connection,
    cart_id: &str,
    actor: &str,
) -> Result<(), DatabaseError> {
    if !fetch_cart_lines(conn, cart_id).await?.is_empty() {
        return Ok(());
    }
    conn.execute("DELETE FROM carts WHERE id = ?1", [cart_id]).await?;
    audit::record(conn, actor, EntityType::Cart, cart_id, AuditAction::Deleted, None).await?;
    Ok(())
}

/// Apply `quantity` more units of a cart line to stock. A negative quantity
/// takes units back off.
async fn apply_stock(
    conn: &libsql::Connection,
    kind: CartKind,
    item_id: &str,
    quantity: i64,
    source_id: &str,
    actor: &str,
) -> Result<(), DatabaseError> {
    if quantity == 0 {
        return Ok(());
    }
    let item = fetch_item(conn, item_id).await?;
    let units = quantity.abs();
    let lowers_stock = (kind == CartKind::Checkout) == (quantity > 0);
    let after = if lowers_stock {
        decrement_stock(conn, &item, units).await?;
        item.current_stock - units
    } else {
        increment_stock(conn, &item, units).await?
    };
    audit_stock_change(conn, actor, &item.id, item.current_stock, after, Some(source_id)).await
}

/// Filter criteria for cart listings.
#[derive(Debug, Default)]
pub struct CartFilter {
    pub kind: Option<CartKind>,
    pub project_id: Option<String>,
    pub limit: Option<u32>,
}

impl TallyService {
    /// Cart headers, newest first.
    pub async fn list_carts(&self, filter: &CartFilter) -> Result<Vec<Cart>, DatabaseError> {
        let mut conditions = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        if let Some(kind) = filter.kind {
            params.push(libsql::Value::Text(kind.as_str().to_string()));
            conditions.push(format!("kind = ?{}", params.len()));
        }
        if let Some(ref project_id) = filter.project_id {
            params.push(libsql::Value::Text(project_id.clone()));
            conditions.push(format!("project_id = ?{}", params.len()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        let limit = filter.limit.unwrap_or(100);
        let sql = format!(
            "SELECT {HEADER_COLS} FROM carts {where_clause}
             ORDER BY created_at DESC, rowid DESC LIMIT {limit}"
        );

        let mut rows = self
            .db()
            .query_with(&sql, || libsql::params_from_iter(params.clone()))
            .await?;
        let mut carts = Vec::new();
        while let Some(row) = rows.next().await? {
            carts.push(row_to_cart(&row)?);
        }
        Ok(carts)
    }

    pub async fn get_cart(&self, id: &str) -> Result<CartResponse, DatabaseError> {
        let conn = self.db().conn();
        let cart = fetch_cart(conn, id).await?;
        let lines = fetch_cart_lines(conn, id).await?;
        cart_response(cart, lines)
    }

    /// Edit a cart. Replacement lines move stock by the difference from the
    /// recorded quantities; kept lines keep the unit cost they were entered at.
    ///
    /// # Errors
    ///
    /// Returns a validation error for bad lines, a project on a receive cart
    /// or an inactive project, `CoreError::InsufficientStock` when the change
    /// needs more stock than is on hand, or `CoreError::NotFound` for an
    /// unknown cart, project or item. Nothing is written on failure.
    pub async fn update_cart(
        &self,
        id: &str,
        update: CartUpdate,
        actor: &str,
    ) -> Result<CartResponse, DatabaseError> {
        if update.is_empty() {
            return self.get_cart(id).await;
        }
        let lines = update.lines.as_deref().map(merge_lines).transpose()?;

        let tx = self.begin().await?;
        let result = update_in(&tx, id, &update, lines.as_deref(), actor).await;
        let response = finish(tx, result).await?;
        tracing::debug!(id = %id, lines = response.transactions.len(), "cart updated");
        Ok(response)
    }

    /// Delete a cart and reverse the stock effect of every line.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotFound` for an unknown cart, or
    /// `CoreError::InsufficientStock` when received stock has already been
    /// used. Either every line is reversed or none is.
    pub async fn delete_cart(&self, id: &str, actor: &str) -> Result<(), DatabaseError> {
        let tx = self.begin().await?;
        let result = delete_in(&tx, id, actor).await;
        finish(tx, result).await?;
        tracing::debug!(id = %id, "cart deleted");
        Ok(())
    }
}

async fn update_in(
    conn: &libsql::Connection,
    id: &str,
    update: &CartUpdate,
    lines: Option<&[(String, i64)]>,
    actor: &str,
) -> Result<CartResponse, DatabaseError> {
    let mut cart = fetch_cart(conn, id).await?;

    if let Some(ref project_id) = update.project_id {
        if cart.kind != CartKind::Checkout {
            return Err(DatabaseError::validation(format!(
                "{id} is a {} cart; only checkouts belong to a project",
                cart.kind
            )));
        }
        let project = fetch_project(conn, project_id).await?;
        if project.status != ProjectStatus::Active {
            return Err(DatabaseError::validation(format!(
                "project '{}' is {}; only active projects accept checkouts",
                project.name, project.status
            )));
        }
        cart.project_id = Some(project.id);
    }
    if let Some(ref notes) = update.notes {
        cart.notes.clone_from(notes);
    }
    cart.updated_at = Utc::now();

    conn.execute(
        "UPDATE carts SET project_id = ?1, notes = ?2, updated_at = ?3 WHERE id = ?4",
        libsql::params![
            cart.project_id.as_deref(),
            cart.notes.as_deref(),
            cart.updated_at.to_rfc3339(),
            id
        ],
    )
    .await?;
    conn.execute(
        "UPDATE inventory_transactions SET project_id = ?1, notes = ?2 WHERE cart_id = ?3",
        libsql::params![cart.project_id.as_deref(), cart.notes.as_deref(), id],
    )
    .await?;

    if let Some(lines) = lines {
        replace_lines(conn, &cart, lines, actor).await?;
    }

    audit::record(
        conn,
        actor,
        EntityType::Cart,
        id,
        AuditAction::Updated,
        Some(to_detail(update)?),
    )
    .await?;

    let transactions = fetch_cart_lines(conn, id).await?;
    cart_response(cart, transactions)
}

async fn replace_lines(
    conn: &libsql::Connection,
    cart: &Cart,
    lines: &[(String, i64)],
    actor: &str,
) -> Result<(), DatabaseError> {
    let old: HashMap<String, InventoryTransaction> = fetch_cart_lines(conn, &cart.id)
        .await?
        .into_iter()
        .map(|t| (t.item_id.clone(), t))
        .collect();

    // Items taken off the cart give back their whole quantity.
    for row in old.values() {
        if !lines.iter().any(|(item_id, _)| item_id == &row.item_id) {
            apply_stock(conn, cart.kind, &row.item_id, -row.quantity, &row.id, actor).await?;
            conn.execute("DELETE FROM inventory_transactions WHERE id = ?1", [row.id.as_str()])
                .await?;
        }
    }

    for (item_id, quantity) in lines {
        match old.get(item_id) {
            Some(row) => {
                let difference = quantity - row.quantity;
                if difference == 0 {
                    continue;
                }
                apply_stock(conn, cart.kind, item_id, difference, &row.id, actor).await?;
                let total_cost = line_total(*quantity, row.unit_cost)?;
                conn.execute(
                    "UPDATE inventory_transactions SET quantity = ?1, total_cost = ?2 WHERE id = ?3",
                    libsql::params![*quantity, total_cost.to_string(), row.id.as_str()],
                )
                .await?;
            }
            None => {
                let item = fetch_item(conn, item_id).await?;
                let transaction = insert_transaction(
                    conn,
                    &LedgerEntry {
                        item_id: &item.id,
                        project_id: cart.project_id.as_deref(),
                        transaction_type: cart.kind.transaction_type(),
                        quantity: *quantity,
                        unit_cost: item.unit_cost,
                        notes: cart.notes.as_deref(),
                        reconciliation_id: None,
                        cart_id: Some(&cart.id),
                        created_by: actor,
                    },
                )
                .await?;
                apply_stock(conn, cart.kind, item_id, *quantity, &transaction.id, actor).await?;
            }
        }
    }
    Ok(())
}

async fn delete_in(conn: &libsql::Connection, id: &str, actor: &str) -> Result<(), DatabaseError> {
    let cart = fetch_cart(conn, id).await?;
    let lines = fetch_cart_lines(conn, id).await?;

    for line in &lines {
        apply_stock(conn, cart.kind, &line.item_id, -line.quantity, id, actor).await?;
    }
    conn.execute("DELETE FROM inventory_transactions WHERE cart_id = ?1", [id])
        .await?;
    conn.execute("DELETE FROM carts WHERE id = ?1", [id]).await?;

    audit::record(
        conn,
        actor,
        EntityType::Cart,
        id,
        AuditAction::Deleted,
        Some(serde_json::json!({ "kind": cart.kind, "lines": lines.len() })),
    )
    .await?;
    Ok(())
}
