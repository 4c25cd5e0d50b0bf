//! Inventory item repository: CRUD, filtering and single-item receipts.

use chrono::Utc;
use rust_decimal::Decimal;
use tally_core::audit_detail::StockChangedDetail;
use tally_core::entities::InventoryItem;
use tally_core::enums::{AuditAction, EntityType, TransactionType};
use tally_core::errors::CoreError;
use tally_core::ids::PREFIX_ITEM;
use tally_core::responses::ItemReceiveResponse;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime, parse_decimal, to_detail};
use crate::repos::audit;
use crate::repos::transaction::{LedgerEntry, insert_transaction};
use crate::service::{TallyService, finish};
use crate::updates::item::ItemUpdate;

pub(crate) const SELECT_COLS: &str = "id, name, sku, description, current_stock, minimum_stock, \
     unit_cost, unit, supplier, category, created_at, updated_at";

pub(crate) fn row_to_item(row: &libsql::Row) -> Result<InventoryItem, DatabaseError> {
    Ok(InventoryItem {
        id: row.get(0)?,
        name: row.get(1)?,
        sku: row.get(2)?,
        description: get_opt_string(row, 3)?,
        current_stock: row.get(4)?,
        minimum_stock: row.get(5)?,
        unit_cost: parse_decimal(&row.get::<String>(6)?)?,
        unit: row.get(7)?,
        supplier: get_opt_string(row, 8)?,
        category: get_opt_string(row, 9)?,
        created_at: parse_datetime(&row.get::<String>(10)?)?,
        updated_at: parse_datetime(&row.get::<String>(11)?)?,
    })
}

/// Fields for a new inventory item.
#[derive(Debug, Clone)]
pub struct NewItem {
    pub name: String,
    pub sku: String,
    pub description: Option<String>,
    pub current_stock: i64,
    pub minimum_stock: i64,
    pub unit_cost: Decimal,
    pub unit: String,
    pub supplier: Option<String>,
    pub category: Option<String>,
}

impl Default for NewItem {
    fn default() -> Self {
        Self {
            name: String::new(),
            sku: String::new(),
            description: None,
            current_stock: 0,
            minimum_stock: 0,
            unit_cost: Decimal::ZERO,
            unit: "each".to_string(),
            supplier: None,
            category: None,
        }
    }
}

/// Filter criteria for item listings.
#[derive(Debug, Default)]
pub struct ItemFilter {
    /// Case-insensitive substring over name, SKU and description.
    pub search: Option<String>,
    pub category: Option<String>,
    pub low_stock_only: bool,
    pub limit: Option<u32>,
}

pub(crate) fn validate_cost(cost: Decimal) -> Result<(), DatabaseError> {
    if cost < Decimal::ZERO {
        return Err(DatabaseError::validation(format!(
            "unit cost cannot be negative: {cost}"
        )));
    }
    Ok(())
}

pub(crate) fn validate_quantity(quantity: i64) -> Result<(), DatabaseError> {
    if quantity <= 0 {
        return Err(DatabaseError::validation(format!(
            "quantity must be positive: {quantity}"
        )));
    }
    Ok(())
}

fn require_text(field: &str, value: &str) -> Result<(), DatabaseError> {
    if value.trim().is_empty() {
        return Err(DatabaseError::validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Load an item on `conn`, which may be an open transaction.
pub(crate) async fn fetch_item(
    conn: &libsql::Connection,
    id: &str,
) -> Result<InventoryItem, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("SELECT {SELECT_COLS} FROM inventory_items WHERE id = ?1"),
            [id],
        )
        .await?;
    let row = rows
        .next()
        .await?
        .ok_or_else(|| DatabaseError::not_found("item", id))?;
    row_to_item(&row)
}

/// Lower stock by `quantity`, failing instead of going negative.
pub(crate) async fn decrement_stock(
    conn: &libsql::Connection,
    item: &InventoryItem,
    quantity: i64,
) -> Result<(), DatabaseError> {
    let changed = conn
        .execute(
            "UPDATE inventory_items
             SET current_stock = current_stock - ?1, updated_at = ?2
             WHERE id = ?3 AND current_stock >= ?1",
            libsql::params![quantity, Utc::now().to_rfc3339(), item.id.as_str()],
        )
        .await?;
    if changed == 0 {
        let available = fetch_item(conn, &item.id).await?.current_stock;
        return Err(CoreError::InsufficientStock {
            item: item.name.clone(),
            requested: quantity,
            available,
        }
        .into());
    }
    Ok(())
}

/// Raise stock by `quantity` and return the new level. SQLite would turn an
/// overflowing sum into a REAL, so the bound is checked here and in the WHERE.
pub(crate) async fn increment_stock(
    conn: &libsql::Connection,
    item: &InventoryItem,
    quantity: i64,
) -> Result<i64, DatabaseError> {
    let overflow = || {
        DatabaseError::validation(format!(
            "adding {quantity} to {} would overflow its stock of {}",
            item.name, item.current_stock
        ))
    };
    let target = item.current_stock.checked_add(quantity).ok_or_else(overflow)?;
    let changed = conn
        .execute(
            "UPDATE inventory_items
             SET current_stock = current_stock + ?1, updated_at = ?2
             WHERE id = ?3 AND current_stock <= ?4",
            libsql::params![
                quantity,
                Utc::now().to_rfc3339(),
                item.id.as_str(),
                i64::MAX.saturating_sub(quantity)
            ],
        )
        .await?;
    if changed == 0 {
        return Err(overflow());
    }
    Ok(target)
}

pub(crate) async fn set_stock(
    conn: &libsql::Connection,
    item_id: &str,
    quantity: i64,
) -> Result<(), DatabaseError> {
    if quantity < 0 {
        return Err(DatabaseError::validation(format!(
            "stock cannot be negative for {item_id}: {quantity}"
        )));
    }
    conn.execute(
        "UPDATE inventory_items SET current_stock = ?1, updated_at = ?2 WHERE id = ?3",
        libsql::params![quantity, Utc::now().to_rfc3339(), item_id],
    )
    .await?;
    Ok(())
}

/// Audit a stock change on an item, inside the caller's transaction.
pub(crate) async fn audit_stock_change(
    conn: &libsql::Connection,
    actor: &str,
    item_id: &str,
    from: i64,
    to: i64,
    source_id: Option<&str>,
) -> Result<(), DatabaseError> {
    let detail = StockChangedDetail {
        from,
        to,
        source_id: source_id.map(String::from),
    };
    audit::record(
        conn,
        actor,
        EntityType::Item,
        item_id,
        AuditAction::StockChanged,
        Some(to_detail(&detail)?),
    )
    .await?;
    Ok(())
}

impl TallyService {
    /// Create an item. Opening stock is logged as a `receive` so the ledger
    /// replays to the stored quantity.
    ///
    /// # Errors
    ///
    /// Returns a validation error for blank names, negative stock or cost,
    /// or `DatabaseError::LibSql` for a duplicate SKU.
    pub async fn create_item(
        &self,
        new: &NewItem,
        actor: &str,
    ) -> Result<InventoryItem, DatabaseError> {
        require_text("item name", &new.name)?;
        require_text("sku", &new.sku)?;
        if new.current_stock < 0 || new.minimum_stock < 0 {
            return Err(DatabaseError::validation("stock levels cannot be negative"));
        }
        validate_cost(new.unit_cost)?;

        let tx = self.begin().await?;
        let result = create_item_in(&tx, new, actor).await;
        let item = finish(tx, result).await?;
        tracing::debug!(id = %item.id, sku = %item.sku, "item created");
        Ok(item)
    }

    pub async fn get_item(&self, id: &str) -> Result<InventoryItem, DatabaseError> {
        let mut rows = self
            .db()
            .query_with(
                &format!("SELECT {SELECT_COLS} FROM inventory_items WHERE id = ?1"),
                || [id],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found("item", id))?;
        row_to_item(&row)
    }

    pub async fn get_item_by_sku(&self, sku: &str) -> Result<InventoryItem, DatabaseError> {
        let mut rows = self
            .db()
            .query_with(
                &format!("SELECT {SELECT_COLS} FROM inventory_items WHERE sku = ?1"),
                || [sku],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found("item", sku))?;
        row_to_item(&row)
    }

    /// Look up by id, falling back to SKU.
    pub async fn resolve_item(&self, id_or_sku: &str) -> Result<InventoryItem, DatabaseError> {
        match self.get_item(id_or_sku).await {
            Err(DatabaseError::Core(CoreError::NotFound { .. })) => {
                self.get_item_by_sku(id_or_sku).await
            }
            other => other,
        }
    }

    /// # Errors
    ///
    /// Returns a validation error for invalid values, or `DatabaseError` if
    /// the UPDATE fails.
    pub async fn update_item(
        &self,
        item_id: &str,
        update: ItemUpdate,
        actor: &str,
    ) -> Result<InventoryItem, DatabaseError> {
        let mut sets = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        let mut idx = 1usize;

        if let Some(ref name) = update.name {
            require_text("item name", name)?;
            sets.push(format!("name = ?{idx}"));
            params.push(name.clone().into());
            idx += 1;
        }
        if let Some(ref sku) = update.sku {
            require_text("sku", sku)?;
            sets.push(format!("sku = ?{idx}"));
            params.push(sku.clone().into());
            idx += 1;
        }
        if let Some(ref description) = update.description {
            sets.push(format!("description = ?{idx}"));
            params.push(description.clone().map_or(libsql::Value::Null, Into::into));
            idx += 1;
        }
        if let Some(minimum_stock) = update.minimum_stock {
            if minimum_stock < 0 {
                return Err(DatabaseError::validation("minimum stock cannot be negative"));
            }
            sets.push(format!("minimum_stock = ?{idx}"));
            params.push(minimum_stock.into());
            idx += 1;
        }
        if let Some(unit_cost) = update.unit_cost {
            validate_cost(unit_cost)?;
            sets.push(format!("unit_cost = ?{idx}"));
            params.push(unit_cost.to_string().into());
            idx += 1;
        }
        if let Some(ref unit) = update.unit {
            sets.push(format!("unit = ?{idx}"));
            params.push(unit.clone().into());
            idx += 1;
        }
        if let Some(ref supplier) = update.supplier {
            sets.push(format!("supplier = ?{idx}"));
            params.push(supplier.clone().map_or(libsql::Value::Null, Into::into));
            idx += 1;
        }
        if let Some(ref category) = update.category {
            sets.push(format!("category = ?{idx}"));
            params.push(category.clone().map_or(libsql::Value::Null, Into::into));
            idx += 1;
        }

        if sets.is_empty() {
            return self.get_item(item_id).await;
        }

        let now = Utc::now();
        sets.push(format!("updated_at = ?{idx}"));
        params.push(now.to_rfc3339().into());
        idx += 1;

        params.push(item_id.into());
        let sql = format!(
            "UPDATE inventory_items SET {} WHERE id = ?{idx}",
            sets.join(", ")
        );
        let changed = self
            .db()
            .execute_with(&sql, || libsql::params_from_iter(params.clone()))
            .await?;
        if changed == 0 {
            return Err(DatabaseError::not_found("item", item_id));
        }

        let updated = self.get_item(item_id).await?;
        self.audit(
            actor,
            EntityType::Item,
            item_id,
            AuditAction::Updated,
            Some(to_detail(&update)?),
        )
        .await?;
        Ok(updated)
    }

    /// Delete an item. Its ledger rows and count lines go with it.
    pub async fn delete_item(&self, item_id: &str, actor: &str) -> Result<(), DatabaseError> {
        let changed = self
            .db()
            .execute_with("DELETE FROM inventory_items WHERE id = ?1", || [item_id])
            .await?;
        if changed == 0 {
            return Err(DatabaseError::not_found("item", item_id));
        }
        self.audit(actor, EntityType::Item, item_id, AuditAction::Deleted, None)
            .await?;
        tracing::debug!(id = %item_id, "item deleted");
        Ok(())
    }

    /// List items ordered by name.
    pub async fn list_items(&self, filter: &ItemFilter) -> Result<Vec<InventoryItem>, DatabaseError> {
        let mut conditions = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(ref category) = filter.category {
            params.push(libsql::Value::Text(category.clone()));
            conditions.push(format!("category = ?{}", params.len()));
        }
        if filter.low_stock_only {
            conditions.push("current_stock <= minimum_stock".to_string());
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        let sql = format!(
            "SELECT {SELECT_COLS} FROM inventory_items {where_clause} ORDER BY name COLLATE NOCASE, sku"
        );

        let mut rows = self
            .db()
            .query_with(&sql, || libsql::params_from_iter(params.clone()))
            .await?;
        let search = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty());
        let limit = filter.limit.map_or(usize::MAX, |l| l as usize);

        let mut items = Vec::new();
        while let Some(row) = rows.next().await? {
            let item = row_to_item(&row)?;
            if search.is_none_or(|term| item.matches_search(term)) {
                items.push(item);
            }
            if items.len() >= limit {
                break;
            }
        }
        Ok(items)
    }

    /// Distinct non-empty categories, sorted.
    pub async fn list_categories(&self) -> Result<Vec<String>, DatabaseError> {
        let mut rows = self
            .db()
            .query_with(
                "SELECT DISTINCT category FROM inventory_items
                 WHERE category IS NOT NULL AND trim(category) != ''
                 ORDER BY category COLLATE NOCASE",
                || (),
            )
            .await?;
        let mut categories = Vec::new();
        while let Some(row) = rows.next().await? {
            categories.push(row.get::<String>(0)?);
        }
        Ok(categories)
    }

    /// Items at or below their minimum stock, ordered by name.
    pub async fn low_stock_items(&self) -> Result<Vec<InventoryItem>, DatabaseError> {
        self.list_items(&ItemFilter {
            low_stock_only: true,
            ..Default::default()
        })
        .await
    }

    /// Receive stock for one item at its current unit cost.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a non-positive quantity or
    /// `CoreError::NotFound` for an unknown item.
    pub async fn receive_item(
        &self,
        item_id: &str,
        quantity: i64,
        notes: Option<&str>,
        actor: &str,
    ) -> Result<ItemReceiveResponse, DatabaseError> {
        validate_quantity(quantity)?;

        let tx = self.begin().await?;
        let result = receive_item_in(&tx, item_id, quantity, notes, actor).await;
        let response = finish(tx, result).await?;
        tracing::debug!(item = %item_id, quantity, "item received");
        Ok(response)
    }
}

async fn create_item_in(
    conn: &libsql::Connection,
    new: &NewItem,
    actor: &str,
) -> Result<InventoryItem, DatabaseError> {
    let now = Utc::now();
    let id = crate::generate_id_on(conn, PREFIX_ITEM).await?;

    conn.execute(
        &format!(
            "INSERT INTO inventory_items ({SELECT_COLS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)"
        ),
        libsql::params![
            id.as_str(),
            new.name.trim(),
            new.sku.trim(),
            new.description.as_deref(),
            new.current_stock,
            new.minimum_stock,
            new.unit_cost.to_string(),
            new.unit.as_str(),
            new.supplier.as_deref(),
            new.category.as_deref(),
            now.to_rfc3339(),
            now.to_rfc3339()
        ],
    )
    .await?;

    audit::record(conn, actor, EntityType::Item, &id, AuditAction::Created, None).await?;

    if new.current_stock > 0 {
        insert_transaction(
            conn,
            &LedgerEntry {
                item_id: &id,
                project_id: None,
                transaction_type: TransactionType::Receive,
                quantity: new.current_stock,
                unit_cost: new.unit_cost,
                notes: Some("Opening stock"),
                reconciliation_id: None,
                cart_id: None,
                created_by: actor,
            },
        )
        .await?;
    }

    fetch_item(conn, &id).await
}

async fn receive_item_in(
    conn: &libsql::Connection,
    item_id: &str,
    quantity: i64,
    notes: Option<&str>,
    actor: &str,
) -> Result<ItemReceiveResponse, DatabaseError> {
    let before = fetch_item(conn, item_id).await?;
    increment_stock(conn, &before, quantity).await?;
    let transaction = insert_transaction(
        conn,
        &LedgerEntry {
            item_id,
            project_id: None,
            transaction_type: TransactionType::Receive,
            quantity,
            unit_cost: before.unit_cost,
            notes,
            reconciliation_id: None,
            cart_id: None,
            created_by: actor,
        },
    )
    .await?;
    let item = fetch_item(conn, item_id).await?;
    audit_stock_change(
        conn,
        actor,
        item_id,
        before.current_stock,
        item.current_stock,
        Some(&transaction.id),
    )
    .await?;
    Ok(ItemReceiveResponse { item, transaction })
}
