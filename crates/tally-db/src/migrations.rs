//! Embedded schema. Every statement is `IF NOT EXISTS`, so opening an
//! existing database re-applies the list harmlessly. Columns added to a
//! table after it first shipped are checked against `pragma_table_info`,
//! since SQLite has no `ADD COLUMN IF NOT EXISTS`.

use crate::TallyDb;
use crate::error::DatabaseError;

/// Applied in order on every open.
const MIGRATIONS: &[(&str, &str)] = &[
    ("001_initial", include_str!("../migrations/001_initial.sql")),
    ("002_carts", include_str!("../migrations/002_carts.sql")),
];

struct AddedColumn {
    table: &'static str,
    column: &'static str,
    definition: &'static str,
    index: &'static str,
}

const ADDED_COLUMNS: &[AddedColumn] = &[AddedColumn {
    table: "inventory_transactions",
    column: "cart_id",
    definition: "TEXT REFERENCES carts(id) ON DELETE CASCADE",
    index: "CREATE INDEX IF NOT EXISTS idx_transactions_cart ON inventory_transactions(cart_id)",
}];

impl TallyDb {
    pub(crate) async fn run_migrations(&self) -> Result<(), DatabaseError> {
        for (name, sql) in MIGRATIONS {
            self.conn
                .execute_batch(sql)
                .await
                .map_err(|e| DatabaseError::Migration(format!("{name}: {e}")))?;
            tracing::debug!(migration = name, "migration applied");
        }
        for added in ADDED_COLUMNS {
            self.add_column_if_missing(added).await.map_err(|e| {
                DatabaseError::Migration(format!("{}.{}: {e}", added.table, added.column))
            })?;
        }
        Ok(())
    }

    async fn add_column_if_missing(&self, added: &AddedColumn) -> Result<(), DatabaseError> {
        let mut rows = self
            .conn
            .query(
                &format!(
                    "SELECT COUNT(*) FROM pragma_table_info('{}') WHERE name = ?1",
                    added.table
                ),
                [added.column],
            )
            .await?;
        let present = match rows.next().await? {
            Some(row) => row.get::<i64>(0)? > 0,
            None => false,
        };
        drop(rows);

        if !present {
            self.conn
                .execute(
                    &format!(
                        "ALTER TABLE {} ADD COLUMN {} {}",
                        added.table, added.column, added.definition
                    ),
                    (),
                )
                .await?;
            tracing::debug!(table = added.table, column = added.column, "column added");
        }
        self.conn.execute(added.index, ()).await?;
        Ok(())
    }
}
