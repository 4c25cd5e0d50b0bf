//! # tally-db
//!
//! libSQL database operations for Tally.
//!
//! Handles all relational state: inventory items, tools, projects, the
//! transaction ledger, tool movements, reconciliations and the audit trail.
//! The same schema runs against a local file, a hosted Turso database, or an
//! embedded replica of one.

pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
pub mod retry;
pub mod service;
pub mod updates;

#[cfg(test)]
mod test_support;

use std::path::Path;
use std::time::Duration;

use error::DatabaseError;
use libsql::Builder;
use libsql::params::IntoParams;
use retry::{RetryConfig, is_transient_turso_error};
use tally_config::{BackendConfig, BackendMode};

/// How the handle reaches its data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbMode {
    Local,
    Remote,
    Replica,
}

/// Central database handle for all Tally state operations.
///
/// Wraps a libSQL database and connection. Provides ID generation and
/// retrying statement helpers.
pub struct TallyDb {
    db: libsql::Database,
    conn: libsql::Connection,
    mode: DbMode,
    retry: RetryConfig,
}

impl TallyDb {
    /// Open a local-only database at the given path.
    ///
    /// Runs migrations automatically on first open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        Self::finish_open(db, DbMode::Local).await
    }

    /// Open a hosted Turso database. Every statement goes over the network.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the connection or migrations fail.
    pub async fn open_remote(url: &str, auth_token: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_remote(url.to_string(), auth_token.to_string())
            .build()
            .await?;
        Self::finish_open(db, DbMode::Remote).await
    }

    /// Open an embedded replica of a hosted database and pull remote state.
    ///
    /// A `sync_interval_secs` of zero disables background sync; `tly sync`
    /// still works.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the replica cannot be built, the initial
    /// sync fails, or migrations fail.
    pub async fn open_synced(
        local_replica_path: &str,
        url: &str,
        auth_token: &str,
        sync_interval_secs: u64,
    ) -> Result<Self, DatabaseError> {
        let mut builder =
            Builder::new_remote_replica(local_replica_path, url.to_string(), auth_token.to_string())
                .read_your_writes(true);
        if sync_interval_secs > 0 {
            builder = builder.sync_interval(Duration::from_secs(sync_interval_secs));
        }
        let db = builder.build().await?;
        db.sync().await?;
        Self::finish_open(db, DbMode::Replica).await
    }

    /// Open whichever backend `config` describes. `local_path` is used for
    /// the local mode.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the chosen backend cannot be opened.
    pub async fn open_from_config(
        config: &BackendConfig,
        local_path: &Path,
    ) -> Result<Self, DatabaseError> {
        match config.mode() {
            BackendMode::Local => {
                let path = local_path.to_str().ok_or_else(|| {
                    DatabaseError::InvalidState(format!(
                        "database path is not valid UTF-8: {}",
                        local_path.display()
                    ))
                })?;
                Self::open_local(path).await
            }
            BackendMode::Remote => Self::open_remote(&config.url, &config.auth_token).await,
            BackendMode::Replica => {
                Self::open_synced(
                    &config.local_replica_path,
                    &config.url,
                    &config.auth_token,
                    config.sync_interval_secs,
                )
                .await
            }
        }
    }

    async fn finish_open(db: libsql::Database, mode: DbMode) -> Result<Self, DatabaseError> {
        let conn = db.connect()?;

        // Enable foreign keys (must be per-connection in SQLite)
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let tally_db = Self {
            db,
            conn,
            mode,
            retry: RetryConfig::default(),
        };
        tally_db.run_migrations().await?;
        tracing::debug!(?mode, "database opened");
        Ok(tally_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    #[must_use]
    pub const fn mode(&self) -> DbMode {
        self.mode
    }

    /// Whether statements reach a hosted database (remote or replica writes).
    #[must_use]
    pub fn is_remote(&self) -> bool {
        self.mode != DbMode::Local
    }

    /// Pull remote changes into the embedded replica.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidState` when the handle is not a replica.
    pub async fn sync(&self) -> Result<(), DatabaseError> {
        if self.mode != DbMode::Replica {
            return Err(DatabaseError::InvalidState(
                "sync requires an embedded replica (set backend.local_replica_path)".into(),
            ));
        }
        self.db.sync().await?;
        Ok(())
    }

    /// Generate a prefixed ID via libSQL. Returns e.g., `"itm-a3f8b2c1"`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or returns no rows.
    pub async fn generate_id(&self, prefix: &str) -> Result<String, DatabaseError> {
        generate_id_on(&self.conn, prefix).await
    }

    /// Execute a statement, retrying transient Turso errors when remote.
    ///
    /// `params` is called once per attempt because libSQL consumes parameters.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::LibSql` once retries are exhausted or on any
    /// non-transient error.
    pub async fn execute_with<F, P>(&self, sql: &str, params: F) -> Result<u64, DatabaseError>
    where
        F: Fn() -> P,
        P: IntoParams,
    {
        let mut attempt = 1;
        loop {
            match self.conn.execute(sql, params()).await {
                Ok(n) => return Ok(n),
                Err(e) if self.should_retry(&e, attempt) => {
                    self.backoff(&e, attempt).await;
                    attempt += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Run a query, retrying transient Turso errors when remote.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::LibSql` once retries are exhausted or on any
    /// non-transient error.
    pub async fn query_with<F, P>(&self, sql: &str, params: F) -> Result<libsql::Rows, DatabaseError>
    where
        F: Fn() -> P,
        P: IntoParams,
    {
        let mut attempt = 1;
        loop {
            match self.conn.query(sql, params()).await {
                Ok(rows) => return Ok(rows),
                Err(e) if self.should_retry(&e, attempt) => {
                    self.backoff(&e, attempt).await;
                    attempt += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn should_retry(&self, e: &libsql::Error, attempt: u32) -> bool {
        self.is_remote() && attempt < self.retry.max_attempts && is_transient_turso_error(e)
    }

    async fn backoff(&self, e: &libsql::Error, attempt: u32) {
        let delay = self.retry.delay_for(attempt);
        tracing::warn!(error = %e, attempt, ?delay, "transient Turso error, retrying");
        tokio::time::sleep(delay).await;
    }
}

/// Generate a prefixed ID on an explicit connection or open transaction.
///
/// # Errors
///
/// Returns `DatabaseError` if the query fails or returns no rows.
pub async fn generate_id_on(conn: &libsql::Connection, prefix: &str) -> Result<String, DatabaseError> {
    let mut rows = conn
        .query(&format!("SELECT '{prefix}-' || lower(hex(randomblob(4)))"), ())
        .await?;
    let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
    Ok(row.get::<String>(0)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    async fn test_db() -> TallyDb {
        TallyDb::open_local(":memory:").await.unwrap()
    }

    #[tokio::test]
    async fn open_local_creates_schema() {
        let db = test_db().await;

        let tables = [
            "inventory_items",
            "tools",
            "projects",
            "inventory_transactions",
            "tool_movements",
            "reconciliations",
            "reconciliation_lines",
            "audit_trail",
        ];
        for table in &tables {
            let mut rows = db
                .conn()
                .query(
                    "SELECT name FROM sqlite_master WHERE type='table' AND name=?1",
                    [*table],
                )
                .await
                .unwrap();
            let row = rows.next().await.unwrap();
            assert!(row.is_some(), "table '{table}' should exist");
        }
        assert_eq!(db.mode(), DbMode::Local);
        assert!(!db.is_remote());
    }

    #[tokio::test]
    async fn generate_id_correct_format() {
        let db = test_db().await;
        let id = db.generate_id("itm").await.unwrap();
        assert!(id.starts_with("itm-"), "ID should start with 'itm-': {id}");
        assert_eq!(id.len(), 12, "3 prefix + 1 dash + 8 hex: {id}");
        assert!(id[4..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[tokio::test]
    async fn generate_id_all_prefixes() {
        let db = test_db().await;
        for prefix in tally_core::ids::ALL_PREFIXES {
            let id = db.generate_id(prefix).await.unwrap();
            assert!(id.starts_with(&format!("{prefix}-")));
        }
    }

    #[tokio::test]
    async fn generate_id_uniqueness() {
        let db = test_db().await;
        let mut ids = HashSet::new();
        for _ in 0..100 {
            let id = db.generate_id("txn").await.unwrap();
            assert!(ids.insert(id.clone()), "Duplicate ID generated: {id}");
        }
    }

    #[tokio::test]
    async fn idempotent_migrations() {
        let db = test_db().await;
        db.run_migrations().await.unwrap();
    }

    #[tokio::test]
    async fn sync_rejected_for_local_database() {
        let db = test_db().await;
        assert!(matches!(db.sync().await, Err(DatabaseError::InvalidState(_))));
    }

    #[tokio::test]
    async fn stock_check_constraint_rejects_negative() {
        let db = test_db().await;
        let result = db
            .conn()
            .execute(
                "INSERT INTO inventory_items (id, name, sku, current_stock) VALUES ('itm-t1', 'Tape', 'TP-1', -1)",
                (),
            )
            .await;
        assert!(result.is_err(), "negative stock should be rejected");
    }

    #[tokio::test]
    async fn open_from_config_uses_local_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("tally.db");
        let db = TallyDb::open_from_config(&BackendConfig::default(), &path)
            .await
            .unwrap();
        assert_eq!(db.mode(), DbMode::Local);
        assert!(path.exists());
    }

    #[tokio::test]
    async fn execute_with_reports_constraint_errors() {
        let db = test_db().await;
        db.execute_with(
            "INSERT INTO projects (id, name, status) VALUES (?1, ?2, 'active')",
            || libsql::params!["prj-a", "Smith House"],
        )
        .await
        .unwrap();
        let dup = db
            .execute_with(
                "INSERT INTO projects (id, name, status) VALUES (?1, ?2, 'active')",
                || libsql::params!["prj-b", "Smith House"],
            )
            .await;
        assert!(matches!(dup, Err(DatabaseError::LibSql(_))));
    }
}
