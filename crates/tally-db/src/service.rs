//! Service layer orchestrating database mutations with audit.
//!
//! `TallyService` wraps `TallyDb` (raw database access) plus the few settings
//! mutations depend on. All repo methods are implemented as `impl TallyService`.

use tally_config::TallyConfig;

use crate::TallyDb;
use crate::error::DatabaseError;

const DEFAULT_SHOP_LOCATION: &str = "shop";

/// Orchestrates database mutations with an audit trail.
///
/// Every mutation method follows this protocol:
/// 1. Validate input
/// 2. Execute SQL (multi-step stock flows inside one transaction)
/// 3. Append audit entry (inside the same transaction when there is one)
/// 4. Commit
pub struct TallyService {
    db: TallyDb,
    shop_location: String,
}

impl TallyService {
    /// Create a new service wrapping a local database.
    ///
    /// # Arguments
    ///
    /// * `db_path` - Path to the libSQL database file, or `":memory:"` for tests.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(db_path: &str) -> Result<Self, DatabaseError> {
        let db = TallyDb::open_local(db_path).await?;
        Ok(Self::from_db(db))
    }

    /// Create a service from loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the configured backend cannot be opened.
    pub async fn from_config(
        config: &TallyConfig,
        local_path: &std::path::Path,
    ) -> Result<Self, DatabaseError> {
        let db = TallyDb::open_from_config(&config.backend, local_path).await?;
        Ok(Self::from_db(db).with_shop_location(&config.general.shop_location))
    }

    /// Create from an existing `TallyDb`.
    #[must_use]
    pub fn from_db(db: TallyDb) -> Self {
        Self {
            db,
            shop_location: DEFAULT_SHOP_LOCATION.to_string(),
        }
    }

    /// Override the location tools return to.
    #[must_use]
    pub fn with_shop_location(mut self, shop_location: &str) -> Self {
        let trimmed = shop_location.trim();
        if !trimmed.is_empty() {
            self.shop_location = trimmed.to_string();
        }
        self
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &TallyDb {
        &self.db
    }

    #[must_use]
    pub fn shop_location(&self) -> &str {
        &self.shop_location
    }

    /// Sync the underlying database with remote cloud state.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the handle is not a replica or sync fails.
    pub async fn sync(&self) -> Result<(), DatabaseError> {
        self.db.sync().await
    }

    /// Begin a transaction on the service connection.
    pub(crate) async fn begin(&self) -> Result<libsql::Transaction, DatabaseError> {
        Ok(self.db.conn().transaction().await?)
    }
}

/// Commit on success, roll back on failure.
pub(crate) async fn finish<T>(
    tx: libsql::Transaction,
    result: Result<T, DatabaseError>,
) -> Result<T, DatabaseError> {
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback) = tx.rollback().await {
                tracing::warn!(error = %rollback, "rollback failed");
            }
            Err(e)
        }
    }
}
