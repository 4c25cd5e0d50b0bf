use tally_core::errors::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A row could not be decoded into its entity.
    #[error("query failed: {0}")]
    Query(String),

    #[error("schema migration {0}")]
    Migration(String),

    #[error("query returned no rows")]
    NoResult,

    /// The backend cannot do what was asked (sync on a local file, bad stored enum).
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// A stock, cart or status rule rejected the operation; the transaction
    /// was rolled back.
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("libsql: {0}")]
    LibSql(#[from] libsql::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DatabaseError {
    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        Self::Core(CoreError::Validation(msg.into()))
    }

    pub(crate) fn not_found(entity_type: &str, id: &str) -> Self {
        Self::Core(CoreError::NotFound {
            entity_type: entity_type.to_string(),
            id: id.to_string(),
        })
    }
}
