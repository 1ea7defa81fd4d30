//! Database error types for dtl-db.

use dtl_core::errors::CoreError;
use thiserror::Error;

/// Errors from database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A SQL query failed or a column could not be decoded.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// A referenced record does not exist or belongs to another parent.
    #[error("{entity} {id} not found")]
    NotFound { entity: String, id: i64 },

    /// A cross-reference or field failed validation before any write.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Invalid state encountered (e.g., promoting an accepted suggestion).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DatabaseError {
    pub fn not_found(entity: impl Into<String>, id: i64) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id,
        }
    }

    /// Whether the caller referenced something that does not exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::NoResult)
    }
}

impl From<CoreError> for DatabaseError {
    fn from(err: CoreError) -> Self {
        let CoreError::Validation(msg) = err;
        Self::Validation(msg)
    }
}
