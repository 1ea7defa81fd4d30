//! # dtl-db
//!
//! libSQL persistence for the DTL record graph.
//!
//! Handles all relational state: users, libraries, units, the singleton
//! artifacts attached to each unit (ontology, interface, configuration, logic,
//! review), tests and their run history, comments, segmentation suggestions,
//! and sync events.
//!
//! [`DtlDb`] owns the database handle and applies the schema on open. Each
//! request scope calls [`DtlDb::connect`] for a [`DtlService`] holding its own
//! connection, which is released when the service is dropped.

pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
pub mod service;
pub mod updates;

#[cfg(test)]
mod test_support;

use dtl_config::DatabaseConfig;
use error::DatabaseError;
use libsql::Builder;
use service::DtlService;

/// Central database handle. Cheap to share behind an `Arc`.
pub struct DtlDb {
    db: libsql::Database,
    remote: bool,
}

impl DtlDb {
    /// Open the database described by `config`, local or remote.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        if config.is_remote() {
            Self::open_remote(&config.url, &config.auth_token).await
        } else {
            Self::open_local(config.local_path()).await
        }
    }

    /// Open a local database file, creating it if missing.
    ///
    /// Runs migrations automatically.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let dtl_db = Self { db, remote: false };
        dtl_db.run_migrations().await?;
        tracing::debug!(path, "opened local database");
        Ok(dtl_db)
    }

    /// Open a remote libSQL database over HTTP.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the remote cannot be reached or
    /// migrations fail.
    pub async fn open_remote(url: &str, auth_token: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_remote(url.to_string(), auth_token.to_string())
            .build()
            .await?;
        let dtl_db = Self { db, remote: true };
        dtl_db.run_migrations().await?;
        tracing::debug!(url, "opened remote database");
        Ok(dtl_db)
    }

    /// Acquire a fresh connection for one request scope.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the connection cannot be created or the
    /// foreign-key pragma fails.
    pub async fn connect(&self) -> Result<DtlService, DatabaseError> {
        let conn = self.raw_connection().await?;
        Ok(DtlService::new(conn))
    }

    #[must_use]
    pub const fn is_remote(&self) -> bool {
        self.remote
    }

    async fn raw_connection(&self) -> Result<libsql::Connection, DatabaseError> {
        let conn = self.db.connect()?;
        // Foreign keys are per-connection in SQLite.
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Query(format!("PRAGMA foreign_keys: {e}")))?;
        if !self.remote {
            // Concurrent request scopes each hold a connection to the same file.
            conn.query("PRAGMA busy_timeout = 5000", ())
                .await
                .map_err(|e| DatabaseError::Query(format!("PRAGMA busy_timeout: {e}")))?;
        }
        Ok(conn)
    }
}
