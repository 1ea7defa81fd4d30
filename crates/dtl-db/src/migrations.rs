//! Database migration runner.
//!
//! Embeds the SQL migration at compile time and executes it on database
//! open. All statements use `IF NOT EXISTS` for idempotent re-running.

use crate::DtlDb;
use crate::error::DatabaseError;

/// Initial schema: 13 tables, 6 indexes.
const MIGRATION_001: &str = include_str!("../migrations/001_initial.sql");

impl DtlDb {
    pub(crate) async fn run_migrations(&self) -> Result<(), DatabaseError> {
        let conn = self.raw_connection().await?;
        conn.execute_batch(MIGRATION_001)
            .await
            .map_err(|e| DatabaseError::Migration(format!("001_initial: {e}")))?;
        Ok(())
    }
}
