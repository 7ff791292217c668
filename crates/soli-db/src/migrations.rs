//! Database migration runner.
//!
//! Embeds the SQL migration files at compile time and executes them on
//! database open. All statements use `IF NOT EXISTS` for idempotent re-running.

use crate::SoliDb;
use crate::error::DatabaseError;

/// Initial schema: 13 tables, 2 FTS5 virtual tables, 14 indexes, 6 triggers.
const MIGRATION_001: &str = include_str!("../migrations/001_initial.sql");

impl SoliDb {
    /// Run all embedded migrations in sequence.
    pub(crate) async fn run_migrations(&self) -> Result<(), DatabaseError> {
        self.conn
            .execute_batch(MIGRATION_001)
            .await
            .map_err(|e| DatabaseError::Migration(format!("001_initial: {e}")))?;
        Ok(())
    }
}
