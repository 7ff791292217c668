//! Service layer bundling database access with schema validation.
//!
//! `SoliService` wraps `SoliDb` (raw database access) and `SchemaRegistry`
//! (schema validation). All repo methods are implemented as `impl SoliService`
//! in the `repos` modules.

use soli_schema::SchemaRegistry;

use crate::SoliDb;
use crate::error::DatabaseError;

/// Repository facade over the Soliloan database.
///
/// Repo methods are plain CRUD: they read and write rows and nothing else.
/// Validation, authorization, and change-log entries are the caller's job
/// (the action layer), so a repo call never leaves half an orchestration
/// behind.
pub struct SoliService {
    db: SoliDb,
    schema: SchemaRegistry,
}

impl SoliService {
    /// Create a new service wrapping a local database.
    ///
    /// # Arguments
    ///
    /// * `db_path`: path to the libSQL database file, or `":memory:"` for tests.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(db_path: &str) -> Result<Self, DatabaseError> {
        let db = SoliDb::open_local(db_path).await?;
        let schema = SchemaRegistry::new();
        Ok(Self { db, schema })
    }

    /// Create from an existing `SoliDb` (for testing).
    #[must_use]
    pub fn from_db(db: SoliDb) -> Self {
        Self {
            db,
            schema: SchemaRegistry::new(),
        }
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &SoliDb {
        &self.db
    }

    /// Access the schema registry.
    #[must_use]
    pub const fn schema(&self) -> &SchemaRegistry {
        &self.schema
    }
}
