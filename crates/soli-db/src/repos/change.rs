//! Change-log repository.
//!
//! Append-only change entries recording every mutation. The table carries no
//! foreign keys so the trail survives deletion of the entities it describes.

use soli_core::entities::Change;
use soli_core::enums::{ChangeAction, EntityType};

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime, parse_enum, parse_optional_json};
use crate::service::SoliService;

const SELECT_COLS: &str =
    "id, project_id, entity_type, entity_id, action, user_id, before_json, after_json, context, created_at";

/// Filter criteria for change-log queries. Entries are always scoped to one
/// project; the remaining fields narrow further.
#[derive(Debug, Clone)]
pub struct ChangeFilter {
    pub project_id: String,
    pub entity_type: Option<EntityType>,
    pub entity_id: Option<String>,
    pub action: Option<ChangeAction>,
    pub user_id: Option<String>,
    pub limit: Option<u32>,
}

impl ChangeFilter {
    #[must_use]
    pub fn for_project(project_id: &str) -> Self {
        Self {
            project_id: project_id.to_string(),
            entity_type: None,
            entity_id: None,
            action: None,
            user_id: None,
            limit: None,
        }
    }
}

fn row_to_change(row: &libsql::Row) -> Result<Change, DatabaseError> {
    Ok(Change {
        id: row.get(0)?,
        project_id: row.get(1)?,
        entity_type: parse_enum(&row.get::<String>(2)?)?,
        entity_id: row.get(3)?,
        action: parse_enum(&row.get::<String>(4)?)?,
        user_id: row.get(5)?,
        before: parse_optional_json(get_opt_string(row, 6)?.as_deref())?,
        after: parse_optional_json(get_opt_string(row, 7)?.as_deref())?,
        context: parse_optional_json(get_opt_string(row, 8)?.as_deref())?,
        created_at: parse_datetime(&row.get::<String>(9)?)?,
    })
}

impl SoliService {
    /// Append a change entry. Called by every mutation action.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the INSERT fails.
    pub async fn append_change(&self, entry: &Change) -> Result<(), DatabaseError> {
        self.db()
            .conn()
            .execute(
                &format!(
                    "INSERT INTO changes ({SELECT_COLS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
                ),
                libsql::params![
                    entry.id.as_str(),
                    entry.project_id.as_str(),
                    entry.entity_type.as_str(),
                    entry.entity_id.as_str(),
                    entry.action.as_str(),
                    entry.user_id.as_str(),
                    entry
                        .before
                        .as_ref()
                        .map(std::string::ToString::to_string)
                        .as_deref(),
                    entry
                        .after
                        .as_ref()
                        .map(std::string::ToString::to_string)
                        .as_deref(),
                    entry
                        .context
                        .as_ref()
                        .map(std::string::ToString::to_string)
                        .as_deref(),
                    entry.created_at.to_rfc3339()
                ],
            )
            .await?;
        Ok(())
    }

    /// Query change entries with optional filters, newest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn query_changes(
        &self,
        filter: &ChangeFilter,
    ) -> Result<Vec<Change>, DatabaseError> {
        let mut conditions = vec!["project_id = ?1".to_string()];
        let mut params: Vec<libsql::Value> =
            vec![libsql::Value::Text(filter.project_id.clone())];

        if let Some(ref et) = filter.entity_type {
            params.push(libsql::Value::Text(et.as_str().to_string()));
            conditions.push(format!("entity_type = ?{}", params.len()));
        }
        if let Some(ref eid) = filter.entity_id {
            params.push(libsql::Value::Text(eid.clone()));
            conditions.push(format!("entity_id = ?{}", params.len()));
        }
        if let Some(ref action) = filter.action {
            params.push(libsql::Value::Text(action.as_str().to_string()));
            conditions.push(format!("action = ?{}", params.len()));
        }
        if let Some(ref uid) = filter.user_id {
            params.push(libsql::Value::Text(uid.clone()));
            conditions.push(format!("user_id = ?{}", params.len()));
        }

        let limit = filter.limit.unwrap_or(100);
        let sql = format!(
            "SELECT {SELECT_COLS} FROM changes
             WHERE {}
             ORDER BY created_at DESC LIMIT {limit}",
            conditions.join(" AND ")
        );

        let mut rows = self
            .db()
            .conn()
            .query(&sql, libsql::params_from_iter(params))
            .await?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next().await? {
            entries.push(row_to_change(&row)?);
        }
        Ok(entries)
    }
}
