//! Saved view repository.
//!
//! Sort, filters, and column visibility are stored as JSON TEXT. The same
//! shapes travel through the URL codec in soli-core, so a saved view and an
//! encoded URL state are interchangeable.

use chrono::Utc;

use soli_core::entities::SavedView;
use soli_core::enums::ViewKind;
use soli_core::ids::PREFIX_VIEW;
use soli_core::inputs::ViewSaveInput;
use soli_core::viewstate::SortSpec;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime, parse_enum, parse_json};
use crate::service::SoliService;

const SELECT_COLS: &str =
    "id, user_id, kind, name, is_default, sort, filters, columns, created_at, updated_at";

fn row_to_view(row: &libsql::Row) -> Result<SavedView, DatabaseError> {
    let sort = match get_opt_string(row, 5)? {
        Some(s) => Some(parse_json::<SortSpec>(&s)?),
        None => None,
    };
    Ok(SavedView {
        id: row.get(0)?,
        user_id: row.get(1)?,
        kind: parse_enum(&row.get::<String>(2)?)?,
        name: row.get(3)?,
        is_default: row.get::<i64>(4)? != 0,
        sort,
        filters: parse_json(&row.get::<String>(6)?)?,
        columns: parse_json(&row.get::<String>(7)?)?,
        created_at: parse_datetime(&row.get::<String>(8)?)?,
        updated_at: parse_datetime(&row.get::<String>(9)?)?,
    })
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, DatabaseError> {
    serde_json::to_string(value).map_err(|e| DatabaseError::Other(e.into()))
}

impl SoliService {
    pub async fn create_view(
        &self,
        user_id: &str,
        input: &ViewSaveInput,
    ) -> Result<SavedView, DatabaseError> {
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_VIEW).await?;
        let filters = input.filters.clone().unwrap_or_default();
        let columns = input.columns.clone().unwrap_or_default();

        let sort_json = match input.sort {
            Some(ref sort) => Some(to_json(sort)?),
            None => None,
        };

        self.db()
            .conn()
            .execute(
                &format!(
                    "INSERT INTO saved_views ({SELECT_COLS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
                ),
                libsql::params![
                    id.as_str(),
                    user_id,
                    input.kind.as_str(),
                    input.name.as_str(),
                    false,
                    sort_json.as_deref(),
                    to_json(&filters)?.as_str(),
                    to_json(&columns)?.as_str(),
                    now.to_rfc3339(),
                    now.to_rfc3339()
                ],
            )
            .await?;

        Ok(SavedView {
            id,
            user_id: user_id.to_string(),
            kind: input.kind,
            name: input.name.clone(),
            is_default: false,
            sort: input.sort.clone(),
            filters,
            columns,
            created_at: now,
            updated_at: now,
        })
    }

    /// Replace a view's name and table state. The kind is fixed at creation.
    pub async fn update_view(
        &self,
        id: &str,
        input: &ViewSaveInput,
    ) -> Result<Option<SavedView>, DatabaseError> {
        let filters = input.filters.clone().unwrap_or_default();
        let columns = input.columns.clone().unwrap_or_default();
        let sort_json = match input.sort {
            Some(ref sort) => Some(to_json(sort)?),
            None => None,
        };

        self.db()
            .conn()
            .execute(
                "UPDATE saved_views
                 SET name = ?1, sort = ?2, filters = ?3, columns = ?4, updated_at = ?5
                 WHERE id = ?6",
                libsql::params![
                    input.name.as_str(),
                    sort_json.as_deref(),
                    to_json(&filters)?.as_str(),
                    to_json(&columns)?.as_str(),
                    Utc::now().to_rfc3339(),
                    id
                ],
            )
            .await?;

        self.get_view(id).await
    }

    pub async fn get_view(&self, id: &str) -> Result<Option<SavedView>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM saved_views WHERE id = ?1"),
                [id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_view(&row)?)),
            None => Ok(None),
        }
    }

    /// All of a user's views for one table, default first, then by name.
    pub async fn list_views(
        &self,
        user_id: &str,
        kind: ViewKind,
    ) -> Result<Vec<SavedView>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM saved_views
                     WHERE user_id = ?1 AND kind = ?2
                     ORDER BY is_default DESC, name"
                ),
                libsql::params![user_id, kind.as_str()],
            )
            .await?;
        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(row_to_view(&row)?);
        }
        Ok(results)
    }

    pub async fn delete_view(&self, id: &str) -> Result<(), DatabaseError> {
        self.db()
            .conn()
            .execute("DELETE FROM saved_views WHERE id = ?1", [id])
            .await?;
        Ok(())
    }

    /// Make this view the user's default for its kind, clearing the flag on
    /// any previous holder.
    pub async fn set_default_view(&self, id: &str) -> Result<Option<SavedView>, DatabaseError> {
        let Some(view) = self.get_view(id).await? else {
            return Ok(None);
        };

        let now = Utc::now().to_rfc3339();
        self.db()
            .conn()
            .execute(
                "UPDATE saved_views SET is_default = 0, updated_at = ?1
                 WHERE user_id = ?2 AND kind = ?3 AND is_default = 1 AND id <> ?4",
                libsql::params![now.as_str(), view.user_id.as_str(), view.kind.as_str(), id],
            )
            .await?;
        self.db()
            .conn()
            .execute(
                "UPDATE saved_views SET is_default = 1, updated_at = ?1 WHERE id = ?2",
                libsql::params![now.as_str(), id],
            )
            .await?;

        self.get_view(id).await
    }

    pub async fn get_default_view(
        &self,
        user_id: &str,
        kind: ViewKind,
    ) -> Result<Option<SavedView>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM saved_views
                     WHERE user_id = ?1 AND kind = ?2 AND is_default = 1"
                ),
                libsql::params![user_id, kind.as_str()],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_view(&row)?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use serde_json::json;

    use soli_core::enums::ViewKind;
    use soli_core::inputs::ViewSaveInput;
    use soli_core::viewstate::{FilterClause, FilterOp, SortDirection, SortSpec};

    use crate::test_support::helpers::{seed_user, test_service};

    fn loans_view(name: &str) -> ViewSaveInput {
        ViewSaveInput {
            id: None,
            kind: ViewKind::Loans,
            name: name.to_string(),
            sort: Some(SortSpec {
                field: "start_date".to_string(),
                direction: SortDirection::Desc,
            }),
            filters: Some(vec![FilterClause {
                field: "status".to_string(),
                op: FilterOp::Eq,
                value: json!("active"),
            }]),
            columns: Some(BTreeMap::from([
                ("name".to_string(), true),
                ("interest_rate".to_string(), false),
            ])),
        }
    }

    #[tokio::test]
    async fn create_roundtrips_json_state() {
        let svc = test_service().await;
        let user = seed_user(&svc, "anna@example.com").await;

        let view = svc.create_view(&user, &loans_view("Active loans")).await.unwrap();
        assert!(view.id.starts_with("viw-"));

        let fetched = svc.get_view(&view.id).await.unwrap().unwrap();
        assert_eq!(fetched.sort.as_ref().unwrap().field, "start_date");
        assert_eq!(fetched.filters.len(), 1);
        assert_eq!(fetched.filters[0].value, json!("active"));
        assert_eq!(fetched.columns.get("interest_rate"), Some(&false));
    }

    #[tokio::test]
    async fn create_with_empty_state() {
        let svc = test_service().await;
        let user = seed_user(&svc, "anna@example.com").await;

        let view = svc
            .create_view(
                &user,
                &ViewSaveInput {
                    id: None,
                    kind: ViewKind::Lenders,
                    name: "Plain".to_string(),
                    sort: None,
                    filters: None,
                    columns: None,
                },
            )
            .await
            .unwrap();

        let fetched = svc.get_view(&view.id).await.unwrap().unwrap();
        assert!(fetched.sort.is_none());
        assert!(fetched.filters.is_empty());
        assert!(fetched.columns.is_empty());
    }

    #[tokio::test]
    async fn update_replaces_state() {
        let svc = test_service().await;
        let user = seed_user(&svc, "anna@example.com").await;
        let view = svc.create_view(&user, &loans_view("Active loans")).await.unwrap();

        let updated = svc
            .update_view(
                &view.id,
                &ViewSaveInput {
                    id: Some(view.id.clone()),
                    kind: ViewKind::Loans,
                    name: "Everything".to_string(),
                    sort: None,
                    filters: None,
                    columns: None,
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.name, "Everything");
        assert!(updated.sort.is_none());
        assert!(updated.filters.is_empty());
    }

    #[tokio::test]
    async fn set_default_clears_previous_holder() {
        let svc = test_service().await;
        let user = seed_user(&svc, "anna@example.com").await;
        let first = svc.create_view(&user, &loans_view("First")).await.unwrap();
        let second = svc.create_view(&user, &loans_view("Second")).await.unwrap();

        svc.set_default_view(&first.id).await.unwrap().unwrap();
        svc.set_default_view(&second.id).await.unwrap().unwrap();

        assert!(!svc.get_view(&first.id).await.unwrap().unwrap().is_default);
        let current = svc
            .get_default_view(&user, ViewKind::Loans)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(current.id, second.id);
    }

    #[tokio::test]
    async fn defaults_scoped_per_user_and_kind() {
        let svc = test_service().await;
        let anna = seed_user(&svc, "anna@example.com").await;
        let ben = seed_user(&svc, "ben@example.com").await;

        let annas = svc.create_view(&anna, &loans_view("Annas")).await.unwrap();
        let bens = svc.create_view(&ben, &loans_view("Bens")).await.unwrap();

        svc.set_default_view(&annas.id).await.unwrap().unwrap();
        svc.set_default_view(&bens.id).await.unwrap().unwrap();

        // Ben's promotion must not demote Anna's default
        assert!(svc.get_view(&annas.id).await.unwrap().unwrap().is_default);
    }

    #[tokio::test]
    async fn list_orders_default_first() {
        let svc = test_service().await;
        let user = seed_user(&svc, "anna@example.com").await;
        svc.create_view(&user, &loans_view("Alpha")).await.unwrap();
        let favorite = svc.create_view(&user, &loans_view("Zeta")).await.unwrap();
        svc.set_default_view(&favorite.id).await.unwrap().unwrap();

        let views = svc.list_views(&user, ViewKind::Loans).await.unwrap();
        assert_eq!(views.len(), 2);
        assert_eq!(views[0].name, "Zeta");
        assert!(views[0].is_default);
    }

    #[tokio::test]
    async fn delete_removes_row() {
        let svc = test_service().await;
        let user = seed_user(&svc, "anna@example.com").await;
        let view = svc.create_view(&user, &loans_view("Gone")).await.unwrap();

        svc.delete_view(&view.id).await.unwrap();
        assert!(svc.get_view(&view.id).await.unwrap().is_none());
    }
}
