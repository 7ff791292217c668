//! Saved view actions.
//!
//! Views are personal table state, owned by one user and scoped by kind
//! rather than project. They carry no change entries; the trail is for
//! shared domain data.

use serde_json::Value;
use soli_core::entities::SavedView;
use soli_core::enums::{EntityType, ViewKind};
use soli_core::identity::AuthIdentity;
use soli_core::inputs::ViewSaveInput;

use crate::Actions;
use crate::error::ActionError;

impl Actions {
    /// Create a view, or replace the state of an existing one when the
    /// input carries an id.
    pub async fn save_view(
        &self,
        who: &AuthIdentity,
        input: Value,
    ) -> Result<SavedView, ActionError> {
        let input: ViewSaveInput = self.validate_input("view_save", input)?;

        let view = match input.id {
            None => self.service().create_view(&who.user_id, &input).await?,
            Some(ref id) => {
                self.owned_view(who, id).await?;
                self.service()
                    .update_view(id, &input)
                    .await?
                    .ok_or_else(|| ActionError::not_found(EntityType::View, id))?
            }
        };

        self.revalidate("/views");
        Ok(view)
    }

    pub async fn delete_view(&self, who: &AuthIdentity, id: &str) -> Result<(), ActionError> {
        let view = self.owned_view(who, id).await?;
        self.service().delete_view(&view.id).await?;
        self.revalidate("/views");
        Ok(())
    }

    /// The caller's views of one kind, default first.
    pub async fn list_views(
        &self,
        who: &AuthIdentity,
        kind: ViewKind,
    ) -> Result<Vec<SavedView>, ActionError> {
        Ok(self.service().list_views(&who.user_id, kind).await?)
    }

    /// Make a view the caller's default for its kind, clearing the previous
    /// holder.
    pub async fn set_default_view(
        &self,
        who: &AuthIdentity,
        id: &str,
    ) -> Result<SavedView, ActionError> {
        let view = self.owned_view(who, id).await?;
        let view = self
            .service()
            .set_default_view(&view.id)
            .await?
            .ok_or_else(|| ActionError::not_found(EntityType::View, id))?;
        self.revalidate("/views");
        Ok(view)
    }

    pub async fn default_view(
        &self,
        who: &AuthIdentity,
        kind: ViewKind,
    ) -> Result<Option<SavedView>, ActionError> {
        Ok(self.service().get_default_view(&who.user_id, kind).await?)
    }

    async fn owned_view(&self, who: &AuthIdentity, id: &str) -> Result<SavedView, ActionError> {
        let view = self
            .service()
            .get_view(id)
            .await?
            .ok_or_else(|| ActionError::not_found(EntityType::View, id))?;
        if view.user_id != who.user_id {
            return Err(ActionError::Forbidden);
        }
        Ok(view)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use soli_core::enums::ViewKind;
    use soli_db::repos::change::ChangeFilter;

    use crate::error::ActionError;
    use crate::test_support::harness;

    fn loans_view(name: &str) -> serde_json::Value {
        json!({
            "kind": "loans",
            "name": name,
            "sort": { "field": "start_date", "direction": "desc" },
            "filters": [{ "field": "status", "op": "eq", "value": "active" }],
            "columns": { "interest_rate": false },
        })
    }

    #[tokio::test]
    async fn save_creates_then_replaces() {
        let h = harness().await;

        let view = h
            .actions
            .save_view(&h.manager, loans_view("Aktive"))
            .await
            .unwrap();
        assert_eq!(view.name, "Aktive");
        assert_eq!(view.user_id, h.manager.user_id);

        let mut replacement = loans_view("Aktive 2024");
        replacement["id"] = json!(view.id);
        replacement["filters"] = json!([]);
        let updated = h
            .actions
            .save_view(&h.manager, replacement)
            .await
            .unwrap();
        assert_eq!(updated.id, view.id);
        assert_eq!(updated.name, "Aktive 2024");
        assert!(updated.filters.is_empty());
    }

    #[tokio::test]
    async fn views_are_private_to_their_owner() {
        let h = harness().await;

        let view = h
            .actions
            .save_view(&h.manager, loans_view("Meine"))
            .await
            .unwrap();

        let mut foreign = loans_view("Gekapert");
        foreign["id"] = json!(view.id);
        let err = h
            .actions
            .save_view(&h.viewer, foreign)
            .await
            .unwrap_err();
        assert!(matches!(err, ActionError::Forbidden));

        let err = h
            .actions
            .delete_view(&h.viewer, &view.id)
            .await
            .unwrap_err();
        assert!(matches!(err, ActionError::Forbidden));

        assert!(h
            .actions
            .list_views(&h.viewer, ViewKind::Loans)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn default_is_exclusive_per_kind() {
        let h = harness().await;

        let first = h
            .actions
            .save_view(&h.manager, loans_view("Erste"))
            .await
            .unwrap();
        let second = h
            .actions
            .save_view(&h.manager, loans_view("Zweite"))
            .await
            .unwrap();

        h.actions
            .set_default_view(&h.manager, &first.id)
            .await
            .unwrap();
        let promoted = h
            .actions
            .set_default_view(&h.manager, &second.id)
            .await
            .unwrap();
        assert!(promoted.is_default);

        let default = h
            .actions
            .default_view(&h.manager, ViewKind::Loans)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(default.id, second.id);

        let listed = h
            .actions
            .list_views(&h.manager, ViewKind::Loans)
            .await
            .unwrap();
        assert_eq!(listed[0].id, second.id);
        assert_eq!(
            listed.iter().filter(|v| v.is_default).count(),
            1
        );
    }

    #[tokio::test]
    async fn view_mutations_leave_no_trail() {
        let h = harness().await;
        let project = h.seed_project("views", "Views").await;

        let view = h
            .actions
            .save_view(&h.manager, loans_view("Leise"))
            .await
            .unwrap();
        h.actions
            .set_default_view(&h.manager, &view.id)
            .await
            .unwrap();
        h.actions.delete_view(&h.manager, &view.id).await.unwrap();

        let changes = h
            .actions
            .service()
            .query_changes(&ChangeFilter::for_project(&project.id))
            .await
            .unwrap();
        assert!(changes.is_empty());
        assert_eq!(
            h.revalidator.paths(),
            vec!["/views".to_string(); 3]
        );
    }
}
