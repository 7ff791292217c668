//! Note actions.

use serde_json::Value;
use soli_core::entities::Note;
use soli_core::enums::EntityType;
use soli_core::identity::AuthIdentity;
use soli_core::inputs::{NoteCreateInput, NoteUpdateInput};

use crate::Actions;
use crate::actions::fts_prefix_query;
use crate::context;
use crate::error::ActionError;

impl Actions {
    pub async fn create_note(&self, who: &AuthIdentity, input: Value) -> Result<Note, ActionError> {
        let input: NoteCreateInput = self.validate_input("note_create", input)?;
        let loan = self
            .service()
            .get_loan(&input.loan_id)
            .await?
            .ok_or_else(|| ActionError::not_found(EntityType::Loan, &input.loan_id))?;
        let project_id = self.project_for_loan(&loan.id).await?;
        self.require_manager(who, &project_id).await?;

        let note = self
            .service()
            .create_note(&loan.id, Some(&who.user_id), &input.content)
            .await?;
        let lender = self.lender_of(&loan).await?;

        self.record_created(
            who,
            &project_id,
            EntityType::Note,
            &note.id,
            &note,
            context::loan(&lender, &loan),
        )
        .await?;
        self.revalidate(&format!("/loans/{}", loan.id));
        Ok(note)
    }

    pub async fn update_note(&self, who: &AuthIdentity, input: Value) -> Result<Note, ActionError> {
        let input: NoteUpdateInput = self.validate_input("note_update", input)?;
        let before = self
            .service()
            .get_note(&input.note_id)
            .await?
            .ok_or_else(|| ActionError::not_found(EntityType::Note, &input.note_id))?;
        let project_id = self.project_for_note(&before.id).await?;
        self.require_manager(who, &project_id).await?;

        let note = self
            .service()
            .update_note(&before.id, &input.content)
            .await?
            .ok_or_else(|| ActionError::not_found(EntityType::Note, &before.id))?;

        let loan = self
            .service()
            .get_loan(&note.loan_id)
            .await?
            .ok_or_else(|| ActionError::not_found(EntityType::Loan, &note.loan_id))?;
        let lender = self.lender_of(&loan).await?;

        self.record_updated(
            who,
            &project_id,
            EntityType::Note,
            &note.id,
            (&before, &note),
            context::loan(&lender, &loan),
        )
        .await?;
        self.revalidate(&format!("/loans/{}", note.loan_id));
        Ok(note)
    }

    pub async fn delete_note(&self, who: &AuthIdentity, id: &str) -> Result<(), ActionError> {
        let note = self
            .service()
            .get_note(id)
            .await?
            .ok_or_else(|| ActionError::not_found(EntityType::Note, id))?;
        let project_id = self.project_for_note(&note.id).await?;
        self.require_manager(who, &project_id).await?;

        let loan = self
            .service()
            .get_loan(&note.loan_id)
            .await?
            .ok_or_else(|| ActionError::not_found(EntityType::Loan, &note.loan_id))?;
        let lender = self.lender_of(&loan).await?;

        self.service().delete_note(&note.id).await?;

        self.record_deleted(
            who,
            &project_id,
            EntityType::Note,
            &note.id,
            &note,
            context::loan(&lender, &loan),
        )
        .await?;
        self.revalidate(&format!("/loans/{}", note.loan_id));
        Ok(())
    }

    /// Notes of a loan, newest first.
    pub async fn list_notes(
        &self,
        who: &AuthIdentity,
        loan_id: &str,
        limit: Option<u32>,
    ) -> Result<Vec<Note>, ActionError> {
        let loan = self
            .service()
            .get_loan(loan_id)
            .await?
            .ok_or_else(|| ActionError::not_found(EntityType::Loan, loan_id))?;
        let project_id = self.project_for_loan(&loan.id).await?;
        self.require_member(who, &project_id).await?;

        let limit = self.config().general.clamp_limit(limit);
        Ok(self.service().list_notes(&loan.id, limit).await?)
    }

    /// Full-text search over all notes in a project, best match first.
    pub async fn search_notes(
        &self,
        who: &AuthIdentity,
        project_id: &str,
        query: &str,
        limit: Option<u32>,
    ) -> Result<Vec<Note>, ActionError> {
        let project = self
            .service()
            .get_project(project_id)
            .await?
            .ok_or_else(|| ActionError::not_found(EntityType::Project, project_id))?;
        self.require_member(who, &project.id).await?;

        let match_query = fts_prefix_query(query);
        if match_query.is_empty() {
            return Ok(Vec::new());
        }
        let limit = self.config().general.clamp_limit(limit);
        Ok(self
            .service()
            .search_notes(&project.id, &match_query, limit)
            .await?)
    }

    async fn project_for_note(&self, note_id: &str) -> Result<String, ActionError> {
        self.service()
            .project_id_for_note(note_id)
            .await?
            .ok_or_else(|| ActionError::not_found(EntityType::Note, note_id))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use soli_db::repos::change::ChangeFilter;

    use crate::error::ActionError;
    use crate::test_support::harness;

    #[tokio::test]
    async fn create_attributes_author() {
        let h = harness().await;
        let project = h.seed_project("note1", "Notes").await;
        let lender = h.seed_lender(&project.id).await;
        let loan = h.seed_loan(&lender.id).await;

        let note = h
            .actions
            .create_note(
                &h.manager,
                json!({ "loan_id": loan.id, "content": "Zinssatz ab 2025 neu verhandeln" }),
            )
            .await
            .unwrap();
        assert_eq!(note.author_id.as_deref(), Some(h.manager.user_id.as_str()));

        let listed = h
            .actions
            .list_notes(&h.viewer, &loan.id, None)
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);
    }

    #[tokio::test]
    async fn update_diffs_content_only() {
        let h = harness().await;
        let project = h.seed_project("note2", "Notes").await;
        let lender = h.seed_lender(&project.id).await;
        let loan = h.seed_loan(&lender.id).await;

        let note = h
            .actions
            .create_note(&h.manager, json!({ "loan_id": loan.id, "content": "draft" }))
            .await
            .unwrap();

        h.actions
            .update_note(
                &h.manager,
                json!({ "note_id": note.id, "content": "final" }),
            )
            .await
            .unwrap();

        let changes = h
            .actions
            .service()
            .query_changes(&ChangeFilter::for_project(&project.id))
            .await
            .unwrap();
        let newest = &changes[0];
        assert_eq!(newest.before, Some(json!({ "content": "draft" })));
        assert_eq!(newest.after, Some(json!({ "content": "final" })));
    }

    #[tokio::test]
    async fn viewers_cannot_write_notes() {
        let h = harness().await;
        let project = h.seed_project("note3", "Notes").await;
        let lender = h.seed_lender(&project.id).await;
        let loan = h.seed_loan(&lender.id).await;

        let err = h
            .actions
            .create_note(&h.viewer, json!({ "loan_id": loan.id, "content": "nope" }))
            .await
            .unwrap_err();
        assert!(matches!(err, ActionError::Forbidden));
    }

    #[tokio::test]
    async fn delete_leaves_trail_entry() {
        let h = harness().await;
        let project = h.seed_project("note4", "Notes").await;
        let lender = h.seed_lender(&project.id).await;
        let loan = h.seed_loan(&lender.id).await;

        let note = h
            .actions
            .create_note(&h.manager, json!({ "loan_id": loan.id, "content": "bye" }))
            .await
            .unwrap();
        h.actions.delete_note(&h.manager, &note.id).await.unwrap();

        assert!(h
            .actions
            .service()
            .get_note(&note.id)
            .await
            .unwrap()
            .is_none());
        let changes = h
            .actions
            .service()
            .query_changes(&ChangeFilter::for_project(&project.id))
            .await
            .unwrap();
        assert_eq!(changes.len(), 2);
    }

    #[tokio::test]
    async fn search_spans_the_whole_project() {
        let h = harness().await;
        let project = h.seed_project("note5", "Notes").await;
        let lender = h.seed_lender(&project.id).await;
        let loan = h.seed_loan(&lender.id).await;

        for content in [
            "Zinssatz ab Januar neu verhandeln",
            "Kontoauszug an greta@example.com geschickt",
        ] {
            h.actions
                .create_note(&h.manager, json!({ "loan_id": loan.id, "content": content }))
                .await
                .unwrap();
        }

        let hits = h
            .actions
            .search_notes(&h.viewer, &project.id, "verhandeln", None)
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);

        let by_address = h
            .actions
            .search_notes(&h.viewer, &project.id, "greta@example.com", None)
            .await
            .unwrap();
        assert_eq!(by_address.len(), 1);

        assert!(
            h.actions
                .search_notes(&h.viewer, &project.id, "  ", None)
                .await
                .unwrap()
                .is_empty()
        );

        let err = h
            .actions
            .search_notes(&h.stranger, &project.id, "verhandeln", None)
            .await
            .unwrap_err();
        assert!(matches!(err, ActionError::Forbidden));
    }
}
