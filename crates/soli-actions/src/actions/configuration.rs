//! Configuration actions.
//!
//! Every project owns exactly one configuration row, created alongside the
//! project, so these actions are keyed by project rather than by the
//! configuration's own id.

use serde_json::Value;
use soli_core::entities::Configuration;
use soli_core::enums::EntityType;
use soli_core::identity::AuthIdentity;
use soli_core::inputs::ConfigurationUpdateInput;
use soli_db::updates::configuration::ConfigurationUpdateBuilder;

use crate::Actions;
use crate::context;
use crate::error::ActionError;

impl Actions {
    pub async fn get_configuration(
        &self,
        who: &AuthIdentity,
        project_id: &str,
    ) -> Result<Configuration, ActionError> {
        let project = self
            .service()
            .get_project(project_id)
            .await?
            .ok_or_else(|| ActionError::not_found(EntityType::Project, project_id))?;
        self.require_member(who, &project.id).await?;

        self.service()
            .get_configuration_for_project(&project.id)
            .await?
            .ok_or_else(|| ActionError::not_found(EntityType::Configuration, project_id))
    }

    pub async fn update_configuration(
        &self,
        who: &AuthIdentity,
        input: Value,
    ) -> Result<Configuration, ActionError> {
        let input: ConfigurationUpdateInput =
            self.validate_input("configuration_update", input)?;
        let project = self
            .service()
            .get_project(&input.project_id)
            .await?
            .ok_or_else(|| ActionError::not_found(EntityType::Project, &input.project_id))?;
        self.require_manager(who, &project.id).await?;

        let before = self
            .service()
            .get_configuration_for_project(&project.id)
            .await?
            .ok_or_else(|| ActionError::not_found(EntityType::Configuration, &project.id))?;

        let mut update = ConfigurationUpdateBuilder::new();
        if let Some(display_name) = input.display_name {
            update = update.display_name(display_name);
        }
        if let Some(primary_color) = input.primary_color {
            update = update.primary_color(primary_color);
        }
        if let Some(interest_method) = input.interest_method {
            update = update.interest_method(interest_method);
        }
        if let Some(required_loan_fields) = input.required_loan_fields {
            update = update.required_loan_fields(required_loan_fields);
        }

        let configuration = self
            .service()
            .update_configuration(&before.id, update.build())
            .await?
            .ok_or_else(|| ActionError::not_found(EntityType::Configuration, &before.id))?;

        self.record_updated(
            who,
            &project.id,
            EntityType::Configuration,
            &configuration.id,
            (&before, &configuration),
            context::configuration(&configuration),
        )
        .await?;
        self.revalidate(&format!("/projects/{}/configuration", project.id));
        Ok(configuration)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use soli_core::enums::{EntityType, InterestMethod};
    use soli_db::repos::change::ChangeFilter;

    use crate::error::ActionError;
    use crate::test_support::harness;

    #[tokio::test]
    async fn get_returns_project_configuration() {
        let h = harness().await;
        let project = h.seed_project("cfg", "Config").await;

        let configuration = h
            .actions
            .get_configuration(&h.viewer, &project.id)
            .await
            .unwrap();
        assert_eq!(configuration.project_id, project.id);
        assert_eq!(configuration.display_name, "Config");

        let err = h
            .actions
            .get_configuration(&h.stranger, &project.id)
            .await
            .unwrap_err();
        assert!(matches!(err, ActionError::Forbidden));
    }

    #[tokio::test]
    async fn update_applies_fields_and_records_change() {
        let h = harness().await;
        let project = h.seed_project("cfg2", "Config").await;

        let configuration = h
            .actions
            .update_configuration(
                &h.manager,
                json!({
                    "project_id": project.id,
                    "display_name": "Familienkasse",
                    "primary_color": "#2d6a4f",
                    "interest_method": "compound",
                    "required_loan_fields": ["end_date"],
                }),
            )
            .await
            .unwrap();

        assert_eq!(configuration.display_name, "Familienkasse");
        assert_eq!(configuration.interest_method, InterestMethod::Compound);
        assert_eq!(configuration.required_loan_fields, vec!["end_date"]);

        let changes = h
            .actions
            .service()
            .query_changes(&ChangeFilter::for_project(&project.id))
            .await
            .unwrap();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].entity_type, EntityType::Configuration);
        let after = changes[0].after.as_ref().unwrap();
        assert_eq!(after["display_name"], json!("Familienkasse"));

        assert_eq!(
            h.revalidator.paths(),
            vec![format!("/projects/{}/configuration", project.id)]
        );
    }

    #[tokio::test]
    async fn update_rejects_non_managers() {
        let h = harness().await;
        let project = h.seed_project("cfg3", "Config").await;

        let err = h
            .actions
            .update_configuration(
                &h.viewer,
                json!({ "project_id": project.id, "display_name": "Nope" }),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ActionError::Forbidden));
    }
}
