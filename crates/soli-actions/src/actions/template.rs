//! Communication template actions.

use serde_json::Value;
use soli_core::entities::CommunicationTemplate;
use soli_core::enums::{EntityType, TemplateKind};
use soli_core::identity::AuthIdentity;
use soli_core::inputs::{TemplateCreateInput, TemplateRenderInput, TemplateUpdateInput};
use soli_core::responses::RenderedTemplate;
use soli_db::updates::template::TemplateUpdateBuilder;
use soli_template::{loan_context, process_template};

use crate::Actions;
use crate::context;
use crate::error::ActionError;

impl Actions {
    pub async fn create_template(
        &self,
        who: &AuthIdentity,
        input: Value,
    ) -> Result<CommunicationTemplate, ActionError> {
        let input: TemplateCreateInput = self.validate_input("template_create", input)?;
        let configuration = self
            .service()
            .get_configuration(&input.configuration_id)
            .await?
            .ok_or_else(|| {
                ActionError::not_found(EntityType::Configuration, &input.configuration_id)
            })?;
        self.require_manager(who, &configuration.project_id).await?;

        let template = self.service().create_template(&input).await?;

        self.record_created(
            who,
            &configuration.project_id,
            EntityType::Template,
            &template.id,
            &template,
            context::template(&template),
        )
        .await?;
        self.revalidate(&format!("/projects/{}/templates", configuration.project_id));
        Ok(template)
    }

    pub async fn get_template(
        &self,
        who: &AuthIdentity,
        id: &str,
    ) -> Result<CommunicationTemplate, ActionError> {
        let template = self
            .service()
            .get_template(id)
            .await?
            .ok_or_else(|| ActionError::not_found(EntityType::Template, id))?;
        let project_id = self.project_for_template(&template.id).await?;
        self.require_member(who, &project_id).await?;
        Ok(template)
    }

    /// Templates of a configuration, grouped by kind.
    pub async fn list_templates(
        &self,
        who: &AuthIdentity,
        configuration_id: &str,
    ) -> Result<Vec<CommunicationTemplate>, ActionError> {
        let configuration = self
            .service()
            .get_configuration(configuration_id)
            .await?
            .ok_or_else(|| ActionError::not_found(EntityType::Configuration, configuration_id))?;
        self.require_member(who, &configuration.project_id).await?;
        Ok(self.service().list_templates(&configuration.id).await?)
    }

    pub async fn update_template(
        &self,
        who: &AuthIdentity,
        input: Value,
    ) -> Result<CommunicationTemplate, ActionError> {
        let input: TemplateUpdateInput = self.validate_input("template_update", input)?;
        let before = self
            .service()
            .get_template(&input.template_id)
            .await?
            .ok_or_else(|| ActionError::not_found(EntityType::Template, &input.template_id))?;
        let project_id = self.project_for_template(&before.id).await?;
        self.require_manager(who, &project_id).await?;

        let mut update = TemplateUpdateBuilder::new();
        if let Some(name) = input.name {
            update = update.name(name);
        }
        if let Some(subject) = input.subject {
            update = update.subject(subject);
        }
        if let Some(body) = input.body {
            update = update.body(body);
        }

        let template = self
            .service()
            .update_template(&before.id, update.build())
            .await?
            .ok_or_else(|| ActionError::not_found(EntityType::Template, &before.id))?;

        self.record_updated(
            who,
            &project_id,
            EntityType::Template,
            &template.id,
            (&before, &template),
            context::template(&template),
        )
        .await?;
        self.revalidate(&format!("/projects/{project_id}/templates"));
        Ok(template)
    }

    pub async fn delete_template(&self, who: &AuthIdentity, id: &str) -> Result<(), ActionError> {
        let template = self
            .service()
            .get_template(id)
            .await?
            .ok_or_else(|| ActionError::not_found(EntityType::Template, id))?;
        let project_id = self.project_for_template(&template.id).await?;
        self.require_manager(who, &project_id).await?;

        self.service().delete_template(&template.id).await?;

        self.record_deleted(
            who,
            &project_id,
            EntityType::Template,
            &template.id,
            &template,
            context::template(&template),
        )
        .await?;
        self.revalidate(&format!("/projects/{project_id}/templates"));
        Ok(())
    }

    /// Make a template the default for its configuration and kind, clearing
    /// the previous holder.
    pub async fn set_default_template(
        &self,
        who: &AuthIdentity,
        id: &str,
    ) -> Result<CommunicationTemplate, ActionError> {
        let before = self
            .service()
            .get_template(id)
            .await?
            .ok_or_else(|| ActionError::not_found(EntityType::Template, id))?;
        let project_id = self.project_for_template(&before.id).await?;
        self.require_manager(who, &project_id).await?;

        let template = self
            .service()
            .set_default_template(&before.id)
            .await?
            .ok_or_else(|| ActionError::not_found(EntityType::Template, &before.id))?;

        self.record_updated(
            who,
            &project_id,
            EntityType::Template,
            &template.id,
            (&before, &template),
            context::template(&template),
        )
        .await?;
        self.revalidate(&format!("/projects/{project_id}/templates"));
        Ok(template)
    }

    /// Render a template against a loan's full context. The template and the
    /// loan must belong to the same project.
    pub async fn render_template(
        &self,
        who: &AuthIdentity,
        input: Value,
    ) -> Result<RenderedTemplate, ActionError> {
        let input: TemplateRenderInput = self.validate_input("template_render", input)?;
        let template = self
            .service()
            .get_template(&input.template_id)
            .await?
            .ok_or_else(|| ActionError::not_found(EntityType::Template, &input.template_id))?;
        let loan = self
            .service()
            .get_loan(&input.loan_id)
            .await?
            .ok_or_else(|| ActionError::not_found(EntityType::Loan, &input.loan_id))?;

        let template_project = self.project_for_template(&template.id).await?;
        let loan_project = self.project_for_loan(&loan.id).await?;
        if template_project != loan_project {
            return Err(ActionError::Forbidden);
        }
        self.require_member(who, &loan_project).await?;

        let configuration = self
            .service()
            .get_configuration(&template.configuration_id)
            .await?
            .ok_or_else(|| {
                ActionError::not_found(EntityType::Configuration, &template.configuration_id)
            })?;
        let lender = self.lender_of(&loan).await?;
        let max = self.config().general.max_limit;
        let transactions = self.service().list_transactions(&loan.id, max).await?;
        let notes = self.service().list_notes(&loan.id, max).await?;

        let data = loan_context(&configuration, &lender, &loan, &transactions, &notes);
        let subject = match template.kind {
            TemplateKind::Email => template
                .subject
                .as_deref()
                .map(|subject| process_template(subject, &data)),
            TemplateKind::Document => None,
        };

        Ok(RenderedTemplate {
            template_id: template.id,
            loan_id: loan.id,
            subject,
            body: process_template(&template.body, &data),
        })
    }

    async fn project_for_template(&self, template_id: &str) -> Result<String, ActionError> {
        self.service()
            .project_id_for_template(template_id)
            .await?
            .ok_or_else(|| ActionError::not_found(EntityType::Template, template_id))
    }
}
