//! Lender actions.

use serde_json::Value;
use soli_core::entities::Lender;
use soli_core::enums::EntityType;
use soli_core::iban;
use soli_core::identity::AuthIdentity;
use soli_core::inputs::{LenderCreateInput, LenderUpdateInput};
use soli_db::updates::lender::LenderUpdateBuilder;

use crate::Actions;
use crate::actions::fts_prefix_query;
use crate::context;
use crate::error::ActionError;

fn checked_iban(raw: &str) -> Result<String, ActionError> {
    iban::validate(raw).map_err(|e| ActionError::Validation(vec![e.to_string()]))
}

impl Actions {
    pub async fn create_lender(
        &self,
        who: &AuthIdentity,
        input: Value,
    ) -> Result<Lender, ActionError> {
        let mut input: LenderCreateInput = self.validate_input("lender_create", input)?;
        let project = self
            .service()
            .get_project(&input.project_id)
            .await?
            .ok_or_else(|| ActionError::not_found(EntityType::Project, &input.project_id))?;
        self.require_manager(who, &project.id).await?;

        if let Some(ref raw) = input.iban {
            input.iban = Some(checked_iban(raw)?);
        }

        let lender = self.service().create_lender(&input).await?;

        self.record_created(
            who,
            &project.id,
            EntityType::Lender,
            &lender.id,
            &lender,
            context::lender(&lender),
        )
        .await?;
        self.revalidate(&format!("/projects/{}/lenders", project.id));
        Ok(lender)
    }

    pub async fn get_lender(&self, who: &AuthIdentity, id: &str) -> Result<Lender, ActionError> {
        let lender = self
            .service()
            .get_lender(id)
            .await?
            .ok_or_else(|| ActionError::not_found(EntityType::Lender, id))?;
        self.require_member(who, &lender.project_id).await?;
        Ok(lender)
    }

    /// Lenders of a project, name-ordered. A query switches to full-text
    /// search over name, email, and city.
    pub async fn list_lenders(
        &self,
        who: &AuthIdentity,
        project_id: &str,
        query: Option<&str>,
        limit: Option<u32>,
    ) -> Result<Vec<Lender>, ActionError> {
        let project = self
            .service()
            .get_project(project_id)
            .await?
            .ok_or_else(|| ActionError::not_found(EntityType::Project, project_id))?;
        self.require_member(who, &project.id).await?;

        let limit = self.config().general.clamp_limit(limit);
        let lenders = match query.map(fts_prefix_query) {
            Some(q) if !q.is_empty() => {
                self.service()
                    .search_lenders(&project.id, &q, limit)
                    .await?
            }
            _ => self.service().list_lenders(&project.id, limit).await?,
        };
        Ok(lenders)
    }

    pub async fn update_lender(
        &self,
        who: &AuthIdentity,
        input: Value,
    ) -> Result<Lender, ActionError> {
        let mut input: LenderUpdateInput = self.validate_input("lender_update", input)?;
        let before = self
            .service()
            .get_lender(&input.lender_id)
            .await?
            .ok_or_else(|| ActionError::not_found(EntityType::Lender, &input.lender_id))?;
        self.require_manager(who, &before.project_id).await?;

        if let Some(Some(ref raw)) = input.iban {
            input.iban = Some(Some(checked_iban(raw)?));
        }

        let mut update = LenderUpdateBuilder::new();
        if let Some(name) = input.name {
            update = update.name(name);
        }
        if let Some(email) = input.email {
            update = update.email(email);
        }
        if let Some(phone) = input.phone {
            update = update.phone(phone);
        }
        if let Some(iban) = input.iban {
            update = update.iban(iban);
        }
        if let Some(street) = input.street {
            update = update.street(street);
        }
        if let Some(postal_code) = input.postal_code {
            update = update.postal_code(postal_code);
        }
        if let Some(city) = input.city {
            update = update.city(city);
        }
        if let Some(country) = input.country {
            update = update.country(country);
        }

        let lender = self
            .service()
            .update_lender(&before.id, update.build())
            .await?
            .ok_or_else(|| ActionError::not_found(EntityType::Lender, &before.id))?;

        self.record_updated(
            who,
            &lender.project_id,
            EntityType::Lender,
            &lender.id,
            (&before, &lender),
            context::lender(&lender),
        )
        .await?;
        self.revalidate(&format!("/projects/{}/lenders", lender.project_id));
        Ok(lender)
    }

    /// Delete a lender and everything under it (loans cascade).
    pub async fn delete_lender(&self, who: &AuthIdentity, id: &str) -> Result<(), ActionError> {
        let lender = self
            .service()
            .get_lender(id)
            .await?
            .ok_or_else(|| ActionError::not_found(EntityType::Lender, id))?;
        self.require_manager(who, &lender.project_id).await?;

        self.service().delete_lender(&lender.id).await?;

        self.record_deleted(
            who,
            &lender.project_id,
            EntityType::Lender,
            &lender.id,
            &lender,
            context::lender(&lender),
        )
        .await?;
        self.revalidate(&format!("/projects/{}/lenders", lender.project_id));
        Ok(())
    }
}
