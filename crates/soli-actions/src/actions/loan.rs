//! Loan actions.
//!
//! Authorization runs against the owning lender's project before anything
//! is written, so a rejected create leaves no row and no change entry.

use serde_json::Value;
use soli_core::entities::Loan;
use soli_core::enums::EntityType;
use soli_core::identity::AuthIdentity;
use soli_core::inputs::{LoanCreateInput, LoanUpdateInput};
use soli_db::updates::loan::LoanUpdateBuilder;

use crate::Actions;
use crate::context;
use crate::error::ActionError;

impl Actions {
    pub async fn create_loan(&self, who: &AuthIdentity, input: Value) -> Result<Loan, ActionError> {
        let input: LoanCreateInput = self.validate_input("loan_create", input)?;
        let lender = self
            .service()
            .get_lender(&input.lender_id)
            .await?
            .ok_or_else(|| ActionError::not_found(EntityType::Lender, &input.lender_id))?;
        self.require_manager(who, &lender.project_id).await?;

        let loan = self.service().create_loan(&input).await?;

        self.record_created(
            who,
            &lender.project_id,
            EntityType::Loan,
            &loan.id,
            &loan,
            context::loan(&lender, &loan),
        )
        .await?;
        self.revalidate(&format!("/lenders/{}", lender.id));
        Ok(loan)
    }

    pub async fn get_loan(&self, who: &AuthIdentity, id: &str) -> Result<Loan, ActionError> {
        let loan = self
            .service()
            .get_loan(id)
            .await?
            .ok_or_else(|| ActionError::not_found(EntityType::Loan, id))?;
        let project_id = self.project_for_loan(&loan.id).await?;
        self.require_member(who, &project_id).await?;
        Ok(loan)
    }

    pub async fn list_loans_for_lender(
        &self,
        who: &AuthIdentity,
        lender_id: &str,
        limit: Option<u32>,
    ) -> Result<Vec<Loan>, ActionError> {
        let lender = self
            .service()
            .get_lender(lender_id)
            .await?
            .ok_or_else(|| ActionError::not_found(EntityType::Lender, lender_id))?;
        self.require_member(who, &lender.project_id).await?;

        let limit = self.config().general.clamp_limit(limit);
        Ok(self
            .service()
            .list_loans_for_lender(&lender.id, limit)
            .await?)
    }

    pub async fn update_loan(&self, who: &AuthIdentity, input: Value) -> Result<Loan, ActionError> {
        let input: LoanUpdateInput = self.validate_input("loan_update", input)?;
        let before = self
            .service()
            .get_loan(&input.loan_id)
            .await?
            .ok_or_else(|| ActionError::not_found(EntityType::Loan, &input.loan_id))?;
        let project_id = self.project_for_loan(&before.id).await?;
        self.require_manager(who, &project_id).await?;

        let mut update = LoanUpdateBuilder::new();
        if let Some(name) = input.name {
            update = update.name(name);
        }
        if let Some(principal_cents) = input.principal_cents {
            update = update.principal_cents(principal_cents);
        }
        if let Some(interest_rate) = input.interest_rate {
            update = update.interest_rate(interest_rate);
        }
        if let Some(interest_method) = input.interest_method {
            update = update.interest_method(interest_method);
        }
        if let Some(start_date) = input.start_date {
            update = update.start_date(start_date);
        }
        if let Some(end_date) = input.end_date {
            update = update.end_date(end_date);
        }
        if let Some(status) = input.status {
            update = update.status(status);
        }

        let loan = self
            .service()
            .update_loan(&before.id, update.build())
            .await?
            .ok_or_else(|| ActionError::not_found(EntityType::Loan, &before.id))?;
        let lender = self
            .service()
            .get_lender(&loan.lender_id)
            .await?
            .ok_or_else(|| ActionError::not_found(EntityType::Lender, &loan.lender_id))?;

        self.record_updated(
            who,
            &project_id,
            EntityType::Loan,
            &loan.id,
            (&before, &loan),
            context::loan(&lender, &loan),
        )
        .await?;
        self.revalidate(&format!("/lenders/{}", lender.id));
        self.revalidate(&format!("/loans/{}", loan.id));
        Ok(loan)
    }

    /// Delete a loan with its transactions, notes, and file records.
    pub async fn delete_loan(&self, who: &AuthIdentity, id: &str) -> Result<(), ActionError> {
        let loan = self
            .service()
            .get_loan(id)
            .await?
            .ok_or_else(|| ActionError::not_found(EntityType::Loan, id))?;
        let project_id = self.project_for_loan(&loan.id).await?;
        self.require_manager(who, &project_id).await?;
        let lender = self
            .service()
            .get_lender(&loan.lender_id)
            .await?
            .ok_or_else(|| ActionError::not_found(EntityType::Lender, &loan.lender_id))?;

        self.service().delete_loan(&loan.id).await?;

        self.record_deleted(
            who,
            &project_id,
            EntityType::Loan,
            &loan.id,
            &loan,
            context::loan(&lender, &loan),
        )
        .await?;
        self.revalidate(&format!("/lenders/{}", lender.id));
        Ok(())
    }

    pub(crate) async fn project_for_loan(&self, loan_id: &str) -> Result<String, ActionError> {
        self.service()
            .project_id_for_loan(loan_id)
            .await?
            .ok_or_else(|| ActionError::not_found(EntityType::Loan, loan_id))
    }
}
