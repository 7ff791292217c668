//! Transaction actions.

use serde_json::Value;
use soli_core::entities::{Lender, Loan, Transaction};
use soli_core::enums::EntityType;
use soli_core::identity::AuthIdentity;
use soli_core::inputs::{TransactionCreateInput, TransactionUpdateInput};
use soli_db::updates::transaction::TransactionUpdateBuilder;

use crate::Actions;
use crate::context;
use crate::error::ActionError;

impl Actions {
    pub async fn create_transaction(
        &self,
        who: &AuthIdentity,
        input: Value,
    ) -> Result<Transaction, ActionError> {
        let input: TransactionCreateInput = self.validate_input("transaction_create", input)?;
        let loan = self
            .service()
            .get_loan(&input.loan_id)
            .await?
            .ok_or_else(|| ActionError::not_found(EntityType::Loan, &input.loan_id))?;
        let project_id = self.project_for_loan(&loan.id).await?;
        self.require_manager(who, &project_id).await?;

        let transaction = self.service().create_transaction(&input).await?;
        let lender = self.lender_of(&loan).await?;

        self.record_created(
            who,
            &project_id,
            EntityType::Transaction,
            &transaction.id,
            &transaction,
            context::transaction(&lender, &loan, &transaction),
        )
        .await?;
        self.revalidate(&format!("/loans/{}", loan.id));
        Ok(transaction)
    }

    pub async fn get_transaction(
        &self,
        who: &AuthIdentity,
        id: &str,
    ) -> Result<Transaction, ActionError> {
        let transaction = self
            .service()
            .get_transaction(id)
            .await?
            .ok_or_else(|| ActionError::not_found(EntityType::Transaction, id))?;
        let project_id = self.project_for_transaction(&transaction.id).await?;
        self.require_member(who, &project_id).await?;
        Ok(transaction)
    }

    /// Transactions of a loan, booking order.
    pub async fn list_transactions(
        &self,
        who: &AuthIdentity,
        loan_id: &str,
        limit: Option<u32>,
    ) -> Result<Vec<Transaction>, ActionError> {
        let loan = self
            .service()
            .get_loan(loan_id)
            .await?
            .ok_or_else(|| ActionError::not_found(EntityType::Loan, loan_id))?;
        let project_id = self.project_for_loan(&loan.id).await?;
        self.require_member(who, &project_id).await?;

        let limit = self.config().general.clamp_limit(limit);
        Ok(self.service().list_transactions(&loan.id, limit).await?)
    }

    pub async fn update_transaction(
        &self,
        who: &AuthIdentity,
        input: Value,
    ) -> Result<Transaction, ActionError> {
        let input: TransactionUpdateInput = self.validate_input("transaction_update", input)?;
        let before = self
            .service()
            .get_transaction(&input.transaction_id)
            .await?
            .ok_or_else(|| {
                ActionError::not_found(EntityType::Transaction, &input.transaction_id)
            })?;
        let project_id = self.project_for_transaction(&before.id).await?;
        self.require_manager(who, &project_id).await?;

        let mut update = TransactionUpdateBuilder::new();
        if let Some(kind) = input.kind {
            update = update.kind(kind);
        }
        if let Some(amount_cents) = input.amount_cents {
            update = update.amount_cents(amount_cents);
        }
        if let Some(booked_at) = input.booked_at {
            update = update.booked_at(booked_at);
        }
        if let Some(description) = input.description {
            update = update.description(description);
        }

        let transaction = self
            .service()
            .update_transaction(&before.id, update.build())
            .await?
            .ok_or_else(|| ActionError::not_found(EntityType::Transaction, &before.id))?;

        let loan = self
            .service()
            .get_loan(&transaction.loan_id)
            .await?
            .ok_or_else(|| ActionError::not_found(EntityType::Loan, &transaction.loan_id))?;
        let lender = self.lender_of(&loan).await?;

        self.record_updated(
            who,
            &project_id,
            EntityType::Transaction,
            &transaction.id,
            (&before, &transaction),
            context::transaction(&lender, &loan, &transaction),
        )
        .await?;
        self.revalidate(&format!("/loans/{}", loan.id));
        Ok(transaction)
    }

    pub async fn delete_transaction(
        &self,
        who: &AuthIdentity,
        id: &str,
    ) -> Result<(), ActionError> {
        let transaction = self
            .service()
            .get_transaction(id)
            .await?
            .ok_or_else(|| ActionError::not_found(EntityType::Transaction, id))?;
        let project_id = self.project_for_transaction(&transaction.id).await?;
        self.require_manager(who, &project_id).await?;

        let loan = self
            .service()
            .get_loan(&transaction.loan_id)
            .await?
            .ok_or_else(|| ActionError::not_found(EntityType::Loan, &transaction.loan_id))?;
        let lender = self.lender_of(&loan).await?;

        self.service().delete_transaction(&transaction.id).await?;

        self.record_deleted(
            who,
            &project_id,
            EntityType::Transaction,
            &transaction.id,
            &transaction,
            context::transaction(&lender, &loan, &transaction),
        )
        .await?;
        self.revalidate(&format!("/loans/{}", loan.id));
        Ok(())
    }

    async fn project_for_transaction(&self, transaction_id: &str) -> Result<String, ActionError> {
        self.service()
            .project_id_for_transaction(transaction_id)
            .await?
            .ok_or_else(|| ActionError::not_found(EntityType::Transaction, transaction_id))
    }

    pub(crate) async fn lender_of(&self, loan: &Loan) -> Result<Lender, ActionError> {
        self.service()
            .get_lender(&loan.lender_id)
            .await?
            .ok_or_else(|| ActionError::not_found(EntityType::Lender, &loan.lender_id))
    }
}
