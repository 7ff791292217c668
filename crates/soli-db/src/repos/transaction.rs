//! Transaction repository.

use chrono::Utc;

use soli_core::entities::Transaction;
use soli_core::ids::PREFIX_TRANSACTION;
use soli_core::inputs::TransactionCreateInput;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_date, parse_datetime, parse_enum};
use crate::service::SoliService;
use crate::updates::transaction::TransactionUpdate;

const SELECT_COLS: &str =
    "id, loan_id, kind, amount_cents, booked_at, description, created_at, updated_at";

fn row_to_transaction(row: &libsql::Row) -> Result<Transaction, DatabaseError> {
    Ok(Transaction {
        id: row.get(0)?,
        loan_id: row.get(1)?,
        kind: parse_enum(&row.get::<String>(2)?)?,
        amount_cents: row.get(3)?,
        booked_at: parse_date(&row.get::<String>(4)?)?,
        description: get_opt_string(row, 5)?,
        created_at: parse_datetime(&row.get::<String>(6)?)?,
        updated_at: parse_datetime(&row.get::<String>(7)?)?,
    })
}

impl SoliService {
    pub async fn create_transaction(
        &self,
        input: &TransactionCreateInput,
    ) -> Result<Transaction, DatabaseError> {
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_TRANSACTION).await?;

        self.db()
            .conn()
            .execute(
                &format!(
                    "INSERT INTO transactions ({SELECT_COLS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"
                ),
                libsql::params![
                    id.as_str(),
                    input.loan_id.as_str(),
                    input.kind.as_str(),
                    input.amount_cents,
                    input.booked_at.to_string(),
                    input.description.as_deref(),
                    now.to_rfc3339(),
                    now.to_rfc3339()
                ],
            )
            .await?;

        Ok(Transaction {
            id,
            loan_id: input.loan_id.clone(),
            kind: input.kind,
            amount_cents: input.amount_cents,
            booked_at: input.booked_at,
            description: input.description.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn get_transaction(
        &self,
        id: &str,
    ) -> Result<Option<Transaction>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM transactions WHERE id = ?1"),
                [id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_transaction(&row)?)),
            None => Ok(None),
        }
    }

    /// Transactions on a loan in booking order (statement order).
    pub async fn list_transactions(
        &self,
        loan_id: &str,
        limit: u32,
    ) -> Result<Vec<Transaction>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM transactions
                     WHERE loan_id = ?1 ORDER BY booked_at, created_at LIMIT {limit}"
                ),
                [loan_id],
            )
            .await?;
        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(row_to_transaction(&row)?);
        }
        Ok(results)
    }

    pub async fn update_transaction(
        &self,
        id: &str,
        update: TransactionUpdate,
    ) -> Result<Option<Transaction>, DatabaseError> {
        let mut sets = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        let mut idx = 1usize;

        if let Some(kind) = update.kind {
            sets.push(format!("kind = ?{idx}"));
            params.push(kind.as_str().into());
            idx += 1;
        }
        if let Some(amount_cents) = update.amount_cents {
            sets.push(format!("amount_cents = ?{idx}"));
            params.push(amount_cents.into());
            idx += 1;
        }
        if let Some(booked_at) = update.booked_at {
            sets.push(format!("booked_at = ?{idx}"));
            params.push(booked_at.to_string().into());
            idx += 1;
        }
        if let Some(ref description) = update.description {
            sets.push(format!("description = ?{idx}"));
            params.push(description.clone().map_or(libsql::Value::Null, Into::into));
            idx += 1;
        }

        if sets.is_empty() {
            return self.get_transaction(id).await;
        }

        sets.push(format!("updated_at = ?{idx}"));
        params.push(Utc::now().to_rfc3339().into());
        idx += 1;

        params.push(id.into());
        let sql = format!(
            "UPDATE transactions SET {} WHERE id = ?{idx}",
            sets.join(", ")
        );
        self.db()
            .conn()
            .execute(&sql, libsql::params_from_iter(params))
            .await?;

        self.get_transaction(id).await
    }

    pub async fn delete_transaction(&self, id: &str) -> Result<(), DatabaseError> {
        self.db()
            .conn()
            .execute("DELETE FROM transactions WHERE id = ?1", [id])
            .await?;
        Ok(())
    }

    /// Project that owns this transaction (via loan and lender).
    pub async fn project_id_for_transaction(
        &self,
        transaction_id: &str,
    ) -> Result<Option<String>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT le.project_id FROM transactions t
                 JOIN loans lo ON lo.id = t.loan_id
                 JOIN lenders le ON le.id = lo.lender_id
                 WHERE t.id = ?1",
                [transaction_id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row.get::<String>(0)?)),
            None => Ok(None),
        }
    }
}
