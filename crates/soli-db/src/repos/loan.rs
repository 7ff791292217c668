//! Loan repository.
//!
//! Loans hang off lenders, so project scoping always goes through a JOIN.
//! `project_id_for_loan` is the authorization hook the action layer uses
//! before touching a loan.

use chrono::Utc;

use soli_core::entities::Loan;
use soli_core::enums::LoanStatus;
use soli_core::ids::PREFIX_LOAN;
use soli_core::inputs::LoanCreateInput;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_date, parse_datetime, parse_enum, parse_optional_date};
use crate::service::SoliService;
use crate::updates::loan::LoanUpdate;

const SELECT_COLS: &str = "id, lender_id, name, principal_cents, interest_rate, \
                           interest_method, start_date, end_date, status, created_at, updated_at";

fn row_to_loan(row: &libsql::Row) -> Result<Loan, DatabaseError> {
    let interest_method = match get_opt_string(row, 5)? {
        Some(s) => Some(parse_enum(&s)?),
        None => None,
    };
    let end_date = get_opt_string(row, 7)?;
    Ok(Loan {
        id: row.get(0)?,
        lender_id: row.get(1)?,
        name: row.get(2)?,
        principal_cents: row.get(3)?,
        interest_rate: row.get(4)?,
        interest_method,
        start_date: parse_date(&row.get::<String>(6)?)?,
        end_date: parse_optional_date(end_date.as_deref())?,
        status: parse_enum(&row.get::<String>(8)?)?,
        created_at: parse_datetime(&row.get::<String>(9)?)?,
        updated_at: parse_datetime(&row.get::<String>(10)?)?,
    })
}

impl SoliService {
    pub async fn create_loan(&self, input: &LoanCreateInput) -> Result<Loan, DatabaseError> {
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_LOAN).await?;
        let status = input.status.unwrap_or(LoanStatus::Active);

        self.db()
            .conn()
            .execute(
                &format!(
                    "INSERT INTO loans ({SELECT_COLS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)"
                ),
                libsql::params![
                    id.as_str(),
                    input.lender_id.as_str(),
                    input.name.as_str(),
                    input.principal_cents,
                    input.interest_rate,
                    input.interest_method.map(|m| m.as_str()),
                    input.start_date.to_string(),
                    input.end_date.map(|d| d.to_string()),
                    status.as_str(),
                    now.to_rfc3339(),
                    now.to_rfc3339()
                ],
            )
            .await?;

        Ok(Loan {
            id,
            lender_id: input.lender_id.clone(),
            name: input.name.clone(),
            principal_cents: input.principal_cents,
            interest_rate: input.interest_rate,
            interest_method: input.interest_method,
            start_date: input.start_date,
            end_date: input.end_date,
            status,
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn get_loan(&self, id: &str) -> Result<Option<Loan>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM loans WHERE id = ?1"),
                [id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_loan(&row)?)),
            None => Ok(None),
        }
    }

    /// All loans in a project, newest first.
    pub async fn list_loans(
        &self,
        project_id: &str,
        limit: u32,
    ) -> Result<Vec<Loan>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT lo.id, lo.lender_id, lo.name, lo.principal_cents, lo.interest_rate, \
                     lo.interest_method, lo.start_date, lo.end_date, lo.status, lo.created_at, \
                     lo.updated_at \
                     FROM loans lo \
                     JOIN lenders le ON le.id = lo.lender_id \
                     WHERE le.project_id = ?1 \
                     ORDER BY lo.created_at DESC LIMIT {limit}"
                ),
                [project_id],
            )
            .await?;
        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(row_to_loan(&row)?);
        }
        Ok(results)
    }

    pub async fn list_loans_for_lender(
        &self,
        lender_id: &str,
        limit: u32,
    ) -> Result<Vec<Loan>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM loans
                     WHERE lender_id = ?1 ORDER BY start_date DESC LIMIT {limit}"
                ),
                [lender_id],
            )
            .await?;
        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(row_to_loan(&row)?);
        }
        Ok(results)
    }

    pub async fn update_loan(
        &self,
        id: &str,
        update: LoanUpdate,
    ) -> Result<Option<Loan>, DatabaseError> {
        let mut sets = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        let mut idx = 1usize;

        if let Some(ref name) = update.name {
            sets.push(format!("name = ?{idx}"));
            params.push(name.clone().into());
            idx += 1;
        }
        if let Some(principal_cents) = update.principal_cents {
            sets.push(format!("principal_cents = ?{idx}"));
            params.push(principal_cents.into());
            idx += 1;
        }
        if let Some(interest_rate) = update.interest_rate {
            sets.push(format!("interest_rate = ?{idx}"));
            params.push(interest_rate.into());
            idx += 1;
        }
        if let Some(interest_method) = update.interest_method {
            sets.push(format!("interest_method = ?{idx}"));
            params.push(
                interest_method.map_or(libsql::Value::Null, |m| m.as_str().into()),
            );
            idx += 1;
        }
        if let Some(start_date) = update.start_date {
            sets.push(format!("start_date = ?{idx}"));
            params.push(start_date.to_string().into());
            idx += 1;
        }
        if let Some(end_date) = update.end_date {
            sets.push(format!("end_date = ?{idx}"));
            params.push(end_date.map_or(libsql::Value::Null, |d| d.to_string().into()));
            idx += 1;
        }
        if let Some(status) = update.status {
            sets.push(format!("status = ?{idx}"));
            params.push(status.as_str().into());
            idx += 1;
        }

        if sets.is_empty() {
            return self.get_loan(id).await;
        }

        sets.push(format!("updated_at = ?{idx}"));
        params.push(Utc::now().to_rfc3339().into());
        idx += 1;

        params.push(id.into());
        let sql = format!("UPDATE loans SET {} WHERE id = ?{idx}", sets.join(", "));
        self.db()
            .conn()
            .execute(&sql, libsql::params_from_iter(params))
            .await?;

        self.get_loan(id).await
    }

    pub async fn delete_loan(&self, id: &str) -> Result<(), DatabaseError> {
        self.db()
            .conn()
            .execute("DELETE FROM loans WHERE id = ?1", [id])
            .await?;
        Ok(())
    }

    /// Project that owns this loan (via its lender), for authorization.
    pub async fn project_id_for_loan(&self, loan_id: &str) -> Result<Option<String>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT le.project_id FROM loans lo
                 JOIN lenders le ON le.id = lo.lender_id
                 WHERE lo.id = ?1",
                [loan_id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row.get::<String>(0)?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use soli_core::enums::{InterestMethod, LoanStatus};
    use soli_core::inputs::LoanCreateInput;

    use crate::test_support::helpers::{seed_lender, seed_loan, seed_project, test_service};
    use crate::updates::loan::LoanUpdateBuilder;

    #[tokio::test]
    async fn create_defaults_to_active() {
        let svc = test_service().await;
        let project = seed_project(&svc, "alpha").await;
        let lender = seed_lender(&svc, &project.id).await;
        let loan = seed_loan(&svc, &lender.id).await;

        assert!(loan.id.starts_with("lon-"));
        assert_eq!(loan.status, LoanStatus::Active);
        assert!(loan.interest_method.is_none());
        assert!(loan.end_date.is_none());
    }

    #[tokio::test]
    async fn dates_roundtrip() {
        let svc = test_service().await;
        let project = seed_project(&svc, "alpha").await;
        let lender = seed_lender(&svc, &project.id).await;

        let loan = svc
            .create_loan(&LoanCreateInput {
                lender_id: lender.id.clone(),
                name: "Baudarlehen".to_string(),
                principal_cents: 5_000_000,
                interest_rate: 3.25,
                interest_method: Some(InterestMethod::Compound),
                start_date: NaiveDate::from_ymd_opt(2023, 7, 1).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2033, 6, 30),
                status: Some(LoanStatus::Active),
            })
            .await
            .unwrap();

        let fetched = svc.get_loan(&loan.id).await.unwrap().unwrap();
        assert_eq!(fetched.start_date.to_string(), "2023-07-01");
        assert_eq!(fetched.end_date.unwrap().to_string(), "2033-06-30");
        assert_eq!(fetched.interest_method, Some(InterestMethod::Compound));
        assert_eq!(fetched.principal_cents, 5_000_000);
    }

    #[tokio::test]
    async fn update_status_and_clear_end_date() {
        let svc = test_service().await;
        let project = seed_project(&svc, "alpha").await;
        let lender = seed_lender(&svc, &project.id).await;
        let loan = seed_loan(&svc, &lender.id).await;

        let updated = svc
            .update_loan(
                &loan.id,
                LoanUpdateBuilder::new()
                    .status(LoanStatus::Repaid)
                    .end_date(NaiveDate::from_ymd_opt(2026, 1, 1))
                    .build(),
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, LoanStatus::Repaid);
        assert_eq!(updated.end_date.unwrap().to_string(), "2026-01-01");

        let cleared = svc
            .update_loan(&loan.id, LoanUpdateBuilder::new().end_date(None).build())
            .await
            .unwrap()
            .unwrap();
        assert!(cleared.end_date.is_none());
        assert_eq!(cleared.status, LoanStatus::Repaid);
    }

    #[tokio::test]
    async fn update_interest_method_override() {
        let svc = test_service().await;
        let project = seed_project(&svc, "alpha").await;
        let lender = seed_lender(&svc, &project.id).await;
        let loan = seed_loan(&svc, &lender.id).await;

        let with_override = svc
            .update_loan(
                &loan.id,
                LoanUpdateBuilder::new()
                    .interest_method(Some(InterestMethod::Compound))
                    .build(),
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(with_override.interest_method, Some(InterestMethod::Compound));

        let without = svc
            .update_loan(
                &loan.id,
                LoanUpdateBuilder::new().interest_method(None).build(),
            )
            .await
            .unwrap()
            .unwrap();
        assert!(without.interest_method.is_none());
    }

    #[tokio::test]
    async fn list_loans_scoped_to_project() {
        let svc = test_service().await;
        let alpha = seed_project(&svc, "alpha").await;
        let beta = seed_project(&svc, "beta").await;
        let lender_a = seed_lender(&svc, &alpha.id).await;
        let lender_b = seed_lender(&svc, &beta.id).await;
        seed_loan(&svc, &lender_a.id).await;
        seed_loan(&svc, &lender_b.id).await;

        let loans = svc.list_loans(&alpha.id, 50).await.unwrap();
        assert_eq!(loans.len(), 1);
        assert_eq!(loans[0].lender_id, lender_a.id);
    }

    #[tokio::test]
    async fn list_loans_for_lender() {
        let svc = test_service().await;
        let project = seed_project(&svc, "alpha").await;
        let lender = seed_lender(&svc, &project.id).await;
        seed_loan(&svc, &lender.id).await;
        seed_loan(&svc, &lender.id).await;

        let loans = svc.list_loans_for_lender(&lender.id, 50).await.unwrap();
        assert_eq!(loans.len(), 2);
    }

    #[tokio::test]
    async fn project_id_for_loan_follows_lender() {
        let svc = test_service().await;
        let project = seed_project(&svc, "alpha").await;
        let lender = seed_lender(&svc, &project.id).await;
        let loan = seed_loan(&svc, &lender.id).await;

        let found = svc.project_id_for_loan(&loan.id).await.unwrap();
        assert_eq!(found.as_deref(), Some(project.id.as_str()));
        assert!(svc.project_id_for_loan("lon-missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_loan_removes_row() {
        let svc = test_service().await;
        let project = seed_project(&svc, "alpha").await;
        let lender = seed_lender(&svc, &project.id).await;
        let loan = seed_loan(&svc, &lender.id).await;

        svc.delete_loan(&loan.id).await.unwrap();
        assert!(svc.get_loan(&loan.id).await.unwrap().is_none());
    }
}
