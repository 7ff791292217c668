//! Dashboard aggregation queries.
//!
//! All figures are computed in SQL and scoped to a project through the
//! lenders table. Amounts stay in cents end to end.

use soli_core::responses::{DashboardSummary, MonthlyVolume};

use crate::error::DatabaseError;
use crate::service::SoliService;

impl SoliService {
    /// Financial summary for one project: headcounts, per-kind transaction
    /// totals, and repayment volume for the six most recent active months.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if a query fails.
    pub async fn dashboard_summary(
        &self,
        project_id: &str,
    ) -> Result<DashboardSummary, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT COUNT(*) FROM lenders WHERE project_id = ?1",
                [project_id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        let lender_count = row.get::<i64>(0)?;

        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT COUNT(*), COALESCE(SUM(l.principal_cents), 0)
                 FROM loans l
                 JOIN lenders d ON d.id = l.lender_id
                 WHERE d.project_id = ?1 AND l.status = 'active'",
                [project_id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        let active_loan_count = row.get::<i64>(0)?;
        let principal_total_cents = row.get::<i64>(1)?;

        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT
                     COALESCE(SUM(CASE WHEN t.kind = 'disbursement' THEN t.amount_cents ELSE 0 END), 0),
                     COALESCE(SUM(CASE WHEN t.kind = 'repayment' THEN t.amount_cents ELSE 0 END), 0),
                     COALESCE(SUM(CASE WHEN t.kind = 'interest_payment' THEN t.amount_cents ELSE 0 END), 0)
                 FROM transactions t
                 JOIN loans l ON l.id = t.loan_id
                 JOIN lenders d ON d.id = l.lender_id
                 WHERE d.project_id = ?1",
                [project_id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        let disbursed_cents = row.get::<i64>(0)?;
        let repaid_cents = row.get::<i64>(1)?;
        let interest_paid_cents = row.get::<i64>(2)?;

        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT strftime('%Y-%m', t.booked_at) AS month, SUM(t.amount_cents)
                 FROM transactions t
                 JOIN loans l ON l.id = t.loan_id
                 JOIN lenders d ON d.id = l.lender_id
                 WHERE d.project_id = ?1 AND t.kind = 'repayment'
                 GROUP BY month
                 ORDER BY month DESC
                 LIMIT 6",
                [project_id],
            )
            .await?;
        let mut monthly_repayments = Vec::new();
        while let Some(row) = rows.next().await? {
            monthly_repayments.push(MonthlyVolume {
                month: row.get(0)?,
                amount_cents: row.get(1)?,
            });
        }

        Ok(DashboardSummary {
            lender_count,
            active_loan_count,
            principal_total_cents,
            disbursed_cents,
            repaid_cents,
            interest_paid_cents,
            outstanding_cents: disbursed_cents - repaid_cents,
            monthly_repayments,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use soli_core::enums::{LoanStatus, TransactionKind};
    use soli_core::inputs::{LoanCreateInput, TransactionCreateInput};

    use crate::service::SoliService;
    use crate::test_support::helpers::{seed_lender, seed_loan, seed_project, test_service};

    async fn book(svc: &SoliService, loan_id: &str, kind: TransactionKind, cents: i64, date: &str) {
        svc.create_transaction(&TransactionCreateInput {
            loan_id: loan_id.to_string(),
            kind,
            amount_cents: cents,
            booked_at: date.parse().unwrap(),
            description: None,
        })
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn empty_project_reports_zeros() {
        let svc = test_service().await;
        let project = seed_project(&svc, "fam").await;

        let summary = svc.dashboard_summary(&project.id).await.unwrap();
        assert_eq!(summary.lender_count, 0);
        assert_eq!(summary.active_loan_count, 0);
        assert_eq!(summary.principal_total_cents, 0);
        assert_eq!(summary.disbursed_cents, 0);
        assert_eq!(summary.outstanding_cents, 0);
        assert!(summary.monthly_repayments.is_empty());
    }

    #[tokio::test]
    async fn totals_reflect_transactions() {
        let svc = test_service().await;
        let project = seed_project(&svc, "fam").await;
        let lender = seed_lender(&svc, &project.id).await;
        let active = seed_loan(&svc, &lender.id).await;
        let repaid = svc
            .create_loan(&LoanCreateInput {
                lender_id: lender.id.clone(),
                name: "Altdarlehen".to_string(),
                principal_cents: 500_000,
                interest_rate: 1.0,
                interest_method: None,
                start_date: NaiveDate::from_ymd_opt(2020, 6, 1).unwrap(),
                end_date: None,
                status: Some(LoanStatus::Repaid),
            })
            .await
            .unwrap();

        book(&svc, &active.id, TransactionKind::Disbursement, 1_000_000, "2024-01-15").await;
        book(&svc, &active.id, TransactionKind::Repayment, 200_000, "2024-02-10").await;
        book(&svc, &active.id, TransactionKind::Repayment, 100_000, "2024-03-05").await;
        book(&svc, &active.id, TransactionKind::InterestPayment, 12_500, "2024-03-05").await;
        book(&svc, &repaid.id, TransactionKind::Disbursement, 500_000, "2020-06-01").await;

        let summary = svc.dashboard_summary(&project.id).await.unwrap();
        assert_eq!(summary.lender_count, 1);
        assert_eq!(summary.active_loan_count, 1);
        assert_eq!(summary.principal_total_cents, 1_000_000);
        assert_eq!(summary.disbursed_cents, 1_500_000);
        assert_eq!(summary.repaid_cents, 300_000);
        assert_eq!(summary.interest_paid_cents, 12_500);
        assert_eq!(summary.outstanding_cents, 1_200_000);
    }

    #[tokio::test]
    async fn monthly_volume_groups_and_limits() {
        let svc = test_service().await;
        let project = seed_project(&svc, "fam").await;
        let lender = seed_lender(&svc, &project.id).await;
        let loan = seed_loan(&svc, &lender.id).await;

        // Two bookings in July, then one per month back through December
        book(&svc, &loan.id, TransactionKind::Repayment, 10_000, "2024-07-01").await;
        book(&svc, &loan.id, TransactionKind::Repayment, 5_000, "2024-07-20").await;
        for date in [
            "2024-06-15", "2024-05-15", "2024-04-15", "2024-03-15", "2024-02-15", "2023-12-15",
        ] {
            book(&svc, &loan.id, TransactionKind::Repayment, 1_000, date).await;
        }
        book(&svc, &loan.id, TransactionKind::Disbursement, 50_000, "2024-07-02").await;

        let summary = svc.dashboard_summary(&project.id).await.unwrap();
        let months: Vec<&str> = summary
            .monthly_repayments
            .iter()
            .map(|m| m.month.as_str())
            .collect();
        assert_eq!(
            months,
            vec!["2024-07", "2024-06", "2024-05", "2024-04", "2024-03", "2024-02"]
        );
        assert_eq!(summary.monthly_repayments[0].amount_cents, 15_000);
    }

    #[tokio::test]
    async fn scoped_to_project() {
        let svc = test_service().await;
        let fam = seed_project(&svc, "fam").await;
        let club = seed_project(&svc, "club").await;
        let lender = seed_lender(&svc, &fam.id).await;
        let loan = seed_loan(&svc, &lender.id).await;
        book(&svc, &loan.id, TransactionKind::Disbursement, 1_000_000, "2024-01-15").await;

        let summary = svc.dashboard_summary(&club.id).await.unwrap();
        assert_eq!(summary.lender_count, 0);
        assert_eq!(summary.disbursed_cents, 0);
    }
}
