//! Shared test utilities for soli-db integration tests.

pub(crate) mod helpers {
    use chrono::NaiveDate;

    use soli_core::entities::{Lender, Loan, Project};
    use soli_core::inputs::{LenderCreateInput, LoanCreateInput};

    use crate::SoliDb;
    use crate::service::SoliService;

    /// Create an in-memory `SoliService`.
    pub async fn test_service() -> SoliService {
        let db = SoliDb::open_local(":memory:").await.unwrap();
        SoliService::from_db(db)
    }

    /// Insert a user and return its ID.
    pub async fn seed_user(svc: &SoliService, email: &str) -> String {
        let user = svc.create_user(email, "Test User").await.unwrap();
        user.id
    }

    /// Insert a bare project (no configuration, no members).
    pub async fn seed_project(svc: &SoliService, slug: &str) -> Project {
        svc.create_project(slug, "Test Project").await.unwrap()
    }

    /// Insert a lender with only the required fields.
    pub async fn seed_lender(svc: &SoliService, project_id: &str) -> Lender {
        svc.create_lender(&LenderCreateInput {
            project_id: project_id.to_string(),
            name: "Greta Janssen".to_string(),
            email: "greta@example.com".to_string(),
            phone: None,
            iban: None,
            street: None,
            postal_code: None,
            city: None,
            country: None,
        })
        .await
        .unwrap()
    }

    /// Insert an active loan with fixed dates and amounts.
    pub async fn seed_loan(svc: &SoliService, lender_id: &str) -> Loan {
        svc.create_loan(&LoanCreateInput {
            lender_id: lender_id.to_string(),
            name: "Privatdarlehen 2024".to_string(),
            principal_cents: 1_000_000,
            interest_rate: 2.5,
            interest_method: None,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            end_date: None,
            status: None,
        })
        .await
        .unwrap()
    }
}
