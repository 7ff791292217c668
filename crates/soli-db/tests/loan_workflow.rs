//! End-to-end persistence workflows.
//!
//! Exercises the repositories together the way the action layer drives them:
//! project setup, lender and loan bookkeeping, dashboard aggregation, and the
//! change log surviving entity deletion.

use chrono::{NaiveDate, Utc};
use pretty_assertions::assert_eq;

use soli_core::entities::Change;
use soli_core::enums::{ChangeAction, EntityType, LoanStatus, ProjectRole, TransactionKind};
use soli_core::ids::PREFIX_CHANGE;
use soli_core::inputs::{LenderCreateInput, LoanCreateInput, TransactionCreateInput};
use soli_db::repos::change::ChangeFilter;
use soli_db::service::SoliService;
use soli_db::updates::loan::LoanUpdateBuilder;

async fn test_service() -> SoliService {
    SoliService::new_local(":memory:").await.unwrap()
}

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

#[tokio::test]
async fn full_loan_lifecycle() {
    let svc = test_service().await;

    let project = svc.create_project("familie", "Familienkasse").await.unwrap();
    svc.create_configuration(&project.id, "Familienkasse")
        .await
        .unwrap();
    let user = svc
        .create_user("anna@example.com", "Anna Vogel")
        .await
        .unwrap();
    svc.add_member(&project.id, &user.id, ProjectRole::Manager)
        .await
        .unwrap();

    let lender = svc
        .create_lender(&LenderCreateInput {
            project_id: project.id.clone(),
            name: "Greta Janssen".to_string(),
            email: "greta@example.com".to_string(),
            phone: None,
            iban: Some("NL91ABNA0417164300".to_string()),
            street: None,
            postal_code: None,
            city: Some("Amsterdam".to_string()),
            country: Some("NL".to_string()),
        })
        .await
        .unwrap();

    let loan = svc
        .create_loan(&LoanCreateInput {
            lender_id: lender.id.clone(),
            name: "Privatdarlehen 2024".to_string(),
            principal_cents: 1_000_000,
            interest_rate: 2.5,
            interest_method: None,
            start_date: date("2024-01-15"),
            end_date: None,
            status: None,
        })
        .await
        .unwrap();
    assert_eq!(loan.status, LoanStatus::Active);

    for (kind, cents, booked) in [
        (TransactionKind::Disbursement, 1_000_000, "2024-01-15"),
        (TransactionKind::Repayment, 400_000, "2024-06-01"),
        (TransactionKind::Repayment, 600_000, "2024-12-01"),
        (TransactionKind::InterestPayment, 25_000, "2024-12-01"),
    ] {
        svc.create_transaction(&TransactionCreateInput {
            loan_id: loan.id.clone(),
            kind,
            amount_cents: cents,
            booked_at: date(booked),
            description: None,
        })
        .await
        .unwrap();
    }

    let summary = svc.dashboard_summary(&project.id).await.unwrap();
    assert_eq!(summary.lender_count, 1);
    assert_eq!(summary.active_loan_count, 1);
    assert_eq!(summary.disbursed_cents, 1_000_000);
    assert_eq!(summary.repaid_cents, 1_000_000);
    assert_eq!(summary.interest_paid_cents, 25_000);
    assert_eq!(summary.outstanding_cents, 0);

    // Loan fully repaid: close it and the dashboard follows
    let update = LoanUpdateBuilder::new()
        .status(LoanStatus::Repaid)
        .end_date(Some(date("2024-12-01")))
        .build();
    let closed = svc.update_loan(&loan.id, update).await.unwrap().unwrap();
    assert_eq!(closed.status, LoanStatus::Repaid);
    assert_eq!(closed.end_date, Some(date("2024-12-01")));

    let summary = svc.dashboard_summary(&project.id).await.unwrap();
    assert_eq!(summary.active_loan_count, 0);
    assert_eq!(summary.principal_total_cents, 0);
}

#[tokio::test]
async fn project_delete_cascades_but_keeps_change_log() {
    let svc = test_service().await;

    let project = svc.create_project("verein", "Verein").await.unwrap();
    let user = svc.create_user("ben@example.com", "Ben").await.unwrap();
    let lender = svc
        .create_lender(&LenderCreateInput {
            project_id: project.id.clone(),
            name: "Jonas Berg".to_string(),
            email: "jonas@example.com".to_string(),
            phone: None,
            iban: None,
            street: None,
            postal_code: None,
            city: None,
            country: None,
        })
        .await
        .unwrap();
    let loan = svc
        .create_loan(&LoanCreateInput {
            lender_id: lender.id.clone(),
            name: "Starthilfe".to_string(),
            principal_cents: 250_000,
            interest_rate: 0.0,
            interest_method: None,
            start_date: date("2023-05-01"),
            end_date: None,
            status: None,
        })
        .await
        .unwrap();
    let note = svc
        .create_note(&loan.id, Some(&user.id), "Vertrag unterschrieben")
        .await
        .unwrap();

    svc.append_change(&Change {
        id: svc.db().generate_id(PREFIX_CHANGE).await.unwrap(),
        project_id: project.id.clone(),
        entity_type: EntityType::Lender,
        entity_id: lender.id.clone(),
        action: ChangeAction::Created,
        user_id: user.id.clone(),
        before: None,
        after: Some(serde_json::json!({"name": "Jonas Berg"})),
        context: Some(serde_json::json!({"lender_name": "Jonas Berg"})),
        created_at: Utc::now(),
    })
    .await
    .unwrap();

    svc.delete_project(&project.id).await.unwrap();

    assert!(svc.get_lender(&lender.id).await.unwrap().is_none());
    assert!(svc.get_loan(&loan.id).await.unwrap().is_none());
    assert!(svc.get_note(&note.id).await.unwrap().is_none());

    let trail = svc
        .query_changes(&ChangeFilter::for_project(&project.id))
        .await
        .unwrap();
    assert_eq!(trail.len(), 1);
    assert_eq!(trail[0].entity_id, lender.id);
}

#[tokio::test]
async fn search_spans_lenders_and_notes() {
    let svc = test_service().await;

    let project = svc.create_project("familie", "Familienkasse").await.unwrap();
    let lender = svc
        .create_lender(&LenderCreateInput {
            project_id: project.id.clone(),
            name: "Margriet de Vries".to_string(),
            email: "margriet@example.com".to_string(),
            phone: None,
            iban: None,
            street: None,
            postal_code: None,
            city: Some("Utrecht".to_string()),
            country: Some("NL".to_string()),
        })
        .await
        .unwrap();
    let loan = svc
        .create_loan(&LoanCreateInput {
            lender_id: lender.id.clone(),
            name: "Renovierung".to_string(),
            principal_cents: 500_000,
            interest_rate: 1.5,
            interest_method: None,
            start_date: date("2024-03-01"),
            end_date: None,
            status: None,
        })
        .await
        .unwrap();
    svc.create_note(&loan.id, None, "Sondertilgung im Oktober vereinbart")
        .await
        .unwrap();

    let lenders = svc.search_lenders(&project.id, "utrecht", 10).await.unwrap();
    assert_eq!(lenders.len(), 1);
    assert_eq!(lenders[0].id, lender.id);

    let notes = svc
        .search_notes(&project.id, "sondertilgung", 10)
        .await
        .unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].loan_id, loan.id);
}
