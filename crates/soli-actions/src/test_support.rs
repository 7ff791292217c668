//! Shared fixtures for action tests.

use std::sync::Arc;

use chrono::NaiveDate;
use soli_config::SoliConfig;
use soli_core::entities::{Lender, Loan, Project};
use soli_core::enums::ProjectRole;
use soli_core::identity::AuthIdentity;
use soli_core::inputs::{LenderCreateInput, LoanCreateInput};
use soli_db::service::SoliService;

use crate::Actions;
use crate::revalidate::RecordingRevalidator;

/// Action layer wired to an in-memory database, plus three identities:
/// a manager, a viewer, and a stranger with no membership anywhere.
pub(crate) struct Harness {
    pub actions: Actions,
    pub revalidator: Arc<RecordingRevalidator>,
    pub manager: AuthIdentity,
    pub viewer: AuthIdentity,
    pub stranger: AuthIdentity,
}

pub(crate) async fn harness() -> Harness {
    harness_with(|_| {}).await
}

pub(crate) async fn harness_with(configure: impl FnOnce(&mut SoliConfig)) -> Harness {
    let service = SoliService::new_local(":memory:").await.unwrap();
    let revalidator = Arc::new(RecordingRevalidator::default());

    let mut config = SoliConfig::default();
    config.files.thumbnail_command = "soliloan-test-no-thumbnailer".to_string();
    configure(&mut config);

    let manager = identity(&service, "mara@example.com", "Mara Vogel").await;
    let viewer = identity(&service, "viktor@example.com", "Viktor Lang").await;
    let stranger = identity(&service, "sasha@example.com", "Sasha Kim").await;

    let actions = Actions::new(service, config, revalidator.clone());
    Harness {
        actions,
        revalidator,
        manager,
        viewer,
        stranger,
    }
}

async fn identity(svc: &SoliService, email: &str, name: &str) -> AuthIdentity {
    let user = svc.create_user(email, name).await.unwrap();
    AuthIdentity {
        user_id: user.id,
        email: user.email,
        name: user.name,
    }
}

impl Harness {
    /// Project with a configuration, `manager` as manager and `viewer` as
    /// viewer. `stranger` stays outside.
    pub async fn seed_project(&self, slug: &str, name: &str) -> Project {
        let svc = self.actions.service();
        let project = svc.create_project(slug, name).await.unwrap();
        svc.create_configuration(&project.id, name).await.unwrap();
        svc.add_member(&project.id, &self.manager.user_id, ProjectRole::Manager)
            .await
            .unwrap();
        svc.add_member(&project.id, &self.viewer.user_id, ProjectRole::Viewer)
            .await
            .unwrap();
        project
    }

    pub async fn seed_lender(&self, project_id: &str) -> Lender {
        self.actions
            .service()
            .create_lender(&LenderCreateInput {
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

    pub async fn seed_loan(&self, lender_id: &str) -> Loan {
        self.actions
            .service()
            .create_loan(&LoanCreateInput {
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
