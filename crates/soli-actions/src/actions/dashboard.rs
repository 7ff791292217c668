//! Dashboard summary.

use soli_core::enums::EntityType;
use soli_core::identity::AuthIdentity;
use soli_core::responses::DashboardSummary;

use crate::Actions;
use crate::error::ActionError;

impl Actions {
    /// Financial summary for one project. Read-only, so any member may ask.
    pub async fn dashboard_summary(
        &self,
        who: &AuthIdentity,
        project_id: &str,
    ) -> Result<DashboardSummary, ActionError> {
        let project = self
            .service()
            .get_project(project_id)
            .await?
            .ok_or_else(|| ActionError::not_found(EntityType::Project, project_id))?;
        self.require_member(who, &project.id).await?;

        Ok(self.service().dashboard_summary(&project.id).await?)
    }
}
