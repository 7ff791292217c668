//! Membership checks shared by all actions.
//!
//! Authorization is project-scoped: a caller must hold a membership row for
//! the project an entity belongs to. Reads accept any role, mutations
//! require a role that can manage.

use soli_core::enums::ProjectRole;
use soli_core::identity::AuthIdentity;

use crate::Actions;
use crate::error::ActionError;

impl Actions {
    /// Require that `who` is a member of the project, returning their role.
    pub(crate) async fn require_member(
        &self,
        who: &AuthIdentity,
        project_id: &str,
    ) -> Result<ProjectRole, ActionError> {
        match self.service().member_role(project_id, &who.user_id).await? {
            Some(role) => Ok(role),
            None => Err(ActionError::Forbidden),
        }
    }

    /// Require a role allowed to mutate project data.
    pub(crate) async fn require_manager(
        &self,
        who: &AuthIdentity,
        project_id: &str,
    ) -> Result<ProjectRole, ActionError> {
        let role = self.require_member(who, project_id).await?;
        if role.can_manage() {
            Ok(role)
        } else {
            Err(ActionError::Forbidden)
        }
    }
}
