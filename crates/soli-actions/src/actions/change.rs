//! Change-log queries.
//!
//! The trail itself is written by [`crate::Actions`] mutation methods; this
//! module only exposes scoped reads. Entries are immutable once appended.

use soli_core::entities::Change;
use soli_core::enums::EntityType;
use soli_core::identity::AuthIdentity;
use soli_db::repos::change::ChangeFilter;

use crate::Actions;
use crate::error::ActionError;

impl Actions {
    /// Change entries for a project, newest first. The filter's `limit` is
    /// clamped against the configured maximum before the query runs.
    pub async fn list_changes(
        &self,
        who: &AuthIdentity,
        mut filter: ChangeFilter,
    ) -> Result<Vec<Change>, ActionError> {
        let project = self
            .service()
            .get_project(&filter.project_id)
            .await?
            .ok_or_else(|| ActionError::not_found(EntityType::Project, &filter.project_id))?;
        self.require_member(who, &project.id).await?;

        filter.limit = Some(self.config().general.clamp_limit(filter.limit));
        Ok(self.service().query_changes(&filter).await?)
    }
}
