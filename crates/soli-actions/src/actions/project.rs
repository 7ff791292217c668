//! Project actions.

use serde_json::Value;
use soli_core::entities::Project;
use soli_core::enums::{EntityType, ProjectRole};
use soli_core::identity::AuthIdentity;
use soli_core::inputs::{ProjectCreateInput, ProjectUpdateInput};
use soli_db::updates::project::ProjectUpdateBuilder;

use crate::Actions;
use crate::context;
use crate::error::ActionError;

impl Actions {
    /// Create a project together with its configuration, adding the caller
    /// as manager.
    pub async fn create_project(
        &self,
        who: &AuthIdentity,
        input: Value,
    ) -> Result<Project, ActionError> {
        let input: ProjectCreateInput = self.validate_input("project_create", input)?;

        if self
            .service()
            .get_project_by_slug(&input.slug)
            .await?
            .is_some()
        {
            return Err(ActionError::SlugTaken(input.slug));
        }

        let project = self
            .service()
            .create_project(&input.slug, &input.name)
            .await?;
        self.service()
            .create_configuration(&project.id, &project.name)
            .await?;
        self.service()
            .add_member(&project.id, &who.user_id, ProjectRole::Manager)
            .await?;

        self.record_created(
            who,
            &project.id,
            EntityType::Project,
            &project.id,
            &project,
            context::project(&project),
        )
        .await?;
        self.revalidate("/projects");
        Ok(project)
    }

    pub async fn get_project(
        &self,
        who: &AuthIdentity,
        id: &str,
    ) -> Result<Project, ActionError> {
        let project = self
            .service()
            .get_project(id)
            .await?
            .ok_or_else(|| ActionError::not_found(EntityType::Project, id))?;
        self.require_member(who, &project.id).await?;
        Ok(project)
    }

    /// Projects the caller is a member of.
    pub async fn list_projects(&self, who: &AuthIdentity) -> Result<Vec<Project>, ActionError> {
        Ok(self.service().list_projects_for_user(&who.user_id).await?)
    }

    pub async fn update_project(
        &self,
        who: &AuthIdentity,
        input: Value,
    ) -> Result<Project, ActionError> {
        let input: ProjectUpdateInput = self.validate_input("project_update", input)?;
        let before = self
            .service()
            .get_project(&input.project_id)
            .await?
            .ok_or_else(|| ActionError::not_found(EntityType::Project, &input.project_id))?;
        self.require_manager(who, &before.id).await?;

        if let Some(ref slug) = input.slug {
            if slug != &before.slug && self.slug_taken(slug).await? {
                return Err(ActionError::SlugTaken(slug.clone()));
            }
        }

        let mut update = ProjectUpdateBuilder::new();
        if let Some(name) = input.name {
            update = update.name(name);
        }
        if let Some(slug) = input.slug {
            update = update.slug(slug);
        }

        let project = self
            .service()
            .update_project(&before.id, update.build())
            .await?
            .ok_or_else(|| ActionError::not_found(EntityType::Project, &before.id))?;

        self.record_updated(
            who,
            &project.id,
            EntityType::Project,
            &project.id,
            (&before, &project),
            context::project(&project),
        )
        .await?;
        self.revalidate("/projects");
        self.revalidate(&format!("/projects/{}", project.id));
        Ok(project)
    }

    async fn slug_taken(&self, slug: &str) -> Result<bool, ActionError> {
        Ok(self.service().get_project_by_slug(slug).await?.is_some())
    }
}
