//! Project and membership repository.

use chrono::Utc;

use soli_core::entities::{Project, ProjectMember};
use soli_core::enums::ProjectRole;
use soli_core::ids::PREFIX_PROJECT;

use crate::error::DatabaseError;
use crate::helpers::{parse_datetime, parse_enum};
use crate::service::SoliService;
use crate::updates::project::ProjectUpdate;

const SELECT_COLS: &str = "id, slug, name, created_at, updated_at";

fn row_to_project(row: &libsql::Row) -> Result<Project, DatabaseError> {
    Ok(Project {
        id: row.get(0)?,
        slug: row.get(1)?,
        name: row.get(2)?,
        created_at: parse_datetime(&row.get::<String>(3)?)?,
        updated_at: parse_datetime(&row.get::<String>(4)?)?,
    })
}

const MEMBER_COLS: &str = "project_id, user_id, role, created_at";

fn row_to_member(row: &libsql::Row) -> Result<ProjectMember, DatabaseError> {
    Ok(ProjectMember {
        project_id: row.get(0)?,
        user_id: row.get(1)?,
        role: parse_enum(&row.get::<String>(2)?)?,
        created_at: parse_datetime(&row.get::<String>(3)?)?,
    })
}

impl SoliService {
    pub async fn create_project(&self, slug: &str, name: &str) -> Result<Project, DatabaseError> {
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_PROJECT).await?;

        self.db()
            .conn()
            .execute(
                &format!("INSERT INTO projects ({SELECT_COLS}) VALUES (?1, ?2, ?3, ?4, ?5)"),
                libsql::params![
                    id.as_str(),
                    slug,
                    name,
                    now.to_rfc3339(),
                    now.to_rfc3339()
                ],
            )
            .await?;

        Ok(Project {
            id,
            slug: slug.to_string(),
            name: name.to_string(),
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn get_project(&self, id: &str) -> Result<Option<Project>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM projects WHERE id = ?1"),
                [id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_project(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn get_project_by_slug(&self, slug: &str) -> Result<Option<Project>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM projects WHERE slug = ?1"),
                [slug],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_project(&row)?)),
            None => Ok(None),
        }
    }

    /// Projects the user is a member of, in any role, ordered by name.
    pub async fn list_projects_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<Project>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT p.id, p.slug, p.name, p.created_at, p.updated_at
                 FROM projects p
                 JOIN project_members m ON m.project_id = p.id
                 WHERE m.user_id = ?1
                 ORDER BY p.name",
                [user_id],
            )
            .await?;
        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(row_to_project(&row)?);
        }
        Ok(results)
    }

    pub async fn update_project(
        &self,
        id: &str,
        update: ProjectUpdate,
    ) -> Result<Option<Project>, DatabaseError> {
        let mut sets = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        let mut idx = 1usize;

        if let Some(ref name) = update.name {
            sets.push(format!("name = ?{idx}"));
            params.push(name.clone().into());
            idx += 1;
        }
        if let Some(ref slug) = update.slug {
            sets.push(format!("slug = ?{idx}"));
            params.push(slug.clone().into());
            idx += 1;
        }

        if sets.is_empty() {
            return self.get_project(id).await;
        }

        sets.push(format!("updated_at = ?{idx}"));
        params.push(Utc::now().to_rfc3339().into());
        idx += 1;

        params.push(id.into());
        let sql = format!("UPDATE projects SET {} WHERE id = ?{idx}", sets.join(", "));
        self.db()
            .conn()
            .execute(&sql, libsql::params_from_iter(params))
            .await?;

        self.get_project(id).await
    }

    pub async fn delete_project(&self, id: &str) -> Result<(), DatabaseError> {
        self.db()
            .conn()
            .execute("DELETE FROM projects WHERE id = ?1", [id])
            .await?;
        Ok(())
    }

    /// Add a member or change an existing member's role.
    pub async fn add_member(
        &self,
        project_id: &str,
        user_id: &str,
        role: ProjectRole,
    ) -> Result<ProjectMember, DatabaseError> {
        let now = Utc::now();
        self.db()
            .conn()
            .execute(
                "INSERT INTO project_members (project_id, user_id, role, created_at)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(project_id, user_id) DO UPDATE SET role = ?3",
                libsql::params![project_id, user_id, role.as_str(), now.to_rfc3339()],
            )
            .await?;

        Ok(ProjectMember {
            project_id: project_id.to_string(),
            user_id: user_id.to_string(),
            role,
            created_at: now,
        })
    }

    pub async fn remove_member(
        &self,
        project_id: &str,
        user_id: &str,
    ) -> Result<(), DatabaseError> {
        self.db()
            .conn()
            .execute(
                "DELETE FROM project_members WHERE project_id = ?1 AND user_id = ?2",
                libsql::params![project_id, user_id],
            )
            .await?;
        Ok(())
    }

    /// The user's role in the project, or `None` if they are not a member.
    pub async fn member_role(
        &self,
        project_id: &str,
        user_id: &str,
    ) -> Result<Option<ProjectRole>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT role FROM project_members WHERE project_id = ?1 AND user_id = ?2",
                libsql::params![project_id, user_id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(parse_enum(&row.get::<String>(0)?)?)),
            None => Ok(None),
        }
    }

    pub async fn list_members(
        &self,
        project_id: &str,
    ) -> Result<Vec<ProjectMember>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {MEMBER_COLS} FROM project_members
                     WHERE project_id = ?1 ORDER BY created_at"
                ),
                [project_id],
            )
            .await?;
        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(row_to_member(&row)?);
        }
        Ok(results)
    }
}
