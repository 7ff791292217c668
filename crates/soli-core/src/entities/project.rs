use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::ProjectRole;

/// A tenant. Everything below (lenders, loans, templates, changes) is scoped
/// to exactly one project.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Project {
    pub id: String,
    /// URL-safe identifier, unique across all projects. Uniqueness is
    /// enforced by an existence check in the create action, not the schema.
    pub slug: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Links a user to a project with a role.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ProjectMember {
    pub project_id: String,
    pub user_id: String,
    pub role: ProjectRole,
    pub created_at: DateTime<Utc>,
}
