//! Action error types and their translation keys.
//!
//! Every error an action can surface maps to a dotted translation key
//! (e.g. `error.loan.notFound`) so transports can serve a localized
//! message without matching on variants themselves.

use soli_core::enums::EntityType;
use soli_db::error::DatabaseError;
use thiserror::Error;

use crate::locale;

/// Errors surfaced by server actions.
#[derive(Debug, Error)]
pub enum ActionError {
    /// No authenticated identity was supplied.
    #[error("authentication required")]
    AuthRequired,

    /// The caller is not allowed to perform this operation.
    #[error("operation not permitted")]
    Forbidden,

    /// Entity lookup returned no row.
    #[error("{} {id} not found", entity.as_str())]
    NotFound { entity: EntityType, id: String },

    /// Input failed schema or domain validation.
    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// Another project already uses this slug.
    #[error("slug already taken: {0}")]
    SlugTaken(String),

    /// Underlying database failure.
    #[error(transparent)]
    Database(#[from] DatabaseError),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ActionError {
    /// Shorthand for a `NotFound` error.
    #[must_use]
    pub fn not_found(entity: EntityType, id: &str) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Translation key for this error.
    #[must_use]
    pub fn key(&self) -> String {
        match self {
            Self::AuthRequired => "error.auth.required".to_string(),
            Self::Forbidden => "error.auth.forbidden".to_string(),
            Self::NotFound { entity, .. } => format!("error.{}.notFound", entity.as_str()),
            Self::Validation(_) => "error.validation.failed".to_string(),
            Self::SlugTaken(_) => "error.project.slugTaken".to_string(),
            Self::Database(_) | Self::Other(_) => "error.generic".to_string(),
        }
    }

    /// Human-readable message for this error, resolved from the locale
    /// catalog via [`key`](Self::key).
    #[must_use]
    pub fn localized_message(&self) -> String {
        locale::message(&self.key())
    }
}
