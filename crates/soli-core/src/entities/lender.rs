use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A person or organisation that has extended one or more loans within a
/// project.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Lender {
    pub id: String,
    pub project_id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    /// Normalized (no spaces, uppercase); validated by `iban::validate`
    /// in the create/update actions when present.
    pub iban: Option<String>,
    pub street: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
