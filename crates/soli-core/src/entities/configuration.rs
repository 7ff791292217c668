use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::InterestMethod;

/// Per-project settings, attached one-to-one to a Project.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Configuration {
    pub id: String,
    pub project_id: String,
    /// Branding name shown on rendered documents and emails.
    pub display_name: String,
    /// Branding accent, `#rrggbb`.
    pub primary_color: String,
    pub interest_method: InterestMethod,
    /// Loan fields the UI must require on create, e.g. `["end_date"]`.
    pub required_loan_fields: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
