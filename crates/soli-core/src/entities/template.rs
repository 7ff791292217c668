use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::TemplateKind;

/// A document or email template whose body contains merge tags.
///
/// At most one template per configuration+kind may have `is_default` set;
/// the set-default action clears the previous holder.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CommunicationTemplate {
    pub id: String,
    pub configuration_id: String,
    pub kind: TemplateKind,
    pub name: String,
    /// Subject line; only meaningful for `TemplateKind::Email`.
    pub subject: Option<String>,
    /// Merge-tag text, e.g. `"Dear {{lender.name}}, ..."`.
    pub body: String,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
