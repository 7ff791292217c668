use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::enums::{ChangeAction, EntityType};

/// One audit-trail entry, recorded after every successful mutation.
///
/// `before` and `after` are sparse objects holding only the fields whose
/// serialized value differs between the two sides. For creations `before` is
/// `None`; for deletions `after` is `None`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Change {
    pub id: String,
    pub project_id: String,
    pub entity_type: EntityType,
    pub entity_id: String,
    pub action: ChangeAction,
    /// User that performed the mutation.
    pub user_id: String,
    pub before: Option<Value>,
    pub after: Option<Value>,
    /// Denormalized display context (lender names, loan names, amounts) so
    /// the trail stays readable after the entities themselves are deleted.
    pub context: Option<Value>,
    pub created_at: DateTime<Utc>,
}
