use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::ViewKind;
use crate::viewstate::{ColumnVisibility, FilterClause, SortSpec};

/// A saved table configuration, owned by a single user.
///
/// At most one view per user and kind may have `is_default` set; marking a
/// view as default clears the flag on the previous holder.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct SavedView {
    pub id: String,
    pub user_id: String,
    pub kind: ViewKind,
    pub name: String,
    pub is_default: bool,
    pub sort: Option<SortSpec>,
    pub filters: Vec<FilterClause>,
    pub columns: ColumnVisibility,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
