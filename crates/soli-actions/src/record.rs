//! Change-log recording.
//!
//! Every successful mutation appends one [`Change`] row. Creations store the
//! full entity (nulls stripped) as `after`, deletions store it as `before`,
//! and updates store only the fields whose value differs. `updated_at`
//! churns on every write and is excluded from diffs.

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use soli_core::audit::{changed_fields, strip_null_fields};
use soli_core::entities::Change;
use soli_core::enums::{ChangeAction, EntityType};
use soli_core::identity::AuthIdentity;
use soli_core::ids::PREFIX_CHANGE;

use crate::Actions;
use crate::error::ActionError;

const VOLATILE_FIELDS: &[&str] = &["updated_at"];

fn without_volatile(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .filter(|(key, _)| !VOLATILE_FIELDS.contains(&key.as_str()))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        ),
        other => other.clone(),
    }
}

fn to_json<T: Serialize>(entity: &T) -> Result<Value, ActionError> {
    serde_json::to_value(entity).map_err(|e| ActionError::Other(e.into()))
}

impl Actions {
    pub(crate) async fn record_created<T: Serialize>(
        &self,
        who: &AuthIdentity,
        project_id: &str,
        entity_type: EntityType,
        entity_id: &str,
        entity: &T,
        context: Value,
    ) -> Result<(), ActionError> {
        let after = strip_null_fields(&without_volatile(&to_json(entity)?));
        self.append(
            who,
            project_id,
            entity_type,
            entity_id,
            ChangeAction::Created,
            (None, Some(after)),
            context,
        )
        .await
    }

    /// Diffs the two states and appends an update entry. A mutation whose
    /// serialized fields all come out equal appends nothing.
    pub(crate) async fn record_updated<T: Serialize>(
        &self,
        who: &AuthIdentity,
        project_id: &str,
        entity_type: EntityType,
        entity_id: &str,
        states: (&T, &T),
        context: Value,
    ) -> Result<(), ActionError> {
        let (before, after) = states;
        let diff = changed_fields(
            &without_volatile(&to_json(before)?),
            &without_volatile(&to_json(after)?),
        );
        if diff.is_empty() {
            return Ok(());
        }
        self.append(
            who,
            project_id,
            entity_type,
            entity_id,
            ChangeAction::Updated,
            diff.into_values(),
            context,
        )
        .await
    }

    pub(crate) async fn record_deleted<T: Serialize>(
        &self,
        who: &AuthIdentity,
        project_id: &str,
        entity_type: EntityType,
        entity_id: &str,
        entity: &T,
        context: Value,
    ) -> Result<(), ActionError> {
        let before = strip_null_fields(&without_volatile(&to_json(entity)?));
        self.append(
            who,
            project_id,
            entity_type,
            entity_id,
            ChangeAction::Deleted,
            (Some(before), None),
            context,
        )
        .await
    }

    #[allow(clippy::too_many_arguments)]
    async fn append(
        &self,
        who: &AuthIdentity,
        project_id: &str,
        entity_type: EntityType,
        entity_id: &str,
        action: ChangeAction,
        fields: (Option<Value>, Option<Value>),
        context: Value,
    ) -> Result<(), ActionError> {
        let (before, after) = fields;
        let entry = Change {
            id: self.service().db().generate_id(PREFIX_CHANGE).await?,
            project_id: project_id.to_string(),
            entity_type,
            entity_id: entity_id.to_string(),
            action,
            user_id: who.user_id.clone(),
            before,
            after,
            context: Some(context),
            created_at: Utc::now(),
        };
        self.service().append_change(&entry).await?;
        Ok(())
    }
}
