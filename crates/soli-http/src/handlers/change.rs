//! Change-log route.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::{Extension, Json};

use soli_core::entities::Change;
use soli_core::identity::AuthIdentity;
use soli_db::repos::change::ChangeFilter;

use crate::AppState;
use crate::error::ApiError;
use crate::handlers::{enum_param, limit_param};

pub async fn list(
    State(state): State<AppState>,
    Extension(who): Extension<AuthIdentity>,
    Path(project_id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<Change>>, ApiError> {
    let mut filter = ChangeFilter::for_project(&project_id);
    filter.entity_type = enum_param(&params, "entity_type")?;
    filter.action = enum_param(&params, "action")?;
    filter.entity_id = params.get("entity_id").cloned();
    filter.user_id = params.get("user_id").cloned();
    filter.limit = limit_param(&params)?;

    Ok(Json(state.actions().list_changes(&who, filter).await?))
}
