//! Saved-view routes.
//!
//! Table state arrives either structured in the JSON body or, when the
//! client saves straight from a table URL, as base64url tokens in the query
//! string (`sort`, `filters`, `columns`). Tokens win over body fields.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use soli_actions::error::ActionError;
use soli_core::entities::SavedView;
use soli_core::enums::ViewKind;
use soli_core::identity::AuthIdentity;
use soli_core::viewstate::{ColumnVisibility, FilterClause, SortSpec, decode_state};

use crate::AppState;
use crate::error::ApiError;
use crate::handlers::{body_with_id, enum_param};

pub async fn list(
    State(state): State<AppState>,
    Extension(who): Extension<AuthIdentity>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<SavedView>>, ApiError> {
    let kind = required_kind(&params)?;
    Ok(Json(state.actions().list_views(&who, kind).await?))
}

/// Create-or-update, keyed on the input's optional `id`.
pub async fn save(
    State(state): State<AppState>,
    Extension(who): Extension<AuthIdentity>,
    Query(params): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> Result<Json<SavedView>, ApiError> {
    let body = merge_url_state(body, &params)?;
    Ok(Json(state.actions().save_view(&who, body).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(who): Extension<AuthIdentity>,
    Path(id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> Result<Json<SavedView>, ApiError> {
    let body = merge_url_state(body_with_id(body, "id", &id), &params)?;
    Ok(Json(state.actions().save_view(&who, body).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(who): Extension<AuthIdentity>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.actions().delete_view(&who, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn set_default(
    State(state): State<AppState>,
    Extension(who): Extension<AuthIdentity>,
    Path(id): Path<String>,
) -> Result<Json<SavedView>, ApiError> {
    Ok(Json(state.actions().set_default_view(&who, &id).await?))
}

fn required_kind(params: &HashMap<String, String>) -> Result<ViewKind, ActionError> {
    enum_param(params, "kind")?.ok_or_else(|| {
        ActionError::Validation(vec!["kind query parameter is required".to_string()])
    })
}

fn merge_url_state(
    mut body: Value,
    params: &HashMap<String, String>,
) -> Result<Value, ActionError> {
    let Value::Object(ref mut map) = body else {
        return Ok(body);
    };
    if let Some(token) = params.get("sort") {
        map.insert("sort".to_string(), decoded::<SortSpec>(token, "sort")?);
    }
    if let Some(token) = params.get("filters") {
        map.insert(
            "filters".to_string(),
            decoded::<Vec<FilterClause>>(token, "filters")?,
        );
    }
    if let Some(token) = params.get("columns") {
        map.insert(
            "columns".to_string(),
            decoded::<ColumnVisibility>(token, "columns")?,
        );
    }
    Ok(body)
}

/// Decode one token into the typed state value, then back into plain JSON
/// for schema validation.
fn decoded<T>(token: &str, key: &str) -> Result<Value, ActionError>
where
    T: DeserializeOwned + Serialize,
{
    let value: T =
        decode_state(token).map_err(|e| ActionError::Validation(vec![format!("{key}: {e}")]))?;
    serde_json::to_value(value).map_err(|e| ActionError::Validation(vec![e.to_string()]))
}
