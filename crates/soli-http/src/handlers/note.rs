//! Note routes.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde_json::Value;

use soli_core::entities::Note;
use soli_core::identity::AuthIdentity;

use crate::AppState;
use crate::error::ApiError;
use crate::handlers::{body_with_id, limit_param, require_param};

pub async fn list_for_loan(
    State(state): State<AppState>,
    Extension(who): Extension<AuthIdentity>,
    Path(loan_id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<Note>>, ApiError> {
    let limit = limit_param(&params)?;
    Ok(Json(
        state.actions().list_notes(&who, &loan_id, limit).await?,
    ))
}

/// Full-text search across a project's notes.
pub async fn search_for_project(
    State(state): State<AppState>,
    Extension(who): Extension<AuthIdentity>,
    Path(project_id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<Note>>, ApiError> {
    let query = require_param(&params, "q")?;
    let limit = limit_param(&params)?;
    Ok(Json(
        state
            .actions()
            .search_notes(&who, &project_id, query, limit)
            .await?,
    ))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(who): Extension<AuthIdentity>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Note>), ApiError> {
    let note = state.actions().create_note(&who, body).await?;
    Ok((StatusCode::CREATED, Json(note)))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(who): Extension<AuthIdentity>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Note>, ApiError> {
    let body = body_with_id(body, "note_id", &id);
    Ok(Json(state.actions().update_note(&who, body).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(who): Extension<AuthIdentity>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.actions().delete_note(&who, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
