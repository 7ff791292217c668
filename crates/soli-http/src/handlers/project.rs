//! Project routes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde_json::Value;

use soli_core::entities::Project;
use soli_core::identity::AuthIdentity;

use crate::AppState;
use crate::error::ApiError;
use crate::handlers::body_with_id;

pub async fn list(
    State(state): State<AppState>,
    Extension(who): Extension<AuthIdentity>,
) -> Result<Json<Vec<Project>>, ApiError> {
    Ok(Json(state.actions().list_projects(&who).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(who): Extension<AuthIdentity>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Project>), ApiError> {
    let project = state.actions().create_project(&who, body).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

pub async fn get(
    State(state): State<AppState>,
    Extension(who): Extension<AuthIdentity>,
    Path(id): Path<String>,
) -> Result<Json<Project>, ApiError> {
    Ok(Json(state.actions().get_project(&who, &id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(who): Extension<AuthIdentity>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Project>, ApiError> {
    let body = body_with_id(body, "project_id", &id);
    Ok(Json(state.actions().update_project(&who, body).await?))
}
