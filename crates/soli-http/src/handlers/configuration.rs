//! Project configuration routes.

use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde_json::Value;

use soli_core::entities::Configuration;
use soli_core::identity::AuthIdentity;

use crate::AppState;
use crate::error::ApiError;
use crate::handlers::body_with_id;

pub async fn get(
    State(state): State<AppState>,
    Extension(who): Extension<AuthIdentity>,
    Path(project_id): Path<String>,
) -> Result<Json<Configuration>, ApiError> {
    Ok(Json(
        state.actions().get_configuration(&who, &project_id).await?,
    ))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(who): Extension<AuthIdentity>,
    Path(project_id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Configuration>, ApiError> {
    let body = body_with_id(body, "project_id", &project_id);
    Ok(Json(state.actions().update_configuration(&who, body).await?))
}
