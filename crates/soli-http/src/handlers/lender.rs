//! Lender routes.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde_json::Value;

use soli_core::entities::Lender;
use soli_core::identity::AuthIdentity;

use crate::AppState;
use crate::error::ApiError;
use crate::handlers::{body_with_id, limit_param};

/// Lenders of one project; `q` switches the listing to a full-text search.
pub async fn list_for_project(
    State(state): State<AppState>,
    Extension(who): Extension<AuthIdentity>,
    Path(project_id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<Lender>>, ApiError> {
    let query = params.get("q").map(String::as_str);
    let limit = limit_param(&params)?;
    Ok(Json(
        state
            .actions()
            .list_lenders(&who, &project_id, query, limit)
            .await?,
    ))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(who): Extension<AuthIdentity>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Lender>), ApiError> {
    let lender = state.actions().create_lender(&who, body).await?;
    Ok((StatusCode::CREATED, Json(lender)))
}

pub async fn get(
    State(state): State<AppState>,
    Extension(who): Extension<AuthIdentity>,
    Path(id): Path<String>,
) -> Result<Json<Lender>, ApiError> {
    Ok(Json(state.actions().get_lender(&who, &id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(who): Extension<AuthIdentity>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Lender>, ApiError> {
    let body = body_with_id(body, "lender_id", &id);
    Ok(Json(state.actions().update_lender(&who, body).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(who): Extension<AuthIdentity>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.actions().delete_lender(&who, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
