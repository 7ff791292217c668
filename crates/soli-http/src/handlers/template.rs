//! Communication template routes, the render endpoint, and the merge-tag
//! catalog the template editor queries.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde_json::Value;

use soli_core::entities::CommunicationTemplate;
use soli_core::identity::AuthIdentity;
use soli_core::responses::RenderedTemplate;
use soli_template::{MergeTagGroup, merge_tag_catalog};

use crate::AppState;
use crate::error::ApiError;
use crate::handlers::{body_with_id, require_param};

pub async fn list(
    State(state): State<AppState>,
    Extension(who): Extension<AuthIdentity>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<CommunicationTemplate>>, ApiError> {
    let configuration_id = require_param(&params, "configuration_id")?;
    Ok(Json(
        state.actions().list_templates(&who, configuration_id).await?,
    ))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(who): Extension<AuthIdentity>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<CommunicationTemplate>), ApiError> {
    let template = state.actions().create_template(&who, body).await?;
    Ok((StatusCode::CREATED, Json(template)))
}

pub async fn get(
    State(state): State<AppState>,
    Extension(who): Extension<AuthIdentity>,
    Path(id): Path<String>,
) -> Result<Json<CommunicationTemplate>, ApiError> {
    Ok(Json(state.actions().get_template(&who, &id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(who): Extension<AuthIdentity>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<CommunicationTemplate>, ApiError> {
    let body = body_with_id(body, "template_id", &id);
    Ok(Json(state.actions().update_template(&who, body).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(who): Extension<AuthIdentity>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.actions().delete_template(&who, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn set_default(
    State(state): State<AppState>,
    Extension(who): Extension<AuthIdentity>,
    Path(id): Path<String>,
) -> Result<Json<CommunicationTemplate>, ApiError> {
    Ok(Json(state.actions().set_default_template(&who, &id).await?))
}

pub async fn render(
    State(state): State<AppState>,
    Extension(who): Extension<AuthIdentity>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<RenderedTemplate>, ApiError> {
    let body = body_with_id(body, "template_id", &id);
    Ok(Json(state.actions().render_template(&who, body).await?))
}

/// The fixed tag catalog. Static data, but kept behind authentication like
/// the rest of the API.
pub async fn merge_tags() -> Json<Vec<MergeTagGroup>> {
    Json(merge_tag_catalog())
}
