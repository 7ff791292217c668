//! Loan routes.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde_json::Value;

use soli_core::entities::Loan;
use soli_core::identity::AuthIdentity;

use crate::AppState;
use crate::error::ApiError;
use crate::handlers::{body_with_id, limit_param};

pub async fn list_for_lender(
    State(state): State<AppState>,
    Extension(who): Extension<AuthIdentity>,
    Path(lender_id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<Loan>>, ApiError> {
    let limit = limit_param(&params)?;
    Ok(Json(
        state
            .actions()
            .list_loans_for_lender(&who, &lender_id, limit)
            .await?,
    ))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(who): Extension<AuthIdentity>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Loan>), ApiError> {
    let loan = state.actions().create_loan(&who, body).await?;
    Ok((StatusCode::CREATED, Json(loan)))
}

pub async fn get(
    State(state): State<AppState>,
    Extension(who): Extension<AuthIdentity>,
    Path(id): Path<String>,
) -> Result<Json<Loan>, ApiError> {
    Ok(Json(state.actions().get_loan(&who, &id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(who): Extension<AuthIdentity>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Loan>, ApiError> {
    let body = body_with_id(body, "loan_id", &id);
    Ok(Json(state.actions().update_loan(&who, body).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(who): Extension<AuthIdentity>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.actions().delete_loan(&who, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
