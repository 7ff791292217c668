//! Transaction routes.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde_json::Value;

use soli_core::entities::Transaction;
use soli_core::identity::AuthIdentity;

use crate::AppState;
use crate::error::ApiError;
use crate::handlers::{body_with_id, limit_param};

pub async fn list_for_loan(
    State(state): State<AppState>,
    Extension(who): Extension<AuthIdentity>,
    Path(loan_id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<Transaction>>, ApiError> {
    let limit = limit_param(&params)?;
    Ok(Json(
        state
            .actions()
            .list_transactions(&who, &loan_id, limit)
            .await?,
    ))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(who): Extension<AuthIdentity>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Transaction>), ApiError> {
    let transaction = state.actions().create_transaction(&who, body).await?;
    Ok((StatusCode::CREATED, Json(transaction)))
}

pub async fn get(
    State(state): State<AppState>,
    Extension(who): Extension<AuthIdentity>,
    Path(id): Path<String>,
) -> Result<Json<Transaction>, ApiError> {
    Ok(Json(state.actions().get_transaction(&who, &id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(who): Extension<AuthIdentity>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Transaction>, ApiError> {
    let body = body_with_id(body, "transaction_id", &id);
    Ok(Json(state.actions().update_transaction(&who, body).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(who): Extension<AuthIdentity>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.actions().delete_transaction(&who, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
