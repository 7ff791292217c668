//! Dashboard route.

use axum::extract::{Path, State};
use axum::{Extension, Json};

use soli_core::identity::AuthIdentity;
use soli_core::responses::DashboardSummary;

use crate::AppState;
use crate::error::ApiError;

pub async fn summary(
    State(state): State<AppState>,
    Extension(who): Extension<AuthIdentity>,
    Path(project_id): Path<String>,
) -> Result<Json<DashboardSummary>, ApiError> {
    Ok(Json(
        state.actions().dashboard_summary(&who, &project_id).await?,
    ))
}
