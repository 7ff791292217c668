//! `ActionError` to HTTP response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use soli_actions::error::ActionError;

/// Wraps an [`ActionError`] so handlers can bubble it with `?`. Responses
/// carry the JSON contract `{"error": {"key": ..., "message": ...}}` next to
/// the mapped status code.
pub struct ApiError(ActionError);

impl From<ActionError> for ApiError {
    fn from(err: ActionError) -> Self {
        Self(err)
    }
}

impl ApiError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self.0 {
            ActionError::AuthRequired => StatusCode::UNAUTHORIZED,
            ActionError::Forbidden => StatusCode::FORBIDDEN,
            ActionError::NotFound { .. } => StatusCode::NOT_FOUND,
            ActionError::Validation(_) | ActionError::SlugTaken(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ActionError::Database(_) | ActionError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self.0, "request failed");
        }
        let body = Json(json!({
            "error": {
                "key": self.0.key(),
                "message": self.0.localized_message(),
            }
        }));
        (status, body).into_response()
    }
}
