//! Bearer-session authentication.
//!
//! Resolves `Authorization: Bearer <token>` against the sessions table and
//! stores the resulting [`AuthIdentity`] in the request extensions for
//! handlers to pick up. Token issuance lives outside this system; the
//! middleware only consumes stored sessions and rejects expired ones.

use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use soli_actions::error::ActionError;
use soli_core::identity::AuthIdentity;

use crate::AppState;
use crate::error::ApiError;

pub async fn require_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(token) = bearer_token(&req) else {
        return ApiError::from(ActionError::AuthRequired).into_response();
    };

    match state.actions().service().user_for_session(&token).await {
        Ok(Some(user)) => {
            req.extensions_mut().insert(AuthIdentity {
                user_id: user.id,
                email: user.email,
                name: user.name,
            });
            next.run(req).await
        }
        Ok(None) => ApiError::from(ActionError::AuthRequired).into_response(),
        Err(e) => ApiError::from(ActionError::from(e)).into_response(),
    }
}

fn bearer_token(req: &Request) -> Option<String> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_string)
}
