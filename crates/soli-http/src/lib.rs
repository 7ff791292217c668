//! # soli-http
//!
//! The REST surface over the action layer. Every `/api` route runs behind
//! bearer-token session auth; handlers translate HTTP to action calls and
//! action errors back to the JSON error contract.

use std::sync::Arc;

use axum::Router;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post, put};

use soli_actions::Actions;

mod auth;
mod error;
mod handlers;
mod trace;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    actions: Arc<Actions>,
}

impl AppState {
    #[must_use]
    pub fn new(actions: Arc<Actions>) -> Self {
        Self { actions }
    }

    #[must_use]
    pub fn actions(&self) -> &Actions {
        &self.actions
    }
}

/// Assemble the full application router.
///
/// `/healthz` sits outside the auth layer so load balancers can probe
/// without credentials; everything under `/api` requires a session.
#[must_use]
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route(
            "/api/projects",
            get(handlers::project::list).post(handlers::project::create),
        )
        .route(
            "/api/projects/{id}",
            get(handlers::project::get).put(handlers::project::update),
        )
        .route(
            "/api/projects/{id}/configuration",
            get(handlers::configuration::get).put(handlers::configuration::update),
        )
        .route(
            "/api/projects/{id}/lenders",
            get(handlers::lender::list_for_project),
        )
        .route(
            "/api/projects/{id}/dashboard",
            get(handlers::dashboard::summary),
        )
        .route("/api/projects/{id}/changes", get(handlers::change::list))
        .route(
            "/api/projects/{id}/notes",
            get(handlers::note::search_for_project),
        )
        .route("/api/lenders", post(handlers::lender::create))
        .route(
            "/api/lenders/{id}",
            get(handlers::lender::get)
                .put(handlers::lender::update)
                .delete(handlers::lender::delete),
        )
        .route("/api/lenders/{id}/loans", get(handlers::loan::list_for_lender))
        .route("/api/loans", post(handlers::loan::create))
        .route(
            "/api/loans/{id}",
            get(handlers::loan::get)
                .put(handlers::loan::update)
                .delete(handlers::loan::delete),
        )
        .route(
            "/api/loans/{id}/transactions",
            get(handlers::transaction::list_for_loan),
        )
        .route("/api/loans/{id}/notes", get(handlers::note::list_for_loan))
        .route("/api/loans/{id}/files", get(handlers::file::list_for_loan))
        .route("/api/transactions", post(handlers::transaction::create))
        .route(
            "/api/transactions/{id}",
            get(handlers::transaction::get)
                .put(handlers::transaction::update)
                .delete(handlers::transaction::delete),
        )
        .route("/api/notes", post(handlers::note::create))
        .route(
            "/api/notes/{id}",
            put(handlers::note::update).delete(handlers::note::delete),
        )
        .route("/api/files", post(handlers::file::register))
        .route(
            "/api/files/{id}",
            get(handlers::file::get).delete(handlers::file::delete),
        )
        .route("/api/files/{id}/download", get(handlers::file::download))
        .route("/api/files/{id}/thumbnail", get(handlers::file::thumbnail))
        .route(
            "/api/templates",
            get(handlers::template::list).post(handlers::template::create),
        )
        .route(
            "/api/templates/{id}",
            get(handlers::template::get)
                .put(handlers::template::update)
                .delete(handlers::template::delete),
        )
        .route(
            "/api/templates/{id}/default",
            post(handlers::template::set_default),
        )
        .route(
            "/api/templates/{id}/render",
            post(handlers::template::render),
        )
        .route("/api/merge-tags", get(handlers::template::merge_tags))
        .route(
            "/api/views",
            get(handlers::view::list).post(handlers::view::save),
        )
        .route(
            "/api/views/{id}",
            put(handlers::view::update).delete(handlers::view::delete),
        )
        .route("/api/views/{id}/default", post(handlers::view::set_default))
        .layer(from_fn_with_state(state.clone(), auth::require_session))
        .layer(from_fn(trace::request_span));

    Router::new()
        .route("/healthz", get(handlers::healthz))
        .merge(api)
        .with_state(state)
}
