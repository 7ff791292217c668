//! Per-request tracing spans.
//!
//! Wraps every request in an `http.request` span carrying method and path,
//! so events emitted by handlers and the error mapper land inside it.

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use tracing::Instrument;

pub async fn request_span(req: Request, next: Next) -> Response {
    let span = tracing::info_span!(
        "http.request",
        method = %req.method(),
        path = %req.uri().path(),
    );
    next.run(req).instrument(span).await
}
