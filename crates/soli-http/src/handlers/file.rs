//! File routes, including stored-blob download and thumbnail serving.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use serde_json::Value;

use soli_actions::error::ActionError;
use soli_config::SoliConfig;
use soli_core::entities::FileRecord;
use soli_core::enums::EntityType;
use soli_core::identity::AuthIdentity;

use crate::AppState;
use crate::error::ApiError;

pub async fn list_for_loan(
    State(state): State<AppState>,
    Extension(who): Extension<AuthIdentity>,
    Path(loan_id): Path<String>,
) -> Result<Json<Vec<FileRecord>>, ApiError> {
    Ok(Json(state.actions().list_files(&who, &loan_id).await?))
}

pub async fn register(
    State(state): State<AppState>,
    Extension(who): Extension<AuthIdentity>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<FileRecord>), ApiError> {
    let file = state.actions().register_file(&who, body).await?;
    Ok((StatusCode::CREATED, Json(file)))
}

pub async fn get(
    State(state): State<AppState>,
    Extension(who): Extension<AuthIdentity>,
    Path(id): Path<String>,
) -> Result<Json<FileRecord>, ApiError> {
    Ok(Json(state.actions().get_file(&who, &id).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(who): Extension<AuthIdentity>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.actions().delete_file(&who, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Serve the stored bytes with the registered MIME type.
pub async fn download(
    State(state): State<AppState>,
    Extension(who): Extension<AuthIdentity>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let file = state.actions().get_file(&who, &id).await?;
    let bytes = read_blob(state.actions().config(), &file.storage_path, &file.id).await?;
    Ok(blob_response(&file.mime_type, Some(&file.file_name), bytes))
}

/// Serve the generated thumbnail. Files without one report not-found, the
/// same as files whose blob is gone.
pub async fn thumbnail(
    State(state): State<AppState>,
    Extension(who): Extension<AuthIdentity>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let file = state.actions().get_file(&who, &id).await?;
    let Some(ref thumbnail_path) = file.thumbnail_path else {
        return Err(ActionError::not_found(EntityType::File, &file.id).into());
    };
    let bytes = read_blob(state.actions().config(), thumbnail_path, &file.id).await?;
    Ok(blob_response("image/png", None, bytes))
}

/// Relative storage paths are resolved against the configured storage
/// directory; absolute paths are used as stored.
fn blob_path(config: &SoliConfig, stored: &str) -> std::path::PathBuf {
    let path = std::path::Path::new(stored);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::path::Path::new(&config.files.storage_dir).join(path)
    }
}

async fn read_blob(
    config: &SoliConfig,
    stored: &str,
    file_id: &str,
) -> Result<Vec<u8>, ActionError> {
    let path = blob_path(config, stored);
    match tokio::fs::read(&path).await {
        Ok(bytes) => Ok(bytes),
        Err(e) => {
            tracing::warn!(file_id = %file_id, path = %path.display(), error = %e, "stored blob unreadable");
            Err(ActionError::not_found(EntityType::File, file_id))
        }
    }
}

fn blob_response(mime: &str, attachment: Option<&str>, bytes: Vec<u8>) -> Response {
    let mut headers = HeaderMap::new();
    let content_type = HeaderValue::from_str(mime)
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));
    headers.insert(header::CONTENT_TYPE, content_type);
    if let Some(name) = attachment {
        if let Ok(value) = HeaderValue::from_str(&format!("attachment; filename=\"{name}\"")) {
            headers.insert(header::CONTENT_DISPOSITION, value);
        }
    }
    (headers, bytes).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn relative_paths_resolve_against_storage_dir() {
        let mut config = SoliConfig::default();
        config.files.storage_dir = "/srv/soliloan/uploads".to_string();

        let resolved = blob_path(&config, "ldr-1/vertrag.pdf");
        assert_eq!(
            resolved,
            std::path::PathBuf::from("/srv/soliloan/uploads/ldr-1/vertrag.pdf")
        );

        let absolute = blob_path(&config, "/tmp/elsewhere.pdf");
        assert_eq!(absolute, std::path::PathBuf::from("/tmp/elsewhere.pdf"));
    }

    #[test]
    fn invalid_mime_falls_back_to_octet_stream() {
        let response = blob_response("not a\nmime", None, vec![1, 2, 3]);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/octet-stream"
        );
    }
}
