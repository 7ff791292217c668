//! Table view state and its URL codec.
//!
//! Saved views persist sort/filter/column-visibility settings. The same
//! values also round-trip through URL query parameters; compound values are
//! base64url-encoded JSON (no padding) so they survive the embedding
//! framework's query handling without escaping issues.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::collections::BTreeMap;
use thiserror::Error;

/// Decoded tokens above this size are rejected outright.
pub const MAX_STATE_BYTES: usize = 4096;

/// Errors from encoding or decoding view-state tokens.
#[derive(Debug, Error)]
pub enum ViewStateError {
    #[error("view state token exceeds {MAX_STATE_BYTES} bytes")]
    TooLong,

    #[error("view state token is not valid base64: {0}")]
    InvalidBase64(String),

    #[error("view state token is not valid JSON: {0}")]
    InvalidJson(String),
}

// ---------------------------------------------------------------------------
// State value types
// ---------------------------------------------------------------------------

/// Sort direction for a table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// One column the table is sorted by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

/// Comparison operator for a filter clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FilterOp {
    Eq,
    Neq,
    Contains,
    Gt,
    Lt,
}

/// One column filter. The value is free-form JSON since columns carry
/// strings, numbers, and enums alike.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FilterClause {
    pub field: String,
    pub op: FilterOp,
    pub value: serde_json::Value,
}

/// Column id → visible. Columns absent from the map use the UI default.
pub type ColumnVisibility = BTreeMap<String, bool>;

// ---------------------------------------------------------------------------
// Codec
// ---------------------------------------------------------------------------

/// Encode a state value as a base64url JSON token.
///
/// # Errors
///
/// Returns `ViewStateError::InvalidJson` if serialization fails (not expected
/// for the types in this module).
pub fn encode_state<T: Serialize>(value: &T) -> Result<String, ViewStateError> {
    let bytes =
        serde_json::to_vec(value).map_err(|e| ViewStateError::InvalidJson(e.to_string()))?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}

/// Decode a base64url JSON token produced by [`encode_state`].
///
/// # Errors
///
/// Returns `ViewStateError` if the token is oversized, not base64, or does
/// not deserialize into `T`.
pub fn decode_state<T: DeserializeOwned>(token: &str) -> Result<T, ViewStateError> {
    if token.len() > MAX_STATE_BYTES {
        return Err(ViewStateError::TooLong);
    }
    let bytes = URL_SAFE_NO_PAD
        .decode(token)
        .map_err(|e| ViewStateError::InvalidBase64(e.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|e| ViewStateError::InvalidJson(e.to_string()))
}
