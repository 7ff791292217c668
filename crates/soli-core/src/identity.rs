use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Lightweight authenticated user identity for cross-crate passing.
///
/// Produced by the HTTP session middleware (or test fixtures), consumed by
/// the action layer. Contains only data fields; session issuance and token
/// lifecycle live outside this system.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AuthIdentity {
    /// ID of the authenticated user (`usr-` prefix).
    pub user_id: String,
    /// Email address, for Change-entry attribution display.
    pub email: String,
    /// Display name.
    pub name: String,
}
