//! Action input payloads.
//!
//! Every payload-carrying action deserializes its JSON input into one of
//! these structs after the schema registry has validated it. Update inputs
//! distinguish "leave untouched" (field absent, outer `None`) from "clear"
//! (explicit `null`, `Some(None)`) on nullable columns; [`double_option`]
//! keeps that distinction through serde.

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

use crate::enums::{InterestMethod, LoanStatus, TemplateKind, TransactionKind, ViewKind};
use crate::viewstate::{ColumnVisibility, FilterClause, SortSpec};

/// Maps an explicitly-present JSON value (including `null`) to `Some(..)`,
/// leaving absent fields as the outer `None` via `#[serde(default)]`.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

// ---- Project ----

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ProjectCreateInput {
    /// URL-safe identifier, unique across all projects.
    pub slug: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ProjectUpdateInput {
    pub project_id: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Re-checked for uniqueness when changed.
    #[serde(default)]
    pub slug: Option<String>,
}

// ---- Configuration ----

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ConfigurationUpdateInput {
    pub project_id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub primary_color: Option<String>,
    #[serde(default)]
    pub interest_method: Option<InterestMethod>,
    #[serde(default)]
    pub required_loan_fields: Option<Vec<String>>,
}

// ---- Lender ----

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct LenderCreateInput {
    pub project_id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    /// Validated and normalized when present.
    #[serde(default)]
    pub iban: Option<String>,
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct LenderUpdateInput {
    pub lender_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub iban: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub street: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub postal_code: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub city: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub country: Option<Option<String>>,
}

// ---- Loan ----

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct LoanCreateInput {
    pub lender_id: String,
    pub name: String,
    pub principal_cents: i64,
    /// Annual rate in percent.
    pub interest_rate: f64,
    #[serde(default)]
    pub interest_method: Option<InterestMethod>,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Defaults to `active` when absent.
    #[serde(default)]
    pub status: Option<LoanStatus>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct LoanUpdateInput {
    pub loan_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub principal_cents: Option<i64>,
    #[serde(default)]
    pub interest_rate: Option<f64>,
    #[serde(default, deserialize_with = "double_option")]
    pub interest_method: Option<Option<InterestMethod>>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "double_option")]
    pub end_date: Option<Option<NaiveDate>>,
    #[serde(default)]
    pub status: Option<LoanStatus>,
}

// ---- Transaction ----

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TransactionCreateInput {
    pub loan_id: String,
    pub kind: TransactionKind,
    pub amount_cents: i64,
    pub booked_at: NaiveDate,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TransactionUpdateInput {
    pub transaction_id: String,
    #[serde(default)]
    pub kind: Option<TransactionKind>,
    #[serde(default)]
    pub amount_cents: Option<i64>,
    #[serde(default)]
    pub booked_at: Option<NaiveDate>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
}

// ---- Note ----

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NoteCreateInput {
    pub loan_id: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NoteUpdateInput {
    pub note_id: String,
    pub content: String,
}

// ---- File ----

/// Registers metadata for a file whose bytes are already on disk; storage
/// itself is handled by the caller.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct FileRegisterInput {
    pub loan_id: String,
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub storage_path: String,
}

// ---- CommunicationTemplate ----

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TemplateCreateInput {
    pub configuration_id: String,
    pub kind: TemplateKind,
    pub name: String,
    /// Email templates only.
    #[serde(default)]
    pub subject: Option<String>,
    pub body: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TemplateUpdateInput {
    pub template_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub subject: Option<Option<String>>,
    #[serde(default)]
    pub body: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TemplateRenderInput {
    pub template_id: String,
    pub loan_id: String,
}

// ---- SavedView ----

/// Create when `id` is absent, update otherwise.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ViewSaveInput {
    #[serde(default)]
    pub id: Option<String>,
    pub kind: ViewKind,
    pub name: String,
    #[serde(default)]
    pub sort: Option<SortSpec>,
    #[serde(default)]
    pub filters: Option<Vec<FilterClause>>,
    #[serde(default)]
    pub columns: Option<ColumnVisibility>,
}
