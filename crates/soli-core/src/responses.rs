//! Response payloads assembled by query actions.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Repayment volume for one calendar month.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct MonthlyVolume {
    /// `YYYY-MM`.
    pub month: String,
    pub amount_cents: i64,
}

/// Financial summary for one project's dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct DashboardSummary {
    pub lender_count: i64,
    pub active_loan_count: i64,
    /// Sum of agreed principals over active loans.
    pub principal_total_cents: i64,
    pub disbursed_cents: i64,
    pub repaid_cents: i64,
    pub interest_paid_cents: i64,
    /// Disbursed minus repaid.
    pub outstanding_cents: i64,
    /// The six most recent months with repayment activity, newest first.
    pub monthly_repayments: Vec<MonthlyVolume>,
}

/// Result of rendering a communication template against a loan.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RenderedTemplate {
    pub template_id: String,
    pub loan_id: String,
    /// Email subject after merge-tag expansion; `None` for documents.
    pub subject: Option<String>,
    pub body: String,
}
