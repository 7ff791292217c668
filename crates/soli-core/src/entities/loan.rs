use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{InterestMethod, LoanStatus};

/// A single lending agreement belonging to a lender.
///
/// All money is integer cents. Transactions record the actual movements;
/// `principal_cents` is the agreed amount.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Loan {
    pub id: String,
    pub lender_id: String,
    pub name: String,
    pub principal_cents: i64,
    /// Annual rate in percent, e.g. `3.5`.
    pub interest_rate: f64,
    /// Overrides the project configuration when set.
    pub interest_method: Option<InterestMethod>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub status: LoanStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
