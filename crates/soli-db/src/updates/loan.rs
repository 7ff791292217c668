//! Loan update builder.

use chrono::NaiveDate;
use serde::Serialize;
use soli_core::enums::{InterestMethod, LoanStatus};

#[derive(Debug, Clone, Default, Serialize)]
pub struct LoanUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub principal_cents: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interest_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interest_method: Option<Option<InterestMethod>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<Option<NaiveDate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<LoanStatus>,
}

pub struct LoanUpdateBuilder(LoanUpdate);

impl LoanUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(LoanUpdate::default())
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.0.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn principal_cents(mut self, cents: i64) -> Self {
        self.0.principal_cents = Some(cents);
        self
    }

    #[must_use]
    pub fn interest_rate(mut self, rate: f64) -> Self {
        self.0.interest_rate = Some(rate);
        self
    }

    #[must_use]
    pub fn interest_method(mut self, method: Option<InterestMethod>) -> Self {
        self.0.interest_method = Some(method);
        self
    }

    #[must_use]
    pub fn start_date(mut self, date: NaiveDate) -> Self {
        self.0.start_date = Some(date);
        self
    }

    #[must_use]
    pub fn end_date(mut self, date: Option<NaiveDate>) -> Self {
        self.0.end_date = Some(date);
        self
    }

    #[must_use]
    pub fn status(mut self, status: LoanStatus) -> Self {
        self.0.status = Some(status);
        self
    }

    #[must_use]
    pub fn build(self) -> LoanUpdate {
        self.0
    }
}
