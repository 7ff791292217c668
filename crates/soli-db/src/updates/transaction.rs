//! Transaction update builder.

use chrono::NaiveDate;
use serde::Serialize;
use soli_core::enums::TransactionKind;

#[derive(Debug, Clone, Default, Serialize)]
pub struct TransactionUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<TransactionKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_cents: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booked_at: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
}

pub struct TransactionUpdateBuilder(TransactionUpdate);

impl TransactionUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(TransactionUpdate::default())
    }

    #[must_use]
    pub fn kind(mut self, kind: TransactionKind) -> Self {
        self.0.kind = Some(kind);
        self
    }

    #[must_use]
    pub fn amount_cents(mut self, cents: i64) -> Self {
        self.0.amount_cents = Some(cents);
        self
    }

    #[must_use]
    pub fn booked_at(mut self, date: NaiveDate) -> Self {
        self.0.booked_at = Some(date);
        self
    }

    #[must_use]
    pub fn description(mut self, description: Option<String>) -> Self {
        self.0.description = Some(description);
        self
    }

    #[must_use]
    pub fn build(self) -> TransactionUpdate {
        self.0
    }
}
