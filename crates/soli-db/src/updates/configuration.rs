//! Configuration update builder.

use serde::Serialize;
use soli_core::enums::InterestMethod;

#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigurationUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interest_method: Option<InterestMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_loan_fields: Option<Vec<String>>,
}

pub struct ConfigurationUpdateBuilder(ConfigurationUpdate);

impl ConfigurationUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(ConfigurationUpdate::default())
    }

    #[must_use]
    pub fn display_name(mut self, display_name: impl Into<String>) -> Self {
        self.0.display_name = Some(display_name.into());
        self
    }

    #[must_use]
    pub fn primary_color(mut self, primary_color: impl Into<String>) -> Self {
        self.0.primary_color = Some(primary_color.into());
        self
    }

    #[must_use]
    pub fn interest_method(mut self, interest_method: InterestMethod) -> Self {
        self.0.interest_method = Some(interest_method);
        self
    }

    #[must_use]
    pub fn required_loan_fields(mut self, fields: Vec<String>) -> Self {
        self.0.required_loan_fields = Some(fields);
        self
    }

    #[must_use]
    pub fn build(self) -> ConfigurationUpdate {
        self.0
    }
}
