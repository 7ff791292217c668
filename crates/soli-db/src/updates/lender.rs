//! Lender update builder.

use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct LenderUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iban: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<Option<String>>,
}

pub struct LenderUpdateBuilder(LenderUpdate);

impl LenderUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(LenderUpdate::default())
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.0.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.0.email = Some(email.into());
        self
    }

    #[must_use]
    pub fn phone(mut self, phone: Option<String>) -> Self {
        self.0.phone = Some(phone);
        self
    }

    #[must_use]
    pub fn iban(mut self, iban: Option<String>) -> Self {
        self.0.iban = Some(iban);
        self
    }

    #[must_use]
    pub fn street(mut self, street: Option<String>) -> Self {
        self.0.street = Some(street);
        self
    }

    #[must_use]
    pub fn postal_code(mut self, postal_code: Option<String>) -> Self {
        self.0.postal_code = Some(postal_code);
        self
    }

    #[must_use]
    pub fn city(mut self, city: Option<String>) -> Self {
        self.0.city = Some(city);
        self
    }

    #[must_use]
    pub fn country(mut self, country: Option<String>) -> Self {
        self.0.country = Some(country);
        self
    }

    #[must_use]
    pub fn build(self) -> LenderUpdate {
        self.0
    }
}
