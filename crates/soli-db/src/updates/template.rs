//! Communication template update builder.

use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct TemplateUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

pub struct TemplateUpdateBuilder(TemplateUpdate);

impl TemplateUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(TemplateUpdate::default())
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.0.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn subject(mut self, subject: Option<String>) -> Self {
        self.0.subject = Some(subject);
        self
    }

    #[must_use]
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.0.body = Some(body.into());
        self
    }

    #[must_use]
    pub fn build(self) -> TemplateUpdate {
        self.0
    }
}
