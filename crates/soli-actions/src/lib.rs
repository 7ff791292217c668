//! # soli-actions
//!
//! Server actions for Soliloan. Every mutation and read an API surface can
//! trigger goes through this crate, which owns the orchestration order:
//! authentication, schema validation, authorization, the database call,
//! the change-log entry, and cache revalidation.
//!
//! Repos in `soli-db` stay plain CRUD; this crate is where the steps around
//! them live, so a transport (HTTP, CLI, tests) only ever calls one method
//! per user-visible operation.

pub mod actions;
pub mod error;
pub mod locale;
pub mod revalidate;

mod authz;
mod context;
mod record;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use soli_config::SoliConfig;
use soli_db::service::SoliService;
use soli_schema::SchemaError;

use crate::error::ActionError;
use crate::revalidate::Revalidator;

/// Entry point for all server actions.
///
/// Holds the service handle, the application configuration, and the
/// revalidation hook. Action methods are implemented in the [`actions`]
/// submodules, one file per entity.
pub struct Actions {
    service: SoliService,
    config: SoliConfig,
    revalidator: Arc<dyn Revalidator>,
}

impl Actions {
    #[must_use]
    pub fn new(
        service: SoliService,
        config: SoliConfig,
        revalidator: Arc<dyn Revalidator>,
    ) -> Self {
        Self {
            service,
            config,
            revalidator,
        }
    }

    /// Access the underlying service for direct repo calls.
    #[must_use]
    pub const fn service(&self) -> &SoliService {
        &self.service
    }

    /// Access the application configuration.
    #[must_use]
    pub const fn config(&self) -> &SoliConfig {
        &self.config
    }

    fn revalidate(&self, path: &str) {
        self.revalidator.revalidate(path);
    }

    /// Validate `input` against the named registry schema, then deserialize
    /// it into the matching input struct.
    fn validate_input<T: DeserializeOwned>(
        &self,
        schema: &str,
        input: Value,
    ) -> Result<T, ActionError> {
        match self.service.schema().validate(schema, &input) {
            Ok(()) => {}
            Err(SchemaError::ValidationFailed { errors }) => {
                return Err(ActionError::Validation(errors));
            }
            Err(other) => return Err(ActionError::Other(other.into())),
        }
        serde_json::from_value(input).map_err(|e| ActionError::Validation(vec![e.to_string()]))
    }
}
