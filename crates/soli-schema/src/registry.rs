//! Central schema registry for all Soliloan types.
//!
//! The `SchemaRegistry` builds JSON Schemas from soli-core types at
//! construction time using [`schemars::schema_for!`] and provides validation
//! via `jsonschema`.

use std::collections::HashMap;

use schemars::schema_for;

use crate::error::SchemaError;

/// Central store of all JSON Schemas in the Soliloan system.
///
/// Built from soli-core types via [`schemars::schema_for!`]. Provides lookup
/// by name and validation of arbitrary JSON values against registered
/// schemas.
pub struct SchemaRegistry {
    schemas: HashMap<&'static str, serde_json::Value>,
}

/// Insert a schema into the map, converting the `schemars` output to a
/// `serde_json::Value`. Panics if `serde_json::to_value` fails (should be
/// infallible for valid `schemars` output).
macro_rules! register {
    ($map:expr, $name:expr, $ty:ty) => {
        $map.insert($name, serde_json::to_value(schema_for!($ty)).unwrap());
    };
}

impl SchemaRegistry {
    /// Build a new registry containing all entity, action-input, and
    /// response schemas from soli-core.
    ///
    /// # Panics
    ///
    /// Panics if `serde_json::to_value` fails on any `schemars`-generated
    /// schema. This is not expected in practice because `schemars` always
    /// produces valid JSON-serialisable output.
    #[must_use]
    pub fn new() -> Self {
        let mut schemas = HashMap::new();

        // --- Entity types (11) ---
        register!(schemas, "user", soli_core::entities::User);
        register!(schemas, "project", soli_core::entities::Project);
        register!(schemas, "configuration", soli_core::entities::Configuration);
        register!(schemas, "lender", soli_core::entities::Lender);
        register!(schemas, "loan", soli_core::entities::Loan);
        register!(schemas, "transaction", soli_core::entities::Transaction);
        register!(schemas, "note", soli_core::entities::Note);
        register!(schemas, "file", soli_core::entities::FileRecord);
        register!(
            schemas,
            "communication_template",
            soli_core::entities::CommunicationTemplate
        );
        register!(schemas, "saved_view", soli_core::entities::SavedView);
        register!(schemas, "change", soli_core::entities::Change);

        // --- Action inputs (16) ---
        register!(schemas, "project_create", soli_core::inputs::ProjectCreateInput);
        register!(schemas, "project_update", soli_core::inputs::ProjectUpdateInput);
        register!(
            schemas,
            "configuration_update",
            soli_core::inputs::ConfigurationUpdateInput
        );
        register!(schemas, "lender_create", soli_core::inputs::LenderCreateInput);
        register!(schemas, "lender_update", soli_core::inputs::LenderUpdateInput);
        register!(schemas, "loan_create", soli_core::inputs::LoanCreateInput);
        register!(schemas, "loan_update", soli_core::inputs::LoanUpdateInput);
        register!(
            schemas,
            "transaction_create",
            soli_core::inputs::TransactionCreateInput
        );
        register!(
            schemas,
            "transaction_update",
            soli_core::inputs::TransactionUpdateInput
        );
        register!(schemas, "note_create", soli_core::inputs::NoteCreateInput);
        register!(schemas, "note_update", soli_core::inputs::NoteUpdateInput);
        register!(schemas, "file_register", soli_core::inputs::FileRegisterInput);
        register!(schemas, "template_create", soli_core::inputs::TemplateCreateInput);
        register!(schemas, "template_update", soli_core::inputs::TemplateUpdateInput);
        register!(
            schemas,
            "template_render",
            soli_core::inputs::TemplateRenderInput
        );
        register!(schemas, "view_save", soli_core::inputs::ViewSaveInput);

        // --- Response types (2) ---
        register!(
            schemas,
            "dashboard_summary",
            soli_core::responses::DashboardSummary
        );
        register!(
            schemas,
            "rendered_template",
            soli_core::responses::RenderedTemplate
        );

        Self { schemas }
    }

    /// Get a schema by name. Returns `None` if not found.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&serde_json::Value> {
        self.schemas.get(name)
    }

    /// Validate a JSON value against a named schema.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::NotFound` if the schema name is unknown, or
    /// `SchemaError::ValidationFailed` if validation produces errors.
    pub fn validate(&self, name: &str, instance: &serde_json::Value) -> Result<(), SchemaError> {
        let schema = self
            .get(name)
            .ok_or_else(|| SchemaError::NotFound(name.to_string()))?;

        let validator = jsonschema::validator_for(schema)
            .map_err(|e| SchemaError::Generation(format!("{e}")))?;

        let errors: Vec<String> = validator
            .iter_errors(instance)
            .map(|e| format!("{e}"))
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SchemaError::ValidationFailed { errors })
        }
    }

    /// List all registered schema names.
    #[must_use]
    pub fn list(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.schemas.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Number of registered schemas.
    #[must_use]
    pub fn schema_count(&self) -> usize {
        self.schemas.len()
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;
    use soli_core::entities::Lender;

    fn registry() -> SchemaRegistry {
        SchemaRegistry::new()
    }

    #[test]
    fn registry_has_expected_count() {
        // 11 entities + 16 action inputs + 2 responses = 29
        assert_eq!(registry().schema_count(), 29);
    }

    #[test]
    fn registry_list_is_sorted() {
        let reg = registry();
        let names = reg.list();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }

    #[test]
    fn get_nonexistent_schema() {
        assert!(registry().get("nonexistent").is_none());
    }

    #[test]
    fn validate_valid_lender_entity() {
        let reg = registry();
        let lender = Lender {
            id: "ldr-test1234".into(),
            project_id: "prj-test1234".into(),
            name: "Erika Beispiel".into(),
            email: "erika@example.org".into(),
            phone: None,
            iban: None,
            street: None,
            postal_code: None,
            city: None,
            country: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(&lender).unwrap();
        assert!(reg.validate("lender", &json).is_ok());
    }

    #[test]
    fn validate_rejects_missing_required_field() {
        let reg = registry();
        // "name" is missing
        let invalid = json!({
            "project_id": "prj-test",
            "email": "x@example.org"
        });
        let result = reg.validate("lender_create", &invalid);
        assert!(result.is_err());
        if let Err(SchemaError::ValidationFailed { errors }) = result {
            assert!(!errors.is_empty());
        } else {
            panic!("Expected ValidationFailed");
        }
    }

    #[test]
    fn validate_rejects_invalid_enum() {
        let reg = registry();
        let invalid = json!({
            "loan_id": "lon-test",
            "kind": "donation",
            "amount_cents": 100,
            "booked_at": "2024-05-01"
        });
        assert!(reg.validate("transaction_create", &invalid).is_err());
    }

    #[test]
    fn validate_rejects_wrong_type() {
        let reg = registry();
        let invalid = json!({
            "lender_id": "ldr-test",
            "name": "Darlehen",
            "principal_cents": "a lot",
            "interest_rate": 2.0,
            "start_date": "2024-05-01"
        });
        assert!(reg.validate("loan_create", &invalid).is_err());
    }

    #[test]
    fn validate_accepts_minimal_create_input() {
        let reg = registry();
        let input = json!({
            "lender_id": "ldr-test",
            "name": "Darlehen",
            "principal_cents": 100_000,
            "interest_rate": 2.0,
            "start_date": "2024-05-01"
        });
        assert!(reg.validate("loan_create", &input).is_ok());
    }

    #[test]
    fn validate_nonexistent_schema_returns_not_found() {
        let result = registry().validate("bogus", &json!({}));
        assert!(matches!(result, Err(SchemaError::NotFound(_))));
    }

    #[test]
    fn all_expected_schemas_present() {
        let reg = registry();
        let expected = [
            "user",
            "project",
            "configuration",
            "lender",
            "loan",
            "transaction",
            "note",
            "file",
            "communication_template",
            "saved_view",
            "change",
            "project_create",
            "project_update",
            "configuration_update",
            "lender_create",
            "lender_update",
            "loan_create",
            "loan_update",
            "transaction_create",
            "transaction_update",
            "note_create",
            "note_update",
            "file_register",
            "template_create",
            "template_update",
            "template_render",
            "view_save",
            "dashboard_summary",
            "rendered_template",
        ];
        for name in &expected {
            assert!(reg.get(name).is_some(), "Missing expected schema: {name}");
        }
    }
}
