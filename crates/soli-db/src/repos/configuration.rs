//! Configuration repository.
//!
//! One configuration per project, created alongside the project and never
//! deleted on its own (it goes away with the project's CASCADE).

use chrono::Utc;

use soli_core::entities::Configuration;
use soli_core::enums::InterestMethod;
use soli_core::ids::PREFIX_CONFIGURATION;

use crate::error::DatabaseError;
use crate::helpers::{parse_datetime, parse_enum, parse_json};
use crate::service::SoliService;
use crate::updates::configuration::ConfigurationUpdate;

/// Accent color applied until a project picks its own.
pub const DEFAULT_PRIMARY_COLOR: &str = "#1d4ed8";

const SELECT_COLS: &str = "id, project_id, display_name, primary_color, interest_method, \
                           required_loan_fields, created_at, updated_at";

fn row_to_configuration(row: &libsql::Row) -> Result<Configuration, DatabaseError> {
    Ok(Configuration {
        id: row.get(0)?,
        project_id: row.get(1)?,
        display_name: row.get(2)?,
        primary_color: row.get(3)?,
        interest_method: parse_enum(&row.get::<String>(4)?)?,
        required_loan_fields: parse_json(&row.get::<String>(5)?)?,
        created_at: parse_datetime(&row.get::<String>(6)?)?,
        updated_at: parse_datetime(&row.get::<String>(7)?)?,
    })
}

impl SoliService {
    /// Create the project's configuration with stock defaults.
    pub async fn create_configuration(
        &self,
        project_id: &str,
        display_name: &str,
    ) -> Result<Configuration, DatabaseError> {
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_CONFIGURATION).await?;

        self.db()
            .conn()
            .execute(
                &format!(
                    "INSERT INTO configurations ({SELECT_COLS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"
                ),
                libsql::params![
                    id.as_str(),
                    project_id,
                    display_name,
                    DEFAULT_PRIMARY_COLOR,
                    InterestMethod::Simple.as_str(),
                    "[]",
                    now.to_rfc3339(),
                    now.to_rfc3339()
                ],
            )
            .await?;

        Ok(Configuration {
            id,
            project_id: project_id.to_string(),
            display_name: display_name.to_string(),
            primary_color: DEFAULT_PRIMARY_COLOR.to_string(),
            interest_method: InterestMethod::Simple,
            required_loan_fields: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn get_configuration(
        &self,
        id: &str,
    ) -> Result<Option<Configuration>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM configurations WHERE id = ?1"),
                [id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_configuration(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn get_configuration_for_project(
        &self,
        project_id: &str,
    ) -> Result<Option<Configuration>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM configurations WHERE project_id = ?1"),
                [project_id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_configuration(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn update_configuration(
        &self,
        id: &str,
        update: ConfigurationUpdate,
    ) -> Result<Option<Configuration>, DatabaseError> {
        let mut sets = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        let mut idx = 1usize;

        if let Some(ref display_name) = update.display_name {
            sets.push(format!("display_name = ?{idx}"));
            params.push(display_name.clone().into());
            idx += 1;
        }
        if let Some(ref primary_color) = update.primary_color {
            sets.push(format!("primary_color = ?{idx}"));
            params.push(primary_color.clone().into());
            idx += 1;
        }
        if let Some(interest_method) = update.interest_method {
            sets.push(format!("interest_method = ?{idx}"));
            params.push(interest_method.as_str().into());
            idx += 1;
        }
        if let Some(ref fields) = update.required_loan_fields {
            let json = serde_json::to_string(fields)
                .map_err(|e| DatabaseError::Other(e.into()))?;
            sets.push(format!("required_loan_fields = ?{idx}"));
            params.push(json.into());
            idx += 1;
        }

        if sets.is_empty() {
            return self.get_configuration(id).await;
        }

        sets.push(format!("updated_at = ?{idx}"));
        params.push(Utc::now().to_rfc3339().into());
        idx += 1;

        params.push(id.into());
        let sql = format!(
            "UPDATE configurations SET {} WHERE id = ?{idx}",
            sets.join(", ")
        );
        self.db()
            .conn()
            .execute(&sql, libsql::params_from_iter(params))
            .await?;

        self.get_configuration(id).await
    }
}

#[cfg(test)]
mod tests {
    use soli_core::enums::InterestMethod;

    use super::DEFAULT_PRIMARY_COLOR;
    use crate::test_support::helpers::{seed_project, test_service};
    use crate::updates::configuration::ConfigurationUpdateBuilder;

    #[tokio::test]
    async fn create_applies_defaults() {
        let svc = test_service().await;
        let project = seed_project(&svc, "alpha").await;
        let config = svc
            .create_configuration(&project.id, "Alpha Loans")
            .await
            .unwrap();

        assert!(config.id.starts_with("cfg-"));
        assert_eq!(config.display_name, "Alpha Loans");
        assert_eq!(config.primary_color, DEFAULT_PRIMARY_COLOR);
        assert_eq!(config.interest_method, InterestMethod::Simple);
        assert!(config.required_loan_fields.is_empty());
    }

    #[tokio::test]
    async fn get_for_project() {
        let svc = test_service().await;
        let project = seed_project(&svc, "alpha").await;
        let config = svc
            .create_configuration(&project.id, "Alpha Loans")
            .await
            .unwrap();

        let fetched = svc
            .get_configuration_for_project(&project.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.id, config.id);
        assert!(
            svc.get_configuration_for_project("prj-missing")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn update_method_and_required_fields() {
        let svc = test_service().await;
        let project = seed_project(&svc, "alpha").await;
        let config = svc
            .create_configuration(&project.id, "Alpha Loans")
            .await
            .unwrap();

        let updated = svc
            .update_configuration(
                &config.id,
                ConfigurationUpdateBuilder::new()
                    .interest_method(InterestMethod::Compound)
                    .required_loan_fields(vec!["end_date".to_string()])
                    .build(),
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.interest_method, InterestMethod::Compound);
        assert_eq!(updated.required_loan_fields, vec!["end_date".to_string()]);
        assert_eq!(updated.display_name, "Alpha Loans");
    }

    #[tokio::test]
    async fn update_color() {
        let svc = test_service().await;
        let project = seed_project(&svc, "alpha").await;
        let config = svc
            .create_configuration(&project.id, "Alpha Loans")
            .await
            .unwrap();

        let updated = svc
            .update_configuration(
                &config.id,
                ConfigurationUpdateBuilder::new()
                    .primary_color("#16a34a")
                    .build(),
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.primary_color, "#16a34a");
    }
}
