//! Communication template repository.
//!
//! The default flag is exclusive per configuration and kind. Promotion and
//! demotion happen in one repo call so callers cannot end up with two
//! defaults.

use chrono::Utc;

use soli_core::entities::CommunicationTemplate;
use soli_core::enums::TemplateKind;
use soli_core::ids::PREFIX_TEMPLATE;
use soli_core::inputs::TemplateCreateInput;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime, parse_enum};
use crate::service::SoliService;
use crate::updates::template::TemplateUpdate;

const SELECT_COLS: &str =
    "id, configuration_id, kind, name, subject, body, is_default, created_at, updated_at";

fn row_to_template(row: &libsql::Row) -> Result<CommunicationTemplate, DatabaseError> {
    Ok(CommunicationTemplate {
        id: row.get(0)?,
        configuration_id: row.get(1)?,
        kind: parse_enum(&row.get::<String>(2)?)?,
        name: row.get(3)?,
        subject: get_opt_string(row, 4)?,
        body: row.get(5)?,
        is_default: row.get::<i64>(6)? != 0,
        created_at: parse_datetime(&row.get::<String>(7)?)?,
        updated_at: parse_datetime(&row.get::<String>(8)?)?,
    })
}

impl SoliService {
    pub async fn create_template(
        &self,
        input: &TemplateCreateInput,
    ) -> Result<CommunicationTemplate, DatabaseError> {
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_TEMPLATE).await?;

        self.db()
            .conn()
            .execute(
                &format!(
                    "INSERT INTO communication_templates ({SELECT_COLS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"
                ),
                libsql::params![
                    id.as_str(),
                    input.configuration_id.as_str(),
                    input.kind.as_str(),
                    input.name.as_str(),
                    input.subject.as_deref(),
                    input.body.as_str(),
                    false,
                    now.to_rfc3339(),
                    now.to_rfc3339()
                ],
            )
            .await?;

        Ok(CommunicationTemplate {
            id,
            configuration_id: input.configuration_id.clone(),
            kind: input.kind,
            name: input.name.clone(),
            subject: input.subject.clone(),
            body: input.body.clone(),
            is_default: false,
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn get_template(
        &self,
        id: &str,
    ) -> Result<Option<CommunicationTemplate>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM communication_templates WHERE id = ?1"),
                [id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_template(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn list_templates(
        &self,
        configuration_id: &str,
    ) -> Result<Vec<CommunicationTemplate>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM communication_templates
                     WHERE configuration_id = ?1 ORDER BY kind, name"
                ),
                [configuration_id],
            )
            .await?;
        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(row_to_template(&row)?);
        }
        Ok(results)
    }

    pub async fn update_template(
        &self,
        id: &str,
        update: TemplateUpdate,
    ) -> Result<Option<CommunicationTemplate>, DatabaseError> {
        let mut sets = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        let mut idx = 1usize;

        if let Some(ref name) = update.name {
            sets.push(format!("name = ?{idx}"));
            params.push(name.clone().into());
            idx += 1;
        }
        if let Some(ref subject) = update.subject {
            sets.push(format!("subject = ?{idx}"));
            params.push(subject.clone().map_or(libsql::Value::Null, Into::into));
            idx += 1;
        }
        if let Some(ref body) = update.body {
            sets.push(format!("body = ?{idx}"));
            params.push(body.clone().into());
            idx += 1;
        }

        if sets.is_empty() {
            return self.get_template(id).await;
        }

        sets.push(format!("updated_at = ?{idx}"));
        params.push(Utc::now().to_rfc3339().into());
        idx += 1;

        params.push(id.into());
        let sql = format!(
            "UPDATE communication_templates SET {} WHERE id = ?{idx}",
            sets.join(", ")
        );
        self.db()
            .conn()
            .execute(&sql, libsql::params_from_iter(params))
            .await?;

        self.get_template(id).await
    }

    pub async fn delete_template(&self, id: &str) -> Result<(), DatabaseError> {
        self.db()
            .conn()
            .execute("DELETE FROM communication_templates WHERE id = ?1", [id])
            .await?;
        Ok(())
    }

    /// Make this template the default for its configuration and kind,
    /// clearing the flag on any previous holder.
    pub async fn set_default_template(
        &self,
        id: &str,
    ) -> Result<Option<CommunicationTemplate>, DatabaseError> {
        let Some(template) = self.get_template(id).await? else {
            return Ok(None);
        };

        let now = Utc::now().to_rfc3339();
        self.db()
            .conn()
            .execute(
                "UPDATE communication_templates SET is_default = 0, updated_at = ?1
                 WHERE configuration_id = ?2 AND kind = ?3 AND is_default = 1 AND id <> ?4",
                libsql::params![
                    now.as_str(),
                    template.configuration_id.as_str(),
                    template.kind.as_str(),
                    id
                ],
            )
            .await?;
        self.db()
            .conn()
            .execute(
                "UPDATE communication_templates SET is_default = 1, updated_at = ?1 WHERE id = ?2",
                libsql::params![now.as_str(), id],
            )
            .await?;

        self.get_template(id).await
    }

    pub async fn get_default_template(
        &self,
        configuration_id: &str,
        kind: TemplateKind,
    ) -> Result<Option<CommunicationTemplate>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM communication_templates
                     WHERE configuration_id = ?1 AND kind = ?2 AND is_default = 1"
                ),
                libsql::params![configuration_id, kind.as_str()],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_template(&row)?)),
            None => Ok(None),
        }
    }

    /// Project that owns this template (via its configuration).
    pub async fn project_id_for_template(
        &self,
        template_id: &str,
    ) -> Result<Option<String>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT c.project_id FROM communication_templates t
                 JOIN configurations c ON c.id = t.configuration_id
                 WHERE t.id = ?1",
                [template_id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row.get::<String>(0)?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use soli_core::enums::TemplateKind;
    use soli_core::inputs::TemplateCreateInput;

    use crate::test_support::helpers::{seed_project, test_service};
    use crate::updates::template::TemplateUpdateBuilder;

    fn letter(configuration_id: &str, name: &str) -> TemplateCreateInput {
        TemplateCreateInput {
            configuration_id: configuration_id.to_string(),
            kind: TemplateKind::Document,
            name: name.to_string(),
            subject: None,
            body: "Dear {{lender.name}}, your balance is {{loan.principal}}.".to_string(),
        }
    }

    #[tokio::test]
    async fn create_and_get() {
        let svc = test_service().await;
        let project = seed_project(&svc, "alpha").await;
        let config = svc
            .create_configuration(&project.id, "Alpha Loans")
            .await
            .unwrap();

        let template = svc.create_template(&letter(&config.id, "Jahresbrief")).await.unwrap();
        assert!(template.id.starts_with("tpl-"));
        assert!(!template.is_default);

        let fetched = svc.get_template(&template.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Jahresbrief");
        assert_eq!(fetched.kind, TemplateKind::Document);
        assert!(fetched.subject.is_none());
    }

    #[tokio::test]
    async fn set_default_clears_previous_holder() {
        let svc = test_service().await;
        let project = seed_project(&svc, "alpha").await;
        let config = svc
            .create_configuration(&project.id, "Alpha Loans")
            .await
            .unwrap();

        let first = svc.create_template(&letter(&config.id, "First")).await.unwrap();
        let second = svc.create_template(&letter(&config.id, "Second")).await.unwrap();

        svc.set_default_template(&first.id).await.unwrap().unwrap();
        let promoted = svc.set_default_template(&second.id).await.unwrap().unwrap();
        assert!(promoted.is_default);

        let demoted = svc.get_template(&first.id).await.unwrap().unwrap();
        assert!(!demoted.is_default);

        let current = svc
            .get_default_template(&config.id, TemplateKind::Document)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(current.id, second.id);
    }

    #[tokio::test]
    async fn defaults_are_independent_per_kind() {
        let svc = test_service().await;
        let project = seed_project(&svc, "alpha").await;
        let config = svc
            .create_configuration(&project.id, "Alpha Loans")
            .await
            .unwrap();

        let doc = svc.create_template(&letter(&config.id, "Letter")).await.unwrap();
        let mail = svc
            .create_template(&TemplateCreateInput {
                configuration_id: config.id.clone(),
                kind: TemplateKind::Email,
                name: "Reminder".to_string(),
                subject: Some("Your loan {{loan.name}}".to_string()),
                body: "Hello {{lender.name}}".to_string(),
            })
            .await
            .unwrap();

        svc.set_default_template(&doc.id).await.unwrap().unwrap();
        svc.set_default_template(&mail.id).await.unwrap().unwrap();

        // Promoting the email must not demote the document
        let doc_now = svc.get_template(&doc.id).await.unwrap().unwrap();
        assert!(doc_now.is_default);
    }

    #[tokio::test]
    async fn set_default_missing_returns_none() {
        let svc = test_service().await;
        assert!(svc.set_default_template("tpl-missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_subject_clear() {
        let svc = test_service().await;
        let project = seed_project(&svc, "alpha").await;
        let config = svc
            .create_configuration(&project.id, "Alpha Loans")
            .await
            .unwrap();
        let mail = svc
            .create_template(&TemplateCreateInput {
                configuration_id: config.id.clone(),
                kind: TemplateKind::Email,
                name: "Reminder".to_string(),
                subject: Some("Old subject".to_string()),
                body: "Hello".to_string(),
            })
            .await
            .unwrap();

        let updated = svc
            .update_template(
                &mail.id,
                TemplateUpdateBuilder::new()
                    .subject(None)
                    .body("Hello {{lender.name}}")
                    .build(),
            )
            .await
            .unwrap()
            .unwrap();
        assert!(updated.subject.is_none());
        assert_eq!(updated.body, "Hello {{lender.name}}");
    }

    #[tokio::test]
    async fn list_by_configuration() {
        let svc = test_service().await;
        let project = seed_project(&svc, "alpha").await;
        let config = svc
            .create_configuration(&project.id, "Alpha Loans")
            .await
            .unwrap();

        svc.create_template(&letter(&config.id, "B")).await.unwrap();
        svc.create_template(&letter(&config.id, "A")).await.unwrap();

        let listed = svc.list_templates(&config.id).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].name, "A");
    }

    #[tokio::test]
    async fn project_id_resolves_through_configuration() {
        let svc = test_service().await;
        let project = seed_project(&svc, "alpha").await;
        let config = svc
            .create_configuration(&project.id, "Alpha Loans")
            .await
            .unwrap();
        let template = svc.create_template(&letter(&config.id, "Letter")).await.unwrap();

        let found = svc.project_id_for_template(&template.id).await.unwrap();
        assert_eq!(found.as_deref(), Some(project.id.as_str()));
    }
}
