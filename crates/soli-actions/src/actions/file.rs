//! File actions.
//!
//! Files are metadata rows; the bytes live wherever `storage_path` points.
//! Registering an image shells out synchronously to the configured
//! converter for a thumbnail. Conversion failures are logged and swallowed,
//! leaving `thumbnail_path` NULL.

use std::process::Command;

use serde_json::Value;
use soli_core::entities::FileRecord;
use soli_core::enums::EntityType;
use soli_core::identity::AuthIdentity;
use soli_core::inputs::FileRegisterInput;

use crate::Actions;
use crate::context;
use crate::error::ActionError;

impl Actions {
    pub async fn register_file(
        &self,
        who: &AuthIdentity,
        input: Value,
    ) -> Result<FileRecord, ActionError> {
        let input: FileRegisterInput = self.validate_input("file_register", input)?;
        let loan = self
            .service()
            .get_loan(&input.loan_id)
            .await?
            .ok_or_else(|| ActionError::not_found(EntityType::Loan, &input.loan_id))?;
        let project_id = self.project_for_loan(&loan.id).await?;
        self.require_manager(who, &project_id).await?;

        let mut file = self
            .service()
            .register_file(&input, Some(&who.user_id))
            .await?;

        if file.mime_type.starts_with("image/") {
            if let Some(thumbnail_path) = self.generate_thumbnail(&file) {
                self.service()
                    .set_thumbnail_path(&file.id, &thumbnail_path)
                    .await?;
                file.thumbnail_path = Some(thumbnail_path);
            }
        }

        let lender = self.lender_of(&loan).await?;
        self.record_created(
            who,
            &project_id,
            EntityType::File,
            &file.id,
            &file,
            context::file(&lender, &loan, &file),
        )
        .await?;
        self.revalidate(&format!("/loans/{}", loan.id));
        Ok(file)
    }

    pub async fn get_file(&self, who: &AuthIdentity, id: &str) -> Result<FileRecord, ActionError> {
        let file = self
            .service()
            .get_file(id)
            .await?
            .ok_or_else(|| ActionError::not_found(EntityType::File, id))?;
        let project_id = self.project_for_file(&file.id).await?;
        self.require_member(who, &project_id).await?;
        Ok(file)
    }

    pub async fn delete_file(&self, who: &AuthIdentity, id: &str) -> Result<(), ActionError> {
        let file = self
            .service()
            .get_file(id)
            .await?
            .ok_or_else(|| ActionError::not_found(EntityType::File, id))?;
        let project_id = self.project_for_file(&file.id).await?;
        self.require_manager(who, &project_id).await?;

        let loan = self
            .service()
            .get_loan(&file.loan_id)
            .await?
            .ok_or_else(|| ActionError::not_found(EntityType::Loan, &file.loan_id))?;
        let lender = self.lender_of(&loan).await?;

        self.service().delete_file(&file.id).await?;

        self.record_deleted(
            who,
            &project_id,
            EntityType::File,
            &file.id,
            &file,
            context::file(&lender, &loan, &file),
        )
        .await?;
        self.revalidate(&format!("/loans/{}", file.loan_id));
        Ok(())
    }

    /// Files of a loan, newest first.
    pub async fn list_files(
        &self,
        who: &AuthIdentity,
        loan_id: &str,
    ) -> Result<Vec<FileRecord>, ActionError> {
        let loan = self
            .service()
            .get_loan(loan_id)
            .await?
            .ok_or_else(|| ActionError::not_found(EntityType::Loan, loan_id))?;
        let project_id = self.project_for_loan(&loan.id).await?;
        self.require_member(who, &project_id).await?;
        Ok(self.service().list_files(&loan.id).await?)
    }

    fn generate_thumbnail(&self, file: &FileRecord) -> Option<String> {
        let files = &self.config().files;
        let dim = files.thumbnail_max_dim;
        let thumbnail_path = format!("{}.thumb.png", file.storage_path);

        let status = Command::new(&files.thumbnail_command)
            .arg(&file.storage_path)
            .arg("-thumbnail")
            .arg(format!("{dim}x{dim}"))
            .arg(&thumbnail_path)
            .status();
        match status {
            Ok(status) if status.success() => Some(thumbnail_path),
            Ok(status) => {
                tracing::warn!(file_id = %file.id, %status, "thumbnail conversion failed");
                None
            }
            Err(e) => {
                tracing::warn!(file_id = %file.id, error = %e, "thumbnail converter unavailable");
                None
            }
        }
    }

    async fn project_for_file(&self, file_id: &str) -> Result<String, ActionError> {
        self.service()
            .project_id_for_file(file_id)
            .await?
            .ok_or_else(|| ActionError::not_found(EntityType::File, file_id))
    }
}
