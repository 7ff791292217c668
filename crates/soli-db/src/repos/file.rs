//! File metadata repository.
//!
//! Stores metadata only; bytes live at `storage_path` on disk. The thumbnail
//! column starts NULL and is filled in by the action layer if conversion
//! succeeds.

use chrono::Utc;

use soli_core::entities::FileRecord;
use soli_core::ids::PREFIX_FILE;
use soli_core::inputs::FileRegisterInput;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime};
use crate::service::SoliService;

const SELECT_COLS: &str = "id, loan_id, file_name, mime_type, size_bytes, storage_path, \
                           thumbnail_path, uploaded_by, created_at";

fn row_to_file(row: &libsql::Row) -> Result<FileRecord, DatabaseError> {
    Ok(FileRecord {
        id: row.get(0)?,
        loan_id: row.get(1)?,
        file_name: row.get(2)?,
        mime_type: row.get(3)?,
        size_bytes: row.get(4)?,
        storage_path: row.get(5)?,
        thumbnail_path: get_opt_string(row, 6)?,
        uploaded_by: get_opt_string(row, 7)?,
        created_at: parse_datetime(&row.get::<String>(8)?)?,
    })
}

impl SoliService {
    pub async fn register_file(
        &self,
        input: &FileRegisterInput,
        uploaded_by: Option<&str>,
    ) -> Result<FileRecord, DatabaseError> {
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_FILE).await?;

        self.db()
            .conn()
            .execute(
                &format!(
                    "INSERT INTO files ({SELECT_COLS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"
                ),
                libsql::params![
                    id.as_str(),
                    input.loan_id.as_str(),
                    input.file_name.as_str(),
                    input.mime_type.as_str(),
                    input.size_bytes,
                    input.storage_path.as_str(),
                    Option::<&str>::None,
                    uploaded_by,
                    now.to_rfc3339()
                ],
            )
            .await?;

        Ok(FileRecord {
            id,
            loan_id: input.loan_id.clone(),
            file_name: input.file_name.clone(),
            mime_type: input.mime_type.clone(),
            size_bytes: input.size_bytes,
            storage_path: input.storage_path.clone(),
            thumbnail_path: None,
            uploaded_by: uploaded_by.map(String::from),
            created_at: now,
        })
    }

    pub async fn get_file(&self, id: &str) -> Result<Option<FileRecord>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM files WHERE id = ?1"),
                [id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_file(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn list_files(&self, loan_id: &str) -> Result<Vec<FileRecord>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM files
                     WHERE loan_id = ?1 ORDER BY created_at DESC"
                ),
                [loan_id],
            )
            .await?;
        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(row_to_file(&row)?);
        }
        Ok(results)
    }

    pub async fn set_thumbnail_path(
        &self,
        file_id: &str,
        thumbnail_path: &str,
    ) -> Result<(), DatabaseError> {
        self.db()
            .conn()
            .execute(
                "UPDATE files SET thumbnail_path = ?1 WHERE id = ?2",
                libsql::params![thumbnail_path, file_id],
            )
            .await?;
        Ok(())
    }

    pub async fn delete_file(&self, id: &str) -> Result<(), DatabaseError> {
        self.db()
            .conn()
            .execute("DELETE FROM files WHERE id = ?1", [id])
            .await?;
        Ok(())
    }

    /// Project that owns this file (via loan and lender).
    pub async fn project_id_for_file(&self, file_id: &str) -> Result<Option<String>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT le.project_id FROM files f
                 JOIN loans lo ON lo.id = f.loan_id
                 JOIN lenders le ON le.id = lo.lender_id
                 WHERE f.id = ?1",
                [file_id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row.get::<String>(0)?)),
            None => Ok(None),
        }
    }
}
