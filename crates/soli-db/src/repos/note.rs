//! Note repository: CRUD and FTS search.

use chrono::Utc;

use soli_core::entities::Note;
use soli_core::ids::PREFIX_NOTE;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime};
use crate::service::SoliService;

const SELECT_COLS: &str = "id, loan_id, author_id, content, created_at, updated_at";

fn row_to_note(row: &libsql::Row) -> Result<Note, DatabaseError> {
    Ok(Note {
        id: row.get(0)?,
        loan_id: row.get(1)?,
        author_id: get_opt_string(row, 2)?,
        content: row.get(3)?,
        created_at: parse_datetime(&row.get::<String>(4)?)?,
        updated_at: parse_datetime(&row.get::<String>(5)?)?,
    })
}

impl SoliService {
    pub async fn create_note(
        &self,
        loan_id: &str,
        author_id: Option<&str>,
        content: &str,
    ) -> Result<Note, DatabaseError> {
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_NOTE).await?;

        self.db()
            .conn()
            .execute(
                &format!(
                    "INSERT INTO notes ({SELECT_COLS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)"
                ),
                libsql::params![
                    id.as_str(),
                    loan_id,
                    author_id,
                    content,
                    now.to_rfc3339(),
                    now.to_rfc3339()
                ],
            )
            .await?;

        Ok(Note {
            id,
            loan_id: loan_id.to_string(),
            author_id: author_id.map(String::from),
            content: content.to_string(),
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn get_note(&self, id: &str) -> Result<Option<Note>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM notes WHERE id = ?1"),
                [id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_note(&row)?)),
            None => Ok(None),
        }
    }

    /// Notes on a loan, newest first.
    pub async fn list_notes(&self, loan_id: &str, limit: u32) -> Result<Vec<Note>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM notes
                     WHERE loan_id = ?1 ORDER BY created_at DESC LIMIT {limit}"
                ),
                [loan_id],
            )
            .await?;
        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(row_to_note(&row)?);
        }
        Ok(results)
    }

    pub async fn update_note(
        &self,
        id: &str,
        content: &str,
    ) -> Result<Option<Note>, DatabaseError> {
        self.db()
            .conn()
            .execute(
                "UPDATE notes SET content = ?1, updated_at = ?2 WHERE id = ?3",
                libsql::params![content, Utc::now().to_rfc3339(), id],
            )
            .await?;
        self.get_note(id).await
    }

    pub async fn delete_note(&self, id: &str) -> Result<(), DatabaseError> {
        self.db()
            .conn()
            .execute("DELETE FROM notes WHERE id = ?1", [id])
            .await?;
        Ok(())
    }

    /// FTS5 search over note content, scoped to a project.
    pub async fn search_notes(
        &self,
        project_id: &str,
        query: &str,
        limit: u32,
    ) -> Result<Vec<Note>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT n.id, n.loan_id, n.author_id, n.content, n.created_at, n.updated_at \
                 FROM notes_fts \
                 JOIN notes n ON n.rowid = notes_fts.rowid \
                 JOIN loans lo ON lo.id = n.loan_id \
                 JOIN lenders le ON le.id = lo.lender_id \
                 WHERE notes_fts MATCH ?1 AND le.project_id = ?2 \
                 ORDER BY rank LIMIT ?3",
                libsql::params![query, project_id, limit],
            )
            .await?;
        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(row_to_note(&row)?);
        }
        Ok(results)
    }

    /// Project that owns this note (via loan and lender).
    pub async fn project_id_for_note(&self, note_id: &str) -> Result<Option<String>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT le.project_id FROM notes n
                 JOIN loans lo ON lo.id = n.loan_id
                 JOIN lenders le ON le.id = lo.lender_id
                 WHERE n.id = ?1",
                [note_id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row.get::<String>(0)?)),
            None => Ok(None),
        }
    }
}
