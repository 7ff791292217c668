//! Lender repository: CRUD and FTS search.

use chrono::Utc;

use soli_core::entities::Lender;
use soli_core::ids::PREFIX_LENDER;
use soli_core::inputs::LenderCreateInput;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime};
use crate::service::SoliService;
use crate::updates::lender::LenderUpdate;

const SELECT_COLS: &str = "id, project_id, name, email, phone, iban, street, postal_code, \
                           city, country, created_at, updated_at";

fn row_to_lender(row: &libsql::Row) -> Result<Lender, DatabaseError> {
    Ok(Lender {
        id: row.get(0)?,
        project_id: row.get(1)?,
        name: row.get(2)?,
        email: row.get(3)?,
        phone: get_opt_string(row, 4)?,
        iban: get_opt_string(row, 5)?,
        street: get_opt_string(row, 6)?,
        postal_code: get_opt_string(row, 7)?,
        city: get_opt_string(row, 8)?,
        country: get_opt_string(row, 9)?,
        created_at: parse_datetime(&row.get::<String>(10)?)?,
        updated_at: parse_datetime(&row.get::<String>(11)?)?,
    })
}

impl SoliService {
    pub async fn create_lender(
        &self,
        input: &LenderCreateInput,
    ) -> Result<Lender, DatabaseError> {
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_LENDER).await?;

        self.db()
            .conn()
            .execute(
                &format!(
                    "INSERT INTO lenders ({SELECT_COLS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)"
                ),
                libsql::params![
                    id.as_str(),
                    input.project_id.as_str(),
                    input.name.as_str(),
                    input.email.as_str(),
                    input.phone.as_deref(),
                    input.iban.as_deref(),
                    input.street.as_deref(),
                    input.postal_code.as_deref(),
                    input.city.as_deref(),
                    input.country.as_deref(),
                    now.to_rfc3339(),
                    now.to_rfc3339()
                ],
            )
            .await?;

        Ok(Lender {
            id,
            project_id: input.project_id.clone(),
            name: input.name.clone(),
            email: input.email.clone(),
            phone: input.phone.clone(),
            iban: input.iban.clone(),
            street: input.street.clone(),
            postal_code: input.postal_code.clone(),
            city: input.city.clone(),
            country: input.country.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn get_lender(&self, id: &str) -> Result<Option<Lender>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM lenders WHERE id = ?1"),
                [id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_lender(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn list_lenders(
        &self,
        project_id: &str,
        limit: u32,
    ) -> Result<Vec<Lender>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM lenders
                     WHERE project_id = ?1 ORDER BY name LIMIT {limit}"
                ),
                [project_id],
            )
            .await?;
        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(row_to_lender(&row)?);
        }
        Ok(results)
    }

    pub async fn update_lender(
        &self,
        id: &str,
        update: LenderUpdate,
    ) -> Result<Option<Lender>, DatabaseError> {
        let mut sets = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        let mut idx = 1usize;

        if let Some(ref name) = update.name {
            sets.push(format!("name = ?{idx}"));
            params.push(name.clone().into());
            idx += 1;
        }
        if let Some(ref email) = update.email {
            sets.push(format!("email = ?{idx}"));
            params.push(email.clone().into());
            idx += 1;
        }
        if let Some(ref phone) = update.phone {
            sets.push(format!("phone = ?{idx}"));
            params.push(phone.clone().map_or(libsql::Value::Null, Into::into));
            idx += 1;
        }
        if let Some(ref iban) = update.iban {
            sets.push(format!("iban = ?{idx}"));
            params.push(iban.clone().map_or(libsql::Value::Null, Into::into));
            idx += 1;
        }
        if let Some(ref street) = update.street {
            sets.push(format!("street = ?{idx}"));
            params.push(street.clone().map_or(libsql::Value::Null, Into::into));
            idx += 1;
        }
        if let Some(ref postal_code) = update.postal_code {
            sets.push(format!("postal_code = ?{idx}"));
            params.push(postal_code.clone().map_or(libsql::Value::Null, Into::into));
            idx += 1;
        }
        if let Some(ref city) = update.city {
            sets.push(format!("city = ?{idx}"));
            params.push(city.clone().map_or(libsql::Value::Null, Into::into));
            idx += 1;
        }
        if let Some(ref country) = update.country {
            sets.push(format!("country = ?{idx}"));
            params.push(country.clone().map_or(libsql::Value::Null, Into::into));
            idx += 1;
        }

        if sets.is_empty() {
            return self.get_lender(id).await;
        }

        sets.push(format!("updated_at = ?{idx}"));
        params.push(Utc::now().to_rfc3339().into());
        idx += 1;

        params.push(id.into());
        let sql = format!("UPDATE lenders SET {} WHERE id = ?{idx}", sets.join(", "));
        self.db()
            .conn()
            .execute(&sql, libsql::params_from_iter(params))
            .await?;

        self.get_lender(id).await
    }

    pub async fn delete_lender(&self, id: &str) -> Result<(), DatabaseError> {
        self.db()
            .conn()
            .execute("DELETE FROM lenders WHERE id = ?1", [id])
            .await?;
        Ok(())
    }

    /// FTS5 search over lender name, email, and city, scoped to a project.
    pub async fn search_lenders(
        &self,
        project_id: &str,
        query: &str,
        limit: u32,
    ) -> Result<Vec<Lender>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT l.id, l.project_id, l.name, l.email, l.phone, l.iban, l.street, \
                 l.postal_code, l.city, l.country, l.created_at, l.updated_at \
                 FROM lenders_fts \
                 JOIN lenders l ON l.rowid = lenders_fts.rowid \
                 WHERE lenders_fts MATCH ?1 AND l.project_id = ?2 \
                 ORDER BY rank LIMIT ?3",
                libsql::params![query, project_id, limit],
            )
            .await?;
        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(row_to_lender(&row)?);
        }
        Ok(results)
    }
}
