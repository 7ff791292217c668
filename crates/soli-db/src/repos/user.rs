//! User and session repository.
//!
//! Session tokens are issued elsewhere; this repo only stores and resolves
//! them. `user_for_session` is what the HTTP auth middleware calls per
//! request.

use chrono::{DateTime, Utc};

use soli_core::entities::{Session, User};
use soli_core::ids::PREFIX_USER;

use crate::error::DatabaseError;
use crate::helpers::parse_datetime;
use crate::service::SoliService;

const SELECT_COLS: &str = "id, email, name, created_at";

fn row_to_user(row: &libsql::Row) -> Result<User, DatabaseError> {
    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        name: row.get(2)?,
        created_at: parse_datetime(&row.get::<String>(3)?)?,
    })
}

impl SoliService {
    pub async fn create_user(&self, email: &str, name: &str) -> Result<User, DatabaseError> {
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_USER).await?;

        self.db()
            .conn()
            .execute(
                &format!("INSERT INTO users ({SELECT_COLS}) VALUES (?1, ?2, ?3, ?4)"),
                libsql::params![id.as_str(), email, name, now.to_rfc3339()],
            )
            .await?;

        Ok(User {
            id,
            email: email.to_string(),
            name: name.to_string(),
            created_at: now,
        })
    }

    pub async fn get_user(&self, id: &str) -> Result<Option<User>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM users WHERE id = ?1"),
                [id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM users WHERE email = ?1"),
                [email],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn create_session(
        &self,
        user_id: &str,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<Session, DatabaseError> {
        let now = Utc::now();
        self.db()
            .conn()
            .execute(
                "INSERT INTO sessions (token, user_id, expires_at, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                libsql::params![
                    token,
                    user_id,
                    expires_at.to_rfc3339(),
                    now.to_rfc3339()
                ],
            )
            .await?;

        Ok(Session {
            token: token.to_string(),
            user_id: user_id.to_string(),
            expires_at,
            created_at: now,
        })
    }

    /// Resolve a session token to its user, rejecting expired sessions.
    ///
    /// Timestamps are normalized with `datetime()` in SQL so RFC 3339 and
    /// `SQLite`-native formats compare correctly.
    pub async fn user_for_session(&self, token: &str) -> Result<Option<User>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT u.id, u.email, u.name, u.created_at
                 FROM sessions s
                 JOIN users u ON u.id = s.user_id
                 WHERE s.token = ?1 AND datetime(s.expires_at) > datetime('now')",
                [token],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn delete_session(&self, token: &str) -> Result<(), DatabaseError> {
        self.db()
            .conn()
            .execute("DELETE FROM sessions WHERE token = ?1", [token])
            .await?;
        Ok(())
    }

    /// Remove all expired sessions. Returns the number of rows deleted.
    pub async fn purge_expired_sessions(&self) -> Result<u64, DatabaseError> {
        let deleted = self
            .db()
            .conn()
            .execute(
                "DELETE FROM sessions WHERE datetime(expires_at) <= datetime('now')",
                (),
            )
            .await?;
        Ok(deleted)
    }
}
