//! User account database operations

use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row};

use crate::db::sqlite::{parse_timestamp, timestamp};
use crate::db::{Database, DbResult};
use crate::models::User;

pub(crate) const USER_COLUMNS: &str = "id, username, email, is_staff, is_admin, created_at";

pub(crate) fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    let created_at: String = row.get(5)?;
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        is_staff: row.get(3)?,
        is_admin: row.get(4)?,
        created_at: parse_timestamp(5, &created_at)?,
    })
}

impl Database {
    /// Insert a new user. Fails with a constraint violation if the username is taken.
    pub fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
        is_staff: bool,
        is_admin: bool,
    ) -> DbResult<User> {
        let conn = self.conn()?;
        let created_at = Utc::now();

        conn.execute(
            "INSERT INTO users (username, email, password_hash, is_staff, is_admin, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![username, email, password_hash, is_staff, is_admin, timestamp(created_at)],
        )?;

        // Re-read so created_at carries the stored precision
        let id = conn.last_insert_rowid();
        let user = conn.query_row(
            &format!("SELECT {} FROM users WHERE id = ?1", USER_COLUMNS),
            params![id],
            user_from_row,
        )?;
        Ok(user)
    }

    pub fn get_user(&self, id: i64) -> DbResult<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                &format!("SELECT {} FROM users WHERE id = ?1", USER_COLUMNS),
                params![id],
                user_from_row,
            )
            .optional()?;
        Ok(user)
    }

    pub fn get_user_by_username(&self, username: &str) -> DbResult<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                &format!("SELECT {} FROM users WHERE username = ?1", USER_COLUMNS),
                params![username],
                user_from_row,
            )
            .optional()?;
        Ok(user)
    }

    /// Fetch a user together with the stored password hash, for login
    pub fn get_user_credentials(&self, username: &str) -> DbResult<Option<(User, String)>> {
        let conn = self.conn()?;
        let found = conn
            .query_row(
                &format!(
                    "SELECT {}, password_hash FROM users WHERE username = ?1",
                    USER_COLUMNS
                ),
                params![username],
                |row| Ok((user_from_row(row)?, row.get::<_, String>(6)?)),
            )
            .optional()?;
        Ok(found)
    }

    /// Grant or revoke the elevated roles of an existing user
    pub fn set_user_roles(&self, id: i64, is_staff: bool, is_admin: bool) -> DbResult<bool> {
        let conn = self.conn()?;
        let rows = conn.execute(
            "UPDATE users SET is_staff = ?1, is_admin = ?2 WHERE id = ?3",
            params![is_staff, is_admin, id],
        )?;
        Ok(rows > 0)
    }
}
