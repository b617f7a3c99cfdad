//! Auth session database operations

use chrono::{DateTime, Duration, Utc};
use rusqlite::{params, OptionalExtension};
use uuid::Uuid;

use super::users::user_from_row;
use crate::db::sqlite::timestamp;
use crate::db::{Database, DbError, DbResult};
use crate::models::{Session, User};

fn expiry_after(from: DateTime<Utc>, ttl_hours: i64) -> DbResult<DateTime<Utc>> {
    Duration::try_hours(ttl_hours)
        .and_then(|ttl| from.checked_add_signed(ttl))
        .ok_or(DbError::SessionTtl(ttl_hours))
}

impl Database {
    /// Create a new bearer-token session for `user_id`
    pub fn create_session(&self, user_id: i64, ttl_hours: i64) -> DbResult<Session> {
        let conn = self.conn()?;
        let token = Uuid::new_v4().to_string();
        let created_at = Utc::now();
        let expires_at = expiry_after(created_at, ttl_hours)?;

        conn.execute(
            "INSERT INTO auth_sessions (token, user_id, created_at, expires_at) VALUES (?1, ?2, ?3, ?4)",
            params![token, user_id, timestamp(created_at), timestamp(expires_at)],
        )?;

        let id = conn.last_insert_rowid();

        Ok(Session {
            id,
            token,
            user_id,
            created_at,
            expires_at,
        })
    }

    /// Resolve a session token to its user and extend the expiry if valid
    pub fn validate_session(&self, token: &str, ttl_hours: i64) -> DbResult<Option<User>> {
        let conn = self.conn()?;
        let now = Utc::now();

        let user = conn
            .query_row(
                "SELECT u.id, u.username, u.email, u.is_staff, u.is_admin, u.created_at
                 FROM auth_sessions s
                 JOIN users u ON u.id = s.user_id
                 WHERE s.token = ?1 AND s.expires_at > ?2",
                params![token, timestamp(now)],
                user_from_row,
            )
            .optional()?;

        // Keep active sessions alive
        if user.is_some() {
            let new_expires = timestamp(expiry_after(now, ttl_hours)?);
            conn.execute(
                "UPDATE auth_sessions SET expires_at = ?1 WHERE token = ?2",
                params![new_expires, token],
            )?;
        }

        Ok(user)
    }

    /// Delete a session (logout)
    pub fn delete_session(&self, token: &str) -> DbResult<bool> {
        let conn = self.conn()?;
        let rows_affected = conn.execute("DELETE FROM auth_sessions WHERE token = ?1", [token])?;
        Ok(rows_affected > 0)
    }

    /// Drop every session whose expiry has passed
    pub fn delete_expired_sessions(&self) -> DbResult<usize> {
        let conn = self.conn()?;
        let rows = conn.execute(
            "DELETE FROM auth_sessions WHERE expires_at <= ?1",
            params![timestamp(Utc::now())],
        )?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use rusqlite::params;

    use crate::db::sqlite::timestamp;
    use crate::db::DbError;
    use crate::test_support::{make_user, test_db};

    #[test]
    fn test_session_lifecycle() {
        let (_dir, db) = test_db();
        let user = make_user(&db, "alice");

        let session = db.create_session(user.id, 24).expect("Failed to create session");
        let resolved = db.validate_session(&session.token, 24).unwrap();
        assert_eq!(resolved.map(|u| u.id), Some(user.id));

        assert!(db.delete_session(&session.token).unwrap());
        assert!(db.validate_session(&session.token, 24).unwrap().is_none());
    }

    #[test]
    fn test_expired_session_is_rejected_and_purged() {
        let (_dir, db) = test_db();
        let user = make_user(&db, "alice");
        let session = db.create_session(user.id, 24).unwrap();

        let past = timestamp(Utc::now() - Duration::hours(1));
        db.conn()
            .unwrap()
            .execute(
                "UPDATE auth_sessions SET expires_at = ?1 WHERE token = ?2",
                params![past, session.token],
            )
            .unwrap();

        assert!(db.validate_session(&session.token, 24).unwrap().is_none());
        assert_eq!(db.delete_expired_sessions().unwrap(), 1);
    }

    #[test]
    fn test_out_of_range_ttl_is_an_error() {
        let (_dir, db) = test_db();
        let user = make_user(&db, "alice");

        let err = db.create_session(user.id, i64::MAX).unwrap_err();
        assert!(matches!(err, DbError::SessionTtl(_)));

        let session = db.create_session(user.id, 24).unwrap();
        assert!(db.validate_session(&session.token, i64::MAX).is_err());
    }

    #[test]
    fn test_unknown_token() {
        let (_dir, db) = test_db();
        assert!(db.validate_session("nope", 24).unwrap().is_none());
    }
}
