//! Database operations for the note_shares table (the sharing index)

use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row};

use super::notes::{note_from_row, NOTE_COLUMNS};
use crate::db::sqlite::{parse_timestamp, timestamp};
use crate::db::{Database, DbResult};
use crate::models::{NoteShare, SharedNote, UserSummary};

const SHARE_COLUMNS: &str = "id, note_id, user_id, created_at";

fn share_from_row(row: &Row<'_>) -> rusqlite::Result<NoteShare> {
    let created_at: String = row.get(3)?;
    Ok(NoteShare {
        id: row.get(0)?,
        note_id: row.get(1)?,
        user_id: row.get(2)?,
        created_at: parse_timestamp(3, &created_at)?,
    })
}

impl Database {
    /// Create a single grant. Duplicate pairs and unknown note/user ids fail
    /// with a constraint violation.
    pub fn create_note_share(&self, note_id: i64, user_id: i64) -> DbResult<NoteShare> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO note_shares (note_id, user_id, created_at) VALUES (?1, ?2, ?3)",
            params![note_id, user_id, timestamp(Utc::now())],
        )?;
        let id = conn.last_insert_rowid();
        let share = conn.query_row(
            &format!("SELECT {} FROM note_shares WHERE id = ?1", SHARE_COLUMNS),
            params![id],
            share_from_row,
        )?;
        Ok(share)
    }

    /// Remove the grant for (note, user). Returns false when none existed.
    pub fn delete_note_share(&self, note_id: i64, user_id: i64) -> DbResult<bool> {
        let conn = self.conn()?;
        let rows = conn.execute(
            "DELETE FROM note_shares WHERE note_id = ?1 AND user_id = ?2",
            params![note_id, user_id],
        )?;
        Ok(rows > 0)
    }

    pub fn get_note_share(&self, id: i64) -> DbResult<Option<NoteShare>> {
        let conn = self.conn()?;
        let share = conn
            .query_row(
                &format!("SELECT {} FROM note_shares WHERE id = ?1", SHARE_COLUMNS),
                params![id],
                share_from_row,
            )
            .optional()?;
        Ok(share)
    }

    pub fn delete_note_share_by_id(&self, id: i64) -> DbResult<bool> {
        let conn = self.conn()?;
        let rows = conn.execute("DELETE FROM note_shares WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    /// Every grant in the system, oldest first
    pub fn list_all_note_shares(&self) -> DbResult<Vec<NoteShare>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM note_shares ORDER BY id",
            SHARE_COLUMNS
        ))?;
        let shares = stmt
            .query_map([], share_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(shares)
    }

    /// Ids of the users a note is shared with, ascending
    pub fn list_share_user_ids(&self, note_id: i64) -> DbResult<Vec<i64>> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare("SELECT user_id FROM note_shares WHERE note_id = ?1 ORDER BY user_id")?;
        let ids = stmt
            .query_map(params![note_id], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<i64>>>()?;
        Ok(ids)
    }

    /// Users a note is shared with, in grant order
    pub fn list_share_users(&self, note_id: i64) -> DbResult<Vec<UserSummary>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT u.id, u.username, u.email
             FROM note_shares s
             JOIN users u ON u.id = s.user_id
             WHERE s.note_id = ?1
             ORDER BY s.id",
        )?;
        let users = stmt
            .query_map(params![note_id], |row| {
                Ok(UserSummary {
                    id: row.get(0)?,
                    username: row.get(1)?,
                    email: row.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(users)
    }

    /// Notes with an active grant targeting `user_id`, joined with owner names
    pub fn list_notes_shared_with(&self, user_id: i64) -> DbResult<Vec<SharedNote>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {}, u.username
             FROM note_shares s
             JOIN notes n ON n.id = s.note_id
             JOIN users u ON u.id = n.owner_id
             WHERE s.user_id = ?1
             ORDER BY n.id",
            NOTE_COLUMNS
        ))?;
        let notes = stmt
            .query_map(params![user_id], |row| {
                Ok(SharedNote {
                    note: note_from_row(row)?,
                    owner_username: row.get(5)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(notes)
    }
}
