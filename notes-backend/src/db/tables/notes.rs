//! Note database operations.
//!
//! Create and update write the note and its grant list in one transaction, so
//! a saved note is never left with a half-applied `shared_to`.

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db::sqlite::{parse_timestamp, timestamp};
use crate::db::{Database, DbResult};
use crate::models::Note;

pub(crate) const NOTE_COLUMNS: &str = "n.id, n.owner_id, n.content, n.created_at, n.updated_at";

pub(crate) fn note_from_row(row: &Row<'_>) -> rusqlite::Result<Note> {
    let created_at: String = row.get(3)?;
    let updated_at: String = row.get(4)?;
    Ok(Note {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        content: row.get(2)?,
        created_at: parse_timestamp(3, &created_at)?,
        updated_at: parse_timestamp(4, &updated_at)?,
    })
}

fn select_note(conn: &Connection, note_id: i64) -> rusqlite::Result<Option<Note>> {
    conn.query_row(
        &format!("SELECT {} FROM notes n WHERE n.id = ?1", NOTE_COLUMNS),
        params![note_id],
        note_from_row,
    )
    .optional()
}

/// Insert one grant per target that names an existing user other than the
/// owner. Repeated ids collapse onto the UNIQUE(note_id, user_id) row.
fn insert_share_targets(
    conn: &Connection,
    note_id: i64,
    owner_id: i64,
    targets: &[i64],
    now: &str,
) -> rusqlite::Result<usize> {
    let mut stmt = conn.prepare(
        "INSERT OR IGNORE INTO note_shares (note_id, user_id, created_at)
         SELECT ?1, id, ?3 FROM users WHERE id = ?2 AND id != ?4",
    )?;

    let mut created = 0;
    for target in targets {
        created += stmt.execute(params![note_id, target, now, owner_id])?;
    }
    Ok(created)
}

impl Database {
    /// Create a note and, when `shared_to` is given, its initial grants
    pub fn create_note_with_shares(
        &self,
        owner_id: i64,
        content: &str,
        shared_to: Option<&[i64]>,
    ) -> DbResult<Note> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let now = timestamp(Utc::now());

        tx.execute(
            "INSERT INTO notes (owner_id, content, created_at, updated_at) VALUES (?1, ?2, ?3, ?3)",
            params![owner_id, content, now],
        )?;
        let note_id = tx.last_insert_rowid();

        if let Some(targets) = shared_to {
            let created = insert_share_targets(&tx, note_id, owner_id, targets, &now)?;
            log::debug!("[DB] Note {} created with {} grants", note_id, created);
        }

        let note = select_note(&tx, note_id)?.ok_or(rusqlite::Error::QueryReturnedNoRows)?;
        tx.commit()?;
        Ok(note)
    }

    /// Update a note's content and optionally replace its whole grant list.
    ///
    /// `updated_at` is bumped on every call. The note owner is excluded from the
    /// new grant list regardless of who performs the update. Returns `None` if
    /// the note does not exist.
    pub fn update_note_with_shares(
        &self,
        note_id: i64,
        content: Option<&str>,
        shared_to: Option<&[i64]>,
    ) -> DbResult<Option<Note>> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let existing = match select_note(&tx, note_id)? {
            Some(note) => note,
            None => return Ok(None),
        };
        let now = timestamp(Utc::now());

        tx.execute(
            "UPDATE notes SET content = ?1, updated_at = ?2 WHERE id = ?3",
            params![content.unwrap_or(existing.content.as_str()), now, note_id],
        )?;

        if let Some(targets) = shared_to {
            tx.execute("DELETE FROM note_shares WHERE note_id = ?1", params![note_id])?;
            insert_share_targets(&tx, note_id, existing.owner_id, targets, &now)?;
        }

        let note = select_note(&tx, note_id)?;
        tx.commit()?;
        Ok(note)
    }

    pub fn get_note(&self, note_id: i64) -> DbResult<Option<Note>> {
        let conn = self.conn()?;
        Ok(select_note(&conn, note_id)?)
    }

    /// All notes owned by `owner_id`, oldest first
    pub fn list_notes_by_owner(&self, owner_id: i64) -> DbResult<Vec<Note>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM notes n WHERE n.owner_id = ?1 ORDER BY n.id",
            NOTE_COLUMNS
        ))?;
        let notes = stmt
            .query_map(params![owner_id], note_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(notes)
    }

    /// Delete a note; its grants go with it via ON DELETE CASCADE
    pub fn delete_note(&self, note_id: i64) -> DbResult<bool> {
        let conn = self.conn()?;
        let rows = conn.execute("DELETE FROM notes WHERE id = ?1", params![note_id])?;
        Ok(rows > 0)
    }
}
