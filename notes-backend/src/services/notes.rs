//! Note CRUD scoped to the ownership-or-staff filter.

use crate::db::Database;
use crate::error::ApiError;
use crate::models::{Note, NoteResponse, User};
use crate::policy;

/// Fields a note update may carry. `None` leaves the field as it is; for
/// `shared_to` that means existing grants stay untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoteChanges<'a> {
    pub content: Option<&'a str>,
    pub shared_to: Option<&'a [i64]>,
}

pub struct NoteService<'a> {
    db: &'a Database,
}

fn validate_content(content: &str) -> Result<(), ApiError> {
    if content.trim().is_empty() {
        return Err(ApiError::BadRequest("content may not be blank".to_string()));
    }
    Ok(())
}

impl<'a> NoteService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Notes owned by the requester. Staff and admins also only see their own here.
    pub fn list(&self, requester: &User) -> Result<Vec<NoteResponse>, ApiError> {
        self.db
            .list_notes_by_owner(requester.id)?
            .into_iter()
            .map(|note| self.respond(note))
            .collect()
    }

    pub fn create(
        &self,
        requester: &User,
        content: &str,
        shared_to: Option<&[i64]>,
    ) -> Result<NoteResponse, ApiError> {
        validate_content(content)?;

        let note = self.db.create_note_with_shares(requester.id, content, shared_to)?;
        log::info!("[NOTES] User {} created note {}", requester.id, note.id);
        self.respond(note)
    }

    pub fn retrieve(&self, requester: &User, note_id: i64) -> Result<NoteResponse, ApiError> {
        let note = self.load_accessible(requester, note_id)?;
        self.respond(note)
    }

    /// Save new content and, if given, atomically replace the grant list
    pub fn update(
        &self,
        requester: &User,
        note_id: i64,
        changes: NoteChanges<'_>,
    ) -> Result<NoteResponse, ApiError> {
        if let Some(content) = changes.content {
            validate_content(content)?;
        }
        self.load_accessible(requester, note_id)?;

        let note = self
            .db
            .update_note_with_shares(note_id, changes.content, changes.shared_to)?
            .ok_or_else(ApiError::note_not_found)?;

        log::info!(
            "[NOTES] User {} updated note {}{}",
            requester.id,
            note_id,
            if changes.shared_to.is_some() { " (grants replaced)" } else { "" }
        );
        self.respond(note)
    }

    pub fn destroy(&self, requester: &User, note_id: i64) -> Result<(), ApiError> {
        self.load_accessible(requester, note_id)?;
        if !self.db.delete_note(note_id)? {
            return Err(ApiError::note_not_found());
        }
        log::info!("[NOTES] User {} deleted note {}", requester.id, note_id);
        Ok(())
    }

    /// Fetch a note the requester may touch. Others' notes read as missing.
    fn load_accessible(&self, requester: &User, note_id: i64) -> Result<Note, ApiError> {
        let note = self.db.get_note(note_id)?.ok_or_else(ApiError::note_not_found)?;
        policy::ensure_can_access(requester, &note)?;
        Ok(note)
    }

    fn respond(&self, note: Note) -> Result<NoteResponse, ApiError> {
        let shared_to = self.db.list_share_user_ids(note.id)?;
        Ok(NoteResponse::new(note, shared_to))
    }
}
