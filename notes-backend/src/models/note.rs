use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A note as stored in the `notes` table. Served to clients as `NoteResponse`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub id: i64,
    pub owner_id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A note reached through a grant, joined with its owner's username
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedNote {
    pub note: Note,
    pub owner_username: String,
}

/// Body of `POST /api/notes`
#[derive(Debug, Clone, Deserialize)]
pub struct CreateNoteRequest {
    pub content: String,
    /// User ids to share the new note with. Absent means no sharing.
    #[serde(default)]
    pub shared_to: Option<Vec<i64>>,
}

/// Body of `PUT /api/notes/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateNoteRequest {
    pub content: String,
    /// Replacement grant list. Absent leaves existing grants untouched.
    #[serde(default)]
    pub shared_to: Option<Vec<i64>>,
}

/// Body of `PATCH /api/notes/{id}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PatchNoteRequest {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub shared_to: Option<Vec<i64>>,
}

/// Note response for API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteResponse {
    pub id: i64,
    pub owner: i64,
    pub content: String,
    pub shared_to: Vec<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NoteResponse {
    pub fn new(note: Note, shared_to: Vec<i64>) -> Self {
        NoteResponse {
            id: note.id,
            owner: note.owner_id,
            content: note.content,
            shared_to,
            created_at: note.created_at,
            updated_at: note.updated_at,
        }
    }
}

/// Entry of `GET /api/notes/shared-with-me`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedNoteResponse {
    pub id: i64,
    pub owner: i64,
    pub owner_username: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<SharedNote> for SharedNoteResponse {
    fn from(shared: SharedNote) -> Self {
        SharedNoteResponse {
            id: shared.note.id,
            owner: shared.note.owner_id,
            owner_username: shared.owner_username,
            content: shared.note.content,
            created_at: shared.note.created_at,
            updated_at: shared.note.updated_at,
        }
    }
}
