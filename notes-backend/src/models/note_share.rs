use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A read grant: `user` may read `note` without owning it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteShare {
    pub id: i64,
    #[serde(rename = "note")]
    pub note_id: i64,
    #[serde(rename = "user")]
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST` / `DELETE /api/notes/{id}/share`
#[derive(Debug, Clone, Deserialize)]
pub struct ShareRequest {
    pub user_id: i64,
}

/// Body of `POST /api/note-users`
#[derive(Debug, Clone, Deserialize)]
pub struct CreateGrantRequest {
    pub note: i64,
    pub user: i64,
}
