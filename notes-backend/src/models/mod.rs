mod auth_session;
mod note;
mod note_share;
mod user;

pub use auth_session::{LoginRequest, LoginResponse, RegisterRequest, Session};
pub use note::{
    CreateNoteRequest, Note, NoteResponse, PatchNoteRequest, SharedNote, SharedNoteResponse,
    UpdateNoteRequest,
};
pub use note_share::{CreateGrantRequest, NoteShare, ShareRequest};
pub use user::{User, UserSummary};
