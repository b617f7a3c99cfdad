//! Request-independent business logic. Controllers authenticate the caller,
//! then hand a resolved `User` to one of these services.

pub mod auth;
pub mod notes;
pub mod password;
pub mod sharing;

pub use auth::AuthService;
pub use notes::{NoteChanges, NoteService};
pub use sharing::SharingService;
