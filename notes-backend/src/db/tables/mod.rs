//! Table-level operations, each module contributing an `impl Database` block.

mod auth_sessions;
mod note_shares;
mod notes;
mod users;
