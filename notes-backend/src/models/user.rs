use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An account that can own notes and receive grants.
///
/// The password hash lives only in the `users` table and is never loaded into
/// this struct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub is_staff: bool,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

/// Public projection of a user, as listed on a note's share endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
    pub email: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        UserSummary {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}
