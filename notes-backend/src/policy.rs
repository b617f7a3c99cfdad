//! Access-control policy for notes.
//!
//! Roles are a capability set evaluated as a pure predicate; nothing here
//! touches the database.

use crate::error::ApiError;
use crate::models::{Note, User};

/// What a requester holds relative to one note
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub owner: bool,
    pub staff: bool,
    pub admin: bool,
}

impl Capabilities {
    /// Role capabilities alone, with no note in view
    pub fn of_user(user: &User) -> Self {
        Capabilities {
            owner: false,
            staff: user.is_staff,
            admin: user.is_admin,
        }
    }

    pub fn of(user: &User, note: &Note) -> Self {
        Capabilities {
            owner: user.id == note.owner_id,
            ..Self::of_user(user)
        }
    }

    pub fn is_elevated(self) -> bool {
        self.staff || self.admin
    }

    pub fn can_manage(self) -> bool {
        self.owner || self.is_elevated()
    }
}

/// `requester.is_staff || requester.is_admin || requester == note.owner`
pub fn can_manage(requester: &User, note: &Note) -> bool {
    Capabilities::of(requester, note).can_manage()
}

/// Sharing operations: refuse with Forbidden
pub fn ensure_can_manage(requester: &User, note: &Note) -> Result<(), ApiError> {
    if can_manage(requester, note) {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}

/// Note record operations: the same predicate, but a miss reads as NotFound
pub fn ensure_can_access(requester: &User, note: &Note) -> Result<(), ApiError> {
    if can_manage(requester, note) {
        Ok(())
    } else {
        Err(ApiError::note_not_found())
    }
}

pub fn ensure_elevated(requester: &User) -> Result<(), ApiError> {
    if Capabilities::of_user(requester).is_elevated() {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(id: i64, is_staff: bool, is_admin: bool) -> User {
        User {
            id,
            username: format!("user{}", id),
            email: String::new(),
            is_staff,
            is_admin,
            created_at: Utc::now(),
        }
    }

    fn note_owned_by(owner_id: i64) -> Note {
        Note {
            id: 1,
            owner_id,
            content: "body".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_can_manage_truth_table() {
        let note = note_owned_by(1);

        assert!(can_manage(&user(1, false, false), &note));
        assert!(can_manage(&user(2, true, false), &note));
        assert!(can_manage(&user(2, false, true), &note));
        assert!(!can_manage(&user(2, false, false), &note));
    }

    #[test]
    fn test_denials_map_to_distinct_errors() {
        let note = note_owned_by(1);
        let stranger = user(2, false, false);

        assert!(matches!(ensure_can_manage(&stranger, &note), Err(ApiError::Forbidden)));
        assert!(matches!(ensure_can_access(&stranger, &note), Err(ApiError::NotFound(_))));
        assert!(ensure_can_access(&user(1, false, false), &note).is_ok());
    }

    #[test]
    fn test_ensure_elevated() {
        assert!(ensure_elevated(&user(1, true, false)).is_ok());
        assert!(ensure_elevated(&user(1, false, true)).is_ok());
        assert!(matches!(ensure_elevated(&user(1, false, false)), Err(ApiError::Forbidden)));
    }
}
