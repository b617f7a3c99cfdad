//! Sharing operations over the note_shares index.
//!
//! Every per-note operation requires the requester to own the note or hold
//! the staff/admin role; the grant registry is staff/admin only.

use crate::db::Database;
use crate::error::ApiError;
use crate::models::{Note, NoteShare, SharedNoteResponse, User, UserSummary};
use crate::policy;

pub struct SharingService<'a> {
    db: &'a Database,
}

impl<'a> SharingService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Users the note is currently shared with
    pub fn list_grants(&self, requester: &User, note_id: i64) -> Result<Vec<UserSummary>, ApiError> {
        let note = self.load_note(note_id)?;
        policy::ensure_can_manage(requester, &note)?;
        Ok(self.db.list_share_users(note_id)?)
    }

    pub fn grant(&self, requester: &User, note_id: i64, user_id: i64) -> Result<NoteShare, ApiError> {
        let note = self.load_note(note_id)?;
        policy::ensure_can_manage(requester, &note)?;

        let share = self.insert_grant(&note, user_id)?;
        log::info!(
            "[SHARE] User {} shared note {} with user {}",
            requester.id,
            note_id,
            user_id
        );
        Ok(share)
    }

    pub fn revoke(&self, requester: &User, note_id: i64, user_id: i64) -> Result<(), ApiError> {
        let note = self.load_note(note_id)?;
        policy::ensure_can_manage(requester, &note)?;

        if !self.db.delete_note_share(note_id, user_id)? {
            return Err(ApiError::wrapped_not_found(format!(
                "Note {} is not shared with user {}.",
                note_id, user_id
            )));
        }
        log::info!(
            "[SHARE] User {} revoked user {} from note {}",
            requester.id,
            user_id,
            note_id
        );
        Ok(())
    }

    /// Notes other users have shared with the requester
    pub fn list_shared_with_me(&self, requester: &User) -> Result<Vec<SharedNoteResponse>, ApiError> {
        Ok(self
            .db
            .list_notes_shared_with(requester.id)?
            .into_iter()
            .map(SharedNoteResponse::from)
            .collect())
    }

    // --- Grant registry (staff/admin) ---

    pub fn list_all_grants(&self, requester: &User) -> Result<Vec<NoteShare>, ApiError> {
        policy::ensure_elevated(requester)?;
        Ok(self.db.list_all_note_shares()?)
    }

    pub fn get_grant(&self, requester: &User, grant_id: i64) -> Result<NoteShare, ApiError> {
        policy::ensure_elevated(requester)?;
        self.db
            .get_note_share(grant_id)?
            .ok_or_else(|| ApiError::NotFound("Grant not found".to_string()))
    }

    pub fn create_grant(&self, requester: &User, note_id: i64, user_id: i64) -> Result<NoteShare, ApiError> {
        policy::ensure_elevated(requester)?;
        let note = self.load_note(note_id)?;
        let share = self.insert_grant(&note, user_id)?;
        log::info!("[SHARE] User {} created grant {}", requester.id, share.id);
        Ok(share)
    }

    pub fn delete_grant(&self, requester: &User, grant_id: i64) -> Result<(), ApiError> {
        policy::ensure_elevated(requester)?;
        if !self.db.delete_note_share_by_id(grant_id)? {
            return Err(ApiError::NotFound("Grant not found".to_string()));
        }
        log::info!("[SHARE] User {} deleted grant {}", requester.id, grant_id);
        Ok(())
    }

    fn load_note(&self, note_id: i64) -> Result<Note, ApiError> {
        self.db.get_note(note_id)?.ok_or_else(ApiError::note_not_found)
    }

    /// Persist one grant; any storage failure comes back as a wrapped service error
    fn insert_grant(&self, note: &Note, user_id: i64) -> Result<NoteShare, ApiError> {
        if user_id == note.owner_id {
            return Err(ApiError::Service(
                "A note cannot be shared with its owner.".to_string(),
            ));
        }
        self.db.create_note_share(note.id, user_id).map_err(|e| {
            log::warn!("[SHARE] Failed to share note {} with user {}: {}", note.id, user_id, e);
            ApiError::Service(e.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{NoteChanges, NoteService};
    use crate::test_support::{make_admin, make_staff, make_user, test_db};

    #[test]
    fn test_owner_can_grant_list_and_revoke() {
        let (_dir, db) = test_db();
        let notes = NoteService::new(&db);
        let sharing = SharingService::new(&db);
        let owner = make_user(&db, "owner");
        let reader = make_user(&db, "reader");

        let note = notes.create(&owner, "draft", None).unwrap();
        sharing.grant(&owner, note.id, reader.id).unwrap();

        let users = sharing.list_grants(&owner, note.id).unwrap();
        assert_eq!(users, vec![UserSummary::from(&reader)]);

        sharing.revoke(&owner, note.id, reader.id).unwrap();
        assert!(sharing.list_grants(&owner, note.id).unwrap().is_empty());
    }

    #[test]
    fn test_non_owner_is_forbidden() {
        let (_dir, db) = test_db();
        let notes = NoteService::new(&db);
        let sharing = SharingService::new(&db);
        let owner = make_user(&db, "owner");
        let reader = make_user(&db, "reader");
        let stranger = make_user(&db, "stranger");

        let note = notes.create(&owner, "draft", Some(&[reader.id])).unwrap();

        assert!(matches!(sharing.list_grants(&stranger, note.id), Err(ApiError::Forbidden)));
        assert!(matches!(sharing.grant(&stranger, note.id, stranger.id), Err(ApiError::Forbidden)));
        assert!(matches!(sharing.revoke(&stranger, note.id, reader.id), Err(ApiError::Forbidden)));
        // A grant target is a reader, not a manager
        assert!(matches!(sharing.grant(&reader, note.id, stranger.id), Err(ApiError::Forbidden)));
    }

    #[test]
    fn test_staff_and_admin_can_manage_any_note() {
        let (_dir, db) = test_db();
        let notes = NoteService::new(&db);
        let sharing = SharingService::new(&db);
        let owner = make_user(&db, "owner");
        let staff = make_staff(&db, "staff");
        let admin = make_admin(&db, "root");
        let reader = make_user(&db, "reader");

        let note = notes.create(&owner, "draft", None).unwrap();
        sharing.grant(&staff, note.id, reader.id).unwrap();
        assert_eq!(sharing.list_grants(&admin, note.id).unwrap().len(), 1);
        sharing.revoke(&admin, note.id, reader.id).unwrap();
    }

    #[test]
    fn test_duplicate_and_invalid_grants_are_service_errors() {
        let (_dir, db) = test_db();
        let notes = NoteService::new(&db);
        let sharing = SharingService::new(&db);
        let owner = make_user(&db, "owner");
        let reader = make_user(&db, "reader");

        let note = notes.create(&owner, "draft", None).unwrap();
        sharing.grant(&owner, note.id, reader.id).unwrap();

        let dup = sharing.grant(&owner, note.id, reader.id).unwrap_err();
        assert!(matches!(dup, ApiError::Service(_)));
        assert!(dup.to_string().starts_with("Something went wrong. Please try again."));

        assert!(matches!(sharing.grant(&owner, note.id, 9999), Err(ApiError::Service(_))));
        assert!(matches!(sharing.grant(&owner, note.id, owner.id), Err(ApiError::Service(_))));
    }

    #[test]
    fn test_revoke_missing_grant_is_not_found() {
        let (_dir, db) = test_db();
        let notes = NoteService::new(&db);
        let sharing = SharingService::new(&db);
        let owner = make_user(&db, "owner");
        let reader = make_user(&db, "reader");

        let note = notes.create(&owner, "draft", None).unwrap();
        let err = sharing.revoke(&owner, note.id, reader.id).unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));

        assert!(matches!(sharing.grant(&owner, 4242, reader.id), Err(ApiError::NotFound(_))));
    }

    #[test]
    fn test_shared_with_me_follows_grant_replacement() {
        let (_dir, db) = test_db();
        let notes = NoteService::new(&db);
        let sharing = SharingService::new(&db);
        let owner = make_user(&db, "owner");
        let u1 = make_user(&db, "u1");
        let u2 = make_user(&db, "u2");

        let draft = notes.create(&owner, "draft", Some(&[u1.id, u2.id])).unwrap();
        let seen_by = |user: &User| -> Vec<i64> {
            sharing
                .list_shared_with_me(user)
                .unwrap()
                .iter()
                .map(|n| n.id)
                .collect()
        };
        assert_eq!(seen_by(&u1), vec![draft.id]);
        assert_eq!(seen_by(&u2), vec![draft.id]);
        assert!(seen_by(&owner).is_empty());

        notes
            .update(
                &owner,
                draft.id,
                NoteChanges {
                    content: None,
                    shared_to: Some(&[u2.id]),
                },
            )
            .unwrap();

        assert!(seen_by(&u1).is_empty());
        assert_eq!(seen_by(&u2), vec![draft.id]);
        assert_eq!(sharing.list_shared_with_me(&u2).unwrap()[0].owner_username, "owner");
    }

    #[test]
    fn test_grant_registry_requires_elevated_role() {
        let (_dir, db) = test_db();
        let notes = NoteService::new(&db);
        let sharing = SharingService::new(&db);
        let owner = make_user(&db, "owner");
        let reader = make_user(&db, "reader");
        let admin = make_admin(&db, "root");

        let note = notes.create(&owner, "draft", None).unwrap();

        assert!(matches!(sharing.list_all_grants(&owner), Err(ApiError::Forbidden)));
        assert!(matches!(sharing.create_grant(&owner, note.id, reader.id), Err(ApiError::Forbidden)));

        let grant = sharing.create_grant(&admin, note.id, reader.id).unwrap();
        assert_eq!(sharing.get_grant(&admin, grant.id).unwrap(), grant);
        assert_eq!(sharing.list_all_grants(&admin).unwrap(), vec![grant.clone()]);

        sharing.delete_grant(&admin, grant.id).unwrap();
        assert!(matches!(sharing.get_grant(&admin, grant.id), Err(ApiError::NotFound(_))));
        assert!(matches!(sharing.delete_grant(&admin, grant.id), Err(ApiError::NotFound(_))));
    }
}
