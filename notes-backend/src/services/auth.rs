//! Local accounts and bearer-token sessions.

use crate::config::AdminBootstrap;
use crate::db::sqlite::is_constraint_violation;
use crate::db::Database;
use crate::error::ApiError;
use crate::models::{LoginResponse, User};
use crate::services::password::{hash_password, verify_password};

const MIN_USERNAME_LEN: usize = 3;
const MAX_USERNAME_LEN: usize = 150;
const MIN_PASSWORD_LEN: usize = 8;

pub struct AuthService<'a> {
    db: &'a Database,
    session_ttl_hours: i64,
}

fn validate_username(username: &str) -> Result<(), ApiError> {
    let len = username.chars().count();
    if !(MIN_USERNAME_LEN..=MAX_USERNAME_LEN).contains(&len) {
        return Err(ApiError::BadRequest(format!(
            "username must be between {} and {} characters",
            MIN_USERNAME_LEN, MAX_USERNAME_LEN
        )));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '@' | '+' | '-'))
    {
        return Err(ApiError::BadRequest(
            "username may only contain letters, digits and _ . @ + -".to_string(),
        ));
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), ApiError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::BadRequest(format!(
            "password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

impl<'a> AuthService<'a> {
    pub fn new(db: &'a Database, session_ttl_hours: i64) -> Self {
        Self {
            db,
            session_ttl_hours,
        }
    }

    pub fn register(&self, username: &str, email: &str, password: &str) -> Result<User, ApiError> {
        self.insert_user(username.trim(), email.trim(), password, false, false)
    }

    /// Check credentials and open a new session
    pub fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let invalid = || ApiError::Unauthorized("Invalid username or password".to_string());

        let (user, hash) = self
            .db
            .get_user_credentials(username.trim())?
            .ok_or_else(invalid)?;

        let matches = verify_password(password, &hash).map_err(|e| {
            log::error!("[AUTH] Stored hash for user {} is unusable: {}", user.id, e);
            invalid()
        })?;
        if !matches {
            log::warn!("[AUTH] Failed login for {}", user.username);
            return Err(invalid());
        }

        let session = self.db.create_session(user.id, self.session_ttl_hours)?;
        log::info!("[AUTH] User {} logged in", user.id);
        Ok(LoginResponse {
            token: session.token,
            expires_at: session.expires_at,
            user,
        })
    }

    pub fn logout(&self, token: &str) -> Result<(), ApiError> {
        self.db.delete_session(token)?;
        Ok(())
    }

    /// Resolve a bearer token to its user
    pub fn authenticate(&self, token: &str) -> Result<User, ApiError> {
        self.db
            .validate_session(token, self.session_ttl_hours)?
            .ok_or_else(|| ApiError::Unauthorized("Invalid or expired session".to_string()))
    }

    /// Make sure the configured bootstrap admin exists and holds both roles.
    /// An existing account keeps its password.
    pub fn ensure_admin(&self, admin: &AdminBootstrap) -> Result<User, ApiError> {
        if let Some(existing) = self.db.get_user_by_username(admin.username.trim())? {
            if !(existing.is_staff && existing.is_admin) {
                self.db.set_user_roles(existing.id, true, true)?;
                log::info!("[AUTH] Promoted {} to admin", existing.username);
            }
            return self
                .db
                .get_user(existing.id)?
                .ok_or_else(|| ApiError::NotFound("User not found".to_string()));
        }

        let user = self.insert_user(
            admin.username.trim(),
            admin.email.trim(),
            &admin.password,
            true,
            true,
        )?;
        log::info!("[AUTH] Created bootstrap admin {}", user.username);
        Ok(user)
    }

    /// Validate and store a new account. Every creation path goes through here.
    fn insert_user(
        &self,
        username: &str,
        email: &str,
        password: &str,
        is_staff: bool,
        is_admin: bool,
    ) -> Result<User, ApiError> {
        validate_username(username)?;
        validate_password(password)?;

        let hash = hash_password(password)?;
        match self.db.create_user(username, email, &hash, is_staff, is_admin) {
            Ok(user) => Ok(user),
            Err(e) if is_constraint_violation(&e) => Err(ApiError::BadRequest(
                "A user with that username already exists.".to_string(),
            )),
            Err(e) => Err(e.into()),
        }
    }
}
