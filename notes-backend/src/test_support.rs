//! Shared fixtures for unit and endpoint tests.

use actix_web::web;
use std::sync::Arc;
use tempfile::{tempdir, TempDir};

use crate::config::Config;
use crate::db::Database;
use crate::models::User;
use crate::AppState;

/// Placeholder hash; fixture users log in through `bearer`, not passwords
const FIXTURE_PASSWORD_HASH: &str = "!";

pub fn test_db() -> (TempDir, Database) {
    let dir = tempdir().expect("Failed to create temp dir");
    let db_path = dir.path().join("test.db");
    let db = Database::new(db_path.to_str().expect("utf-8 temp path"), 4)
        .expect("Failed to create database");
    (dir, db)
}

pub fn test_state() -> (TempDir, web::Data<AppState>) {
    let (dir, db) = test_db();
    let state = web::Data::new(AppState {
        db: Arc::new(db),
        config: Config::default(),
        started_at: std::time::Instant::now(),
    });
    (dir, state)
}

fn insert_user(db: &Database, username: &str, is_staff: bool, is_admin: bool) -> User {
    db.create_user(
        username,
        &format!("{}@example.com", username),
        FIXTURE_PASSWORD_HASH,
        is_staff,
        is_admin,
    )
    .expect("Failed to create user")
}

pub fn make_user(db: &Database, username: &str) -> User {
    insert_user(db, username, false, false)
}

pub fn make_staff(db: &Database, username: &str) -> User {
    insert_user(db, username, true, false)
}

pub fn make_admin(db: &Database, username: &str) -> User {
    insert_user(db, username, false, true)
}

/// Open a session for `user` and return the matching Authorization header
pub fn bearer(db: &Database, user: &User) -> (&'static str, String) {
    let session = db.create_session(user.id, 24).expect("Failed to create session");
    ("Authorization", format!("Bearer {}", session.token))
}

/// Build the full service around a `web::Data<AppState>`, as `main` does
macro_rules! test_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data($state.clone())
                .app_data(crate::controllers::json_config())
                .app_data(crate::controllers::path_config())
                .wrap(actix_web::middleware::NormalizePath::trim())
                .configure(crate::controllers::configure),
        )
        .await
    };
}

pub(crate) use test_app;
