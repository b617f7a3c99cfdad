//! Sharing endpoints: per-note grants under `/api/notes/{id}/share` and the
//! staff-only grant registry under `/api/note-users`.

use actix_web::{web, HttpResponse};

use super::auth::AuthUser;
use crate::error::ApiError;
use crate::models::{CreateGrantRequest, ShareRequest};
use crate::services::SharingService;
use crate::AppState;

/// Users with access to a note
pub(crate) async fn list_note_shares(
    AuthUser(user): AuthUser,
    data: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let users = SharingService::new(&data.db).list_grants(&user, path.into_inner())?;
    Ok(HttpResponse::Ok().json(users))
}

pub(crate) async fn share_note(
    AuthUser(user): AuthUser,
    data: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<ShareRequest>,
) -> Result<HttpResponse, ApiError> {
    SharingService::new(&data.db).grant(&user, path.into_inner(), body.user_id)?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true })))
}

pub(crate) async fn unshare_note(
    AuthUser(user): AuthUser,
    data: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<ShareRequest>,
) -> Result<HttpResponse, ApiError> {
    SharingService::new(&data.db).revoke(&user, path.into_inner(), body.user_id)?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true })))
}

// --- Grant registry ---

async fn list_grants(
    AuthUser(user): AuthUser,
    data: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let grants = SharingService::new(&data.db).list_all_grants(&user)?;
    Ok(HttpResponse::Ok().json(grants))
}

async fn create_grant(
    AuthUser(user): AuthUser,
    data: web::Data<AppState>,
    body: web::Json<CreateGrantRequest>,
) -> Result<HttpResponse, ApiError> {
    let grant = SharingService::new(&data.db).create_grant(&user, body.note, body.user)?;
    Ok(HttpResponse::Created().json(grant))
}

async fn get_grant(
    AuthUser(user): AuthUser,
    data: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let grant = SharingService::new(&data.db).get_grant(&user, path.into_inner())?;
    Ok(HttpResponse::Ok().json(grant))
}

async fn delete_grant(
    AuthUser(user): AuthUser,
    data: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    SharingService::new(&data.db).delete_grant(&user, path.into_inner())?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/note-users")
            .route("", web::get().to(list_grants))
            .route("", web::post().to(create_grant))
            .route("/{id}", web::get().to(get_grant))
            .route("/{id}", web::delete().to(delete_grant)),
    );
}
