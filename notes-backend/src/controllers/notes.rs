//! Notes REST API: owner-scoped CRUD plus the per-note share endpoints.

use actix_web::{web, HttpResponse};

use super::auth::AuthUser;
use super::shares;
use crate::error::ApiError;
use crate::models::{CreateNoteRequest, PatchNoteRequest, UpdateNoteRequest};
use crate::services::{NoteChanges, NoteService, SharingService};
use crate::AppState;

/// List the caller's own notes
async fn list_notes(
    AuthUser(user): AuthUser,
    data: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let notes = NoteService::new(&data.db).list(&user)?;
    Ok(HttpResponse::Ok().json(notes))
}

async fn create_note(
    AuthUser(user): AuthUser,
    data: web::Data<AppState>,
    body: web::Json<CreateNoteRequest>,
) -> Result<HttpResponse, ApiError> {
    let note = NoteService::new(&data.db).create(&user, &body.content, body.shared_to.as_deref())?;
    Ok(HttpResponse::Created().json(note))
}

async fn get_note(
    AuthUser(user): AuthUser,
    data: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let note = NoteService::new(&data.db).retrieve(&user, path.into_inner())?;
    Ok(HttpResponse::Ok().json(note))
}

/// Full update: content is required
async fn update_note(
    AuthUser(user): AuthUser,
    data: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<UpdateNoteRequest>,
) -> Result<HttpResponse, ApiError> {
    let changes = NoteChanges {
        content: Some(body.content.as_str()),
        shared_to: body.shared_to.as_deref(),
    };
    let note = NoteService::new(&data.db).update(&user, path.into_inner(), changes)?;
    Ok(HttpResponse::Ok().json(note))
}

/// Partial update: any subset of content / shared_to
async fn patch_note(
    AuthUser(user): AuthUser,
    data: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<PatchNoteRequest>,
) -> Result<HttpResponse, ApiError> {
    let changes = NoteChanges {
        content: body.content.as_deref(),
        shared_to: body.shared_to.as_deref(),
    };
    let note = NoteService::new(&data.db).update(&user, path.into_inner(), changes)?;
    Ok(HttpResponse::Ok().json(note))
}

async fn delete_note(
    AuthUser(user): AuthUser,
    data: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    NoteService::new(&data.db).destroy(&user, path.into_inner())?;
    Ok(HttpResponse::NoContent().finish())
}

/// Notes other users have shared with the caller
async fn shared_with_me(
    AuthUser(user): AuthUser,
    data: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let notes = SharingService::new(&data.db).list_shared_with_me(&user)?;
    Ok(HttpResponse::Ok().json(notes))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/notes")
            .route("", web::get().to(list_notes))
            .route("", web::post().to(create_note))
            // Must precede /{id}
            .route("/shared-with-me", web::get().to(shared_with_me))
            .route("/{id}", web::get().to(get_note))
            .route("/{id}", web::put().to(update_note))
            .route("/{id}", web::patch().to(patch_note))
            .route("/{id}", web::delete().to(delete_note))
            .route("/{id}/share", web::get().to(shares::list_note_shares))
            .route("/{id}/share", web::post().to(shares::share_note))
            .route("/{id}/share", web::delete().to(shares::unshare_note)),
    );
}
