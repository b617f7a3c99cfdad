//! Login/session endpoints and the `AuthUser` extractor.

use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest, HttpResponse};
use std::future::{ready, Ready};

use crate::error::ApiError;
use crate::models::{LoginRequest, RegisterRequest, User};
use crate::services::AuthService;
use crate::AppState;

/// The caller behind a valid `Authorization: Bearer <token>` header.
///
/// Handlers take this as their first argument so unauthenticated requests
/// are rejected before any body is parsed.
pub struct AuthUser(pub User);

fn bearer_token(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn authenticate_request(req: &HttpRequest) -> Result<User, ApiError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| ApiError::Service("application state is not configured".to_string()))?;

    let token = bearer_token(req).ok_or_else(|| {
        ApiError::Unauthorized("Authentication credentials were not provided.".to_string())
    })?;

    AuthService::new(&state.db, state.config.session_ttl_hours).authenticate(&token)
}

impl FromRequest for AuthUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate_request(req).map(AuthUser))
    }
}

fn auth_service(data: &web::Data<AppState>) -> AuthService<'_> {
    AuthService::new(&data.db, data.config.session_ttl_hours)
}

async fn register(
    data: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ApiError> {
    let user = auth_service(&data).register(&body.username, &body.email, &body.password)?;
    Ok(HttpResponse::Created().json(user))
}

async fn login(
    data: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    let response = auth_service(&data).login(&body.username, &body.password)?;
    Ok(HttpResponse::Ok().json(response))
}

async fn logout(
    AuthUser(user): AuthUser,
    data: web::Data<AppState>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    if let Some(token) = bearer_token(&req) {
        auth_service(&data).logout(&token)?;
    }
    log::info!("[AUTH] User {} logged out", user.id);
    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true })))
}

async fn me(AuthUser(user): AuthUser) -> HttpResponse {
    HttpResponse::Ok().json(user)
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/auth")
            .route("/register", web::post().to(register))
            .route("/login", web::post().to(login))
            .route("/logout", web::post().to(logout))
            .route("/me", web::get().to(me)),
    );
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde_json::{json, Value};

    use crate::test_support::{bearer, make_user, test_app, test_state};

    #[actix_web::test]
    async fn test_missing_or_bad_token_is_unauthorized() {
        let (_dir, state) = test_state();
        let app = test_app!(state);

        let req = test::TestRequest::get().uri("/api/auth/me").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::get()
            .uri("/api/auth/me")
            .insert_header(("Authorization", "Bearer not-a-session"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Invalid or expired session");
    }

    #[actix_web::test]
    async fn test_register_login_me_logout() {
        let (_dir, state) = test_state();
        let app = test_app!(state);

        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({ "username": "alice", "email": "a@example.com", "password": "s3cret-pass" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let user: Value = test::read_body_json(resp).await;
        assert!(user.get("password_hash").is_none());

        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "username": "alice", "password": "s3cret-pass" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let login: Value = test::read_body_json(resp).await;
        let token = login["token"].as_str().unwrap().to_string();

        let req = test::TestRequest::get()
            .uri("/api/auth/me")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();
        let me: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(me["username"], "alice");

        let req = test::TestRequest::post()
            .uri("/api/auth/logout")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri("/api/auth/me")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_unauthenticated_request_rejected_before_body_parsing() {
        let (_dir, state) = test_state();
        make_user(&state.db, "alice");
        let app = test_app!(state);

        let req = test::TestRequest::post()
            .uri("/api/notes")
            .insert_header(("Content-Type", "application/json"))
            .set_payload("{ not json")
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

        let alice = state.db.get_user_by_username("alice").unwrap().unwrap();
        let req = test::TestRequest::post()
            .uri("/api/notes")
            .insert_header(bearer(&state.db, &alice))
            .insert_header(("Content-Type", "application/json"))
            .set_payload("{ not json")
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    }
}
