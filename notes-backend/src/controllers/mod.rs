pub mod auth;
pub mod health;
pub mod notes;
pub mod shares;

use actix_web::web;

use crate::error::ApiError;

/// Register every route
pub fn configure(cfg: &mut web::ServiceConfig) {
    health::config_routes(cfg);
    auth::config(cfg);
    notes::config(cfg);
    shares::config(cfg);
}

/// JSON body errors come back as `{"error": ...}` with 400
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        ApiError::BadRequest(format!("Invalid request body: {}", err)).into()
    })
}

/// Non-numeric ids read as a missing record
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|_err, _req| ApiError::NotFound("Not found".to_string()).into())
}
