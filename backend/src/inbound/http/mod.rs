//! HTTP inbound adapter exposing the REST API under `/api/v1`.

use actix_web::web;

pub mod auth;
pub mod error;
pub mod payload;
pub mod request_context;
pub mod session;
pub mod session_config;
pub mod settings;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;

pub use error::ApiResult;

/// Largest accepted JSON body.
const JSON_LIMIT_BYTES: usize = 16 * 1024;

/// JSON extractor settings shared by every endpoint.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_LIMIT_BYTES)
        .error_handler(error::json_payload_error)
}

/// Query extractor settings shared by every endpoint.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(error::query_payload_error)
}

/// Raw body limit for handlers that decode after authorisation.
pub fn payload_config() -> web::PayloadConfig {
    web::PayloadConfig::new(JSON_LIMIT_BYTES)
}

/// Register every API handler on `cfg`.
///
/// The caller mounts this inside a scope that carries the session
/// middleware, normally `/api/v1`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        .app_data(payload_config())
        .service(auth::login)
        .service(auth::logout)
        .service(auth::confirm_password)
        .service(auth::forgot_password)
        .service(auth::reset_password)
        .service(users::list_users)
        .service(users::create_user)
        .service(users::update_user)
        .service(users::delete_user)
        .service(settings::get_profile)
        .service(settings::update_profile)
        .service(settings::change_password)
        .service(settings::delete_account);
}
