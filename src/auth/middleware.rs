//! Authentication extractor for HTTP Basic credentials.

use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::future::{ready, Ready};

use crate::error::AppError;
use crate::models::AppState;

/// Authenticated client extractor.
///
/// Use this as a parameter in route handlers to require valid Basic
/// credentials.
///
/// # Example
/// ```ignore
/// async fn gated_route(user: BasicUser) -> impl Responder {
///     format!("Hello, {}!", user.username)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct BasicUser {
    /// Username the client authenticated as.
    pub username: String,
}

impl FromRequest for BasicUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(extract_user(req))
    }
}

/// Extract and verify Basic credentials from request headers.
///
/// Every failure path returns the same `invalid_credentials` error, so a
/// missing header, a malformed one, a wrong username, and a wrong password
/// all produce the same challenge response.
fn extract_user(req: &HttpRequest) -> Result<BasicUser, AppError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::Internal("Application state not configured".to_string()))?;

    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(AppError::invalid_credentials)?;

    let encoded = auth_header
        .strip_prefix("Basic ")
        .or_else(|| auth_header.strip_prefix("basic "))
        .ok_or_else(AppError::invalid_credentials)?;

    let decoded = STANDARD
        .decode(encoded.trim())
        .map_err(|_| AppError::invalid_credentials())?;
    let decoded = String::from_utf8(decoded).map_err(|_| AppError::invalid_credentials())?;

    let (username, password) = decoded
        .split_once(':')
        .ok_or_else(AppError::invalid_credentials)?;

    if !state.credentials.verify(username, password) {
        tracing::debug!("Rejected request with bad credentials");
        return Err(AppError::invalid_credentials());
    }

    Ok(BasicUser {
        username: username.to_string(),
    })
}
