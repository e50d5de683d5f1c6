//! Application error types and handling.
//!
//! Provides structured error responses for the API. Unauthorized responses
//! carry the Basic challenge header so browsers prompt for credentials.

use actix_web::{
    http::{header, StatusCode},
    HttpResponse, ResponseError,
};
use serde::Serialize;

/// Realm advertised in the `WWW-Authenticate` challenge.
pub const AUTH_REALM: &str = "aircheck";

/// API error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error type/code.
    pub error: String,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorResponse {
    /// Create a new error response.
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}

/// Application error types.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Authentication required or failed.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Get the error code string.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Io(_) => "IO_ERROR",
        }
    }

    /// Create an unauthorized error for bad or missing credentials.
    ///
    /// Shared by every authentication failure so a wrong username and a
    /// wrong password are indistinguishable to the caller.
    pub fn invalid_credentials() -> Self {
        Self::Unauthorized("Invalid credentials".to_string())
    }

    /// Create a not found error for a recording.
    pub fn recording_not_found(filename: &str) -> Self {
        Self::NotFound(format!("Recording not found: {}", filename))
    }

    /// Create a bad request error for a path traversal attempt.
    pub fn path_traversal() -> Self {
        Self::BadRequest("Invalid path: path traversal not allowed".to_string())
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) | Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let error_response = ErrorResponse::new(self.error_code(), self.to_string());

        tracing::error!(
            error_code = %self.error_code(),
            status = %status.as_u16(),
            message = %self.to_string(),
            "API error"
        );

        let mut builder = HttpResponse::build(status);
        if matches!(self, Self::Unauthorized(_)) {
            builder.insert_header((
                header::WWW_AUTHENTICATE,
                format!("Basic realm=\"{}\"", AUTH_REALM),
            ));
        }

        builder.json(error_response)
    }
}

/// Result type alias using AppError.
pub type AppResult<T> = Result<T, AppError>;
