//! Health check endpoints.

use actix_web::{get, web, HttpResponse};
use serde::Serialize;

use crate::models::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: &'static str,
    /// Service version.
    pub version: &'static str,
    /// Service name.
    pub service: &'static str,
}

/// Readiness check response.
#[derive(Debug, Serialize)]
pub struct ReadyResponse {
    /// Service status.
    pub status: &'static str,
    /// Watched recordings folder accessible.
    pub recordings_dir: bool,
}

/// Health check endpoint.
///
/// GET /health
///
/// Returns 200 if the service is running.
#[get("/health")]
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        service: env!("CARGO_PKG_NAME"),
    })
}

/// Readiness check endpoint.
///
/// GET /ready
///
/// Returns 200 if the watched directory is accessible.
#[get("/ready")]
pub async fn ready(data: web::Data<AppState>) -> HttpResponse {
    let dir = data.library.dir();
    let recordings_dir_ok = dir.exists() && dir.is_dir();

    let response = ReadyResponse {
        status: if recordings_dir_ok { "ready" } else { "not_ready" },
        recordings_dir: recordings_dir_ok,
    };

    if recordings_dir_ok {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}

/// Configure health routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health).service(ready);
}
