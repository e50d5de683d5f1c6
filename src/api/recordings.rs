//! Recording API endpoints.
//!
//! Every route re-scans the watched directory on demand; requests are
//! stateless and observe independent filesystem snapshots.

use actix_files::NamedFile;
use actix_web::{get, web, HttpRequest, HttpResponse};

use crate::auth::BasicUser;
use crate::error::{AppError, AppResult};
use crate::models::{AppState, MetadataResponse, RecordingEntry};

/// Stream the newest recording.
///
/// GET /stream
///
/// Returns 404 when the library is empty. Supports range requests for
/// seeking.
#[get("/stream")]
pub async fn stream_latest(
    req: HttpRequest,
    _user: BasicUser,
    data: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let recording = data
        .library
        .latest()?
        .ok_or_else(|| AppError::NotFound("No recordings found".to_string()))?;

    let path = data.library.resolve(&recording.filename)?;
    let file = NamedFile::open(path)?;

    Ok(file.into_response(&req))
}

/// Stream a named recording.
///
/// GET /stream/{filename}
///
/// Returns 400 on a path traversal attempt and 404 when the file is
/// absent. Supports range requests for seeking.
///
/// The tail pattern captures multi-segment paths so that a raw
/// `/stream/../../etc/passwd` reaches the filename validator instead of
/// falling through to the router's 404.
#[get("/stream/{filename:.*}")]
pub async fn stream_named(
    req: HttpRequest,
    _user: BasicUser,
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let full_path = data.library.resolve(&path)?;
    let file = NamedFile::open(full_path)?;

    Ok(file.into_response(&req))
}

/// List recordings, newest first.
///
/// GET /files
///
/// When a listing cap is configured, only the newest entries up to the cap
/// are returned.
#[get("/files")]
pub async fn list_files(
    _user: BasicUser,
    data: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let mut recordings = data.library.list()?;

    if let Some(limit) = data.list_limit {
        recordings.truncate(limit);
    }

    let entries: Vec<RecordingEntry> = recordings.into_iter().map(RecordingEntry::from).collect();

    Ok(HttpResponse::Ok().json(entries))
}

/// Describe the newest recording.
///
/// GET /metadata
///
/// Returns `{"filename": null, "modified_at": null}` when the library is
/// empty; the presentation client polls this route to detect new files.
#[get("/metadata")]
pub async fn metadata(_user: BasicUser, data: web::Data<AppState>) -> AppResult<HttpResponse> {
    let latest = data.library.latest()?;

    Ok(HttpResponse::Ok().json(MetadataResponse::from(latest)))
}

/// Configure recording routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(stream_latest)
        .service(stream_named)
        .service(list_files)
        .service(metadata);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Credentials;
    use crate::library::Library;
    use actix_web::http::{header, StatusCode};
    use actix_web::{test, App};
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use std::fs::File;
    use std::io::Write;
    use std::time::{Duration, SystemTime};
    use tempfile::{tempdir, TempDir};

    fn write_file(dir: &TempDir, name: &str, contents: &[u8], mtime_secs: u64) {
        let path = dir.path().join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(contents).unwrap();
        file.set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(mtime_secs))
            .unwrap();
    }

    fn state_for(dir: &TempDir, list_limit: Option<usize>) -> AppState {
        AppState {
            library: Library::new(
                dir.path(),
                vec!["mp3", "wav", "m4a", "flac"]
                    .into_iter()
                    .map(String::from)
                    .collect(),
            ),
            credentials: Credentials::new("listener", "hunter2"),
            list_limit,
        }
    }

    fn auth_header() -> (header::HeaderName, String) {
        (
            header::AUTHORIZATION,
            format!("Basic {}", STANDARD.encode("listener:hunter2")),
        )
    }

    async fn call(
        state: AppState,
        uri: &str,
        with_auth: bool,
    ) -> actix_web::dev::ServiceResponse {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(configure),
        )
        .await;

        let mut req = test::TestRequest::get().uri(uri);
        if with_auth {
            req = req.insert_header(auth_header());
        }

        test::call_service(&app, req.to_request()).await
    }

    #[actix_web::test]
    async fn test_files_sorted_newest_first() {
        let dir = tempdir().unwrap();
        write_file(&dir, "a.mp3", b"aaa", 1_000);
        write_file(&dir, "b.wav", b"bbbb", 2_000);

        let resp = call(state_for(&dir, None), "/files", true).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: serde_json::Value = test::read_body_json(resp).await;
        let names: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["filename"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["b.wav", "a.mp3"]);
    }

    #[actix_web::test]
    async fn test_files_respects_list_limit() {
        let dir = tempdir().unwrap();
        write_file(&dir, "a.mp3", b"x", 1_000);
        write_file(&dir, "b.wav", b"x", 2_000);
        write_file(&dir, "c.flac", b"x", 3_000);

        let resp = call(state_for(&dir, Some(2)), "/files", true).await;
        let body: serde_json::Value = test::read_body_json(resp).await;
        let names: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["filename"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["c.flac", "b.wav"]);
    }

    #[actix_web::test]
    async fn test_metadata_reports_newest() {
        let dir = tempdir().unwrap();
        write_file(&dir, "old.mp3", b"x", 1_000);
        write_file(&dir, "new.wav", b"x", 2_000);

        let resp = call(state_for(&dir, None), "/metadata", true).await;
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["filename"], "new.wav");
    }

    #[actix_web::test]
    async fn test_metadata_on_empty_library() {
        let dir = tempdir().unwrap();

        let resp = call(state_for(&dir, None), "/metadata", true).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["filename"], serde_json::Value::Null);
        assert_eq!(body["modified_at"], serde_json::Value::Null);
    }

    #[actix_web::test]
    async fn test_stream_latest_serves_newest_bytes() {
        let dir = tempdir().unwrap();
        write_file(&dir, "old.mp3", b"old bytes", 1_000);
        write_file(&dir, "new.mp3", b"new bytes", 2_000);

        let resp = call(state_for(&dir, None), "/stream", true).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body = test::read_body(resp).await;
        assert_eq!(&body[..], b"new bytes");
    }

    #[actix_web::test]
    async fn test_stream_on_empty_library_is_404() {
        let dir = tempdir().unwrap();

        let resp = call(state_for(&dir, None), "/stream", true).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_stream_named_serves_full_file() {
        let dir = tempdir().unwrap();
        write_file(&dir, "take.wav", b"wav data here", 1_000);

        let resp = call(state_for(&dir, None), "/stream/take.wav", true).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body = test::read_body(resp).await;
        assert_eq!(body.len(), b"wav data here".len());
    }

    #[actix_web::test]
    async fn test_stream_named_missing_is_404() {
        let dir = tempdir().unwrap();

        let resp = call(state_for(&dir, None), "/stream/ghost.mp3", true).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_stream_traversal_is_400() {
        let dir = tempdir().unwrap();

        // Encoded "../../etc/passwd" in the path segment.
        let resp = call(
            state_for(&dir, None),
            "/stream/..%2F..%2Fetc%2Fpasswd",
            true,
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_stream_raw_traversal_is_400() {
        let dir = tempdir().unwrap();

        // Unencoded "../" spans path segments; the tail-matching route must
        // still hand the whole name to the validator.
        let resp = call(state_for(&dir, None), "/stream/../../etc/passwd", true).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_stream_trailing_slash_is_400() {
        let dir = tempdir().unwrap();

        // The tail pattern also matches an empty name.
        let resp = call(state_for(&dir, None), "/stream/", true).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_routes_reject_missing_credentials() {
        let dir = tempdir().unwrap();
        write_file(&dir, "take.mp3", b"x", 1_000);

        for uri in ["/stream", "/stream/take.mp3", "/files", "/metadata"] {
            let resp = call(state_for(&dir, None), uri, false).await;
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{uri}");
            assert!(
                resp.headers().get(header::WWW_AUTHENTICATE).is_some(),
                "{uri} missing challenge"
            );
        }
    }

    #[actix_web::test]
    async fn test_range_request_gets_partial_content() {
        let dir = tempdir().unwrap();
        write_file(&dir, "take.mp3", b"0123456789", 1_000);

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state_for(&dir, None)))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/stream/take.mp3")
            .insert_header(auth_header())
            .insert_header((header::RANGE, "bytes=0-3"))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::PARTIAL_CONTENT);

        let body = test::read_body(resp).await;
        assert_eq!(&body[..], b"0123");
    }
}
