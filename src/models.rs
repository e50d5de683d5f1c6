//! Shared application state and API response shapes.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::auth::Credentials;
use crate::library::{Library, Recording};

/// Immutable per-worker application state, derived from the configuration
/// at startup.
#[derive(Clone)]
pub struct AppState {
    /// Scanner over the watched recordings folder.
    pub library: Library,
    /// Shared credential pair for the access gate.
    pub credentials: Credentials,
    /// Optional cap on `/files` responses.
    pub list_limit: Option<usize>,
}

/// One entry in the `/files` listing.
#[derive(Debug, Serialize)]
pub struct RecordingEntry {
    pub filename: String,
    pub modified_at: DateTime<Utc>,
    pub size_bytes: u64,
    /// Human-readable rendering of `modified_at`.
    pub formatted_date: String,
}

impl From<Recording> for RecordingEntry {
    fn from(recording: Recording) -> Self {
        let formatted_date = recording
            .modified_at
            .format("%Y-%m-%d %H:%M:%S UTC")
            .to_string();

        Self {
            filename: recording.filename,
            modified_at: recording.modified_at,
            size_bytes: recording.size_bytes,
            formatted_date,
        }
    }
}

/// Response body for `/metadata`.
///
/// Both fields are null when the library is empty; an empty library is not
/// an error for this endpoint.
#[derive(Debug, Serialize)]
pub struct MetadataResponse {
    pub filename: Option<String>,
    pub modified_at: Option<DateTime<Utc>>,
}

impl From<Option<Recording>> for MetadataResponse {
    fn from(recording: Option<Recording>) -> Self {
        match recording {
            Some(r) => Self {
                filename: Some(r.filename),
                modified_at: Some(r.modified_at),
            },
            None => Self {
                filename: None,
                modified_at: None,
            },
        }
    }
}
