//! Recording library scanner.
//!
//! Every call re-derives the recording set from the filesystem; there is
//! no cached index, so the result always reflects the directory at scan
//! time.

use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// A single audio file discovered in the watched directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recording {
    /// Base filename, without any path component.
    pub filename: String,
    /// Filesystem modification time.
    pub modified_at: DateTime<Utc>,
    /// File size in bytes.
    pub size_bytes: u64,
}

/// Scanner over a single flat directory of recordings.
///
/// Holds no mutable state; safe to call concurrently and repeatedly.
#[derive(Debug, Clone)]
pub struct Library {
    dir: PathBuf,
    extensions: Vec<String>,
}

/// Validate a client-supplied filename to prevent path traversal attacks.
///
/// Returns an error if the name is empty, contains a path separator, a
/// parent-directory reference, or looks like an absolute path.
pub fn sanitize_filename(filename: &str) -> AppResult<&str> {
    if filename.is_empty() {
        return Err(AppError::BadRequest("Filename cannot be empty".to_string()));
    }

    if filename.contains("..") || filename.contains('/') || filename.contains('\\') {
        tracing::warn!(filename = %filename, "Path traversal attempt blocked");
        return Err(AppError::path_traversal());
    }

    // Absolute paths (Unix and Windows drive letters)
    if filename.starts_with('/') || filename.chars().nth(1) == Some(':') {
        return Err(AppError::path_traversal());
    }

    Ok(filename)
}

impl Library {
    /// Create a scanner over `dir` matching the given extensions
    /// (case-insensitive, no leading dot).
    pub fn new(dir: impl Into<PathBuf>, extensions: Vec<String>) -> Self {
        let extensions = extensions
            .into_iter()
            .map(|e| e.trim_start_matches('.').to_lowercase())
            .collect();

        Self {
            dir: dir.into(),
            extensions,
        }
    }

    /// The watched directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Check whether a path carries one of the configured extensions.
    fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| {
                let e = e.to_lowercase();
                self.extensions.iter().any(|known| *known == e)
            })
            .unwrap_or(false)
    }

    /// Scan the watched directory and return matching recordings, newest
    /// first.
    ///
    /// The scan is non-recursive. Entries that vanish between the directory
    /// read and the metadata lookup are skipped rather than failing the
    /// whole scan. An unreadable directory is an error; a directory with no
    /// matching files is an empty list.
    pub fn list(&self) -> AppResult<Vec<Recording>> {
        let mut recordings: Vec<Recording> = fs::read_dir(&self.dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && self.matches_extension(path))
            .filter_map(|path| {
                let metadata = fs::metadata(&path).ok()?;
                let modified = metadata.modified().ok()?;
                Some(Recording {
                    filename: path.file_name()?.to_string_lossy().into_owned(),
                    modified_at: DateTime::<Utc>::from(modified),
                    size_bytes: metadata.len(),
                })
            })
            .collect();

        // Stable sort, so equal mtimes keep their scan order within a call.
        recordings.sort_by(|a, b| b.modified_at.cmp(&a.modified_at));

        Ok(recordings)
    }

    /// The newest recording, or `None` if the library is empty.
    pub fn latest(&self) -> AppResult<Option<Recording>> {
        Ok(self.list()?.into_iter().next())
    }

    /// Validate a filename and resolve it inside the watched directory.
    ///
    /// The name is checked before any filesystem access, so a traversal
    /// attempt is rejected whether or not its target exists.
    pub fn resolve(&self, filename: &str) -> AppResult<PathBuf> {
        let filename = sanitize_filename(filename)?;
        let path = self.dir.join(filename);

        if !path.is_file() {
            return Err(AppError::recording_not_found(filename));
        }

        Ok(path)
    }
}
