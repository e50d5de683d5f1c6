//! Application configuration management.
//!
//! Loads configuration from environment variables with sensible defaults.
//! All settings are fixed at process start; there is no runtime
//! reconfiguration.

use std::path::PathBuf;
use std::sync::OnceLock;

/// Global configuration instance.
static CONFIG: OnceLock<Config> = OnceLock::new();

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Path to the watched recordings folder.
    pub recordings_dir: PathBuf,
    /// Audio file extensions to include (lowercase, no leading dot).
    pub extensions: Vec<String>,
    /// Username for HTTP Basic authentication.
    pub username: String,
    /// Password for HTTP Basic authentication.
    pub password: String,
    /// Optional cap on the number of entries returned by the file listing.
    pub list_limit: Option<usize>,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
    /// Log format (json or pretty).
    pub log_format: LogFormat,
    /// Allowed CORS origins (comma-separated, or * for all).
    pub cors_origins: Vec<String>,
}

/// Log output format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable colored output.
    Pretty,
    /// JSON structured logging for production.
    Json,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Panics
    /// Panics if a numeric setting fails to parse.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .expect("PORT must be a valid u16");

        let recordings_dir = PathBuf::from(
            std::env::var("RECORDINGS_DIR").unwrap_or_else(|_| "./recordings".to_string()),
        );

        let extensions = std::env::var("EXTENSIONS")
            .unwrap_or_else(|_| "mp3,wav,m4a,flac".to_string())
            .split(',')
            .map(|s| s.trim().trim_start_matches('.').to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();

        let username = std::env::var("AUTH_USERNAME").unwrap_or_default();
        let password = std::env::var("AUTH_PASSWORD").unwrap_or_default();

        let list_limit = std::env::var("LIST_LIMIT").ok().map(|v| {
            v.parse::<usize>()
                .expect("LIST_LIMIT must be a valid integer")
        });

        let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let log_format = match std::env::var("LOG_FORMAT")
            .unwrap_or_else(|_| "pretty".to_string())
            .to_lowercase()
            .as_str()
        {
            "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        let cors_origins = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Self {
            host,
            port,
            recordings_dir,
            extensions,
            username,
            password,
            list_limit,
            log_level,
            log_format,
            cors_origins,
        }
    }

    /// Validate the configuration.
    ///
    /// # Errors
    /// Returns an error if validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.recordings_dir.exists() {
            return Err(ConfigError::RecordingsDirNotFound(
                self.recordings_dir.display().to_string(),
            ));
        }

        if !self.recordings_dir.is_dir() {
            return Err(ConfigError::RecordingsDirNotDirectory(
                self.recordings_dir.display().to_string(),
            ));
        }

        if self.extensions.is_empty() {
            return Err(ConfigError::NoExtensions);
        }

        if self.username.is_empty() || self.password.is_empty() {
            return Err(ConfigError::MissingCredentials);
        }

        Ok(())
    }

    /// Get the server bind address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Recordings folder not found: {0}")]
    RecordingsDirNotFound(String),

    #[error("Recordings folder is not a directory: {0}")]
    RecordingsDirNotDirectory(String),

    #[error("EXTENSIONS must name at least one file extension")]
    NoExtensions,

    #[error("AUTH_USERNAME and AUTH_PASSWORD must both be set")]
    MissingCredentials,
}

/// Initialize the global configuration.
///
/// Should be called once at application startup.
pub fn init() -> &'static Config {
    CONFIG.get_or_init(|| {
        dotenvy::dotenv().ok();
        Config::from_env()
    })
}
