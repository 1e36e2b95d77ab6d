//! Error types for showfetch.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for showfetch.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("Config file not found: {0}")]
    ConfigNotFound(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Missing required settings: {}. Add them to config.local.toml", .0.join(", "))]
    MissingSettings(Vec<String>),

    // File system errors
    #[error("Path not found: {0}")]
    PathNotFound(String),

    #[error("Not a directory: {0}")]
    NotADirectory(String),

    // Trakt errors
    #[error("Trakt access token not configured. Run: showfetch authorize")]
    TraktNotAuthorized,

    #[error("Trakt authorization failed: {0}")]
    TraktAuth(String),

    #[error("Device code expired before it was approved")]
    DeviceCodeExpired,

    // Indexer errors
    #[error("Indexer {name} failed: {message}")]
    Indexer { name: String, message: String },

    // Download client errors
    #[error("Download client error: {0}")]
    DownloadClient(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // HTTP errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // JSON errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // XML errors
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    // TOML errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    // Generic errors
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a generic error from a string.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }

    /// Create an indexer error.
    pub fn indexer<N: Into<String>, M: Into<String>>(name: N, message: M) -> Self {
        Error::Indexer {
            name: name.into(),
            message: message.into(),
        }
    }
}
