//! Error types for boardhand.

use thiserror::Error;

/// Main error type for boardhand operations.
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(String),

    /// API returned an error
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Credentials rejected (401)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Access denied (403)
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Resource missing (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Response could not be interpreted
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Missing or malformed token, owner, repo, project number or mapping
    #[error("Configuration error: {0}")]
    Config(String),

    /// Project not found or not accessible
    #[error("Lookup error: {0}")]
    Lookup(String),

    /// The board cannot serve the operation (e.g. it has no columns)
    #[error("Board setup error: {0}")]
    BoardSetup(String),

    /// The event payload lacks a field the handler needs
    #[error("Invalid event context: {0}")]
    InvalidContext(String),

    /// No handler exists for the event kind/action
    #[error("unhandled trigger: {kind}")]
    UnhandledTrigger {
        kind: String,
        action: Option<String>,
    },

    /// The trigger is recognised but has no board policy yet
    #[error("Trigger not yet supported: {0}")]
    Unsupported(String),

    /// Generic error
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Map an HTTP status code and response body to an error.
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            401 => Error::Unauthorized(message),
            403 => Error::Forbidden(message),
            404 => Error::NotFound(message),
            _ => Error::Api { status, message },
        }
    }

    /// Whether the error means the caller may not see the resource.
    pub fn is_access_denied(&self) -> bool {
        matches!(
            self,
            Error::Unauthorized(_) | Error::Forbidden(_) | Error::NotFound(_)
        )
    }
}

/// Result type alias for boardhand operations.
pub type Result<T> = std::result::Result<T, Error>;
