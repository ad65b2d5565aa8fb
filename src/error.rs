//! Error types for harwire crate.

use std::io;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while converting a transaction into an archive entry.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Required input is absent (e.g. a request URI without scheme or host).
    #[error("Missing required: {0}")]
    Missing(String),

    /// Reading a request or response body failed.
    #[error("Body read error: {0}")]
    BodyRead(#[source] io::Error),

    /// Malformed or oversized multipart/form-data body.
    #[error("Multipart parse error: {0}")]
    Multipart(#[from] multer::Error),

    /// URL parsing error.
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Archive could not be rendered to JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Writing the archive to its destination failed.
    #[error("Persist error: {0}")]
    Persist(#[source] io::Error),

    /// A response was already attached to the entry.
    #[error("Entry already has a response attached")]
    ResponseAlreadyAttached,

    /// Send/wait phases can only be recorded before the response arrives.
    #[error("Request phase already closed, cannot record {0} timing")]
    RequestPhaseClosed(&'static str),
}

impl Error {
    /// Create a missing field error.
    pub fn missing(field: impl Into<String>) -> Self {
        Self::Missing(field.into())
    }

    /// Create a body read error.
    pub fn body_read(err: io::Error) -> Self {
        Self::BodyRead(err)
    }

    /// Create a persist error.
    pub fn persist(err: io::Error) -> Self {
        Self::Persist(err)
    }
}
