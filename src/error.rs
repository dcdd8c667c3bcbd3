use thiserror::Error;

/// Errors that can occur in the durable storage layer or the backup ring.
///
/// Expected editing-session edge conditions (missing node, protected node,
/// malformed single action) are deliberately NOT represented here: store
/// operations report those through [`crate::store::OpStatus`], and whole
/// document operations through a `bool`, so an interactive session never has
/// to unwind on recoverable input.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage I/O failure for key '{key}': {message}")]
    Io { key: String, message: String },

    #[error("Failed to encode backup data: {0}")]
    Encode(String),

    #[error("Failed to decode backup data: {0}")]
    Decode(String),
}

/// Error returned when an externally authored action batch cannot be parsed
/// as JSON at all. Individual actions that parse but do not resolve are
/// skipped during application, not reported here.
#[derive(Error, Debug, Clone)]
pub enum BatchParseError {
    #[error("Failed to parse action batch JSON: {0}")]
    JsonParseError(String),
}
