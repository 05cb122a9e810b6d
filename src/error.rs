//! Error types for the key-value store

use std::io;
use thiserror::Error;

/// Result type alias for store, server and client operations
pub type Result<T> = std::result::Result<T, KvError>;

/// Errors surfaced by the server setup and the HTTP client.
///
/// Missing keys on the server side are not errors; see
/// [`crate::handler::Rejection`] for the per-request failure outcomes.
#[derive(Error, Debug)]
pub enum KvError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("key not found")]
    KeyNotFound,

    #[error("method not allowed")]
    MethodNotAllowed,

    #[error("{0}")]
    Status(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}
