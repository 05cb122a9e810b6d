//! Request handling for the `/store/{key}` resource
//!
//! Turns one decoded operation into a store call and a tagged result. The
//! HTTP layer in [`crate::server`] only decodes requests and encodes results.

use crate::store::{SetOutcome, Store};
use actix_web::http::StatusCode;

/// Operation requested by the client, taken from the HTTP method token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Put,
    Get,
    Delete,
    Other(String),
}

impl Operation {
    pub fn from_method(method: &str) -> Self {
        match method {
            "PUT" => Operation::Put,
            "GET" => Operation::Get,
            "DELETE" => Operation::Delete,
            other => Operation::Other(other.to_string()),
        }
    }
}

/// Request body as delivered by the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    Absent,
    Bytes(Vec<u8>),
    /// The transport failed while reading the body
    Unreadable(String),
}

/// One decoded request
#[derive(Debug, Clone)]
pub struct Request {
    pub operation: Operation,
    pub key: String,
    pub body: Body,
}

impl Request {
    pub fn new(operation: Operation, key: impl Into<String>, body: Body) -> Self {
        Self {
            operation,
            key: key.into(),
            body,
        }
    }
}

/// Successful request outcomes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Created,
    Updated,
    Value(String),
    Deleted,
}

/// Request failures; none of them change the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Empty key, or a PUT body that is not valid UTF-8. Values are
    /// stored as `String`, so undecodable bytes are refused rather than
    /// stored lossily.
    BadRequest(&'static str),
    NotFound,
    MethodNotAllowed,
    Internal,
}

pub const KEY_MISSING: &str = "Invalid request format, key missing in URL";
pub const VALUE_NOT_UTF8: &str = "Invalid request body, value must be valid UTF-8";

impl Outcome {
    pub fn status(&self) -> StatusCode {
        match self {
            Outcome::Created => StatusCode::CREATED,
            Outcome::Updated | Outcome::Value(_) | Outcome::Deleted => StatusCode::OK,
        }
    }

    pub fn into_body(self) -> String {
        match self {
            Outcome::Created => "Key created".to_string(),
            Outcome::Updated => "Key updated".to_string(),
            Outcome::Value(value) => value,
            Outcome::Deleted => "Key deleted".to_string(),
        }
    }
}

impl Rejection {
    pub fn status(&self) -> StatusCode {
        match self {
            Rejection::BadRequest(_) => StatusCode::BAD_REQUEST,
            Rejection::NotFound => StatusCode::NOT_FOUND,
            Rejection::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Rejection::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Rejection::BadRequest(message) => *message,
            Rejection::NotFound => "Key not found",
            Rejection::MethodNotAllowed => "Method not allowed",
            Rejection::Internal => "Failed to read request body",
        }
    }
}

/// Apply one request to the store.
///
/// Unsupported methods are rejected before the key is looked at, and an
/// empty key is rejected before the store is touched.
pub fn handle<S: Store + ?Sized>(store: &S, request: Request) -> Result<Outcome, Rejection> {
    let Request {
        operation,
        key,
        body,
    } = request;

    if let Operation::Other(_) = operation {
        return Err(Rejection::MethodNotAllowed);
    }
    if key.is_empty() {
        return Err(Rejection::BadRequest(KEY_MISSING));
    }

    match operation {
        Operation::Put => {
            let value = match body {
                Body::Absent => String::new(),
                Body::Bytes(bytes) => String::from_utf8(bytes)
                    .map_err(|_| Rejection::BadRequest(VALUE_NOT_UTF8))?,
                Body::Unreadable(reason) => {
                    tracing::warn!(%key, %reason, "failed to read request body");
                    return Err(Rejection::Internal);
                }
            };
            Ok(match store.set(key, value) {
                SetOutcome::Created => Outcome::Created,
                SetOutcome::Updated => Outcome::Updated,
            })
        }
        Operation::Get => store.get(&key).map(Outcome::Value).ok_or(Rejection::NotFound),
        Operation::Delete => {
            if store.delete(&key) {
                Ok(Outcome::Deleted)
            } else {
                Err(Rejection::NotFound)
            }
        }
        Operation::Other(_) => Err(Rejection::MethodNotAllowed),
    }
}
