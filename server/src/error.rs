//! Error taxonomy for the todo service.
//!
//! # Design
//! `TodoError` is the only error the service hands back to its callers, and
//! every failure carries one of three kinds: validation, not found, or store
//! unavailable. Store adapters report `StoreError`; the service wraps it
//! without retrying. HTTP status mapping lives in `routes`.

use thiserror::Error;

use crate::model::{TodoId, ValidationError};

/// Failures raised by a `TodoStore` implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend could not be reached, refused the command, or timed out.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A stored value could not be decoded into a record.
    #[error("corrupt record under `{key}`: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// A record could not be encoded for storage.
    #[error("failed to encode record: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Errors returned by `TodoService` operations.
#[derive(Debug, Error)]
pub enum TodoError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("todo `{0}` not found")]
    NotFound(TodoId),

    #[error(transparent)]
    StoreUnavailable(#[from] StoreError),
}

/// Errors that stop the server binary from starting or serving.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to connect to store: {0}")]
    Store(#[from] StoreError),

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}
