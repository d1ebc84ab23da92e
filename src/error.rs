//! Error types for the ink engine.
//!
//! Degenerate input (short strokes, missing surfaces, empty text fields) is
//! never an error; it is absorbed as a no-op. What remains are persistence,
//! configuration and export failures, which are surfaced to the caller.

use thiserror::Error;

/// Errors raised by a [`PageStore`](crate::store::PageStore) implementation.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The requested page or notebook does not exist
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// A create was issued for an id that is already stored
    #[error("{kind} already exists: {id}")]
    AlreadyExists { kind: &'static str, id: String },

    /// IO error from the backing filesystem
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored document could not be encoded or decoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An id that cannot name a stored document
    #[error("invalid id: {0:?}")]
    InvalidId(String),

    /// The backend refused the write
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn page_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            kind: "page",
            id: id.into(),
        }
    }

    pub fn notebook_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            kind: "notebook",
            id: id.into(),
        }
    }
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Top-level error for the engine.
#[derive(Error, Debug)]
pub enum InkError {
    /// Persistence failure; in-memory state is kept as is
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// IO error from std::io
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error from serde_json
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Raster encode/decode failure
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// A color string that is not `#rgb`, `#rrggbb` or `#rrggbbaa`
    #[error("invalid color: {0:?}")]
    InvalidColor(String),

    /// A notebook title that is empty once trimmed
    #[error("notebook title is empty")]
    EmptyTitle,

    /// The requested page is not part of the open notebook
    #[error("unknown page: {0}")]
    UnknownPage(String),
}

/// Result type alias for engine operations
pub type InkResult<T> = Result<T, InkError>;
