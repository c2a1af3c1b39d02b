//! # Connector Errors
//!
//! Error surface for every public operation. Callers always receive a
//! two-branch result; failures never escape as panics.

use thiserror::Error;

/// Result type for connector operations
pub type QueryResult<T> = Result<T, QueryError>;

/// Connector errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QueryError {
    /// Connection or HTTP-layer failure
    #[error("Transport failure: {0}")]
    Transport(String),

    /// Malformed or unexpected JSON shape; carries a bounded payload snippet
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// The named table does not exist
    #[error("Table not found: {0}")]
    NotFound(String),

    /// Any other remote-side failure
    #[error("{0}")]
    Generic(String),
}

impl QueryError {
    /// Builds a decode error carrying a bounded snippet of the offending
    /// payload. Large payloads are truncated so errors stay loggable.
    pub fn decode_snippet(context: &str, payload: &[u8]) -> Self {
        QueryError::Decode(format!("{}: {}", context, snippet(payload)))
    }
}

const SNIPPET_MAX: usize = 200;

/// Lossy, length-bounded rendering of a payload for diagnostics.
pub fn snippet(payload: &[u8]) -> String {
    let text = String::from_utf8_lossy(payload);
    if text.len() <= SNIPPET_MAX {
        text.into_owned()
    } else {
        let mut end = SNIPPET_MAX;
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &text[..end])
    }
}
