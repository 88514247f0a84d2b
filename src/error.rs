//! Error types for the rewrite engine.
//!
//! Only the glue around the engine can fail: serializing a document, or validating a node
//! query from configuration. The rules themselves degrade to no-ops instead of erroring.

use thiserror::Error;

pub use crate::dom::query::QueryError;

/// Result type for themebind operations.
pub type Result<T> = std::result::Result<T, RewriteError>;

/// Errors surfaced by the document pipeline.
#[derive(Debug, Error)]
pub enum RewriteError {
    /// Writing the DOM back to markup failed.
    #[error("HTML serialization failed: {0}")]
    Serialization(#[source] std::io::Error),

    /// Serialized output was not valid UTF-8.
    #[error("UTF-8 conversion failed: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// A configured node query could not be parsed.
    #[error(transparent)]
    Query(#[from] QueryError),
}
