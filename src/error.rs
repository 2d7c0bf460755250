//! Error types for the drawing extraction library.
//!
//! Field-level absences are not errors: a missing title or drawing number is
//! recorded as an empty field in the result. This module only covers the
//! failures that stop a document from being read at all.

/// Result type alias for drawing extraction operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while loading or processing a document.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The layout provider could not produce a usable page
    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    /// A page index past the end of the document was requested
    #[error("Page {index} out of range (document has {count} pages)")]
    PageOutOfRange {
        /// Requested page index
        index: usize,
        /// Number of pages in the document
        count: usize,
    },

    /// The document has no pages
    #[error("Document has no pages")]
    EmptyDocument,

    /// Configuration values are inconsistent
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
