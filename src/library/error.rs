//! Error taxonomy for catalog, ledger and indexer operations.

use thiserror::Error;

use crate::domain::DocumentId;

/// Errors reported by library operations.
///
/// All variants are recoverable and surface directly to the caller.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    #[error("Invalid document: {field} must not be empty")]
    Validation { field: &'static str },

    #[error("Document already in catalog: {0}")]
    Duplicate(DocumentId),

    #[error("{user} has not borrowed document {document}")]
    NotBorrowed { user: String, document: DocumentId },

    #[error("Document not found: {0}")]
    NotFound(String),

    #[error("Catalog unavailable: {0}")]
    Unavailable(String),

    #[error("Indexer did not finish within {waited_ms}ms")]
    IndexTimeout { waited_ms: u64 },
}

/// Result alias for library operations
pub type Result<T, E = CatalogError> = std::result::Result<T, E>;
