//! Domain types for the catalog.
//!
//! This module contains the core data structures:
//! - Document: immutable catalog item built through a validating builder
//! - User: a named borrower with a kind

pub mod document;
pub mod user;

// Re-export commonly used types
pub use document::{Document, DocumentBuilder, DocumentId, DocumentKind};
pub use user::{User, UserKind};
