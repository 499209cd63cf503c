//! libris - thread-safe in-memory document catalog
//!
//! A registry of immutable documents that can be searched with predicates,
//! grouped by any string key, borrowed by users, and swept by a background
//! indexer while other threads keep reading and writing.
//!
//! # Modules
//!
//! - `domain`: Data structures (Document, User)
//! - `library`: Catalog, borrow ledger, indexer, display and export
//! - `config`: YAML configuration and environment overrides
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use libris::{Catalog, Document, Indexer};
//!
//! # fn main() -> libris::library::Result<()> {
//! let catalog = Arc::new(Catalog::new());
//! catalog.add(
//!     Document::builder()
//!         .title("Clean Code")
//!         .author("Martin")
//!         .year(2008)
//!         .category("Programming")
//!         .build()?,
//! )?;
//!
//! let programming = catalog.search(|d| d.category() == "Programming")?;
//! let titles = Indexer::run(Arc::clone(&catalog))?;
//! assert_eq!(programming.len(), titles.len());
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod domain;
pub mod library;

// Re-export main types at crate root for convenience
pub use domain::{Document, DocumentBuilder, DocumentId, DocumentKind, User, UserKind};
pub use library::{BorrowLedger, Catalog, CatalogError, DocumentStatus, GroupedIndex, Indexer};
