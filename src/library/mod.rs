//! The document library: catalog, borrowing and indexing.
//!
//! # Ownership
//!
//! ```text
//! Arc<Catalog> ──owns──▶ Arc<Document> ◀──weak── BorrowLedger (per user)
//!      │
//!      └── snapshot ──▶ Indexer thread ──▶ Vec<String>
//! ```
//!
//! The catalog is constructed by the host and passed to whatever needs it.

pub mod catalog;
pub mod display;
pub mod error;
pub mod export;
pub mod grouped;
pub mod indexer;
pub mod ledger;

pub use catalog::Catalog;
pub use display::{describe, describe_with_annotation, describe_with_premium, PREMIUM_ANNOTATION};
pub use error::{CatalogError, Result};
pub use export::export_snapshot;
pub use grouped::GroupedIndex;
pub use indexer::Indexer;
pub use ledger::{BorrowLedger, DocumentStatus, LendingPolicy, Loan};
