//! Catalog documents and their validating builder.
//!
//! A [`Document`] is immutable once built. Its identity is the [`DocumentId`]
//! assigned by [`DocumentBuilder::build`], so two documents with identical
//! fields are still distinct catalog entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::library::error::{CatalogError, Result};

/// Document identity (random UUID assigned at build time)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocumentId(Uuid);

impl DocumentId {
    /// Generate a fresh identity
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind-specific fields of a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DocumentKind {
    /// Book, optionally identified by ISBN
    Book { isbn: Option<String> },

    /// Magazine or journal issue
    Periodical { issue: Option<u32> },

    /// Anything else the catalog holds
    Other,
}

impl DocumentKind {
    /// Short lowercase label used in listings
    pub fn label(&self) -> &'static str {
        match self {
            DocumentKind::Book { .. } => "book",
            DocumentKind::Periodical { .. } => "periodical",
            DocumentKind::Other => "other",
        }
    }
}

impl Default for DocumentKind {
    fn default() -> Self {
        Self::Book { isbn: None }
    }
}

/// An immutable catalog item
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    id: DocumentId,
    title: String,
    author: String,
    year: i32,
    category: String,
    kind: DocumentKind,
    created_at: DateTime<Utc>,
}

impl Document {
    /// Start building a new document
    pub fn builder() -> DocumentBuilder {
        DocumentBuilder::default()
    }

    pub fn id(&self) -> DocumentId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn kind(&self) -> &DocumentKind {
        &self.kind
    }

    /// When the document was built
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// ISBN, for books that carry one
    pub fn isbn(&self) -> Option<&str> {
        match &self.kind {
            DocumentKind::Book { isbn } => isbn.as_deref(),
            _ => None,
        }
    }

    /// Re-check the fields the builder requires
    pub fn is_valid(&self) -> bool {
        !self.title.trim().is_empty() && !self.author.trim().is_empty()
    }
}

/// Builder for [`Document`]; `build` is the only way to obtain one
#[derive(Debug, Clone, Default)]
pub struct DocumentBuilder {
    title: Option<String>,
    author: Option<String>,
    year: i32,
    category: Option<String>,
    kind: DocumentKind,
}

impl DocumentBuilder {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn year(mut self, year: i32) -> Self {
        self.year = year;
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Make this a book with the given ISBN
    pub fn isbn(mut self, isbn: impl Into<String>) -> Self {
        self.kind = DocumentKind::Book {
            isbn: Some(isbn.into()),
        };
        self
    }

    /// Make this a periodical with the given issue number
    pub fn issue(mut self, issue: u32) -> Self {
        self.kind = DocumentKind::Periodical { issue: Some(issue) };
        self
    }

    /// Set the kind explicitly
    pub fn kind(mut self, kind: DocumentKind) -> Self {
        self.kind = kind;
        self
    }

    /// Validate required fields and produce the document
    pub fn build(self) -> Result<Document> {
        let title = required("title", self.title)?;
        let author = required("author", self.author)?;

        Ok(Document {
            id: DocumentId::new(),
            title,
            author,
            year: self.year,
            category: self.category.unwrap_or_default(),
            kind: self.kind,
            created_at: Utc::now(),
        })
    }
}

fn required(field: &'static str, value: Option<String>) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(CatalogError::Validation { field }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn java_guide() -> Document {
        Document::builder()
            .title("Java Guide")
            .author("Oracle")
            .category("Programming")
            .year(2020)
            .isbn("123")
            .build()
            .unwrap()
    }

    #[test]
    fn test_build_valid_book() {
        let doc = java_guide();

        assert_eq!(doc.title(), "Java Guide");
        assert_eq!(doc.author(), "Oracle");
        assert_eq!(doc.year(), 2020);
        assert_eq!(doc.category(), "Programming");
        assert_eq!(doc.isbn(), Some("123"));
        assert_eq!(doc.kind().label(), "book");
        assert!(doc.is_valid());
    }

    #[test]
    fn test_build_rejects_empty_title() {
        let result = Document::builder().title("").author("Martin").build();
        assert!(matches!(
            result,
            Err(CatalogError::Validation { field: "title" })
        ));

        let result = Document::builder().author("Martin").build();
        assert!(matches!(
            result,
            Err(CatalogError::Validation { field: "title" })
        ));
    }

    #[test]
    fn test_build_rejects_blank_author() {
        let result = Document::builder().title("Clean Code").author("   ").build();
        assert!(matches!(
            result,
            Err(CatalogError::Validation { field: "author" })
        ));
    }

    #[test]
    fn test_identical_fields_have_distinct_identity() {
        let a = java_guide();
        let b = java_guide();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_periodical_kind() {
        let doc = Document::builder()
            .title("Rust Monthly")
            .author("Editors")
            .issue(42)
            .build()
            .unwrap();

        assert_eq!(doc.kind(), &DocumentKind::Periodical { issue: Some(42) });
        assert_eq!(doc.isbn(), None);
        assert_eq!(doc.category(), "");
    }

    #[test]
    fn test_document_serialization() {
        let doc = java_guide();
        let json = serde_json::to_value(&doc).unwrap();

        assert_eq!(json["title"], "Java Guide");
        assert_eq!(json["kind"]["kind"], "book");
        assert_eq!(json["kind"]["isbn"], "123");
    }
}
