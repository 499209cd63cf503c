//! Text descriptions of documents.

use crate::domain::{Document, DocumentKind};

/// Annotation appended by [`describe_with_premium`]
pub const PREMIUM_ANNOTATION: &str = "[Premium feature!]";

/// One-line description, by document kind
pub fn describe(doc: &Document) -> String {
    match doc.kind() {
        DocumentKind::Book { isbn: Some(isbn) } => {
            format!("Book: {} by {} ({}, ISBN {})", doc.title(), doc.author(), doc.year(), isbn)
        }
        DocumentKind::Book { isbn: None } => {
            format!("Book: {} by {} ({})", doc.title(), doc.author(), doc.year())
        }
        DocumentKind::Periodical { issue: Some(issue) } => {
            format!("Periodical: {} #{} ({})", doc.title(), issue, doc.year())
        }
        DocumentKind::Periodical { issue: None } => {
            format!("Periodical: {} ({})", doc.title(), doc.year())
        }
        DocumentKind::Other => format!("Document: {} by {}", doc.title(), doc.author()),
    }
}

/// Description followed by the premium annotation
pub fn describe_with_premium(doc: &Document) -> String {
    describe_with_annotation(doc, PREMIUM_ANNOTATION)
}

/// Description followed by a custom annotation
pub fn describe_with_annotation(doc: &Document, annotation: &str) -> String {
    format!("{}\n{}", describe(doc), annotation)
}
