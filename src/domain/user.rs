//! Library users (borrowers).

use serde::{Deserialize, Serialize};

use crate::library::error::{CatalogError, Result};

/// Kind of borrower
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserKind {
    Student,
    Staff,
}

impl std::fmt::Display for UserKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserKind::Student => write!(f, "student"),
            UserKind::Staff => write!(f, "staff"),
        }
    }
}

impl std::str::FromStr for UserKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "student" => Ok(UserKind::Student),
            "staff" | "employee" => Ok(UserKind::Staff),
            _ => anyhow::bail!("Unknown user kind: {}", s),
        }
    }
}

/// A named borrower
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct User {
    name: String,
    kind: UserKind,
}

impl User {
    /// Create a user; the name must not be blank
    pub fn new(name: impl Into<String>, kind: UserKind) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CatalogError::Validation { field: "name" });
        }
        Ok(Self { name, kind })
    }

    /// Shorthand for a student borrower
    pub fn student(name: impl Into<String>) -> Result<Self> {
        Self::new(name, UserKind::Student)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> UserKind {
        self.kind
    }
}
