//! Per-user borrow records.
//!
//! Loans reference documents weakly: the catalog stays the owner, and a
//! returned or removed document is never dropped on the ledger's account.
//! Borrowing does not consult [`DocumentStatus`], so the same document may be
//! borrowed more than once, by one user or several.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::error::{CatalogError, Result};
use crate::domain::{Document, DocumentId, User, UserKind};

/// Fee and loan-period rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LendingPolicy {
    /// Fee charged per day past the due date (default: 0.50)
    #[serde(default = "default_late_fee")]
    pub late_fee_per_day: f64,

    /// Loan period for students in days (default: 14)
    #[serde(default = "default_student_days")]
    pub student_loan_days: u32,

    /// Loan period for staff in days (default: 28)
    #[serde(default = "default_staff_days")]
    pub staff_loan_days: u32,
}

fn default_late_fee() -> f64 {
    0.50
}
fn default_student_days() -> u32 {
    14
}
fn default_staff_days() -> u32 {
    28
}

impl Default for LendingPolicy {
    fn default() -> Self {
        Self {
            late_fee_per_day: default_late_fee(),
            student_loan_days: default_student_days(),
            staff_loan_days: default_staff_days(),
        }
    }
}

impl LendingPolicy {
    /// Loan period for a kind of user
    pub fn loan_days(&self, kind: UserKind) -> u32 {
        match kind {
            UserKind::Student => self.student_loan_days,
            UserKind::Staff => self.staff_loan_days,
        }
    }
}

/// Lending state of a document, derived from outstanding loans
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Available,
    Borrowed,
}

impl std::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentStatus::Available => write!(f, "available"),
            DocumentStatus::Borrowed => write!(f, "borrowed"),
        }
    }
}

/// One borrow of one document
#[derive(Debug, Clone)]
pub struct Loan {
    /// Identity of the borrowed document
    pub document_id: DocumentId,

    /// Title at borrow time, kept for display after removal
    pub title: String,

    /// When the document was borrowed
    pub borrowed_at: DateTime<Utc>,

    document: Weak<Document>,
}

impl Loan {
    /// The borrowed document, if the catalog still holds it
    pub fn document(&self) -> Option<Arc<Document>> {
        self.document.upgrade()
    }

    /// Date the loan falls due under `policy`, saturating at the latest
    /// representable date
    pub fn due_at(&self, kind: UserKind, policy: &LendingPolicy) -> DateTime<Utc> {
        Duration::try_days(i64::from(policy.loan_days(kind)))
            .and_then(|period| self.borrowed_at.checked_add_signed(period))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

/// Borrow ledgers for all users, keyed by the whole [`User`] (name and kind)
#[derive(Debug, Default)]
pub struct BorrowLedger {
    policy: LendingPolicy,
    loans: Mutex<HashMap<User, Vec<Loan>>>,
}

impl BorrowLedger {
    /// Create an empty ledger with the default policy
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty ledger with a custom policy
    pub fn with_policy(policy: LendingPolicy) -> Self {
        Self {
            policy,
            loans: Mutex::default(),
        }
    }

    pub fn policy(&self) -> &LendingPolicy {
        &self.policy
    }

    // Every mutation is a single push or remove, so a poisoned map is
    // still consistent.
    fn lock(&self) -> MutexGuard<'_, HashMap<User, Vec<Loan>>> {
        self.loans.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record that `user` borrowed `doc` now
    pub fn borrow(&self, user: &User, doc: &Arc<Document>) {
        self.borrow_at(user, doc, Utc::now());
    }

    /// Record that `user` borrowed `doc` at a given time
    pub fn borrow_at(&self, user: &User, doc: &Arc<Document>, at: DateTime<Utc>) {
        let loan = Loan {
            document_id: doc.id(),
            title: doc.title().to_string(),
            borrowed_at: at,
            document: Arc::downgrade(doc),
        };

        self.lock()
            .entry(user.clone())
            .or_default()
            .push(loan);

        info!(user = user.name(), title = doc.title(), "{} borrows {}", user.name(), doc.title());
    }

    /// Remove the first loan of `doc` from `user`'s ledger
    pub fn return_item(&self, user: &User, doc: &Document) -> Result<Loan> {
        let mut loans = self.lock();

        let not_borrowed = || CatalogError::NotBorrowed {
            user: user.name().to_string(),
            document: doc.id(),
        };

        let Some((ledger, pos)) = loans.get_mut(user).and_then(|ledger| {
            let pos = ledger.iter().position(|l| l.document_id == doc.id())?;
            Some((ledger, pos))
        }) else {
            warn!(user = user.name(), title = doc.title(), "Return of item not borrowed");
            return Err(not_borrowed());
        };
        let loan = ledger.remove(pos);

        if ledger.is_empty() {
            loans.remove(user);
        }

        info!(user = user.name(), title = doc.title(), "{} returned", doc.title());
        Ok(loan)
    }

    /// Documents `user` currently holds that still exist in the catalog
    pub fn borrowed(&self, user: &User) -> Vec<Arc<Document>> {
        self.lock()
            .get(user)
            .map(|ledger| ledger.iter().filter_map(Loan::document).collect())
            .unwrap_or_default()
    }

    /// All of `user`'s outstanding loans, in borrow order
    pub fn loans(&self, user: &User) -> Vec<Loan> {
        self.lock().get(user).cloned().unwrap_or_default()
    }

    /// Whether any user holds `doc`
    pub fn status(&self, doc: &Document) -> DocumentStatus {
        let held = self
            .lock()
            .values()
            .flatten()
            .any(|l| l.document_id == doc.id());

        if held {
            DocumentStatus::Borrowed
        } else {
            DocumentStatus::Available
        }
    }

    /// Fee for returning `days_late` days after the due date
    pub fn late_fee(&self, days_late: u32) -> f64 {
        f64::from(days_late) * self.policy.late_fee_per_day
    }

    /// Fee owed on `loan` for `user` if returned at `now`
    pub fn overdue_fee(&self, loan: &Loan, user: &User, now: DateTime<Utc>) -> f64 {
        let days_late = (now - loan.due_at(user.kind(), &self.policy)).num_days();
        self.late_fee(u32::try_from(days_late).unwrap_or(0))
    }
}
