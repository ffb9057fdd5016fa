//! # Domain Types
//!
//! Entities shared by every Perpus crate.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Book       │   │      Loan       │   │     Member      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │◄──│  book_id        │   │  id             │       │
//! │  │  title, author  │   │  user_id ───────┼──►│  name, address  │       │
//! │  │  category       │   │  staff_id ──┐   │   │  phone          │       │
//! │  │  stock          │   │  status     │   │   └─────────────────┘       │
//! │  └─────────────────┘   └─────────────┼───┘   ┌─────────────────┐       │
//! │                                      └──────►│     Staff       │       │
//! │                                              │  id, name, role │       │
//! │  LoanDetails = Loan + joined Book/Member/    └─────────────────┘       │
//! │  Staff, assembled by the store.                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Loans reference other entities by id only. Joins are done by the
//! persistence collaborator, which hands back [`LoanDetails`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

// =============================================================================
// Book
// =============================================================================

/// A title held by the library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Book {
    /// Unique identifier assigned by the store.
    pub id: i64,

    pub title: String,

    pub author: String,

    /// Free-text category ("Fiction", "Science", ...).
    pub category: String,

    /// Copies currently on the shelf. Never negative.
    pub stock: i64,
}

impl Book {
    /// Checks if at least one copy can be lent.
    #[inline]
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} - {} ({}) - Stock: {}",
            self.id, self.title, self.author, self.category, self.stock
        )
    }
}

/// Input for adding a book to the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub category: String,
    pub stock: i64,
}

impl NewBook {
    /// Creates a new book input with a single copy.
    pub fn new(title: impl Into<String>, author: impl Into<String>, category: impl Into<String>) -> Self {
        NewBook {
            title: title.into(),
            author: author.into(),
            category: category.into(),
            stock: 1,
        }
    }

    /// Sets the initial number of copies.
    pub fn with_stock(mut self, stock: i64) -> Self {
        self.stock = stock;
        self
    }
}

// =============================================================================
// Member
// =============================================================================

/// A registered library user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Member {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub phone: String,
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} - {} - {}", self.id, self.name, self.address, self.phone)
    }
}

// =============================================================================
// Staff
// =============================================================================

/// A staff member who can act as the lending agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Staff {
    pub id: i64,
    pub name: String,
    /// Job title ("Librarian", "Head of Circulation", ...).
    pub role: String,
    pub phone: String,
}

impl fmt::Display for Staff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} - {} - {}", self.id, self.name, self.role, self.phone)
    }
}

// =============================================================================
// Loan Status
// =============================================================================

/// The status of a loan record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum LoanStatus {
    /// Book is out with the borrower.
    #[default]
    Active,
    /// Book came back; the loan is closed.
    Returned,
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoanStatus::Active => write!(f, "Active"),
            LoanStatus::Returned => write!(f, "Returned"),
        }
    }
}

// =============================================================================
// Loan
// =============================================================================

/// A loan record linking one book copy, one member and one staff member.
///
/// ## Invariant
/// A closed loan (`Returned`) always carries `returned_at >= borrowed_at`.
/// Transitions go through `Loan::close` (see [`crate::lending`]) so the
/// invariant holds for every value the core produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Loan {
    pub id: i64,
    pub book_id: i64,
    pub user_id: i64,
    pub staff_id: i64,
    #[ts(as = "String")]
    pub borrowed_at: DateTime<Utc>,
    #[ts(as = "Option<String>")]
    pub returned_at: Option<DateTime<Utc>>,
    pub status: LoanStatus,
}

impl Loan {
    /// Checks if the loan is still open.
    #[inline]
    pub fn is_open(&self) -> bool {
        self.status == LoanStatus::Active && self.returned_at.is_none()
    }
}

// =============================================================================
// Loan Details
// =============================================================================

/// A loan joined with the entities it references.
///
/// Built by the persistence collaborator; the core only reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LoanDetails {
    pub loan: Loan,
    pub book: Book,
    pub member: Member,
    pub staff: Staff,
}

impl LoanDetails {
    /// Loan id shortcut.
    #[inline]
    pub fn id(&self) -> i64 {
        self.loan.id
    }
}

impl fmt::Display for LoanDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] Book: {} - Borrower: {} - Status: {}",
            self.loan.id, self.book.title, self.member.name, self.loan.status
        )
    }
}

// =============================================================================
// Loan Parties
// =============================================================================

/// Who borrows and which staff member hands the book over.
///
/// Passed explicitly to every borrow; there is no process-wide default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LoanParties {
    pub user_id: i64,
    pub staff_id: i64,
}

impl LoanParties {
    pub const fn new(user_id: i64, staff_id: i64) -> Self {
        LoanParties { user_id, staff_id }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_book(stock: i64) -> Book {
        Book {
            id: 1,
            title: "Bumi Manusia".to_string(),
            author: "Pramoedya Ananta Toer".to_string(),
            category: "Fiction".to_string(),
            stock,
        }
    }

    #[test]
    fn test_book_summary() {
        assert_eq!(
            sample_book(2).to_string(),
            "[1] Bumi Manusia - Pramoedya Ananta Toer (Fiction) - Stock: 2"
        );
    }

    #[test]
    fn test_book_in_stock() {
        assert!(sample_book(1).in_stock());
        assert!(!sample_book(0).in_stock());
    }

    #[test]
    fn test_loan_status_default() {
        assert_eq!(LoanStatus::default(), LoanStatus::Active);
    }

    #[test]
    fn test_loan_details_summary() {
        let details = LoanDetails {
            loan: Loan {
                id: 7,
                book_id: 1,
                user_id: 2,
                staff_id: 3,
                borrowed_at: Utc::now(),
                returned_at: None,
                status: LoanStatus::Active,
            },
            book: sample_book(0),
            member: Member {
                id: 2,
                name: "Siti".to_string(),
                address: "Jl. Merdeka 1".to_string(),
                phone: "0812".to_string(),
            },
            staff: Staff {
                id: 3,
                name: "Budi".to_string(),
                role: "Librarian".to_string(),
                phone: "0813".to_string(),
            },
        };

        assert!(details.loan.is_open());
        assert_eq!(
            details.to_string(),
            "[7] Book: Bumi Manusia - Borrower: Siti - Status: Active"
        );
    }

    #[test]
    fn test_new_book_defaults_to_one_copy() {
        let book = NewBook::new("Title", "Author", "Category");
        assert_eq!(book.stock, 1);
        assert_eq!(book.with_stock(4).stock, 4);
    }
}
