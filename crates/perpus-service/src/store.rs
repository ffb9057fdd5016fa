//! # Persistence Collaborator
//!
//! The [`LibraryStore`] trait is the only way the service layer touches
//! storage. [`crate::sqlite::SqliteStore`] is the bundled implementation;
//! tests swap in fakes.
//!
//! ## Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Reads          Ok(rows)            rows in store order                │
//! │  Writes         Ok(true)            change applied atomically          │
//! │                 Ok(false)           change did not apply               │
//! │  Either         Err(StoreError)     collaborator failed                │
//! │                                                                         │
//! │  borrow_book    decrement stock only if > 0, open loan, one unit       │
//! │  return_book    close loan only if active, increment stock, one unit   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;

use crate::error::StoreResult;
use perpus_core::{Book, Loan, LoanDetails, Member, NewBook, Staff};

/// Storage operations the library needs.
#[async_trait]
pub trait LibraryStore: Send + Sync {
    /// Checks that the store answers at all.
    async fn test_connection(&self) -> bool;

    async fn list_books(&self) -> StoreResult<Vec<Book>>;

    /// Books whose title, author or category contains `keyword`.
    async fn search_books(&self, keyword: &str) -> StoreResult<Vec<Book>>;

    async fn add_book(&self, book: &NewBook) -> StoreResult<bool>;

    /// Conditionally decrements stock and opens a loan.
    async fn borrow_book(&self, book_id: i64, user_id: i64, staff_id: i64) -> StoreResult<bool>;

    /// Closes an active loan and restocks its book.
    async fn return_book(&self, loan_id: i64, book_id: i64) -> StoreResult<bool>;

    /// Active loans, joined with book, member and staff.
    async fn list_active_loans(&self) -> StoreResult<Vec<LoanDetails>>;

    async fn list_users(&self) -> StoreResult<Vec<Member>>;

    async fn list_staff(&self) -> StoreResult<Vec<Staff>>;

    /// Looks a book up by id.
    ///
    /// The default scans `list_books`; stores with keyed access override it.
    async fn find_book(&self, book_id: i64) -> StoreResult<Option<Book>> {
        Ok(self
            .list_books()
            .await?
            .into_iter()
            .find(|book| book.id == book_id))
    }

    /// Looks a loan up by id, whatever its status.
    async fn find_loan(&self, loan_id: i64) -> StoreResult<Option<Loan>>;
}
