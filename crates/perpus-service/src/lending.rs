//! # Loan Engine
//!
//! Drives borrow and return against a [`LibraryStore`].
//!
//! ## Failure Diagnosis
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Borrow                                               │
//! │                                                                         │
//! │  store.borrow_book() ── Ok(true) ──► done                              │
//! │         │                                                               │
//! │         └─ Ok(false) / Err ──► store.find_book()                       │
//! │                                   │                                     │
//! │                                   ├─ None        → NotFound            │
//! │                                   ├─ stock == 0  → OutOfStock          │
//! │                                   └─ otherwise   → PersistenceFailure  │
//! │                                                                         │
//! │                    Return                                               │
//! │                                                                         │
//! │  store.return_book() ── Ok(true) ──► done                              │
//! │         │                                                               │
//! │         └─ Ok(false) / Err ──► store.find_loan()                       │
//! │                                   │                                     │
//! │                                   ├─ None          → NotFound          │
//! │                                   ├─ closed        → AlreadyReturned   │
//! │                                   ├─ other book    → InvalidLoanState  │
//! │                                   └─ otherwise     → PersistenceFailure│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The write outcome is ground truth. The follow-up lookup only picks a
//! reason and can be stale if something else touched the row in between.

use std::sync::Arc;
use tracing::{error, info, warn};

use crate::error::StoreResult;
use crate::store::LibraryStore;
use perpus_core::lending::{classify_borrow_failure, classify_return_failure};
use perpus_core::{LendingError, LoanDetails, LoanParties};

const REJECTED: &str = "the store did not apply the change";

/// Loan lifecycle operations over a store.
#[derive(Clone)]
pub struct LoanEngine {
    store: Arc<dyn LibraryStore>,
}

impl LoanEngine {
    pub fn new(store: Arc<dyn LibraryStore>) -> Self {
        LoanEngine { store }
    }

    /// Lends one copy of `book_id` to `parties.user_id`.
    pub async fn borrow(&self, book_id: i64, parties: LoanParties) -> Result<(), LendingError> {
        let outcome = self
            .store
            .borrow_book(book_id, parties.user_id, parties.staff_id)
            .await;

        let detail = match outcome {
            Ok(true) => {
                info!(book_id, user_id = parties.user_id, "Book borrowed");
                return Ok(());
            }
            Ok(false) => REJECTED.to_string(),
            Err(e) => {
                error!(book_id, error = %e, "Borrow failed at the store");
                e.to_string()
            }
        };

        let reason = match self.store.find_book(book_id).await {
            Ok(current) => classify_borrow_failure(book_id, current.as_ref(), &detail),
            Err(e) => {
                warn!(book_id, error = %e, "Could not re-read book after failed borrow");
                LendingError::persistence(detail)
            }
        };

        warn!(book_id, reason = %reason, "Borrow rejected");
        Err(reason)
    }

    /// Closes loan `loan_id` and puts `book_id` back on the shelf.
    pub async fn return_loan(&self, loan_id: i64, book_id: i64) -> Result<(), LendingError> {
        let detail = match self.store.return_book(loan_id, book_id).await {
            Ok(true) => {
                info!(loan_id, book_id, "Book returned");
                return Ok(());
            }
            Ok(false) => REJECTED.to_string(),
            Err(e) => {
                error!(loan_id, error = %e, "Return failed at the store");
                e.to_string()
            }
        };

        let reason = match self.store.find_loan(loan_id).await {
            Ok(current) => classify_return_failure(loan_id, book_id, current.as_ref(), &detail),
            Err(e) => {
                warn!(loan_id, error = %e, "Could not re-read loan after failed return");
                LendingError::persistence(detail)
            }
        };

        warn!(loan_id, reason = %reason, "Return rejected");
        Err(reason)
    }

    /// Every loan still out.
    pub async fn active_loans(&self) -> StoreResult<Vec<LoanDetails>> {
        self.store.list_active_loans().await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use async_trait::async_trait;
    use chrono::Utc;
    use perpus_core::{Book, Loan, LoanStatus, Member, NewBook, Staff};

    /// Store whose write outcomes are fixed up front.
    ///
    /// `None` outcomes simulate a collaborator error.
    #[derive(Default)]
    struct ScriptedStore {
        books: Vec<Book>,
        loans: Vec<Loan>,
        borrow_outcome: Option<bool>,
        return_outcome: Option<bool>,
        lookups_fail: bool,
    }

    impl ScriptedStore {
        fn unavailable() -> StoreError {
            StoreError::Unavailable("scripted failure".into())
        }
    }

    #[async_trait]
    impl LibraryStore for ScriptedStore {
        async fn test_connection(&self) -> bool {
            true
        }

        async fn list_books(&self) -> StoreResult<Vec<Book>> {
            if self.lookups_fail {
                return Err(Self::unavailable());
            }
            Ok(self.books.clone())
        }

        async fn search_books(&self, _keyword: &str) -> StoreResult<Vec<Book>> {
            self.list_books().await
        }

        async fn add_book(&self, _book: &NewBook) -> StoreResult<bool> {
            Ok(false)
        }

        async fn borrow_book(&self, _book_id: i64, _user_id: i64, _staff_id: i64) -> StoreResult<bool> {
            self.borrow_outcome.ok_or_else(Self::unavailable)
        }

        async fn return_book(&self, _loan_id: i64, _book_id: i64) -> StoreResult<bool> {
            self.return_outcome.ok_or_else(Self::unavailable)
        }

        async fn list_active_loans(&self) -> StoreResult<Vec<LoanDetails>> {
            Ok(Vec::new())
        }

        async fn list_users(&self) -> StoreResult<Vec<Member>> {
            Ok(Vec::new())
        }

        async fn list_staff(&self) -> StoreResult<Vec<Staff>> {
            Ok(Vec::new())
        }

        async fn find_loan(&self, loan_id: i64) -> StoreResult<Option<Loan>> {
            if self.lookups_fail {
                return Err(Self::unavailable());
            }
            Ok(self.loans.iter().find(|l| l.id == loan_id).cloned())
        }
    }

    fn book(id: i64, stock: i64) -> Book {
        Book {
            id,
            title: format!("Book {id}"),
            author: "Author".to_string(),
            category: "General".to_string(),
            stock,
        }
    }

    fn loan(id: i64, book_id: i64, status: LoanStatus) -> Loan {
        let opened = Loan::open(id, book_id, PARTIES, Utc::now());
        match status {
            LoanStatus::Active => opened,
            LoanStatus::Returned => opened.close(Utc::now()).unwrap(),
        }
    }

    const PARTIES: LoanParties = LoanParties::new(1, 1);

    fn engine(store: ScriptedStore) -> LoanEngine {
        LoanEngine::new(Arc::new(store))
    }

    #[tokio::test]
    async fn test_borrow_success() {
        let engine = engine(ScriptedStore {
            books: vec![book(1, 2)],
            borrow_outcome: Some(true),
            ..Default::default()
        });

        assert!(engine.borrow(1, PARTIES).await.is_ok());
    }

    #[tokio::test]
    async fn test_borrow_unknown_book_is_not_found() {
        let engine = engine(ScriptedStore {
            books: vec![book(1, 2)],
            borrow_outcome: Some(false),
            ..Default::default()
        });

        let err = engine.borrow(999, PARTIES).await.unwrap_err();
        assert_eq!(err, LendingError::book_not_found(999));
    }

    #[tokio::test]
    async fn test_borrow_empty_shelf_is_out_of_stock() {
        let engine = engine(ScriptedStore {
            books: vec![book(1, 0)],
            borrow_outcome: Some(false),
            ..Default::default()
        });

        let err = engine.borrow(1, PARTIES).await.unwrap_err();
        assert!(matches!(err, LendingError::OutOfStock { book_id: 1, .. }));
    }

    #[tokio::test]
    async fn test_borrow_store_error_with_stock_is_persistence_failure() {
        let engine = engine(ScriptedStore {
            books: vec![book(1, 3)],
            borrow_outcome: None,
            ..Default::default()
        });

        let err = engine.borrow(1, PARTIES).await.unwrap_err();
        assert!(matches!(err, LendingError::PersistenceFailure(ref d) if d.contains("scripted failure")));
    }

    #[tokio::test]
    async fn test_borrow_diagnosis_failure_falls_back_to_persistence() {
        let engine = engine(ScriptedStore {
            borrow_outcome: Some(false),
            lookups_fail: true,
            ..Default::default()
        });

        let err = engine.borrow(1, PARTIES).await.unwrap_err();
        assert_eq!(err, LendingError::persistence(REJECTED));
    }

    #[tokio::test]
    async fn test_return_failures_are_classified() {
        let loans = vec![
            loan(1, 1, LoanStatus::Returned),
            loan(2, 1, LoanStatus::Active),
        ];

        let engine = engine(ScriptedStore {
            loans,
            return_outcome: Some(false),
            ..Default::default()
        });

        assert_eq!(
            engine.return_loan(1, 1).await.unwrap_err(),
            LendingError::AlreadyReturned { loan_id: 1 }
        );
        assert!(matches!(
            engine.return_loan(2, 5).await.unwrap_err(),
            LendingError::InvalidLoanState { loan_id: 2, .. }
        ));
        assert_eq!(
            engine.return_loan(42, 1).await.unwrap_err(),
            LendingError::loan_not_found(42)
        );
        assert!(matches!(
            engine.return_loan(2, 1).await.unwrap_err(),
            LendingError::PersistenceFailure(_)
        ));
    }

    #[tokio::test]
    async fn test_return_success() {
        let engine = engine(ScriptedStore {
            loans: vec![loan(1, 1, LoanStatus::Active)],
            return_outcome: Some(true),
            ..Default::default()
        });

        assert!(engine.return_loan(1, 1).await.is_ok());
    }
}
