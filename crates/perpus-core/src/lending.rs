//! # Loan Lifecycle Rules
//!
//! Pure transition rules for the (Book, Loan) state machine.
//!
//! ## States
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Loan Lifecycle                                    │
//! │                                                                         │
//! │   Book: Available (stock > 0)                                          │
//! │      │                                                                  │
//! │      │  borrow: stock - 1, Loan::open(...)                             │
//! │      ▼                                                                  │
//! │   Loan: Active (returned_at = None)                                    │
//! │      │                                                                  │
//! │      │  return: Loan::close(now), stock + 1                            │
//! │      ▼                                                                  │
//! │   Loan: Returned (terminal for this loan)                              │
//! │                                                                         │
//! │   Stock is the only gate for opening a loan. Loan records are the      │
//! │   audit trail.                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Stores call these rules to compute the next stock and loan values they
//! write back. The service layer calls the `classify_*` functions after a
//! store reports that a write did not apply.

use chrono::{DateTime, Utc};

use crate::error::LendingError;
use crate::types::{Book, Loan, LoanParties, LoanStatus};

/// Result type for lifecycle rules.
pub type LendingResult<T> = Result<T, LendingError>;

// =============================================================================
// Borrow
// =============================================================================

/// Computes the stock left after lending one copy of `book`.
///
/// ## Errors
/// [`LendingError::OutOfStock`] when no copy is on the shelf.
pub fn stock_after_borrow(book: &Book) -> LendingResult<i64> {
    if !book.in_stock() {
        return Err(LendingError::OutOfStock {
            book_id: book.id,
            title: book.title.clone(),
        });
    }

    Ok(book.stock - 1)
}

/// Computes the stock after one copy of `book` comes back.
#[inline]
pub fn stock_after_return(book: &Book) -> i64 {
    book.stock.max(0) + 1
}

impl Loan {
    /// Opens a new loan record.
    ///
    /// `id` is whatever the store assigned; stores that assign ids on insert
    /// pass `0` and read the real id back.
    pub fn open(id: i64, book_id: i64, parties: LoanParties, borrowed_at: DateTime<Utc>) -> Self {
        Loan {
            id,
            book_id,
            user_id: parties.user_id,
            staff_id: parties.staff_id,
            borrowed_at,
            returned_at: None,
            status: LoanStatus::Active,
        }
    }

    /// Closes the loan, returning the updated record.
    ///
    /// ## Errors
    /// - [`LendingError::AlreadyReturned`] if the loan is not open
    /// - [`LendingError::InvalidLoanState`] if `returned_at` precedes the
    ///   borrow date
    pub fn close(&self, returned_at: DateTime<Utc>) -> LendingResult<Loan> {
        if !self.is_open() {
            return Err(LendingError::AlreadyReturned { loan_id: self.id });
        }

        if returned_at < self.borrowed_at {
            return Err(LendingError::InvalidLoanState {
                loan_id: self.id,
                reason: "return date precedes borrow date".to_string(),
            });
        }

        Ok(Loan {
            returned_at: Some(returned_at),
            status: LoanStatus::Returned,
            ..self.clone()
        })
    }
}

// =============================================================================
// Failure Classification
// =============================================================================

/// Picks the most likely reason a borrow write did not apply.
///
/// `current` is the book as re-read after the failure. The reading can be
/// stale under concurrent access, so the result is a diagnostic.
pub fn classify_borrow_failure(book_id: i64, current: Option<&Book>, detail: &str) -> LendingError {
    match current {
        None => LendingError::book_not_found(book_id),
        Some(book) if !book.in_stock() => LendingError::OutOfStock {
            book_id,
            title: book.title.clone(),
        },
        Some(_) => LendingError::persistence(detail),
    }
}

/// Picks the most likely reason a return write did not apply.
pub fn classify_return_failure(
    loan_id: i64,
    book_id: i64,
    current: Option<&Loan>,
    detail: &str,
) -> LendingError {
    match current {
        None => LendingError::loan_not_found(loan_id),
        Some(loan) if !loan.is_open() => LendingError::AlreadyReturned { loan_id },
        Some(loan) if loan.book_id != book_id => LendingError::InvalidLoanState {
            loan_id,
            reason: format!("loan is for book {}, not book {}", loan.book_id, book_id),
        },
        Some(_) => LendingError::persistence(detail),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn book(stock: i64) -> Book {
        Book {
            id: 1,
            title: "X".to_string(),
            author: "Y".to_string(),
            category: "Z".to_string(),
            stock,
        }
    }

    fn open_loan() -> Loan {
        Loan::open(10, 1, LoanParties::new(2, 3), Utc::now())
    }

    #[test]
    fn test_borrow_decrements_stock() {
        assert_eq!(stock_after_borrow(&book(1)), Ok(0));
        assert_eq!(stock_after_borrow(&book(5)), Ok(4));
    }

    #[test]
    fn test_borrow_rejects_empty_shelf() {
        let err = stock_after_borrow(&book(0)).unwrap_err();
        assert!(matches!(err, LendingError::OutOfStock { book_id: 1, .. }));
    }

    #[test]
    fn test_borrow_then_return_restores_stock() {
        let before = book(3);
        let after_borrow = Book {
            stock: stock_after_borrow(&before).unwrap(),
            ..before.clone()
        };
        assert_eq!(stock_after_return(&after_borrow), before.stock);
    }

    #[test]
    fn test_open_loan_is_active() {
        let loan = open_loan();
        assert!(loan.is_open());
        assert_eq!(loan.status, LoanStatus::Active);
        assert_eq!(loan.returned_at, None);
        assert_eq!((loan.user_id, loan.staff_id), (2, 3));
    }

    #[test]
    fn test_close_loan_once() {
        let loan = open_loan();
        let now = loan.borrowed_at + Duration::days(7);

        let closed = loan.close(now).unwrap();
        assert_eq!(closed.status, LoanStatus::Returned);
        assert_eq!(closed.returned_at, Some(now));
        assert!(closed.returned_at.unwrap() >= closed.borrowed_at);

        assert_eq!(
            closed.close(now),
            Err(LendingError::AlreadyReturned { loan_id: 10 })
        );
    }

    #[test]
    fn test_close_rejects_return_before_borrow() {
        let loan = open_loan();
        let err = loan.close(loan.borrowed_at - Duration::hours(1)).unwrap_err();
        assert!(matches!(err, LendingError::InvalidLoanState { loan_id: 10, .. }));
    }

    #[test]
    fn test_classify_borrow_failure() {
        assert_eq!(
            classify_borrow_failure(999, None, "no rows"),
            LendingError::book_not_found(999)
        );
        assert!(matches!(
            classify_borrow_failure(1, Some(&book(0)), "no rows"),
            LendingError::OutOfStock { .. }
        ));
        assert_eq!(
            classify_borrow_failure(1, Some(&book(2)), "no rows"),
            LendingError::persistence("no rows")
        );
    }

    #[test]
    fn test_classify_return_failure() {
        let loan = open_loan();
        let closed = loan.close(Utc::now() + Duration::seconds(1)).unwrap();

        assert_eq!(
            classify_return_failure(10, 1, None, "x"),
            LendingError::loan_not_found(10)
        );
        assert_eq!(
            classify_return_failure(10, 1, Some(&closed), "x"),
            LendingError::AlreadyReturned { loan_id: 10 }
        );
        assert!(matches!(
            classify_return_failure(10, 2, Some(&loan), "x"),
            LendingError::InvalidLoanState { loan_id: 10, .. }
        ));
        assert_eq!(
            classify_return_failure(10, 1, Some(&loan), "x"),
            LendingError::persistence("x")
        );
    }
}
