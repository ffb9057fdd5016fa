//! # Error Types
//!
//! Domain-specific error types for perpus-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  perpus-core errors (this file)                                        │
//! │  ├── CoreError        - General domain errors                          │
//! │  ├── LendingError     - Why a borrow/return did not happen             │
//! │  └── ValidationError  - Structural input failures                      │
//! │                                                                         │
//! │  perpus-db errors                                                      │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  perpus-service errors                                                 │
//! │  ├── StoreError       - Persistence collaborator failures              │
//! │  └── ServiceError     - What read operations surface to callers        │
//! │                                                                         │
//! │  Flow: DbError → StoreError → LendingError / ServiceError → caller     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core domain errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A loan lifecycle rule rejected the transition.
    #[error(transparent)]
    Lending(#[from] LendingError),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Lending Error
// =============================================================================

/// Reasons a borrow or return did not take effect.
///
/// The `Display` output is phrased for the person at the desk; the facade
/// passes it through unchanged as the operation message.
///
/// ## Borrow Failure Classification
/// ```text
/// store.borrow_book(...) == false
///      │
///      ▼
/// re-query book
///      ├── missing           → NotFound { entity: "Book" }
///      ├── stock <= 0        → OutOfStock
///      └── stock > 0         → PersistenceFailure
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LendingError {
    /// Referenced book or loan does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i64 },

    /// Borrow attempted while no copy is on the shelf.
    #[error("'{title}' is currently not available (no copies in stock)")]
    OutOfStock { book_id: i64, title: String },

    /// Return attempted on a loan that is already closed.
    #[error("Loan {loan_id} has already been returned")]
    AlreadyReturned { loan_id: i64 },

    /// Loan exists but the requested transition does not fit its state.
    #[error("Loan {loan_id} cannot be changed: {reason}")]
    InvalidLoanState { loan_id: i64, reason: String },

    /// The store did not apply the write and no better reason is known.
    #[error("The change could not be saved, please try again ({0})")]
    PersistenceFailure(String),
}

impl LendingError {
    /// Creates a NotFound error for a book id.
    pub fn book_not_found(id: i64) -> Self {
        LendingError::NotFound { entity: "Book", id }
    }

    /// Creates a NotFound error for a loan id.
    pub fn loan_not_found(id: i64) -> Self {
        LendingError::NotFound { entity: "Loan", id }
    }

    /// Creates a PersistenceFailure with the given detail.
    pub fn persistence(detail: impl Into<String>) -> Self {
        LendingError::PersistenceFailure(detail.into())
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised when a catalog item, report or new book is structurally incomplete.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },
}

impl ValidationError {
    /// Creates a Required error for the named field.
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lending_messages_distinguish_causes() {
        let missing = LendingError::book_not_found(999);
        let empty = LendingError::OutOfStock {
            book_id: 1,
            title: "Laskar Pelangi".to_string(),
        };

        assert_eq!(missing.to_string(), "Book not found: 999");
        assert_eq!(
            empty.to_string(),
            "'Laskar Pelangi' is currently not available (no copies in stock)"
        );
        assert_ne!(missing.to_string(), empty.to_string());
    }

    #[test]
    fn test_validation_error_messages() {
        assert_eq!(ValidationError::required("title").to_string(), "title is required");

        let err = ValidationError::TooLong {
            field: "author".to_string(),
            max: 200,
        };
        assert_eq!(err.to_string(), "author must be at most 200 characters");
    }

    #[test]
    fn test_errors_convert_to_core_error() {
        let core_err: CoreError = ValidationError::required("title").into();
        assert!(matches!(core_err, CoreError::Validation(_)));

        let core_err: CoreError = LendingError::AlreadyReturned { loan_id: 4 }.into();
        assert_eq!(core_err.to_string(), "Loan 4 has already been returned");
    }
}
