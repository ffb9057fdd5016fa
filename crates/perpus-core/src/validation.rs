//! # Validation Module
//!
//! Input validation utilities for Perpus.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Presentation layer                                           │
//! │  └── Parsing menu input, defaults for blank fields                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Structural completeness (non-blank titles, positive ids)          │
//! │  └── Bounds (stock >= 0, text length)                                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK (stock >= 0) constraints                         │
//! │  └── Foreign key constraints on loans                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use perpus_core::validation::{validate_required, validate_stock};
//!
//! assert!(validate_required("title", "Laskar Pelangi").is_ok());
//! assert!(validate_stock(-1).is_err());
//! ```

use crate::error::ValidationError;
use crate::types::NewBook;
use crate::{DEFAULT_CATEGORY, MAX_SEARCH_LEN, MAX_TEXT_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Upper bound on copies of one title.
pub const MAX_STOCK: i64 = 10_000;

// =============================================================================
// String Validators
// =============================================================================

/// Checks only that a text field is non-blank. No length bound.
///
/// ## Returns
/// The trimmed value.
pub fn require_present(field: &str, value: &str) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::required(field));
    }

    Ok(value.to_string())
}

/// Validates that a text field is present and not overly long.
///
/// ## Returns
/// The trimmed value.
pub fn validate_required(field: &str, value: &str) -> ValidationResult<String> {
    let value = require_present(field, value)?;

    if value.chars().count() > MAX_TEXT_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_TEXT_LEN,
        });
    }

    Ok(value)
}

/// Normalizes a category, falling back to [`DEFAULT_CATEGORY`] when blank.
pub fn normalize_category(category: &str) -> ValidationResult<String> {
    if category.trim().is_empty() {
        return Ok(DEFAULT_CATEGORY.to_string());
    }

    validate_required("category", category)
}

/// Validates a search keyword.
///
/// ## Rules
/// - Can be empty (matches every book)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed keyword.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > MAX_SEARCH_LEN {
        return Err(ValidationError::TooLong {
            field: "keyword".to_string(),
            max: MAX_SEARCH_LEN,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a stock count.
///
/// ## Rules
/// - Zero is allowed (title catalogued, all copies out)
/// - Must not exceed [`MAX_STOCK`]
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if !(0..=MAX_STOCK).contains(&stock) {
        return Err(ValidationError::OutOfRange {
            field: "stock".to_string(),
            min: 0,
            max: MAX_STOCK,
        });
    }

    Ok(())
}

/// Validates an entity id.
pub fn validate_id(field: &str, id: i64) -> ValidationResult<()> {
    if id <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Composite Validators
// =============================================================================

/// Validates and normalizes input for a new book.
///
/// Title and author are trimmed, a blank category becomes
/// [`DEFAULT_CATEGORY`].
pub fn validate_new_book(book: &NewBook) -> ValidationResult<NewBook> {
    let title = validate_required("title", &book.title)?;
    let author = validate_required("author", &book.author)?;
    let category = normalize_category(&book.category)?;
    validate_stock(book.stock)?;

    Ok(NewBook {
        title,
        author,
        category,
        stock: book.stock,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_required() {
        assert_eq!(validate_required("title", "  Dune ").unwrap(), "Dune");
        assert!(validate_required("title", "").is_err());
        assert!(validate_required("title", "   ").is_err());
        assert!(validate_required("title", &"A".repeat(201)).is_err());
    }

    #[test]
    fn test_require_present_has_no_length_bound() {
        let long = "A".repeat(201);
        assert_eq!(require_present("title", &format!(" {long} ")).unwrap(), long);
        assert!(require_present("title", " \t ").is_err());
    }

    #[test]
    fn test_normalize_category() {
        assert_eq!(normalize_category("").unwrap(), DEFAULT_CATEGORY);
        assert_eq!(normalize_category(" Science ").unwrap(), "Science");
    }

    #[test]
    fn test_validate_search_query() {
        assert_eq!(validate_search_query("  tere ").unwrap(), "tere");
        assert_eq!(validate_search_query("").unwrap(), "");
        assert!(validate_search_query(&"q".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_stock() {
        assert!(validate_stock(0).is_ok());
        assert!(validate_stock(5).is_ok());
        assert!(validate_stock(-1).is_err());
        assert!(validate_stock(MAX_STOCK + 1).is_err());
    }

    #[test]
    fn test_validate_id() {
        assert!(validate_id("book id", 1).is_ok());
        assert!(validate_id("book id", 0).is_err());
    }

    #[test]
    fn test_validate_new_book_normalizes() {
        let input = NewBook::new(" Ronggeng Dukuh Paruk ", "Ahmad Tohari", " ").with_stock(2);
        let book = validate_new_book(&input).unwrap();

        assert_eq!(book.title, "Ronggeng Dukuh Paruk");
        assert_eq!(book.category, DEFAULT_CATEGORY);
        assert_eq!(book.stock, 2);

        let missing_author = NewBook::new("Title", "", "Fiction");
        assert_eq!(
            validate_new_book(&missing_author),
            Err(ValidationError::required("author"))
        );
    }
}
