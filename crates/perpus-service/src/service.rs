//! # Library Service
//!
//! The facade a presentation layer talks to.
//!
//! ## Operation Shapes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Writes (add / borrow / return)  → OperationOutcome, never an Err      │
//! │  Reads (list / search)           → ServiceResult<Vec<_>>               │
//! │  Reports and catalog             → ServiceResult<Report | Vec<Item>>   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Borrowing always takes an explicit [`LoanParties`]. The configured
//! default pair is available through [`LibraryService::default_parties`] and
//! can be checked with [`LibraryService::resolve_parties`].

use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::config::{CatalogSettings, LibraryConfig};
use crate::error::ServiceResult;
use crate::lending::LoanEngine;
use crate::sqlite::SqliteStore;
use crate::store::LibraryStore;
use perpus_core::catalog;
use perpus_core::validation::{validate_id, validate_new_book, validate_search_query};
use perpus_core::{
    Book, CatalogItem, LendingError, LoanDetails, LoanParties, Member, NewBook, Report,
    ReportBuilder, ReportDirector, Staff, ValidationError,
};

// =============================================================================
// Operation Outcome
// =============================================================================

/// Why a write did not go through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureCode {
    NotFound,
    OutOfStock,
    AlreadyReturned,
    InvalidLoanState,
    PersistenceFailure,
    InvalidInput,
}

impl From<&LendingError> for FailureCode {
    fn from(err: &LendingError) -> Self {
        match err {
            LendingError::NotFound { .. } => FailureCode::NotFound,
            LendingError::OutOfStock { .. } => FailureCode::OutOfStock,
            LendingError::AlreadyReturned { .. } => FailureCode::AlreadyReturned,
            LendingError::InvalidLoanState { .. } => FailureCode::InvalidLoanState,
            LendingError::PersistenceFailure(_) => FailureCode::PersistenceFailure,
        }
    }
}

/// Result of a write operation, ready to show to the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationOutcome {
    pub success: bool,
    pub failure: Option<FailureCode>,
    pub message: String,
}

impl OperationOutcome {
    pub fn succeeded(message: impl Into<String>) -> Self {
        OperationOutcome {
            success: true,
            failure: None,
            message: message.into(),
        }
    }

    pub fn failed(code: FailureCode, message: impl Into<String>) -> Self {
        OperationOutcome {
            success: false,
            failure: Some(code),
            message: message.into(),
        }
    }
}

impl From<LendingError> for OperationOutcome {
    fn from(err: LendingError) -> Self {
        OperationOutcome::failed(FailureCode::from(&err), err.to_string())
    }
}

impl From<ValidationError> for OperationOutcome {
    fn from(err: ValidationError) -> Self {
        OperationOutcome::failed(FailureCode::InvalidInput, err.to_string())
    }
}

impl fmt::Display for OperationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

// =============================================================================
// Library Service
// =============================================================================

/// Facade over lending, reporting and the catalog.
pub struct LibraryService {
    store: Arc<dyn LibraryStore>,
    loans: LoanEngine,
    director: ReportDirector,
    catalog: CatalogSettings,
    default_parties: LoanParties,
    default_author: String,
}

impl LibraryService {
    /// Builds the facade over any store.
    pub fn new(store: Arc<dyn LibraryStore>, config: &LibraryConfig) -> Self {
        LibraryService {
            loans: LoanEngine::new(Arc::clone(&store)),
            store,
            director: ReportDirector::new(),
            catalog: config.catalog.clone(),
            default_parties: config.lending.default_parties(),
            default_author: config.reports.default_author.clone(),
        }
    }

    /// Opens the configured SQLite database and builds the facade.
    pub async fn connect(config: &LibraryConfig) -> ServiceResult<Self> {
        let store = SqliteStore::connect(config.database.db_config()).await?;
        info!(path = %config.database.path.display(), "Library store connected");
        Ok(Self::new(Arc::new(store), config))
    }

    /// Pair configured for borrows when the operator picks nobody.
    pub fn default_parties(&self) -> LoanParties {
        self.default_parties
    }

    pub fn default_author(&self) -> &str {
        &self.default_author
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    pub async fn test_connection(&self) -> bool {
        self.store.test_connection().await
    }

    pub async fn list_books(&self) -> ServiceResult<Vec<Book>> {
        Ok(self.store.list_books().await?)
    }

    /// Keyword search. A blank keyword lists everything.
    pub async fn search_books(&self, keyword: &str) -> ServiceResult<Vec<Book>> {
        let keyword = validate_search_query(keyword)?;
        Ok(self.store.search_books(&keyword).await?)
    }

    pub async fn add_book(
        &self,
        title: &str,
        author: &str,
        category: &str,
        stock: i64,
    ) -> OperationOutcome {
        let book = match validate_new_book(&NewBook::new(title, author, category).with_stock(stock)) {
            Ok(book) => book,
            Err(e) => {
                warn!(error = %e, "Rejected new book");
                return e.into();
            }
        };

        match self.store.add_book(&book).await {
            Ok(true) => {
                info!(title = %book.title, stock = book.stock, "Book added");
                OperationOutcome::succeeded(format!("Book '{}' added successfully!", book.title))
            }
            Ok(false) => OperationOutcome::failed(
                FailureCode::PersistenceFailure,
                "Could not add book: the store did not accept it",
            ),
            Err(e) => {
                error!(title = %book.title, error = %e, "Failed to add book");
                OperationOutcome::failed(
                    FailureCode::PersistenceFailure,
                    format!("Could not add book: {e}"),
                )
            }
        }
    }

    /// Builds catalog items for `books` followed by the configured
    /// periodicals and digital media.
    pub fn build_catalog_items(&self, books: &[Book]) -> ServiceResult<Vec<CatalogItem>> {
        let extras = self.catalog.items()?;
        Ok(catalog::assemble(books, extras)?)
    }

    // =========================================================================
    // Lending
    // =========================================================================

    pub async fn borrow_book(&self, book_id: i64, parties: LoanParties) -> OperationOutcome {
        if let Err(e) = validate_id("user id", parties.user_id)
            .and_then(|()| validate_id("staff id", parties.staff_id))
        {
            return e.into();
        }

        match self.loans.borrow(book_id, parties).await {
            Ok(()) => OperationOutcome::succeeded("Book borrowed successfully!"),
            Err(reason) => reason.into(),
        }
    }

    pub async fn return_book(&self, loan_id: i64, book_id: i64) -> OperationOutcome {
        match self.loans.return_loan(loan_id, book_id).await {
            Ok(()) => OperationOutcome::succeeded("Book returned successfully!"),
            Err(reason) => reason.into(),
        }
    }

    pub async fn list_active_loans(&self) -> ServiceResult<Vec<LoanDetails>> {
        Ok(self.loans.active_loans().await?)
    }

    pub async fn list_users(&self) -> ServiceResult<Vec<Member>> {
        Ok(self.store.list_users().await?)
    }

    pub async fn list_staff(&self) -> ServiceResult<Vec<Staff>> {
        Ok(self.store.list_staff().await?)
    }

    /// Checks that both ids name known people and returns them as a pair.
    ///
    /// ## Errors
    /// `LendingError::NotFound` for an unknown user or staff id.
    pub async fn resolve_parties(&self, user_id: i64, staff_id: i64) -> ServiceResult<LoanParties> {
        let users = self.store.list_users().await?;
        if !users.iter().any(|u| u.id == user_id) {
            return Err(LendingError::NotFound { entity: "User", id: user_id }.into());
        }

        let staff = self.store.list_staff().await?;
        if !staff.iter().any(|s| s.id == staff_id) {
            return Err(LendingError::NotFound { entity: "Staff", id: staff_id }.into());
        }

        Ok(LoanParties::new(user_id, staff_id))
    }

    // =========================================================================
    // Reports
    // =========================================================================

    /// All books plus active loans. A blank `author` uses the configured one.
    pub async fn build_monthly_report(&self, author: &str) -> ServiceResult<Report> {
        let books = self.store.list_books().await?;
        let loans = self.loans.active_loans().await?;
        let report = self
            .director
            .monthly(ReportBuilder::new(), books, loans, self.author_or_default(author), now())?;

        info!(title = %report.title(), "Report built");
        Ok(report)
    }

    pub async fn build_inventory_report(&self, author: &str) -> ServiceResult<Report> {
        let books = self.store.list_books().await?;
        let report = self
            .director
            .inventory(ReportBuilder::new(), books, self.author_or_default(author), now())?;

        info!(title = %report.title(), "Report built");
        Ok(report)
    }

    pub async fn build_membership_report(&self, author: &str) -> ServiceResult<Report> {
        let users = self.store.list_users().await?;
        let report = self
            .director
            .membership(ReportBuilder::new(), users, self.author_or_default(author), now())?;

        info!(title = %report.title(), "Report built");
        Ok(report)
    }

    fn author_or_default<'a>(&'a self, author: &'a str) -> &'a str {
        if author.trim().is_empty() {
            &self.default_author
        } else {
            author
        }
    }
}

/// Local wall clock, which is what report dates show.
fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

// =============================================================================
// Unit Tests
// =============================================================================
