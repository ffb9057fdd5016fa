//! # perpus-core: Pure Domain Logic for Perpus
//!
//! This crate holds the library's domain model and every rule that does not
//! need storage: loan state transitions, catalog item construction and report
//! assembly.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Perpus Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Presentation layer (menu, API, ...)                │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │        perpus-service (LibraryService facade, LoanEngine)       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ perpus-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │  lending  │  │  catalog  │  │  report   │  │   │
//! │  │   │ Book Loan │  │ Loan FSM  │  │CatalogItem│  │ Builder   │  │   │
//! │  │   │ Member    │  │ failures  │  │ factories │  │ Director  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    perpus-db (Database Layer)                   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Entities (Book, Member, Staff, Loan, LoanDetails)
//! - [`lending`] - Loan lifecycle rules and failure classification
//! - [`catalog`] - Polymorphic catalog items
//! - [`report`] - Report builder, director recipes and rendering
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use perpus_core::catalog::CatalogItem;
//!
//! let item = CatalogItem::periodical(1001, "National Geographic", "June 2023", 3).unwrap();
//! assert!(item.is_available());
//! assert_eq!(item.id(), 1001);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod error;
pub mod lending;
pub mod report;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use catalog::{CatalogItem, ItemKind};
pub use error::{CoreError, CoreResult, LendingError, ValidationError};
pub use report::{Report, ReportBuilder, ReportDirector};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Category assigned to a book added without one.
pub const DEFAULT_CATEGORY: &str = "General";

/// Maximum length of a book title or author name.
pub const MAX_TEXT_LEN: usize = 200;

/// Maximum length of a catalog search keyword.
pub const MAX_SEARCH_LEN: usize = 100;
