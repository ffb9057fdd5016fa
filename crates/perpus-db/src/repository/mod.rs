//! # Repository Module
//!
//! Database repository implementations for Perpus.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  SqliteStore (perpus-service)                                          │
//! │       │                                                                 │
//! │       │  db.books().search("tere")                                     │
//! │       ▼                                                                 │
//! │  BookRepository / LoanRepository / MemberRepository / StaffRepository  │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`BookRepository`] - Catalog listing, search and inserts
//! - [`LoanRepository`] - Borrow/return transactions and active-loan joins
//! - [`MemberRepository`] - Registered borrowers
//! - [`StaffRepository`] - Lending agents

pub mod book;
pub mod loan;
pub mod member;
pub mod staff;

pub use book::BookRepository;
pub use loan::LoanRepository;
pub use member::MemberRepository;
pub use staff::StaffRepository;
