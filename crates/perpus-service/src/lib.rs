//! # perpus-service: Library Service Layer
//!
//! Wires the pure rules in `perpus-core` to a storage collaborator and
//! exposes the operations a presentation layer needs.
//!
//! ## Module Organization
//!
//! - [`service`] - The [`LibraryService`] facade
//! - [`lending`] - Borrow/return driving and failure diagnosis
//! - [`store`] - The [`LibraryStore`] collaborator trait
//! - [`sqlite`] - [`SqliteStore`], the bundled collaborator
//! - [`config`] - [`LibraryConfig`] loading (TOML + environment)
//! - [`telemetry`] - Logging setup
//! - [`error`] - Error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use perpus_service::{LibraryConfig, LibraryService};
//!
//! let config = LibraryConfig::load_or_default(None);
//! let service = LibraryService::connect(&config).await?;
//!
//! let outcome = service.borrow_book(1, service.default_parties()).await;
//! println!("{}", outcome.message);
//! ```

pub mod config;
pub mod error;
pub mod lending;
pub mod service;
pub mod sqlite;
pub mod store;
pub mod telemetry;

pub use config::LibraryConfig;
pub use error::{ConfigError, ServiceError, ServiceResult, StoreError, StoreResult};
pub use lending::LoanEngine;
pub use service::{FailureCode, LibraryService, OperationOutcome};
pub use sqlite::SqliteStore;
pub use store::LibraryStore;
pub use telemetry::init_tracing;
