//! # Service Error Types
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Service Error Types                               │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  StoreError     │  │  ServiceError   │  │  ConfigError            │ │
//! │  │  ─────────────  │  │  ─────────────  │  │  ─────────────          │ │
//! │  │  Db             │  │  Store          │  │  LoadFailed             │ │
//! │  │  Unavailable    │  │  Core           │  │  Invalid                │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  Borrow/return never surface these: the facade folds them into an      │
//! │  OperationOutcome. Reads and report builds do.                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use perpus_core::{CoreError, LendingError, ValidationError};
use perpus_db::DbError;

/// Failure reported by a persistence collaborator.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The SQLite store failed.
    #[error(transparent)]
    Db(#[from] DbError),

    /// The collaborator could not be reached.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced by the library facade.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<ValidationError> for ServiceError {
    fn from(err: ValidationError) -> Self {
        ServiceError::Core(err.into())
    }
}

impl From<LendingError> for ServiceError {
    fn from(err: LendingError) -> Self {
        ServiceError::Core(err.into())
    }
}

impl From<DbError> for ServiceError {
    fn from(err: DbError) -> Self {
        ServiceError::Store(err.into())
    }
}

/// Result type for facade operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read or parsed.
    #[error("Failed to load config: {0}")]
    LoadFailed(String),

    /// Config parsed but holds unusable values.
    #[error("Invalid config: {0}")]
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::LoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::LoadFailed(err.to_string())
    }
}

/// Result type for configuration.
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_is_transparent() {
        let err = StoreError::from(DbError::PoolExhausted);
        assert_eq!(err.to_string(), "Connection pool exhausted");
        assert_eq!(
            StoreError::Unavailable("down".into()).to_string(),
            "Store unavailable: down"
        );
    }

    #[test]
    fn test_service_error_conversions() {
        let err = ServiceError::from(LendingError::book_not_found(3));
        assert!(matches!(err, ServiceError::Core(CoreError::Lending(_))));

        let err = ServiceError::from(ValidationError::required("title"));
        assert!(matches!(err, ServiceError::Core(CoreError::Validation(_))));
    }
}
