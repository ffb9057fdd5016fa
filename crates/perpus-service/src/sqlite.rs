//! # SQLite Store
//!
//! [`LibraryStore`] backed by a [`perpus_db::Database`].

use async_trait::async_trait;
use tracing::warn;

use crate::error::StoreResult;
use crate::store::LibraryStore;
use perpus_core::{Book, Loan, LoanDetails, LoanParties, Member, NewBook, Staff};
use perpus_db::{Database, DbConfig};

/// Library store over the bundled SQLite database.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    db: Database,
}

impl SqliteStore {
    pub fn new(db: Database) -> Self {
        SqliteStore { db }
    }

    /// Opens (and migrates) the database described by `config`.
    pub async fn connect(config: DbConfig) -> StoreResult<Self> {
        let db = Database::new(config).await?;
        Ok(SqliteStore { db })
    }

    /// The underlying database handle.
    pub fn database(&self) -> &Database {
        &self.db
    }
}

#[async_trait]
impl LibraryStore for SqliteStore {
    async fn test_connection(&self) -> bool {
        let healthy = self.db.health_check().await;
        if !healthy {
            warn!("Database health check failed");
        }
        healthy
    }

    async fn list_books(&self) -> StoreResult<Vec<Book>> {
        Ok(self.db.books().list().await?)
    }

    async fn search_books(&self, keyword: &str) -> StoreResult<Vec<Book>> {
        Ok(self.db.books().search(keyword).await?)
    }

    async fn add_book(&self, book: &NewBook) -> StoreResult<bool> {
        self.db.books().insert(book).await?;
        Ok(true)
    }

    async fn borrow_book(&self, book_id: i64, user_id: i64, staff_id: i64) -> StoreResult<bool> {
        let parties = LoanParties::new(user_id, staff_id);
        Ok(self.db.loans().borrow(book_id, parties).await?.is_some())
    }

    async fn return_book(&self, loan_id: i64, book_id: i64) -> StoreResult<bool> {
        Ok(self.db.loans().return_loan(loan_id, book_id).await?)
    }

    async fn list_active_loans(&self) -> StoreResult<Vec<LoanDetails>> {
        Ok(self.db.loans().list_active().await?)
    }

    async fn list_users(&self) -> StoreResult<Vec<Member>> {
        Ok(self.db.members().list().await?)
    }

    async fn list_staff(&self) -> StoreResult<Vec<Staff>> {
        Ok(self.db.staff().list().await?)
    }

    async fn find_book(&self, book_id: i64) -> StoreResult<Option<Book>> {
        Ok(self.db.books().get_by_id(book_id).await?)
    }

    async fn find_loan(&self, loan_id: i64) -> StoreResult<Option<Loan>> {
        Ok(self.db.loans().get_by_id(loan_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_find_book_uses_keyed_lookup() {
        let store = SqliteStore::connect(DbConfig::in_memory()).await.unwrap();
        assert!(store.test_connection().await);

        store
            .add_book(&NewBook::new("Ronggeng Dukuh Paruk", "Ahmad Tohari", "Novel"))
            .await
            .unwrap();

        let found = store.find_book(1).await.unwrap().unwrap();
        assert_eq!(found.title, "Ronggeng Dukuh Paruk");
        assert!(store.find_book(2).await.unwrap().is_none());
        assert!(store.find_loan(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_closed_database_fails_connection_test() {
        let store = SqliteStore::connect(DbConfig::in_memory()).await.unwrap();
        store.database().close().await;

        assert!(!store.test_connection().await);
        assert!(store.list_books().await.is_err());
    }
}
