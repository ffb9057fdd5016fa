//! # Book Repository
//!
//! Database operations for the book catalog.
//!
//! ## Key Operations
//! - Listing in store order (by id)
//! - Keyword search across title, author and category
//! - Inserting new titles
//!
//! Stock is never written here. Only the loan transactions in
//! [`super::loan`] move it.
//!
//! ## Search
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    How Keyword Search Works                             │
//! │                                                                         │
//! │  User types: "tere"                                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  LIKE '%tere%' over: title, author, category (ASCII case-insensitive)  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │ books                                   │                           │
//! │  │                                         │                           │
//! │  │ 1 | Ayat-Ayat Cinta | Habiburrahman     │                           │
//! │  │ 2 | Bumi           | Tere Liye          │ ← MATCH!                  │
//! │  │ 3 | Hujan          | Tere Liye          │ ← MATCH!                  │
//! │  └─────────────────────────────────────────┘                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Results: [2, 3] (ordered by id)                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use perpus_core::{Book, NewBook};

/// Repository for book database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = BookRepository::new(pool);
///
/// let results = repo.search("tere").await?;
/// let book = repo.get_by_id(1).await?;
/// ```
#[derive(Debug, Clone)]
pub struct BookRepository {
    pool: SqlitePool,
}

impl BookRepository {
    /// Creates a new BookRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BookRepository { pool }
    }

    /// Lists every book in store order.
    pub async fn list(&self) -> DbResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(
            r#"
            SELECT id, title, author, category, stock
            FROM books
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = books.len(), "Listed books");
        Ok(books)
    }

    /// Searches books by keyword.
    ///
    /// ## Arguments
    /// * `keyword` - Substring to look for. Blank returns every book.
    ///
    /// `%` and `_` in the keyword match literally.
    pub async fn search(&self, keyword: &str) -> DbResult<Vec<Book>> {
        let keyword = keyword.trim();

        debug!(keyword = %keyword, "Searching books");

        if keyword.is_empty() {
            return self.list().await;
        }

        let pattern = format!("%{}%", escape_like(keyword));

        let books = sqlx::query_as::<_, Book>(
            r#"
            SELECT id, title, author, category, stock
            FROM books
            WHERE title LIKE ?1 ESCAPE '\'
               OR author LIKE ?1 ESCAPE '\'
               OR category LIKE ?1 ESCAPE '\'
            ORDER BY id
            "#,
        )
        .bind(&pattern)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = books.len(), "Search returned books");
        Ok(books)
    }

    /// Gets a book by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Book))` - Book found
    /// * `Ok(None)` - Book not found
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(
            r#"
            SELECT id, title, author, category, stock
            FROM books
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(book)
    }

    /// Inserts a new book and returns its assigned id.
    ///
    /// The input is stored as given; validation happens upstream.
    pub async fn insert(&self, book: &NewBook) -> DbResult<i64> {
        debug!(title = %book.title, stock = book.stock, "Inserting book");

        let result = sqlx::query(
            r#"
            INSERT INTO books (title, author, category, stock)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.category)
        .bind(book.stock)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Counts total books (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Escapes LIKE wildcards so user input matches literally.
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    async fn seeded() -> BookRepository {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.books();
        for book in [
            NewBook::new("Ayat-Ayat Cinta", "Habiburrahman El Shirazy", "Novel"),
            NewBook::new("Bumi", "Tere Liye", "Fantasy").with_stock(2),
            NewBook::new("Hujan", "Tere Liye", "Novel").with_stock(0),
        ] {
            repo.insert(&book).await.unwrap();
        }
        repo
    }

    #[tokio::test]
    async fn test_list_in_store_order() {
        let repo = seeded().await;

        let books = repo.list().await.unwrap();
        let ids: Vec<i64> = books.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(books[1].stock, 2);
        assert_eq!(repo.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_search_matches_author_and_category() {
        let repo = seeded().await;

        let by_author = repo.search("tere").await.unwrap();
        assert_eq!(by_author.len(), 2);

        let by_category = repo.search("novel").await.unwrap();
        let titles: Vec<&str> = by_category.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["Ayat-Ayat Cinta", "Hujan"]);
    }

    #[tokio::test]
    async fn test_blank_search_returns_everything() {
        let repo = seeded().await;
        assert_eq!(repo.search("   ").await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_wildcards_match_literally() {
        let repo = seeded().await;
        assert!(repo.search("%").await.unwrap().is_empty());
        assert!(repo.search("_").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let repo = seeded().await;

        let book = repo.get_by_id(2).await.unwrap().unwrap();
        assert_eq!(book.title, "Bumi");
        assert!(repo.get_by_id(999).await.unwrap().is_none());
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("plain"), "plain");
    }
}
