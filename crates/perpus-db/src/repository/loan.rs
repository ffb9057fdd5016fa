//! # Loan Repository
//!
//! Database operations for loans, including the two stock-moving
//! transactions.
//!
//! ## Loan Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Loan Lifecycle                                    │
//! │                                                                         │
//! │  1. BORROW (one transaction)                                           │
//! │     └── read book → stock_after_borrow()                               │
//! │     └── UPDATE books SET stock = new WHERE stock = old                 │
//! │     └── INSERT loan { status: active, returned_at: NULL }              │
//! │                                                                         │
//! │  2. RETURN (one transaction)                                           │
//! │     └── read loan → Loan::close(now)                                   │
//! │     └── UPDATE loans ... WHERE status = 'active'                       │
//! │     └── read book → stock_after_return()                               │
//! │     └── UPDATE books SET stock = new WHERE stock = old                 │
//! │                                                                         │
//! │  Any step that touches zero rows rolls the whole thing back.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A borrow or return that does not apply comes back as `Ok(None)` /
//! `Ok(false)`. Only SQL failures are `Err`.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;
use perpus_core::lending::{stock_after_borrow, stock_after_return};
use perpus_core::{Book, Loan, LoanDetails, LoanParties, LoanStatus, Member, Staff};

/// Repository for loan database operations.
#[derive(Debug, Clone)]
pub struct LoanRepository {
    pool: SqlitePool,
}

impl LoanRepository {
    /// Creates a new LoanRepository.
    pub fn new(pool: SqlitePool) -> Self {
        LoanRepository { pool }
    }

    /// Gets a loan by ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Loan>> {
        let loan = sqlx::query_as::<_, Loan>(
            r#"
            SELECT id, book_id, user_id, staff_id, borrowed_at, returned_at, status
            FROM loans
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(loan)
    }

    /// Lends one copy of a book.
    ///
    /// ## Returns
    /// * `Ok(Some(loan_id))` - Stock decremented and loan opened
    /// * `Ok(None)` - Book missing, out of stock, or lost a race for the
    ///   last copy
    /// * `Err(DbError::ForeignKeyViolation)` - Unknown user or staff id
    pub async fn borrow(&self, book_id: i64, parties: LoanParties) -> DbResult<Option<i64>> {
        debug!(
            book_id,
            user_id = parties.user_id,
            staff_id = parties.staff_id,
            "Borrowing book"
        );

        let mut tx = self.pool.begin().await?;

        let book = sqlx::query_as::<_, Book>(
            "SELECT id, title, author, category, stock FROM books WHERE id = ?1",
        )
        .bind(book_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(book) = book else {
            debug!(book_id, "Borrow skipped: no such book");
            return Ok(None);
        };

        let Ok(new_stock) = stock_after_borrow(&book) else {
            debug!(book_id, "Borrow skipped: no copies left");
            return Ok(None);
        };

        // Compare-and-swap on the stock we read
        let updated = sqlx::query("UPDATE books SET stock = ?1 WHERE id = ?2 AND stock = ?3")
            .bind(new_stock)
            .bind(book_id)
            .bind(book.stock)
            .execute(&mut *tx)
            .await?;

        if updated.rows_affected() == 0 {
            debug!(book_id, "Borrow skipped: stock changed underneath");
            return Ok(None);
        }

        let loan = Loan::open(0, book_id, parties, Utc::now());

        let inserted = sqlx::query(
            r#"
            INSERT INTO loans (book_id, user_id, staff_id, borrowed_at, returned_at, status)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(loan.book_id)
        .bind(loan.user_id)
        .bind(loan.staff_id)
        .bind(loan.borrowed_at)
        .bind(loan.returned_at)
        .bind(loan.status)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        let loan_id = inserted.last_insert_rowid();
        info!(loan_id, book_id, stock = new_stock, "Loan opened");
        Ok(Some(loan_id))
    }

    /// Closes an active loan and puts the copy back on the shelf.
    ///
    /// ## Returns
    /// * `Ok(true)` - Loan closed and stock incremented
    /// * `Ok(false)` - Loan missing, already closed, or for another book
    pub async fn return_loan(&self, loan_id: i64, book_id: i64) -> DbResult<bool> {
        self.return_loan_at(loan_id, book_id, Utc::now()).await
    }

    async fn return_loan_at(
        &self,
        loan_id: i64,
        book_id: i64,
        returned_at: DateTime<Utc>,
    ) -> DbResult<bool> {
        debug!(loan_id, book_id, "Returning loan");

        let mut tx = self.pool.begin().await?;

        let loan = sqlx::query_as::<_, Loan>(
            r#"
            SELECT id, book_id, user_id, staff_id, borrowed_at, returned_at, status
            FROM loans
            WHERE id = ?1
            "#,
        )
        .bind(loan_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(loan) = loan else {
            return Ok(false);
        };

        if loan.book_id != book_id {
            debug!(loan_id, expected = loan.book_id, got = book_id, "Return skipped: book mismatch");
            return Ok(false);
        }

        let Ok(closed) = loan.close(returned_at) else {
            debug!(loan_id, "Return skipped: loan not open");
            return Ok(false);
        };

        let updated = sqlx::query(
            r#"
            UPDATE loans
            SET status = ?1, returned_at = ?2
            WHERE id = ?3 AND status = 'active'
            "#,
        )
        .bind(closed.status)
        .bind(closed.returned_at)
        .bind(loan_id)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            return Ok(false);
        }

        let book = sqlx::query_as::<_, Book>(
            "SELECT id, title, author, category, stock FROM books WHERE id = ?1",
        )
        .bind(book_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(book) = book else {
            return Ok(false);
        };

        let restocked = sqlx::query("UPDATE books SET stock = ?1 WHERE id = ?2 AND stock = ?3")
            .bind(stock_after_return(&book))
            .bind(book_id)
            .bind(book.stock)
            .execute(&mut *tx)
            .await?;

        if restocked.rows_affected() == 0 {
            debug!(loan_id, book_id, "Return skipped: stock changed underneath");
            return Ok(false);
        }

        tx.commit().await?;

        info!(loan_id, book_id, "Loan returned");
        Ok(true)
    }

    /// Lists every active loan joined with its book, member and staff.
    pub async fn list_active(&self) -> DbResult<Vec<LoanDetails>> {
        let rows = sqlx::query_as::<_, ActiveLoanRow>(
            r#"
            SELECT
                l.id            AS loan_id,
                l.book_id       AS book_id,
                l.user_id       AS user_id,
                l.staff_id      AS staff_id,
                l.borrowed_at   AS borrowed_at,
                l.returned_at   AS returned_at,
                l.status        AS status,
                b.title         AS book_title,
                b.author        AS book_author,
                b.category      AS book_category,
                b.stock         AS book_stock,
                u.name          AS user_name,
                u.address       AS user_address,
                u.phone         AS user_phone,
                s.name          AS staff_name,
                s.role          AS staff_role,
                s.phone         AS staff_phone
            FROM loans l
            INNER JOIN books b ON b.id = l.book_id
            INNER JOIN users u ON u.id = l.user_id
            INNER JOIN staff s ON s.id = l.staff_id
            WHERE l.status = 'active'
            ORDER BY l.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "Listed active loans");
        Ok(rows.into_iter().map(LoanDetails::from).collect())
    }

}

/// Flat row for the active-loan join.
#[derive(Debug, sqlx::FromRow)]
struct ActiveLoanRow {
    loan_id: i64,
    book_id: i64,
    user_id: i64,
    staff_id: i64,
    borrowed_at: DateTime<Utc>,
    returned_at: Option<DateTime<Utc>>,
    status: LoanStatus,
    book_title: String,
    book_author: String,
    book_category: String,
    book_stock: i64,
    user_name: String,
    user_address: String,
    user_phone: String,
    staff_name: String,
    staff_role: String,
    staff_phone: String,
}

impl From<ActiveLoanRow> for LoanDetails {
    fn from(row: ActiveLoanRow) -> Self {
        LoanDetails {
            loan: Loan {
                id: row.loan_id,
                book_id: row.book_id,
                user_id: row.user_id,
                staff_id: row.staff_id,
                borrowed_at: row.borrowed_at,
                returned_at: row.returned_at,
                status: row.status,
            },
            book: Book {
                id: row.book_id,
                title: row.book_title,
                author: row.book_author,
                category: row.book_category,
                stock: row.book_stock,
            },
            member: Member {
                id: row.user_id,
                name: row.user_name,
                address: row.user_address,
                phone: row.user_phone,
            },
            staff: Staff {
                id: row.staff_id,
                name: row.staff_name,
                role: row.staff_role,
                phone: row.staff_phone,
            },
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
