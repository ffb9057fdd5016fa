//! # Report Assembly
//!
//! Staged construction of library reports.
//!
//! ## Builder and Director
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Report Assembly                                    │
//! │                                                                         │
//! │  ReportDirector (fixed recipes)                                        │
//! │  ├── monthly()     title, date, author, books, loans, header, footer   │
//! │  ├── inventory()   title, date, author, books, header, footer          │
//! │  └── membership()  title, date, author, users, header, footer          │
//! │           │                                                             │
//! │           ▼  each step: ReportBuilder -> ReportBuilder                  │
//! │  ReportBuilder (accumulates, appends never replace)                    │
//! │           │                                                             │
//! │           ▼  build(self)                                                │
//! │  Report (immutable, renders via Display)                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The builder is consumed by [`ReportBuilder::build`], so one builder value
//! yields at most one report. Ad-hoc reports use the builder directly.

use chrono::NaiveDateTime;
use serde::Serialize;
use std::fmt;
use ts_rs::TS;

use crate::error::CoreResult;
use crate::types::{Book, LoanDetails, Member};
use crate::validation::validate_required;

// =============================================================================
// Recipe Text
// =============================================================================

pub const MONTHLY_TITLE: &str = "Monthly Library Report";
pub const MONTHLY_HEADER: &str = "This report contains monthly library statistics";
pub const INVENTORY_TITLE: &str = "Book Inventory Report";
pub const INVENTORY_HEADER: &str = "Complete inventory of library books";
pub const MEMBERSHIP_TITLE: &str = "Library Member Report";
pub const MEMBERSHIP_HEADER: &str = "List of all library members";

/// Section labels, rendered in this order.
pub const BOOKS_SECTION: &str = "Daftar Buku";
pub const LOANS_SECTION: &str = "Daftar Peminjaman";
pub const USERS_SECTION: &str = "Daftar Pengguna";

const DATE_FORMAT: &str = "%d/%m/%Y";
const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";
const MONTH_FORMAT: &str = "%B %Y";

// =============================================================================
// Report
// =============================================================================

/// An assembled report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct Report {
    title: String,
    #[ts(as = "Option<String>")]
    date: Option<NaiveDateTime>,
    author: Option<String>,
    header: Option<String>,
    footer: Option<String>,
    books: Vec<Book>,
    loans: Vec<LoanDetails>,
    users: Vec<Member>,
}

impl Report {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn date(&self) -> Option<NaiveDateTime> {
        self.date
    }

    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    pub fn header(&self) -> Option<&str> {
        self.header.as_deref()
    }

    pub fn footer(&self) -> Option<&str> {
        self.footer.as_deref()
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn loans(&self) -> &[LoanDetails] {
        &self.loans
    }

    pub fn users(&self) -> &[Member] {
        &self.users
    }
}

fn write_section<T: fmt::Display>(f: &mut fmt::Formatter<'_>, label: &str, rows: &[T]) -> fmt::Result {
    if rows.is_empty() {
        return Ok(());
    }

    writeln!(f)?;
    writeln!(f, "{}:", label)?;
    for row in rows {
        writeln!(f, "- {}", row)?;
    }
    Ok(())
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== {} ===", self.title)?;

        if let Some(date) = self.date {
            writeln!(f, "Date: {}", date.format(DATE_FORMAT))?;
        }
        if let Some(author) = &self.author {
            writeln!(f, "Compiled by: {}", author)?;
        }
        if let Some(header) = &self.header {
            writeln!(f)?;
            writeln!(f, "{}", header)?;
        }

        write_section(f, BOOKS_SECTION, &self.books)?;
        write_section(f, LOANS_SECTION, &self.loans)?;
        write_section(f, USERS_SECTION, &self.users)?;

        if let Some(footer) = &self.footer {
            writeln!(f)?;
            writeln!(f, "{}", footer)?;
        }

        Ok(())
    }
}

// =============================================================================
// Report Builder
// =============================================================================

/// Accumulates report fields step by step.
///
/// ## Example
/// ```rust
/// use perpus_core::ReportBuilder;
///
/// let report = ReportBuilder::new()
///     .title("Weekend Picks")
///     .header("Staff recommendations")
///     .build()
///     .unwrap();
///
/// assert!(report.to_string().starts_with("=== Weekend Picks ==="));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ReportBuilder {
    title: Option<String>,
    date: Option<NaiveDateTime>,
    author: Option<String>,
    header: Option<String>,
    footer: Option<String>,
    books: Vec<Book>,
    loans: Vec<LoanDetails>,
    users: Vec<Member>,
}

impl ReportBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn date(mut self, date: NaiveDateTime) -> Self {
        self.date = Some(date);
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    pub fn footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }

    pub fn add_book(mut self, book: Book) -> Self {
        self.books.push(book);
        self
    }

    pub fn add_books(mut self, books: impl IntoIterator<Item = Book>) -> Self {
        self.books.extend(books);
        self
    }

    pub fn add_loan(mut self, loan: LoanDetails) -> Self {
        self.loans.push(loan);
        self
    }

    pub fn add_loans(mut self, loans: impl IntoIterator<Item = LoanDetails>) -> Self {
        self.loans.extend(loans);
        self
    }

    pub fn add_user(mut self, user: Member) -> Self {
        self.users.push(user);
        self
    }

    pub fn add_users(mut self, users: impl IntoIterator<Item = Member>) -> Self {
        self.users.extend(users);
        self
    }

    /// Produces the report from whatever has been set so far.
    ///
    /// ## Errors
    /// A missing or blank title is a structural error.
    pub fn build(self) -> CoreResult<Report> {
        let title = validate_required("title", self.title.as_deref().unwrap_or_default())?;

        Ok(Report {
            title,
            date: self.date,
            author: self.author,
            header: self.header,
            footer: self.footer,
            books: self.books,
            loans: self.loans,
            users: self.users,
        })
    }
}

// =============================================================================
// Report Director
// =============================================================================

/// Fixed recipes for the named report kinds.
///
/// `now` is the generation timestamp; it feeds both the report date and the
/// footer text.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportDirector;

impl ReportDirector {
    pub fn new() -> Self {
        ReportDirector
    }

    /// All books plus every active loan.
    pub fn monthly(
        &self,
        builder: ReportBuilder,
        books: Vec<Book>,
        loans: Vec<LoanDetails>,
        author: &str,
        now: NaiveDateTime,
    ) -> CoreResult<Report> {
        builder
            .title(MONTHLY_TITLE)
            .date(now)
            .author(author)
            .add_books(books)
            .add_loans(loans)
            .header(MONTHLY_HEADER)
            .footer(format!("Printed on {}", now.format(TIMESTAMP_FORMAT)))
            .build()
    }

    /// All books only.
    pub fn inventory(
        &self,
        builder: ReportBuilder,
        books: Vec<Book>,
        author: &str,
        now: NaiveDateTime,
    ) -> CoreResult<Report> {
        builder
            .title(INVENTORY_TITLE)
            .date(now)
            .author(author)
            .add_books(books)
            .header(INVENTORY_HEADER)
            .footer(format!("Inventory as of {}", now.format(MONTH_FORMAT)))
            .build()
    }

    /// All registered members only.
    pub fn membership(
        &self,
        builder: ReportBuilder,
        users: Vec<Member>,
        author: &str,
        now: NaiveDateTime,
    ) -> CoreResult<Report> {
        builder
            .title(MEMBERSHIP_TITLE)
            .date(now)
            .author(author)
            .add_users(users)
            .header(MEMBERSHIP_HEADER)
            .footer(format!("Member data as of {}", now.format(MONTH_FORMAT)))
            .build()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CoreError, ValidationError};
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 14)
            .unwrap()
            .and_hms_opt(9, 30, 5)
            .unwrap()
    }

    fn book(id: i64) -> Book {
        Book {
            id,
            title: format!("Book {}", id),
            author: "Author".to_string(),
            category: "General".to_string(),
            stock: 1,
        }
    }

    fn member(id: i64) -> Member {
        Member {
            id,
            name: format!("Member {}", id),
            address: "Jl. Sudirman".to_string(),
            phone: "021".to_string(),
        }
    }

    #[test]
    fn test_monthly_report_without_data_has_no_sections() {
        let report = ReportDirector::new()
            .monthly(ReportBuilder::new(), vec![], vec![], "Admin", now())
            .unwrap();
        let text = report.to_string();

        assert!(text.contains("=== Monthly Library Report ==="));
        assert!(text.contains(MONTHLY_HEADER));
        assert!(text.contains("Printed on 14/10/2026 09:30:05"));
        assert!(!text.contains(BOOKS_SECTION));
        assert!(!text.contains(LOANS_SECTION));
        assert!(!text.contains("0 items"));
    }

    #[test]
    fn test_inventory_report_lists_books_in_order() {
        let books = vec![book(3), book(1), book(2)];
        let report = ReportDirector::new()
            .inventory(ReportBuilder::new(), books, "Admin", now())
            .unwrap();

        let ids: Vec<i64> = report.books().iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
        assert!(report.users().is_empty());
        assert_eq!(report.footer(), Some("Inventory as of October 2026"));
    }

    #[test]
    fn test_membership_report_renders_users_only() {
        let report = ReportDirector::new()
            .membership(ReportBuilder::new(), vec![member(1), member(2)], "Rina", now())
            .unwrap();

        assert_eq!(report.title(), MEMBERSHIP_TITLE);
        assert_eq!(
            report.to_string(),
            "=== Library Member Report ===\n\
             Date: 14/10/2026\n\
             Compiled by: Rina\n\
             \n\
             List of all library members\n\
             \n\
             Daftar Pengguna:\n\
             - [1] Member 1 - Jl. Sudirman - 021\n\
             - [2] Member 2 - Jl. Sudirman - 021\n\
             \n\
             Member data as of October 2026\n"
        );
    }

    #[test]
    fn test_builder_appends_rather_than_replaces() {
        let report = ReportBuilder::new()
            .title("Custom")
            .add_books(vec![book(1)])
            .add_book(book(2))
            .add_books(vec![book(3)])
            .build()
            .unwrap();

        assert_eq!(report.books().len(), 3);
        assert_eq!(report.books()[2].id, 3);
    }

    #[test]
    fn test_unset_fields_are_omitted() {
        let text = ReportBuilder::new().title("Bare").build().unwrap().to_string();
        assert_eq!(text, "=== Bare ===\n");
    }

    #[test]
    fn test_build_requires_title() {
        assert_eq!(
            ReportBuilder::new().author("Admin").build(),
            Err(CoreError::Validation(ValidationError::required("title")))
        );
    }

    #[test]
    fn test_sections_render_in_fixed_order() {
        let text = ReportBuilder::new()
            .title("All")
            .add_user(member(1))
            .add_book(book(1))
            .build()
            .unwrap()
            .to_string();

        let books_at = text.find(BOOKS_SECTION).unwrap();
        let users_at = text.find(USERS_SECTION).unwrap();
        assert!(books_at < users_at);
    }
}
