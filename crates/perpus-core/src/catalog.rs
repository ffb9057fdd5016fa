//! # Catalog Items
//!
//! A uniform read view over every kind of holding.
//!
//! ## Variants
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        CatalogItem                                      │
//! │                                                                         │
//! │  ┌──────────────────┐  ┌──────────────────┐  ┌──────────────────────┐  │
//! │  │    BookItem      │  │  PeriodicalItem  │  │  DigitalMediaItem    │  │
//! │  │  ──────────────  │  │  ──────────────  │  │  ──────────────────  │  │
//! │  │  Book snapshot   │  │  title, edition  │  │  title, format       │  │
//! │  │  available iff   │  │  available iff   │  │  available iff       │  │
//! │  │  stock > 0       │  │  copies > 0      │  │  licensed            │  │
//! │  └──────────────────┘  └──────────────────┘  └──────────────────────┘  │
//! │                                                                         │
//! │  id() / display_info() / is_available() dispatch with `match`          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Items are snapshots: an item built from a book keeps the stock it saw,
//! so two items for the same book can disagree once stock changes.

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::CoreResult;
use crate::types::Book;
use crate::validation::{require_present, validate_id};

/// Which kind of holding an item is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Book,
    Periodical,
    DigitalMedia,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKind::Book => write!(f, "Book"),
            ItemKind::Periodical => write!(f, "Periodical"),
            ItemKind::DigitalMedia => write!(f, "Digital media"),
        }
    }
}

/// A book tracked as a catalog row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BookItem {
    pub book: Book,
}

/// A magazine or journal issue held in a fixed number of copies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PeriodicalItem {
    pub id: i64,
    pub title: String,
    /// Issue or edition label ("June 2023", "Vol. 12 No. 3").
    pub edition: String,
    pub copies: i64,
}

/// A downloadable or streamable holding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DigitalMediaItem {
    pub id: i64,
    pub title: String,
    /// Media format ("Video", "E-book", "Audio").
    pub format: String,
    /// Whether the library holds a license that allows access.
    pub licensed: bool,
}

/// One holding of any kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CatalogItem {
    Book(BookItem),
    Periodical(PeriodicalItem),
    DigitalMedia(DigitalMediaItem),
}

impl CatalogItem {
    // =========================================================================
    // Factories
    // =========================================================================

    /// Builds a book item from a catalog row.
    ///
    /// Only the identifying fields are checked. Stock bounds belong to the
    /// lending rules.
    pub fn book(book: &Book) -> CoreResult<Self> {
        validate_id("book id", book.id)?;
        require_present("title", &book.title)?;

        Ok(CatalogItem::Book(BookItem { book: book.clone() }))
    }

    /// Builds a periodical item.
    pub fn periodical(id: i64, title: &str, edition: &str, copies: i64) -> CoreResult<Self> {
        validate_id("periodical id", id)?;
        let title = require_present("title", title)?;
        let edition = require_present("edition", edition)?;

        Ok(CatalogItem::Periodical(PeriodicalItem {
            id,
            title,
            edition,
            copies,
        }))
    }

    /// Builds a digital media item.
    pub fn digital_media(id: i64, title: &str, format: &str, licensed: bool) -> CoreResult<Self> {
        validate_id("media id", id)?;
        let title = require_present("title", title)?;
        let format = require_present("format", format)?;

        Ok(CatalogItem::DigitalMedia(DigitalMediaItem {
            id,
            title,
            format,
            licensed,
        }))
    }

    // =========================================================================
    // Uniform Contract
    // =========================================================================

    pub fn id(&self) -> i64 {
        match self {
            CatalogItem::Book(item) => item.book.id,
            CatalogItem::Periodical(item) => item.id,
            CatalogItem::DigitalMedia(item) => item.id,
        }
    }

    pub fn kind(&self) -> ItemKind {
        match self {
            CatalogItem::Book(_) => ItemKind::Book,
            CatalogItem::Periodical(_) => ItemKind::Periodical,
            CatalogItem::DigitalMedia(_) => ItemKind::DigitalMedia,
        }
    }

    /// Kind-specific one-line summary.
    pub fn display_info(&self) -> String {
        match self {
            CatalogItem::Book(BookItem { book }) => format!(
                "Book: {} by {} ({}) - {} in stock",
                book.title, book.author, book.category, book.stock
            ),
            CatalogItem::Periodical(item) => format!(
                "Periodical: {} - {} edition, {} copies",
                item.title, item.edition, item.copies
            ),
            CatalogItem::DigitalMedia(item) => format!(
                "Digital media: {} [{}] - {}",
                item.title,
                item.format,
                if item.licensed { "licensed" } else { "not licensed" }
            ),
        }
    }

    pub fn is_available(&self) -> bool {
        match self {
            CatalogItem::Book(item) => item.book.stock > 0,
            CatalogItem::Periodical(item) => item.copies > 0,
            CatalogItem::DigitalMedia(item) => item.licensed,
        }
    }

    /// Status column text.
    pub fn availability_label(&self) -> &'static str {
        if self.is_available() {
            "Available"
        } else {
            "Unavailable"
        }
    }
}

impl fmt::Display for CatalogItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} ({})",
            self.id(),
            self.display_info(),
            self.availability_label()
        )
    }
}

// =============================================================================
// Aggregation
// =============================================================================

/// Builds one book item per book, in input order, then appends `extras`.
///
/// No sorting or de-duplication happens.
pub fn assemble<I>(books: &[Book], extras: I) -> CoreResult<Vec<CatalogItem>>
where
    I: IntoIterator<Item = CatalogItem>,
{
    let mut items = books
        .iter()
        .map(CatalogItem::book)
        .collect::<CoreResult<Vec<_>>>()?;

    items.extend(extras);
    Ok(items)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CoreError, ValidationError};

    fn book(id: i64, stock: i64) -> Book {
        Book {
            id,
            title: format!("Book {}", id),
            author: "Author".to_string(),
            category: "General".to_string(),
            stock,
        }
    }

    #[test]
    fn test_book_item_availability_follows_stock() {
        let empty = CatalogItem::book(&book(1, 0)).unwrap();
        let one = CatalogItem::book(&book(1, 1)).unwrap();

        assert!(!empty.is_available());
        assert!(one.is_available());
        assert_eq!(empty.availability_label(), "Unavailable");
        assert_eq!(one.kind(), ItemKind::Book);
    }

    #[test]
    fn test_snapshot_does_not_follow_later_stock_changes() {
        let mut row = book(3, 1);
        let before = CatalogItem::book(&row).unwrap();
        row.stock = 0;
        let after = CatalogItem::book(&row).unwrap();

        assert_eq!(before.id(), after.id());
        assert!(before.is_available());
        assert!(!after.is_available());
    }

    #[test]
    fn test_periodical_and_media_rules() {
        let magazine = CatalogItem::periodical(1001, "National Geographic", "June 2023", 3).unwrap();
        assert!(magazine.is_available());
        assert_eq!(
            magazine.display_info(),
            "Periodical: National Geographic - June 2023 edition, 3 copies"
        );

        let sold_out = CatalogItem::periodical(1002, "Tempo", "No. 12", 0).unwrap();
        assert!(!sold_out.is_available());

        let course = CatalogItem::digital_media(2001, "Rust Course", "Video", true).unwrap();
        let expired = CatalogItem::digital_media(2002, "Old Course", "Video", false).unwrap();
        assert!(course.is_available());
        assert!(!expired.is_available());
        assert_eq!(expired.display_info(), "Digital media: Old Course [Video] - not licensed");
    }

    #[test]
    fn test_factories_reject_incomplete_input() {
        assert_eq!(
            CatalogItem::periodical(1001, "National Geographic", " ", 3),
            Err(CoreError::Validation(ValidationError::required("edition")))
        );
        assert!(CatalogItem::digital_media(0, "Course", "Video", true).is_err());

        let mut untitled = book(4, 1);
        untitled.title = String::new();
        assert!(CatalogItem::book(&untitled).is_err());
    }

    #[test]
    fn test_long_titles_do_not_block_the_catalog() {
        let mut long = book(2, 1);
        long.title = "T".repeat(201);

        let item = CatalogItem::book(&long).unwrap();
        assert!(matches!(&item, CatalogItem::Book(b) if b.book.title.len() == 201));

        let items = assemble(&[book(1, 1), long], Vec::new()).unwrap();
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_assemble_keeps_insertion_order() {
        let books = vec![book(2, 1), book(1, 0)];
        let extra = CatalogItem::digital_media(2001, "Rust Course", "Video", true).unwrap();

        let items = assemble(&books, vec![extra]).unwrap();
        let ids: Vec<i64> = items.iter().map(CatalogItem::id).collect();

        assert_eq!(ids, vec![2, 1, 2001]);
        assert_eq!(items[2].kind(), ItemKind::DigitalMedia);
    }

    #[test]
    fn test_serializes_with_kind_tag() {
        let item = CatalogItem::periodical(1001, "National Geographic", "June 2023", 3).unwrap();
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["kind"], "periodical");
        assert_eq!(json["copies"], 3);
    }
}
