//! # Seed Data Generator
//!
//! Populates the database with a small sample library for development.
//!
//! ## Usage
//! ```bash
//! # Seed ./perpus_dev.db
//! cargo run -p perpus-db --bin seed
//!
//! # Specify database path
//! cargo run -p perpus-db --bin seed -- --db ./data/perpus.db
//! ```
//!
//! ## Generated Data
//! - Books across a handful of categories, one of them out of stock
//! - Registered members
//! - Staff members (the first one is the usual default lending agent)

use std::env;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use perpus_core::NewBook;
use perpus_db::{Database, DbConfig};

/// (title, author, category, stock)
const BOOKS: &[(&str, &str, &str, i64)] = &[
    ("Laskar Pelangi", "Andrea Hirata", "Novel", 3),
    ("Bumi Manusia", "Pramoedya Ananta Toer", "Historical Fiction", 2),
    ("Cantik Itu Luka", "Eka Kurniawan", "Novel", 1),
    ("Negeri 5 Menara", "Ahmad Fuadi", "Novel", 0),
    ("Filosofi Teras", "Henry Manampiring", "Philosophy", 4),
    ("Sejarah Indonesia Modern", "M.C. Ricklefs", "History", 2),
    ("The Rust Programming Language", "Steve Klabnik", "Technology", 2),
    ("Clean Code", "Robert C. Martin", "Technology", 1),
];

/// (name, address, phone)
const MEMBERS: &[(&str, &str, &str)] = &[
    ("Budi Santoso", "Jl. Merdeka No. 1, Bandung", "081234567890"),
    ("Siti Rahayu", "Jl. Diponegoro No. 12, Semarang", "081298765432"),
    ("Andi Wijaya", "Jl. Gajah Mada No. 7, Jakarta", "085711223344"),
];

/// (name, role, phone)
const STAFF: &[(&str, &str, &str)] = &[
    ("Dewi Lestari", "Librarian", "082112345678"),
    ("Rudi Hartono", "Head of Circulation", "082187654321"),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,perpus=debug,sqlx=warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./perpus_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Perpus Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./perpus_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    info!(path = %db_path, "Seeding database");

    let db = Database::new(DbConfig::new(&db_path)).await?;

    let existing = db.books().count().await?;
    if existing > 0 {
        warn!(
            existing,
            "Database already has books, skipping seed. Delete the file to regenerate"
        );
        return Ok(());
    }

    let mut books = 0;
    for &(title, author, category, stock) in BOOKS {
        let book = NewBook::new(title, author, category).with_stock(stock);
        match db.books().insert(&book).await {
            Ok(_) => books += 1,
            Err(e) => warn!(title, error = %e, "Failed to insert book"),
        }
    }

    for &(name, address, phone) in MEMBERS {
        db.members().insert(name, address, phone).await?;
    }

    for &(name, role, phone) in STAFF {
        db.staff().insert(name, role, phone).await?;
    }

    info!(
        books,
        members = MEMBERS.len(),
        staff = STAFF.len(),
        "Seed complete"
    );

    let search = db.books().search("novel").await?;
    info!(results = search.len(), "Search 'novel' check");

    db.close().await;
    Ok(())
}
