//! # Report Printer
//!
//! Prints one library report to stdout.
//!
//! ## Usage
//! ```bash
//! cargo run -p perpus-service --bin perpus-report -- inventory
//! cargo run -p perpus-service --bin perpus-report -- monthly --author "Dewi" --json
//! cargo run -p perpus-service --bin perpus-report -- catalog --config ./perpus.toml
//! ```

use std::env;
use std::path::PathBuf;
use tracing::{error, warn};

use perpus_service::{init_tracing, LibraryConfig, LibraryService};

const USAGE: &str = "\
Perpus Report Printer

Usage: perpus-report <REPORT> [OPTIONS]

Reports:
  monthly       Books and active loans
  inventory     Books
  membership    Registered members
  catalog       Books, periodicals and digital media
  loans         Active loans

Options:
  -c, --config <PATH>    Config file (default: platform config dir)
  -a, --author <NAME>    Compiler name (default: reports.default_author)
      --json             Print JSON instead of text
  -h, --help             Show this help message";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args: Vec<String> = env::args().collect();

    let mut report = None;
    let mut config_path = None;
    let mut author = String::new();
    let mut json = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--author" | "-a" => {
                if i + 1 < args.len() {
                    author = args[i + 1].clone();
                    i += 1;
                }
            }
            "--json" => json = true,
            "--help" | "-h" => {
                println!("{USAGE}");
                return Ok(());
            }
            other => report = Some(other.to_string()),
        }
        i += 1;
    }

    let Some(report) = report else {
        println!("{USAGE}");
        return Ok(());
    };

    let config = LibraryConfig::load_or_default(config_path);

    let service = match LibraryService::connect(&config).await {
        Ok(service) => service,
        Err(e) => {
            error!(error = %e, "Could not open the library database");
            println!("Could not connect to the library database: {e}");
            return Ok(());
        }
    };

    if !service.test_connection().await {
        warn!("Database connection test failed, results may be incomplete");
    }

    match build_output(&service, &report, &author, json).await {
        Ok(Some(output)) => println!("{}", output.trim_end()),
        Ok(None) => println!("Unknown report '{report}'.\n\n{USAGE}"),
        Err(e) => {
            error!(report = %report, error = %e, "Report failed");
            println!("Could not build the {report} report: {e}");
        }
    }

    Ok(())
}

/// Renders `report`, or `None` when no report has that name.
async fn build_output(
    service: &LibraryService,
    report: &str,
    author: &str,
    json: bool,
) -> Result<Option<String>, Box<dyn std::error::Error>> {
    let output = match report {
        "monthly" => render(service.build_monthly_report(author).await?, json)?,
        "inventory" => render(service.build_inventory_report(author).await?, json)?,
        "membership" => render(service.build_membership_report(author).await?, json)?,
        "catalog" => {
            let books = service.list_books().await?;
            let items = service.build_catalog_items(&books)?;
            if json {
                serde_json::to_string_pretty(&items)?
            } else {
                items.iter().map(|item| format!("{item}\n")).collect()
            }
        }
        "loans" => {
            let loans = service.list_active_loans().await?;
            if json {
                serde_json::to_string_pretty(&loans)?
            } else if loans.is_empty() {
                "No active loans.".to_string()
            } else {
                loans.iter().map(|loan| format!("{loan}\n")).collect()
            }
        }
        _ => return Ok(None),
    };

    Ok(Some(output))
}

fn render(report: perpus_core::Report, json: bool) -> serde_json::Result<String> {
    if json {
        serde_json::to_string_pretty(&report)
    } else {
        Ok(report.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use perpus_db::DbConfig;
    use perpus_service::SqliteStore;
    use std::sync::Arc;

    async fn service() -> (LibraryService, SqliteStore) {
        let store = SqliteStore::connect(DbConfig::in_memory()).await.unwrap();
        let service = LibraryService::new(Arc::new(store.clone()), &LibraryConfig::default());
        (service, store)
    }

    #[tokio::test]
    async fn test_unknown_report_has_no_output() {
        let (service, _store) = service().await;
        assert!(build_output(&service, "weekly", "", false).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_empty_loans_report() {
        let (service, _store) = service().await;
        let output = build_output(&service, "loans", "", false).await.unwrap();
        assert_eq!(output.as_deref(), Some("No active loans."));
    }

    #[tokio::test]
    async fn test_read_failure_reads_as_a_sentence() {
        let (service, store) = service().await;
        store.database().close().await;

        let err = build_output(&service, "inventory", "", false).await.unwrap_err();
        let message = err.to_string();
        assert_eq!(message, "Connection failed: Pool is closed");
    }
}
