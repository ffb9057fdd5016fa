//! # Library Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Load Order (later overrides earlier)                 │
//! │                                                                         │
//! │  1. Defaults (LibraryConfig::default)                                  │
//! │  2. perpus.toml (platform config dir, or an explicit path)             │
//! │  3. PERPUS_* environment variables                                     │
//! │  4. validate()                                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # perpus.toml
//! [database]
//! path = "perpus.db"
//! max_connections = 5
//! busy_timeout_ms = 5000
//!
//! [lending]
//! default_user_id = 1
//! default_staff_id = 1
//!
//! [reports]
//! default_author = "Admin"
//!
//! [[catalog.periodicals]]
//! id = 1001
//! title = "National Geographic"
//! edition = "June 2023"
//! copies = 3
//!
//! [[catalog.digital_media]]
//! id = 2001
//! title = "Rust Programming Course"
//! format = "Video"
//! licensed = true
//! ```
//!
//! ## Environment Overrides
//! | Variable | Field |
//! |---|---|
//! | `PERPUS_DB_PATH` | `database.path` |
//! | `PERPUS_DB_MAX_CONNECTIONS` | `database.max_connections` |
//! | `PERPUS_DEFAULT_USER_ID` | `lending.default_user_id` |
//! | `PERPUS_DEFAULT_STAFF_ID` | `lending.default_staff_id` |
//! | `PERPUS_REPORT_AUTHOR` | `reports.default_author` |

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{ConfigError, ConfigResult};
use perpus_core::{CatalogItem, CoreResult, LoanParties};
use perpus_db::DbConfig;

// =============================================================================
// Database Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// SQLite file path. `:memory:` opens a throwaway database.
    #[serde(default = "default_db_path")]
    pub path: PathBuf,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// How long a borrow or return waits on another writer's lock.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("perpus.db")
}

fn default_max_connections() -> u32 {
    5
}

fn default_busy_timeout_ms() -> u64 {
    5_000
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: default_db_path(),
            max_connections: default_max_connections(),
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

impl DatabaseSettings {
    /// Pool configuration for these settings.
    pub fn db_config(&self) -> DbConfig {
        let busy_timeout = Duration::from_millis(self.busy_timeout_ms);
        if self.path.as_os_str() == ":memory:" {
            return DbConfig::in_memory().busy_timeout(busy_timeout);
        }
        DbConfig::new(&self.path)
            .max_connections(self.max_connections)
            .busy_timeout(busy_timeout)
    }
}

// =============================================================================
// Lending Settings
// =============================================================================

/// Who a presentation layer should pass as the borrowing parties when the
/// operator has not picked anyone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LendingSettings {
    #[serde(default = "default_party_id")]
    pub default_user_id: i64,

    #[serde(default = "default_party_id")]
    pub default_staff_id: i64,
}

fn default_party_id() -> i64 {
    1
}

impl Default for LendingSettings {
    fn default() -> Self {
        LendingSettings {
            default_user_id: default_party_id(),
            default_staff_id: default_party_id(),
        }
    }
}

impl LendingSettings {
    pub fn default_parties(&self) -> LoanParties {
        LoanParties::new(self.default_user_id, self.default_staff_id)
    }
}

// =============================================================================
// Report Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSettings {
    /// Compiler name stamped on reports when the caller gives none.
    #[serde(default = "default_author")]
    pub default_author: String,
}

fn default_author() -> String {
    "Admin".to_string()
}

impl Default for ReportSettings {
    fn default() -> Self {
        ReportSettings {
            default_author: default_author(),
        }
    }
}

// =============================================================================
// Catalog Settings
// =============================================================================

/// A periodical holding listed alongside the books.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodicalEntry {
    pub id: i64,
    pub title: String,
    pub edition: String,
    #[serde(default)]
    pub copies: i64,
}

/// A digital media holding listed alongside the books.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigitalMediaEntry {
    pub id: i64,
    pub title: String,
    pub format: String,
    #[serde(default)]
    pub licensed: bool,
}

/// Non-book holdings. These have no table of their own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSettings {
    #[serde(default)]
    pub periodicals: Vec<PeriodicalEntry>,

    #[serde(default)]
    pub digital_media: Vec<DigitalMediaEntry>,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        CatalogSettings {
            periodicals: vec![PeriodicalEntry {
                id: 1001,
                title: "National Geographic".to_string(),
                edition: "June 2023".to_string(),
                copies: 3,
            }],
            digital_media: vec![DigitalMediaEntry {
                id: 2001,
                title: "Rust Programming Course".to_string(),
                format: "Video".to_string(),
                licensed: true,
            }],
        }
    }
}

impl CatalogSettings {
    /// Catalog items for the configured holdings, periodicals first.
    pub fn items(&self) -> CoreResult<Vec<CatalogItem>> {
        let periodicals = self
            .periodicals
            .iter()
            .map(|p| CatalogItem::periodical(p.id, &p.title, &p.edition, p.copies));
        let media = self
            .digital_media
            .iter()
            .map(|m| CatalogItem::digital_media(m.id, &m.title, &m.format, m.licensed));

        periodicals.chain(media).collect()
    }
}

// =============================================================================
// Library Configuration
// =============================================================================

/// Complete configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryConfig {
    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub lending: LendingSettings,

    #[serde(default)]
    pub reports: ReportSettings,

    #[serde(default)]
    pub catalog: CatalogSettings,
}

impl LibraryConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// A missing file is not an error; a malformed one is.
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = Self::from_toml(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Parses a TOML document. Missing sections take their defaults.
    pub fn from_toml(contents: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.database.path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("database.path must not be empty".into()));
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "database.max_connections must be greater than 0".into(),
            ));
        }

        if self.lending.default_user_id <= 0 || self.lending.default_staff_id <= 0 {
            return Err(ConfigError::Invalid(
                "lending.default_user_id and lending.default_staff_id must be positive".into(),
            ));
        }

        if self.reports.default_author.trim().is_empty() {
            return Err(ConfigError::Invalid("reports.default_author must not be blank".into()));
        }

        let mut seen = HashSet::new();
        let ids = self
            .catalog
            .periodicals
            .iter()
            .map(|p| p.id)
            .chain(self.catalog.digital_media.iter().map(|m| m.id));
        for id in ids {
            if !seen.insert(id) {
                return Err(ConfigError::Invalid(format!("catalog id {} is listed twice", id)));
            }
        }

        self.catalog
            .items()
            .map_err(|e| ConfigError::Invalid(format!("catalog: {}", e)))?;

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from `lookup`. Unparseable values are logged and
    /// ignored.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("PERPUS_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = PathBuf::from(path);
        }

        if let Some(max) = lookup("PERPUS_DB_MAX_CONNECTIONS") {
            match max.parse() {
                Ok(n) => self.database.max_connections = n,
                Err(_) => warn!(value = %max, "Ignoring PERPUS_DB_MAX_CONNECTIONS"),
            }
        }

        if let Some(id) = lookup("PERPUS_DEFAULT_USER_ID") {
            match id.parse() {
                Ok(n) => self.lending.default_user_id = n,
                Err(_) => warn!(value = %id, "Ignoring PERPUS_DEFAULT_USER_ID"),
            }
        }

        if let Some(id) = lookup("PERPUS_DEFAULT_STAFF_ID") {
            match id.parse() {
                Ok(n) => self.lending.default_staff_id = n,
                Err(_) => warn!(value = %id, "Ignoring PERPUS_DEFAULT_STAFF_ID"),
            }
        }

        if let Some(author) = lookup("PERPUS_REPORT_AUTHOR") {
            self.reports.default_author = author;
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("id", "perpus", "perpus")
            .map(|dirs| dirs.config_dir().join("perpus.toml"))
    }
}
