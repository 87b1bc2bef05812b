//! Run configuration
//!
//! Resolved once at startup, lowest precedence first:
//! 1. built-in defaults (a stock OTRS install on localhost)
//! 2. a TOML file: `--config FILE`, else `awaycal.toml` in the working directory
//! 3. `AWAYCAL_*` environment variables
//! 4. command-line flags
//!
//! ```toml
//! calendar_id = 3
//! symbol = "U"
//! locale = "german"
//! output = "vacation.xlsx"
//!
//! [database]
//! host = "otrs-db.internal"
//! user = "report"
//! password = "secret"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use awaycal_core::{CalendarId, NameLocale, ReportOptions};
use awaycal_db::DatabaseConfig;
use clap::Args;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// File picked up when no `--config` is given
pub const DEFAULT_CONFIG_FILE: &str = "awaycal.toml";

/// Settings for one export run
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    /// Calendar holding the vacation appointments
    pub calendar_id: CalendarId,
    /// Cell marker for an absent agent
    pub symbol: String,
    pub locale: NameLocale,
    /// Workbook written by `export`
    pub output: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            calendar_id: 1,
            symbol: "U".into(),
            locale: NameLocale::English,
            output: PathBuf::from("calendar.xlsx"),
        }
    }
}

/// Environment and command-line overrides
#[derive(Args, Clone, Debug, Default)]
pub struct Overrides {
    /// Database host
    #[arg(long = "db-host", env = "AWAYCAL_DB_HOST", global = true)]
    pub host: Option<String>,

    /// Database port
    #[arg(long = "db-port", env = "AWAYCAL_DB_PORT", global = true)]
    pub port: Option<u16>,

    /// Database user
    #[arg(long = "db-user", env = "AWAYCAL_DB_USER", global = true)]
    pub user: Option<String>,

    /// Database password
    #[arg(long = "db-password", env = "AWAYCAL_DB_PASSWORD", hide_env_values = true, global = true)]
    pub password: Option<String>,

    /// Database name
    #[arg(long = "db-name", env = "AWAYCAL_DB_NAME", global = true)]
    pub database: Option<String>,

    /// Calendar holding the vacation appointments
    #[arg(long, env = "AWAYCAL_CALENDAR_ID", global = true)]
    pub calendar_id: Option<CalendarId>,

    /// Cell marker for an absent agent
    #[arg(long, env = "AWAYCAL_SYMBOL", global = true)]
    pub symbol: Option<String>,

    /// Language for day and month names (english, german)
    #[arg(long, env = "AWAYCAL_LOCALE", global = true)]
    pub locale: Option<NameLocale>,
}

impl AppConfig {
    /// Parse a TOML document; missing keys keep their defaults.
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("invalid configuration")
    }

    /// Read the configuration file, if any.
    ///
    /// An explicit path must exist; the default file is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => Path::new(DEFAULT_CONFIG_FILE),
            None => {
                debug!("no configuration file, using defaults");
                return Ok(Self::default());
            }
        };

        let text = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read configuration file {}", path.display()))?;
        let config = Self::from_toml(&text).with_context(|| format!("in {}", path.display()))?;
        debug!(path = %path.display(), "loaded configuration file");
        Ok(config)
    }

    /// Layer environment and command-line values on top.
    pub fn apply(&mut self, overrides: &Overrides) {
        let db = &mut self.database;
        if let Some(host) = &overrides.host {
            db.host.clone_from(host);
        }
        if let Some(port) = overrides.port {
            db.port = port;
        }
        if let Some(user) = &overrides.user {
            db.user.clone_from(user);
        }
        if let Some(password) = &overrides.password {
            db.password.clone_from(password);
        }
        if let Some(database) = &overrides.database {
            db.database.clone_from(database);
        }
        if let Some(id) = overrides.calendar_id {
            self.calendar_id = id;
        }
        if let Some(symbol) = &overrides.symbol {
            self.symbol.clone_from(symbol);
        }
        if let Some(locale) = overrides.locale {
            self.locale = locale;
        }
    }

    /// Defaults, then file, then overrides.
    pub fn resolve(explicit: Option<&Path>, overrides: &Overrides) -> Result<Self> {
        let mut config = Self::load(explicit)?;
        config.apply(overrides);
        Ok(config)
    }

    pub fn report_options(&self) -> ReportOptions {
        ReportOptions {
            symbol: self.symbol.clone(),
            locale: self.locale,
            ..ReportOptions::default()
        }
    }
}
