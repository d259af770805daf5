use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    duration::parse_duration,
    error::{ConfigError, Result},
};

const DEFAULT_BUSY_TIMEOUT: &str = "5s";

/// SQLite journal mode applied when a file-backed database is opened.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JournalMode {
    Delete,
    #[default]
    Wal,
    Memory,
}

impl JournalMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            JournalMode::Delete => "DELETE",
            JournalMode::Wal => "WAL",
            JournalMode::Memory => "MEMORY",
        }
    }
}

/// Configuration for the SQLite statement sink.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Path to the SQLite database file.
    /// Default: in-memory database
    pub db_path: Option<String>,

    /// Journal mode for file-backed databases.
    /// Default: wal
    pub journal_mode: Option<JournalMode>,

    /// How long to wait on a locked database, e.g. "500ms" or "5s".
    /// Default: 5s
    pub busy_timeout: Option<String>,

    /// Log every statement before it is executed.
    /// Default: true
    pub log_statements: Option<bool>,
}

impl Config {
    /// Loads the configuration file named by `SIFT_CONFIG`, falling back to
    /// defaults when the variable is unset or the file does not exist.
    /// `SIFT_DB` overrides `db_path`.
    pub fn new() -> Result<Self> {
        let mut config = match std::env::var("SIFT_CONFIG") {
            Ok(path) => Self::load_or_default(path)?,
            Err(_) => Self::default(),
        };

        if let Ok(db_path) = std::env::var("SIFT_DB") {
            config.db_path = Some(db_path);
        }

        config.resolve()?;
        Ok(config)
    }

    /// Loads and resolves the configuration at `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let mut config = Self::from_toml(&content)?;
        config.resolve()?;
        info!("Loaded configuration from {}", path.as_ref().display());
        Ok(config)
    }

    fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        match fs::read_to_string(path.as_ref()) {
            Ok(content) => Self::from_toml(&content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::IoError(err)),
        }
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Validates the configuration and fills in defaults.
    pub fn resolve(&mut self) -> Result<()> {
        if self.db_path.as_deref().is_some_and(|p| p.trim().is_empty()) {
            return Err(ConfigError::EmptyDbPath);
        }

        let busy_timeout = self
            .busy_timeout
            .get_or_insert_with(|| DEFAULT_BUSY_TIMEOUT.to_string());
        if parse_duration(busy_timeout).is_none() {
            return Err(ConfigError::InvalidBusyTimeout(busy_timeout.clone()));
        }

        self.journal_mode.get_or_insert_with(JournalMode::default);
        self.log_statements.get_or_insert(true);

        Ok(())
    }

    pub fn db_path(&self) -> Option<PathBuf> {
        self.db_path.as_ref().map(PathBuf::from)
    }

    pub fn journal_mode(&self) -> JournalMode {
        self.journal_mode.unwrap_or_default()
    }

    pub fn busy_timeout(&self) -> Duration {
        self.busy_timeout
            .as_deref()
            .and_then(parse_duration)
            .or_else(|| parse_duration(DEFAULT_BUSY_TIMEOUT))
            .unwrap_or_default()
    }

    pub fn log_statements(&self) -> bool {
        self.log_statements.unwrap_or(true)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let serialized = toml::to_string_pretty(self)?;
        fs::write(path.as_ref(), serialized)?;
        info!("Configuration saved to {}", path.as_ref().display());
        Ok(())
    }
}
