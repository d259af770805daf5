//! Database connection management.
//!
//! [`Database`] owns a single SQLite connection and executes assembled
//! statements on behalf of [`sift_query::SelectQuery`].

use std::{
    path::Path,
    sync::{Arc, Mutex, MutexGuard},
};

use rusqlite::Connection;
use sift_config::Config;
use sift_query::{RowSet, Statement, StatementSink};
use tracing::{debug, info, trace};

use crate::{
    binder::{from_sql_value, StatementBinder},
    error::{DbError, Result},
};

/// A shared SQLite connection that implements [`StatementSink`].
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
    log_statements: bool,
}

impl Database {
    /// Opens the database described by the environment configuration.
    pub fn new() -> Result<Self> {
        Self::from_config(&Config::new()?)
    }

    /// Opens a database file with default settings.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config {
            db_path: Some(path.as_ref().to_string_lossy().into_owned()),
            ..Default::default()
        };
        Self::from_config(&config)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::from_config(&Config::default())
    }

    /// Opens a database and applies the configured pragmas.
    ///
    /// The journal mode is only applied to file-backed databases.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut config = config.clone();
        config.resolve()?;

        let conn = match config.db_path() {
            Some(path) => Connection::open(&path)
                .map_err(|e| DbError::ConnectionError(format!("{}: {}", path.display(), e)))?,
            None => Connection::open_in_memory()
                .map_err(|e| DbError::ConnectionError(e.to_string()))?,
        };

        conn.busy_timeout(config.busy_timeout())?;

        if config.db_path.is_some() {
            let mode: String = conn.pragma_update_and_check(
                None,
                "journal_mode",
                config.journal_mode().as_str(),
                |row| row.get(0),
            )?;
            debug!("journal mode set to {}", mode);
        }

        info!(
            "Opened database {}",
            config.db_path.as_deref().unwrap_or(":memory:")
        );

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            log_statements: config.log_statements(),
        })
    }

    /// Runs one or more semicolon-separated statements without parameters.
    pub fn execute_batch(&self, sql: &str) -> Result<()> {
        self.conn()?.execute_batch(sql)?;
        Ok(())
    }

    /// Locks and returns the underlying connection.
    pub fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| DbError::LockPoisoned)
    }
}

impl StatementSink for Database {
    fn execute(&self, statement: &Statement<'_>) -> sift_query::Result<RowSet> {
        let sql = statement.sql();
        let conn = self.conn().map_err(|e| statement.execution_error(e))?;
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| statement.execution_error(DbError::from(e)))?;

        let bound = statement.link(&mut StatementBinder::new(&mut stmt))?;
        let expected = stmt.parameter_count();
        if expected != bound {
            return Err(statement.execution_error(DbError::ParameterMismatch { expected, bound }));
        }

        if self.log_statements {
            trace!("bound {} parameters", bound);
        }

        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let width = columns.len();

        let mut rows = Vec::new();
        let mut cursor = stmt.raw_query();
        while let Some(row) = cursor
            .next()
            .map_err(|e| statement.execution_error(DbError::from(e)))?
        {
            let values = (0..width)
                .map(|idx| row.get_ref(idx).map(from_sql_value))
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(|e| statement.execution_error(DbError::from(e)))?;
            rows.push(values);
        }

        Ok(RowSet::new(columns, rows))
    }

    fn log_statements(&self) -> bool {
        self.log_statements
    }
}

#[cfg(test)]
mod tests {
    use sift_config::JournalMode;

    use super::*;

    #[test]
    fn test_file_backed_database_applies_journal_mode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sift.db");

        let config = Config {
            db_path: Some(path.to_string_lossy().into_owned()),
            journal_mode: Some(JournalMode::Wal),
            busy_timeout: Some("250ms".to_string()),
            ..Default::default()
        };
        let db = Database::from_config(&config).unwrap();

        let mode: String = db
            .conn()
            .unwrap()
            .query_row("PRAGMA journal_mode", [], |row| row.get(0))
            .unwrap();
        assert_eq!(mode.to_lowercase(), "wal");
        assert!(path.exists());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = Config {
            busy_timeout: Some("eventually".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            Database::from_config(&config),
            Err(DbError::Config(_))
        ));
    }

    #[test]
    fn test_log_statements_follows_config() {
        assert!(Database::open_in_memory().unwrap().log_statements());

        let config = Config {
            log_statements: Some(false),
            ..Default::default()
        };
        let db = Database::from_config(&config).unwrap();
        assert!(!db.log_statements());
    }

    #[test]
    fn test_open_in_memory() {
        let db = Database::open_in_memory().unwrap();
        db.execute_batch("CREATE TABLE t (a INTEGER); INSERT INTO t VALUES (1);")
            .unwrap();
        let count: i64 = db
            .conn()
            .unwrap()
            .query_row("SELECT COUNT(*) FROM t", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }
}
