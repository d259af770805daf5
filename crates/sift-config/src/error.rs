use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum ConfigError {
    #[error("TOML serialization error: {0}")]
    #[diagnostic(
        code(sift_config::toml_serialize),
        help("Check your configuration structure for invalid values")
    )]
    TomlSerError(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    #[diagnostic(
        code(sift_config::toml_deserialize),
        help("Check your config.toml syntax and structure")
    )]
    TomlDeError(#[from] toml::de::Error),

    #[error("Invalid busy timeout: {0}")]
    #[diagnostic(
        code(sift_config::invalid_busy_timeout),
        help("Use a duration such as '500ms', '5s' or '1m30s'")
    )]
    InvalidBusyTimeout(String),

    #[error("Database path cannot be empty")]
    #[diagnostic(
        code(sift_config::empty_db_path),
        help("Remove db_path to use an in-memory database")
    )]
    EmptyDbPath,

    #[error("IO error: {0}")]
    #[diagnostic(code(sift_config::io))]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
