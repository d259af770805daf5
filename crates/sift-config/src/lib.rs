pub mod config;
pub mod duration;
pub mod error;

pub use config::{Config, JournalMode};
pub use error::{ConfigError, Result};

#[cfg(test)]
pub mod test_utils;
