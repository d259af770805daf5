//! SQLite backend for sift filter queries.
//!
//! [`Database`] prepares the statements assembled by
//! [`sift_query::SelectQuery`], binds WHERE and HAVING values in placeholder
//! order and decodes the result rows.

pub mod binder;
pub mod connection;
pub mod error;
pub mod helpers;

pub use binder::StatementBinder;
pub use connection::Database;
pub use error::{DbError, Result};
pub use helpers::Json;
