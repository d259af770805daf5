//! Capabilities the engine consumes.
//!
//! These traits define the contract for:
//! - Accepting bound values by position (`ParamSink`)
//! - Executing an assembled statement (`StatementSink`)
//! - Describing a table (`TableDescriptor`)
//! - Converting result rows into Rust types (`FromRow`)

use crate::{
    error::Result,
    query::select::Statement,
    row::{Row, RowSet},
    value::Value,
};

/// Receives bound values in placeholder order.
///
/// `index` is zero-based; a sink targeting a 1-indexed wire protocol adds one
/// itself. A sink that rejects a value is reported as
/// [`crate::QueryError::Binding`] by the binder.
pub trait ParamSink {
    type Error: std::error::Error + Send + Sync + 'static;

    fn bind_value(&mut self, index: usize, value: &Value) -> std::result::Result<(), Self::Error>;
}

impl ParamSink for Vec<Value> {
    type Error = std::convert::Infallible;

    fn bind_value(&mut self, _index: usize, value: &Value) -> std::result::Result<(), Self::Error> {
        self.push(value.clone());
        Ok(())
    }
}

/// Executes an assembled statement.
///
/// The sink prepares [`Statement::sql`] and binds its parameters through
/// [`Statement::link`], so every placeholder receives its value in order.
///
/// # Example
///
/// ```rust
/// use sift_query::{QueryError, RowSet, Statement, StatementSink};
///
/// struct Echo;
///
/// impl StatementSink for Echo {
///     fn execute(&self, statement: &Statement<'_>) -> Result<RowSet, QueryError> {
///         let values = statement.values()?;
///         Ok(RowSet::new(vec!["value".into()], values.into_iter().map(|v| vec![v]).collect()))
///     }
/// }
/// ```
pub trait StatementSink {
    fn execute(&self, statement: &Statement<'_>) -> Result<RowSet>;

    /// Executes the statement and hands the rows to `transform`.
    fn transform<R, F>(&self, statement: &Statement<'_>, transform: F) -> Result<R>
    where
        F: FnOnce(RowSet) -> Result<R>,
    {
        transform(self.execute(statement)?)
    }

    /// Whether the assembler logs statement text before execution.
    fn log_statements(&self) -> bool {
        true
    }
}

impl<S: StatementSink + ?Sized> StatementSink for &S {
    fn execute(&self, statement: &Statement<'_>) -> Result<RowSet> {
        (**self).execute(statement)
    }

    fn log_statements(&self) -> bool {
        (**self).log_statements()
    }
}

/// Resolves a record type to its table.
///
/// Usually generated by [`crate::define_entity!`].
pub trait TableDescriptor {
    const TABLE: &'static str;
    const COLUMNS: &'static [&'static str];
}

/// A type that can be constructed from a result row.
///
/// # Example
///
/// ```rust
/// use sift_query::{FromRow, Row};
///
/// struct User {
///     id: i64,
///     name: String,
/// }
///
/// impl FromRow for User {
///     fn from_row(row: &Row<'_>) -> sift_query::Result<Self> {
///         Ok(User {
///             id: row.get("id")?,
///             name: row.get("name")?,
///         })
///     }
/// }
/// ```
pub trait FromRow: Sized {
    fn from_row(row: &Row<'_>) -> Result<Self>;
}
