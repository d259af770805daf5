//! Error types for sift-query.

use miette::Diagnostic;
use thiserror::Error;

/// Boxed error produced by a parameter or statement sink.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error type for building, binding and executing filter clauses.
#[derive(Error, Diagnostic, Debug)]
pub enum QueryError {
    #[error("Malformed filter: {0}")]
    #[diagnostic(
        code(sift_query::malformed_filter),
        help("Filters must end in a comparison operator, e.g. 'age>=' or 'name='")
    )]
    MalformedFilter(String),

    #[error("Invalid clause: {0}")]
    #[diagnostic(code(sift_query::invalid_clause))]
    InvalidClause(String),

    #[error("Failed to bind parameter {index} of \"{fragment}\": {source}")]
    #[diagnostic(
        code(sift_query::binding),
        help("Check that the value type is supported by the target placeholder")
    )]
    Binding {
        fragment: String,
        index: usize,
        #[source]
        source: BoxError,
    },

    #[error("Failed to execute query \"{fragment}\": {source}")]
    #[diagnostic(code(sift_query::execution))]
    Execution {
        fragment: String,
        #[source]
        source: BoxError,
    },

    #[error("Column not found: {0}")]
    #[diagnostic(
        code(sift_query::column_not_found),
        help("Make sure the column is part of the selected columns")
    )]
    ColumnNotFound(String),

    #[error("Type mismatch for column '{column}': expected {expected}, found {found}")]
    #[diagnostic(code(sift_query::type_mismatch))]
    TypeMismatch {
        column: String,
        expected: &'static str,
        found: &'static str,
    },
}

impl QueryError {
    pub fn binding<E: Into<BoxError>>(
        fragment: impl Into<String>,
        index: usize,
        source: E,
    ) -> Self {
        QueryError::Binding {
            fragment: fragment.into(),
            index,
            source: source.into(),
        }
    }

    /// Replaces the fragment of a binding error with the enclosing text.
    /// Other errors are returned unchanged.
    pub fn within(self, enclosing: impl Into<String>) -> Self {
        match self {
            QueryError::Binding { index, source, .. } => QueryError::Binding {
                fragment: enclosing.into(),
                index,
                source,
            },
            other => other,
        }
    }

    pub fn execution<E: Into<BoxError>>(fragment: impl Into<String>, source: E) -> Self {
        QueryError::Execution {
            fragment: fragment.into(),
            source: source.into(),
        }
    }
}

/// Result type alias for sift-query operations.
pub type Result<T> = std::result::Result<T, QueryError>;
