//! Placeholder-free statement fragments: JOIN, GROUP BY, ORDER BY and LIMIT.
//!
//! Each fragment renders through [`fmt::Display`] with its own leading space,
//! so the assembler can concatenate them directly.

use std::fmt;

use crate::error::{QueryError, Result};

/// Sort direction for ORDER BY terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub const fn keyword(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
}

/// A single JOIN with its ON condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinClause {
    kind: JoinKind,
    table: String,
    on: String,
}

impl JoinClause {
    pub fn inner(table: impl Into<String>, on: impl Into<String>) -> Self {
        Self {
            kind: JoinKind::Inner,
            table: table.into(),
            on: on.into(),
        }
    }

    pub fn left(table: impl Into<String>, on: impl Into<String>) -> Self {
        Self {
            kind: JoinKind::Left,
            table: table.into(),
            on: on.into(),
        }
    }
}

impl fmt::Display for JoinClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            JoinKind::Inner => "INNER",
            JoinKind::Left => "LEFT",
        };
        write!(f, " {kind} JOIN {} ON {}", self.table, self.on)
    }
}

/// GROUP BY over one or more columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupBy {
    columns: Vec<String>,
}

impl GroupBy {
    pub fn of(column: impl Into<String>) -> Self {
        Self {
            columns: vec![column.into()],
        }
    }

    /// # Errors
    ///
    /// [`QueryError::InvalidClause`] if no column is given.
    pub fn columns<I, C>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = C>,
        C: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        if columns.is_empty() {
            return Err(QueryError::InvalidClause(
                "GROUP BY columns cannot be empty".to_string(),
            ));
        }
        Ok(Self { columns })
    }

    pub fn get_columns(&self) -> &[String] {
        &self.columns
    }
}

impl fmt::Display for GroupBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, " GROUP BY {}", self.columns.join(","))
    }
}

/// ORDER BY over one or more columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    terms: Vec<(String, SortDirection)>,
}

impl OrderBy {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            terms: vec![(column.into(), SortDirection::Asc)],
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            terms: vec![(column.into(), SortDirection::Desc)],
        }
    }

    pub fn then_asc(mut self, column: impl Into<String>) -> Self {
        self.terms.push((column.into(), SortDirection::Asc));
        self
    }

    pub fn then_desc(mut self, column: impl Into<String>) -> Self {
        self.terms.push((column.into(), SortDirection::Desc));
        self
    }
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let terms = self
            .terms
            .iter()
            .map(|(column, direction)| format!("{} {}", column, direction.keyword()))
            .collect::<Vec<_>>();
        write!(f, " ORDER BY {}", terms.join(", "))
    }
}

/// LIMIT with an optional offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limit {
    offset: u32,
    row_count: u32,
}

impl Limit {
    pub fn new(offset: u32, row_count: u32) -> Self {
        Self { offset, row_count }
    }

    pub fn rows(row_count: u32) -> Self {
        Self::new(0, row_count)
    }

    /// Limit for a 1-indexed page. Page 0 is treated as page 1, and an
    /// offset past `u32::MAX` is clamped to it.
    pub fn page(page: u32, per_page: u32) -> Self {
        Self::new(page.saturating_sub(1).saturating_mul(per_page), per_page)
    }
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, " LIMIT {}", self.row_count)?;
        if self.offset > 0 {
            write!(f, " OFFSET {}", self.offset)?;
        }
        Ok(())
    }
}
