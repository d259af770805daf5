//! Single comparisons and the operators that combine them.
//!
//! An [`Atom`] is one `column<op>` fragment plus the value bound to its
//! placeholder. The placeholder itself is never stored; the renderer appends
//! it. Atoms are validated when they are built so rendering and binding can
//! assume a well-formed tree.

use std::fmt;

use crate::{
    error::{QueryError, Result},
    value::Value,
};

/// Operator joining two atoms or two filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolOp {
    And,
    Or,
    Not,
}

impl BoolOp {
    pub const fn keyword(self) -> &'static str {
        match self {
            BoolOp::And => "AND",
            BoolOp::Or => "OR",
            BoolOp::Not => "NOT",
        }
    }
}

impl fmt::Display for BoolOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Scalar functions that may wrap a column in either clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarFunction {
    Distinct,
    Date,
    Year,
    Quarter,
    Month,
    Week,
    WeekOfYear,
    Day,
    DayOfWeek,
    DayOfMonth,
    DayOfYear,
    Hour,
    Minute,
    Second,
}

impl ScalarFunction {
    pub const fn name(self) -> &'static str {
        match self {
            ScalarFunction::Distinct => "DISTINCT",
            ScalarFunction::Date => "DATE",
            ScalarFunction::Year => "YEAR",
            ScalarFunction::Quarter => "QUARTER",
            ScalarFunction::Month => "MONTH",
            ScalarFunction::Week => "WEEK",
            ScalarFunction::WeekOfYear => "WEEKOFYEAR",
            ScalarFunction::Day => "DAY",
            ScalarFunction::DayOfWeek => "DAYOFWEEK",
            ScalarFunction::DayOfMonth => "DAYOFMONTH",
            ScalarFunction::DayOfYear => "DAYOFYEAR",
            ScalarFunction::Hour => "HOUR",
            ScalarFunction::Minute => "MINUTE",
            ScalarFunction::Second => "SECOND",
        }
    }
}

/// Aggregate functions, legal only inside a HAVING clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateFunction {
    Sum,
    Avg,
    Min,
    Max,
    Count,
}

impl AggregateFunction {
    pub const fn name(self) -> &'static str {
        match self {
            AggregateFunction::Sum => "SUM",
            AggregateFunction::Avg => "AVG",
            AggregateFunction::Min => "MIN",
            AggregateFunction::Max => "MAX",
            AggregateFunction::Count => "COUNT",
        }
    }
}

/// A function wrapping the column part of an atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionKind {
    Scalar(ScalarFunction),
    Aggregate(AggregateFunction),
}

impl FunctionKind {
    pub const fn name(self) -> &'static str {
        match self {
            FunctionKind::Scalar(f) => f.name(),
            FunctionKind::Aggregate(f) => f.name(),
        }
    }

    pub const fn is_aggregate(self) -> bool {
        matches!(self, FunctionKind::Aggregate(_))
    }
}

impl From<ScalarFunction> for FunctionKind {
    fn from(value: ScalarFunction) -> Self {
        FunctionKind::Scalar(value)
    }
}

impl From<AggregateFunction> for FunctionKind {
    fn from(value: AggregateFunction) -> Self {
        FunctionKind::Aggregate(value)
    }
}

impl fmt::Display for FunctionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One comparison: rendered text up to and including the operator, and the
/// value bound to the placeholder that follows it.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    text: String,
    function: Option<FunctionKind>,
    value: Value,
}

impl Atom {
    /// Builds a plain comparison such as `"age>="`.
    ///
    /// # Errors
    ///
    /// [`QueryError::MalformedFilter`] if the text is blank or does not end
    /// in `=`, `>` or `<`.
    pub fn of(text: impl AsRef<str>, value: impl Into<Value>) -> Result<Self> {
        let text = non_empty(text.as_ref())?;

        if !text.ends_with(is_comparison_char) {
            return Err(QueryError::MalformedFilter(format!(
                "'{text}' does not end in a comparison operator"
            )));
        }

        Ok(Self {
            text: text.to_string(),
            function: None,
            value: value.into(),
        })
    }

    /// Builds a comparison whose column is wrapped by `function`, so
    /// `"created_at>="` under `DATE` becomes `DATE(created_at)>=`.
    ///
    /// # Errors
    ///
    /// [`QueryError::MalformedFilter`] if the text is blank, has no operator
    /// boundary, or has no column before the boundary.
    pub fn with_function(
        function: impl Into<FunctionKind>,
        text: impl AsRef<str>,
        value: impl Into<Value>,
    ) -> Result<Self> {
        let function = function.into();
        let text = non_empty(text.as_ref())?;
        let (column, tail) = split_column(text)?;

        Ok(Self {
            text: format!("{}({}){}", function.name(), column, tail),
            function: Some(function),
            value: value.into(),
        })
    }

    /// Builds an atom from a column and an operator known to be valid.
    pub(crate) fn comparison(
        column: &str,
        function: Option<FunctionKind>,
        op: &str,
        value: Value,
    ) -> Self {
        let text = match function {
            Some(function) => format!("{}({}){}", function.name(), column, op),
            None => format!("{column}{op}"),
        };
        Self {
            text,
            function,
            value,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn function(&self) -> Option<FunctionKind> {
        self.function
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn is_aggregate(&self) -> bool {
        self.function.is_some_and(FunctionKind::is_aggregate)
    }
}

/// An atom together with the operator joining it to the previous atom of the
/// same group. The first atom of a group carries no operator.
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedAtom {
    pub operator: Option<BoolOp>,
    pub atom: Atom,
}

fn non_empty(text: &str) -> Result<&str> {
    let text = text.trim();
    if text.is_empty() {
        return Err(QueryError::MalformedFilter(
            "filter text cannot be empty".to_string(),
        ));
    }
    Ok(text)
}

fn is_comparison_char(c: char) -> bool {
    matches!(c, '=' | '>' | '<')
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// Splits `text` at the first non-identifier character. The tail keeps the
/// boundary character.
fn split_column(text: &str) -> Result<(&str, &str)> {
    let boundary = text
        .char_indices()
        .find(|&(_, c)| !is_identifier_char(c))
        .map(|(idx, _)| idx)
        .ok_or_else(|| {
            QueryError::MalformedFilter(format!("unable to find an operator in '{text}'"))
        })?;

    if boundary == 0 {
        return Err(QueryError::MalformedFilter(format!(
            "missing column name in '{text}'"
        )));
    }

    Ok(text.split_at(boundary))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atom_of_accepts_trailing_operator() {
        for text in ["age>=", "age<", "name=", " id = ", "age<>"] {
            assert!(Atom::of(text, 1).is_ok(), "{text}");
        }
        assert_eq!(Atom::of(" id = ", 1).unwrap().text(), "id =");
    }

    #[test]
    fn test_atom_of_rejects_missing_operator() {
        assert!(matches!(
            Atom::of("age", 10),
            Err(QueryError::MalformedFilter(_))
        ));
        assert!(matches!(
            Atom::of("", 10),
            Err(QueryError::MalformedFilter(_))
        ));
        assert!(matches!(
            Atom::of("   ", 10),
            Err(QueryError::MalformedFilter(_))
        ));
        assert!(matches!(
            Atom::of("age>=x", 10),
            Err(QueryError::MalformedFilter(_))
        ));
    }

    #[test]
    fn test_with_function_wraps_column() {
        let atom = Atom::with_function(ScalarFunction::Date, "created_at>=", "2020-01-01").unwrap();
        assert_eq!(atom.text(), "DATE(created_at)>=");
        assert_eq!(atom.function(), Some(FunctionKind::Scalar(ScalarFunction::Date)));
        assert_eq!(atom.value(), &Value::Text("2020-01-01".into()));
        assert!(!atom.is_aggregate());
    }

    #[test]
    fn test_with_function_keeps_identifier_chars() {
        let atom = Atom::with_function(AggregateFunction::Sum, "total-amount_2 > ", 5).unwrap();
        assert_eq!(atom.text(), "SUM(total-amount_2) >");
        assert!(atom.is_aggregate());

        let atom = Atom::with_function(ScalarFunction::Year, "col6<=", 2020).unwrap();
        assert_eq!(atom.text(), "YEAR(col6)<=");
    }

    #[test]
    fn test_with_function_rejects_unparseable_text() {
        assert!(matches!(
            Atom::with_function(ScalarFunction::Day, "created_at", 1),
            Err(QueryError::MalformedFilter(_))
        ));
        assert!(matches!(
            Atom::with_function(ScalarFunction::Day, ">=", 1),
            Err(QueryError::MalformedFilter(_))
        ));
        assert!(matches!(
            Atom::with_function(ScalarFunction::Day, "", 1),
            Err(QueryError::MalformedFilter(_))
        ));
    }

    #[test]
    fn test_function_names() {
        assert_eq!(ScalarFunction::WeekOfYear.name(), "WEEKOFYEAR");
        assert_eq!(FunctionKind::from(AggregateFunction::Count).to_string(), "COUNT");
        assert_eq!(BoolOp::Not.to_string(), "NOT");
    }
}
