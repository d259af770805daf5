//! Conversions between sift values and SQLite values.

use rusqlite::types::{Value as SqlValue, ValueRef};
use sift_query::{
    value::{DATETIME_FORMAT, DATE_FORMAT},
    ParamSink, Value,
};
use tracing::trace;

/// Binds values onto a prepared rusqlite statement.
///
/// Indices coming from the binder are zero-based; SQLite parameters start
/// at one.
pub struct StatementBinder<'a, 'conn> {
    stmt: &'a mut rusqlite::Statement<'conn>,
}

impl<'a, 'conn> StatementBinder<'a, 'conn> {
    pub fn new(stmt: &'a mut rusqlite::Statement<'conn>) -> Self {
        Self { stmt }
    }
}

impl ParamSink for StatementBinder<'_, '_> {
    type Error = rusqlite::Error;

    fn bind_value(&mut self, index: usize, value: &Value) -> rusqlite::Result<()> {
        trace!("binding sqlite parameter {} to {}", index + 1, value);
        self.stmt.raw_bind_parameter(index + 1, to_sql_value(value))
    }
}

/// Converts a bound value into its SQLite storage class.
///
/// SQLite has no boolean or date types: booleans become integers, dates
/// become ISO-8601 text.
pub fn to_sql_value(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(v) => SqlValue::Integer(i64::from(*v)),
        Value::Integer(v) => SqlValue::Integer(*v),
        Value::Real(v) => SqlValue::Real(*v),
        Value::Text(v) => SqlValue::Text(v.clone()),
        Value::Blob(v) => SqlValue::Blob(v.clone()),
        Value::Date(v) => SqlValue::Text(v.format(DATE_FORMAT).to_string()),
        Value::DateTime(v) => SqlValue::Text(v.format(DATETIME_FORMAT).to_string()),
    }
}

pub fn from_sql_value(value: ValueRef<'_>) -> Value {
    match SqlValue::from(value) {
        SqlValue::Null => Value::Null,
        SqlValue::Integer(v) => Value::Integer(v),
        SqlValue::Real(v) => Value::Real(v),
        SqlValue::Text(v) => Value::Text(v),
        SqlValue::Blob(v) => Value::Blob(v),
    }
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use sift_query::{Atom, Filter, QueryError};

    use super::*;

    #[test]
    fn test_sqlite_conversions() {
        assert_eq!(to_sql_value(&Value::Bool(true)), SqlValue::Integer(1));
        assert_eq!(
            to_sql_value(&Value::from("x")),
            SqlValue::Text("x".to_string())
        );
        assert_eq!(from_sql_value(ValueRef::Integer(4)), Value::Integer(4));
        assert_eq!(from_sql_value(ValueRef::Null), Value::Null);
        assert_eq!(
            from_sql_value(ValueRef::Text(b"abc")),
            Value::Text("abc".to_string())
        );
    }

    #[test]
    fn test_rejected_value_reports_its_index() {
        let conn = Connection::open_in_memory().unwrap();
        let mut stmt = conn.prepare("SELECT ?").unwrap();

        let filter = Filter::of("a=", 1)
            .unwrap()
            .and_atom(Atom::of("b=", 2).unwrap());
        let mut binder = StatementBinder::new(&mut stmt);

        match filter.bind(&mut binder, 0) {
            Err(QueryError::Binding { index, .. }) => assert_eq!(index, 1),
            other => panic!("expected binding error, got {other:?}"),
        }
    }

    #[test]
    fn test_bound_values_reach_sqlite() {
        let conn = Connection::open_in_memory().unwrap();
        let mut stmt = conn.prepare("SELECT ? + ?").unwrap();

        let filter = Filter::of("a=", 40)
            .unwrap()
            .or_atom(Atom::of("b=", 2).unwrap());
        {
            let mut binder = StatementBinder::new(&mut stmt);
            assert_eq!(filter.bind(&mut binder, 0).unwrap(), 2);
        }

        let mut rows = stmt.raw_query();
        let row = rows.next().unwrap().unwrap();
        assert_eq!(row.get::<_, i64>(0).unwrap(), 42);
    }
}
