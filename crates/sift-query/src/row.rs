//! Result rows returned by a statement sink.

use chrono::{NaiveDate, NaiveDateTime};

use crate::{
    error::{QueryError, Result},
    traits::FromRow,
    value::{Value, DATETIME_FORMAT, DATE_FORMAT},
};

/// Column names plus the rows a sink produced, in result order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowSet {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl RowSet {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(|values| Row {
            columns: &self.columns,
            values,
        })
    }

    /// Materializes every row as `E`.
    pub fn materialize<E: FromRow>(&self) -> Result<Vec<E>> {
        self.iter().map(|row| E::from_row(&row)).collect()
    }
}

/// A single borrowed row.
#[derive(Debug, Clone, Copy)]
pub struct Row<'r> {
    columns: &'r [String],
    values: &'r [Value],
}

impl<'r> Row<'r> {
    pub fn value(&self, column: &str) -> Result<&'r Value> {
        self.columns
            .iter()
            .position(|c| c == column)
            .and_then(|idx| self.values.get(idx))
            .ok_or_else(|| QueryError::ColumnNotFound(column.to_string()))
    }

    pub fn get<T: FromValue>(&self, column: &str) -> Result<T> {
        T::from_value(column, self.value(column)?)
    }

    pub fn get_index<T: FromValue>(&self, index: usize) -> Result<T> {
        let value = self
            .values
            .get(index)
            .ok_or_else(|| QueryError::ColumnNotFound(format!("#{index}")))?;
        let column = self
            .columns
            .get(index)
            .map(String::as_str)
            .unwrap_or_default();
        T::from_value(column, value)
    }

    pub fn values(&self) -> &'r [Value] {
        self.values
    }
}

/// Conversion from a column value into a Rust type.
pub trait FromValue: Sized {
    fn from_value(column: &str, value: &Value) -> Result<Self>;
}

fn mismatch<T>(column: &str, expected: &'static str, value: &Value) -> Result<T> {
    Err(QueryError::TypeMismatch {
        column: column.to_string(),
        expected,
        found: value.kind(),
    })
}

impl FromValue for Value {
    fn from_value(_column: &str, value: &Value) -> Result<Self> {
        Ok(value.clone())
    }
}

impl FromValue for i64 {
    fn from_value(column: &str, value: &Value) -> Result<Self> {
        match value {
            Value::Integer(v) => Ok(*v),
            Value::Bool(v) => Ok(*v as i64),
            other => mismatch(column, "integer", other),
        }
    }
}

macro_rules! impl_from_value_integer {
    ($($ty:ty),*) => {
        $(
            impl FromValue for $ty {
                fn from_value(column: &str, value: &Value) -> Result<Self> {
                    let v = i64::from_value(column, value)?;
                    <$ty>::try_from(v).or_else(|_| mismatch(column, stringify!($ty), value))
                }
            }
        )*
    };
}

impl_from_value_integer!(i32, u32, u64, usize);

impl FromValue for f64 {
    fn from_value(column: &str, value: &Value) -> Result<Self> {
        match value {
            Value::Real(v) => Ok(*v),
            Value::Integer(v) => Ok(*v as f64),
            other => mismatch(column, "real", other),
        }
    }
}

impl FromValue for bool {
    fn from_value(column: &str, value: &Value) -> Result<Self> {
        match value {
            Value::Bool(v) => Ok(*v),
            Value::Integer(v) => Ok(*v != 0),
            other => mismatch(column, "bool", other),
        }
    }
}

impl FromValue for String {
    fn from_value(column: &str, value: &Value) -> Result<Self> {
        match value {
            Value::Text(v) => Ok(v.clone()),
            Value::Date(v) => Ok(v.format(DATE_FORMAT).to_string()),
            Value::DateTime(v) => Ok(v.format(DATETIME_FORMAT).to_string()),
            other => mismatch(column, "text", other),
        }
    }
}

impl FromValue for Vec<u8> {
    fn from_value(column: &str, value: &Value) -> Result<Self> {
        match value {
            Value::Blob(v) => Ok(v.clone()),
            other => mismatch(column, "blob", other),
        }
    }
}

impl FromValue for NaiveDate {
    fn from_value(column: &str, value: &Value) -> Result<Self> {
        match value {
            Value::Date(v) => Ok(*v),
            Value::DateTime(v) => Ok(v.date()),
            Value::Text(s) => NaiveDate::parse_from_str(s, DATE_FORMAT)
                .or_else(|_| mismatch(column, "date", value)),
            other => mismatch(column, "date", other),
        }
    }
}

impl FromValue for NaiveDateTime {
    fn from_value(column: &str, value: &Value) -> Result<Self> {
        match value {
            Value::DateTime(v) => Ok(*v),
            Value::Text(s) => NaiveDateTime::parse_from_str(s, DATETIME_FORMAT)
                .or_else(|_| mismatch(column, "datetime", value)),
            other => mismatch(column, "datetime", other),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(column: &str, value: &Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(column, other).map(Some),
        }
    }
}
