use serde::{de::DeserializeOwned, Serialize};
use sift_query::{FromValue, QueryError, Value};

use crate::error::DbError;

/// A column stored as JSON text.
///
/// Convert a `Json` into a [`Value`] with `Value::try_from` to bind its
/// serialized form, or read a JSON column back with `row.get::<Json<T>>(..)`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Json<T>(pub T);

impl<T> Json<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: Serialize> TryFrom<Json<T>> for Value {
    type Error = DbError;

    fn try_from(value: Json<T>) -> Result<Self, DbError> {
        Ok(Value::Text(serde_json::to_string(&value.0)?))
    }
}

impl<T: DeserializeOwned> FromValue for Json<T> {
    fn from_value(column: &str, value: &Value) -> sift_query::Result<Self> {
        let text = match value {
            Value::Text(text) => text.as_str(),
            Value::Blob(bytes) => {
                return serde_json::from_slice(bytes)
                    .map(Json)
                    .map_err(|_| mismatch(column, value));
            }
            other => return Err(mismatch(column, other)),
        };
        serde_json::from_str(text)
            .map(Json)
            .map_err(|_| mismatch(column, value))
    }
}

fn mismatch(column: &str, value: &Value) -> QueryError {
    QueryError::TypeMismatch {
        column: column.to_string(),
        expected: "json",
        found: value.kind(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn test_json_column() {
        let value = Value::try_from(Json(vec!["a", "b"])).unwrap();
        assert_eq!(value, Value::Text(r#"["a","b"]"#.to_string()));

        let Json(parsed) = Json::<Vec<String>>::from_value("tags", &value).unwrap();
        assert_eq!(parsed, ["a", "b"]);

        assert!(matches!(
            Json::<Vec<String>>::from_value("tags", &Value::Text("{".to_string())),
            Err(QueryError::TypeMismatch { .. })
        ));
        assert_eq!(
            Option::<Json<Vec<String>>>::from_value("tags", &Value::Null).unwrap(),
            None
        );
    }

    #[test]
    fn test_unserializable_json_is_an_error() {
        let keyed_by_tuple = BTreeMap::from([((1, 2), "pair")]);
        assert!(matches!(
            Value::try_from(Json(keyed_by_tuple)),
            Err(DbError::JsonError(_))
        ));
    }
}
