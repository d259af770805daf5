//! Filter clauses with positional parameter binding.
//!
//! Build comparison atoms, compose them into WHERE/HAVING clauses and render
//! them into SQL fragments whose `?` placeholders line up with the bound
//! values.
//!
//! ```rust
//! use sift_query::{Atom, Filter, HavingClause, WhereClause};
//!
//! let where_clause = WhereClause::create(Filter::of("age>=", 18)?)?
//!     .and(Filter::of("city=", "Oslo")?.or_atom(Atom::of("city=", "Bergen")?))?;
//!
//! assert_eq!(
//!     where_clause.render(),
//!     " WHERE age>= ? AND( city= ? OR city= ?)"
//! );
//!
//! let having = HavingClause::create(Filter::count("id>", 5)?)?;
//! assert_eq!(having.render(), " HAVING COUNT(id)> ?");
//! # Ok::<(), sift_query::QueryError>(())
//! ```

pub mod atom;
pub mod error;
pub mod expr;
pub mod filter;
pub mod macros;
pub mod query;
pub mod row;
pub mod traits;
pub mod value;

pub use atom::{AggregateFunction, Atom, BoolOp, CombinedAtom, FunctionKind, ScalarFunction};
pub use error::{QueryError, Result};
pub use filter::{Continuation, Filter};
pub use query::*;
pub use row::{FromValue, Row, RowSet};
pub use traits::{FromRow, ParamSink, StatementSink, TableDescriptor};
pub use value::Value;

#[cfg(test)]
mod tests {
    use super::*;

    fn placeholders(sql: &str) -> usize {
        sql.matches('?').count()
    }

    fn nested_filter() -> Filter {
        let mut root = Filter::of("a=", 1)
            .unwrap()
            .or_atom(Atom::of("b>", 2).unwrap());
        let inner = Filter::of("c<", 3)
            .unwrap()
            .and_atom(Atom::of("d=", "x").unwrap())
            .not_atom(Atom::of("e>=", 5.5).unwrap());
        root.attach_continuation(BoolOp::And, inner);
        root.attach_continuation(BoolOp::Or, Filter::date("f>=", "2020-01-01").unwrap());
        root
    }

    #[test]
    fn test_bound_values_match_placeholders() {
        let filter = nested_filter();
        let sql = filter.render();

        let mut values = Vec::new();
        let next = filter.bind(&mut values, 0).unwrap();

        assert_eq!(next, placeholders(&sql));
        assert_eq!(values.len(), placeholders(&sql));
        assert_eq!(
            values,
            [
                Value::Integer(1),
                Value::Integer(2),
                Value::Integer(3),
                Value::Text("x".to_string()),
                Value::Real(5.5),
                Value::Text("2020-01-01".to_string()),
            ]
        );

        // Each placeholder follows the atom text its value was built with.
        let texts = ["a=", "b>", "c<", "d=", "e>=", "DATE(f)>="];
        for (nth, (idx, _)) in sql.match_indices('?').enumerate() {
            assert!(sql[..idx].trim_end().ends_with(texts[nth]), "{sql}");
        }
    }

    #[test]
    fn test_group_parentheses() {
        assert_eq!(Filter::of("a=", 1).unwrap().render(), " a= ?");
        assert_eq!(
            nested_filter().render(),
            "( a= ? OR b> ?) AND( c< ? AND d= ? NOT e>= ?) OR DATE(f)>= ?"
        );
    }

    #[test]
    fn test_clause_extends_right_most_end() {
        let clause = WhereClause::create(Filter::of("a=", 1).unwrap())
            .unwrap()
            .and(Filter::of("b=", 2).unwrap())
            .unwrap()
            .or(Filter::of("c=", 3).unwrap())
            .unwrap();
        assert_eq!(clause.render(), " WHERE a= ? AND b= ? OR c= ?");
    }

    #[test]
    fn test_render_and_bind_are_idempotent() {
        let clause = HavingClause::create(nested_filter()).unwrap();

        let first = clause.render();
        let values = clause.values();
        for _ in 0..3 {
            assert_eq!(clause.render(), first);
            assert_eq!(clause.values(), values);
        }
    }

    #[test]
    fn test_date_function_atom() {
        let filter = Filter::with_function(ScalarFunction::Date, "created_at>=", "2020-01-01").unwrap();
        assert_eq!(filter.render(), " DATE(created_at)>= ?");
        assert_eq!(filter.values(), [Value::Text("2020-01-01".to_string())]);
    }

    #[test]
    fn test_where_then_having_sequence() {
        struct Dry;

        impl StatementSink for Dry {
            fn execute(&self, _statement: &Statement<'_>) -> Result<RowSet> {
                Ok(RowSet::default())
            }
        }

        let where_clause = WhereClause::create(
            Filter::of("status=", "paid")
                .unwrap()
                .and_atom(Atom::of("total>", 0).unwrap()),
        )
        .unwrap();
        let having = HavingClause::create(Filter::count("id>", 1).unwrap()).unwrap();

        let query = SelectQuery::from(&Dry, "orders")
            .filter(where_clause)
            .group_by(GroupBy::of("customer"))
            .having(having);
        let statement = query.build();

        let sql = statement.sql();
        let values = statement.values().unwrap();
        assert_eq!(values.len(), 3);
        assert_eq!(values[2], Value::Integer(1));

        let third = sql.match_indices('?').nth(2).unwrap().0;
        assert!(sql[..third].ends_with("HAVING COUNT(id)> "));
    }

    #[test]
    fn test_malformed_atoms() {
        for text in ["age", "", "   "] {
            assert!(matches!(
                Atom::of(text, 10),
                Err(QueryError::MalformedFilter(_))
            ));
        }
    }

    define_entity!(
        people {
            table: "people",
            columns: {
                ID: i64 => "id",
                AGE: i64 => "age",
                CITY: String => "city"
            }
        }
    );

    #[test]
    fn test_entity_query() {
        use crate::expr::Compare as _;

        struct Dry;

        impl StatementSink for Dry {
            fn execute(&self, _statement: &Statement<'_>) -> Result<RowSet> {
                Ok(RowSet::default())
            }
        }

        let clause = WhereClause::create(people::AGE.gte(18))
            .unwrap()
            .and(people::CITY.eq("Oslo"))
            .unwrap();
        let query = SelectQuery::of::<people::Table>(&Dry).filter(clause);

        assert_eq!(
            query.build().sql(),
            "SELECT id, age, city FROM people WHERE age>= ? AND city= ?"
        );
        assert!(query.execute().unwrap().is_empty());
    }
}
