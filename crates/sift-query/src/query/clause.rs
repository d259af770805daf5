//! WHERE and HAVING clauses.
//!
//! Both clause kinds share one representation: a root [`Filter`] that
//! `and`/`or`/`not` extend at the right-most end of its continuation chain.
//! They differ in keyword and in whether aggregate atoms are accepted.

use std::marker::PhantomData;

use crate::{
    atom::BoolOp,
    error::{QueryError, Result},
    filter::Filter,
    traits::ParamSink,
    value::Value,
};

/// Distinguishes the clause kinds at the type level.
pub trait ClauseKind {
    /// Prefix emitted before the root filter, including its leading space.
    const KEYWORD: &'static str;
    const ALLOWS_AGGREGATES: bool;
}

/// Marker for `WHERE` clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Where;

/// Marker for `HAVING` clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Having;

impl ClauseKind for Where {
    const KEYWORD: &'static str = " WHERE";
    const ALLOWS_AGGREGATES: bool = false;
}

impl ClauseKind for Having {
    const KEYWORD: &'static str = " HAVING";
    const ALLOWS_AGGREGATES: bool = true;
}

pub type WhereClause = Clause<Where>;
pub type HavingClause = Clause<Having>;

/// A named root over a filter chain.
///
/// Building a clause is single-threaded: extend it from one caller, then
/// render and bind it as often as needed. Rendering and binding never mutate.
///
/// # Example
///
/// ```rust
/// use sift_query::{Filter, WhereClause};
///
/// let clause = WhereClause::create(Filter::of("age>=", 18)?)?
///     .and(Filter::of("name=", "alice")?)?
///     .or(Filter::of("admin=", true)?)?;
///
/// assert_eq!(clause.render(), " WHERE age>= ? AND name= ? OR admin= ?");
/// assert_eq!(clause.values().len(), 3);
/// # Ok::<(), sift_query::QueryError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Clause<K> {
    root: Filter,
    _kind: PhantomData<K>,
}

impl<K: ClauseKind> Clause<K> {
    /// Starts a clause from `filter`.
    ///
    /// # Errors
    ///
    /// [`QueryError::InvalidClause`] if the filter is absent, or if it holds
    /// an aggregate atom and this is a `WHERE` clause.
    pub fn create(filter: impl Into<Option<Filter>>) -> Result<Self> {
        let root = Self::accept(filter.into())?;
        Ok(Self {
            root,
            _kind: PhantomData,
        })
    }

    /// Starts a clause from a filter that may be absent.
    pub fn from_optional(filter: Option<Filter>) -> Result<Self> {
        Self::create(filter)
    }

    pub fn and(self, filter: impl Into<Option<Filter>>) -> Result<Self> {
        self.append(BoolOp::And, filter.into())
    }

    pub fn or(self, filter: impl Into<Option<Filter>>) -> Result<Self> {
        self.append(BoolOp::Or, filter.into())
    }

    pub fn not(self, filter: impl Into<Option<Filter>>) -> Result<Self> {
        self.append(BoolOp::Not, filter.into())
    }

    fn append(mut self, operator: BoolOp, filter: Option<Filter>) -> Result<Self> {
        let filter = Self::accept(filter)?;
        self.root.attach_continuation(operator, filter);
        Ok(self)
    }

    fn accept(filter: Option<Filter>) -> Result<Filter> {
        let keyword = K::KEYWORD.trim_start();
        let filter = filter.ok_or_else(|| {
            QueryError::InvalidClause(format!("{keyword} filter cannot be absent"))
        })?;

        if !K::ALLOWS_AGGREGATES && filter.has_aggregate() {
            return Err(QueryError::InvalidClause(format!(
                "aggregate functions are not allowed in {keyword}"
            )));
        }

        Ok(filter)
    }

    pub fn filter(&self) -> &Filter {
        &self.root
    }

    pub fn render(&self) -> String {
        let mut sql = String::from(K::KEYWORD);
        self.root.render_into(&mut sql);
        sql
    }

    /// Binds the clause values starting at `index` and returns the next free
    /// index.
    pub fn bind<S: ParamSink + ?Sized>(&self, sink: &mut S, index: usize) -> Result<usize> {
        self.root
            .bind(sink, index)
            .map_err(|err| err.within(self.render()))
    }

    pub fn values(&self) -> Vec<Value> {
        self.root.values()
    }

    pub fn placeholder_count(&self) -> usize {
        self.root.placeholder_count()
    }
}

impl<K: ClauseKind> TryFrom<Option<Filter>> for Clause<K> {
    type Error = QueryError;

    fn try_from(filter: Option<Filter>) -> Result<Self> {
        Self::create(filter)
    }
}

impl<K: ClauseKind> TryFrom<Filter> for Clause<K> {
    type Error = QueryError;

    fn try_from(filter: Filter) -> Result<Self> {
        Self::create(filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::Atom;

    fn filter(text: &str, value: impl Into<Value>) -> Filter {
        Filter::of(text, value).unwrap()
    }

    #[test]
    fn test_combinators_preserve_call_order() {
        let clause = WhereClause::create(filter("a=", 1))
            .unwrap()
            .and(filter("b=", 2))
            .unwrap()
            .or(filter("c=", 3))
            .unwrap();

        assert_eq!(clause.render(), " WHERE a= ? AND b= ? OR c= ?");
        assert_eq!(
            clause.values(),
            [Value::Integer(1), Value::Integer(2), Value::Integer(3)]
        );
    }

    #[test]
    fn test_grouped_term_after_operator() {
        let grouped = filter("name=", "a").or_atom(Atom::of("name=", "b").unwrap());
        let clause = WhereClause::create(filter("age>", 20))
            .unwrap()
            .and(grouped)
            .unwrap()
            .not(filter("banned=", true))
            .unwrap();

        assert_eq!(
            clause.render(),
            " WHERE age> ? AND( name= ? OR name= ?) NOT banned= ?"
        );
        assert_eq!(clause.placeholder_count(), 4);
    }

    #[test]
    fn test_absent_filter_is_rejected() {
        assert!(matches!(
            WhereClause::create(None::<Filter>),
            Err(QueryError::InvalidClause(_))
        ));

        let clause = HavingClause::create(filter("a=", 1)).unwrap();
        assert!(matches!(
            clause.and(None::<Filter>),
            Err(QueryError::InvalidClause(_))
        ));

        assert!(HavingClause::try_from(None::<Filter>).is_err());
        assert!(WhereClause::from_optional(None).is_err());
    }

    #[test]
    fn test_where_rejects_aggregates() {
        assert!(matches!(
            WhereClause::create(Filter::sum("amount>", 10).unwrap()),
            Err(QueryError::InvalidClause(_))
        ));

        let clause = WhereClause::create(filter("a=", 1)).unwrap();
        assert!(clause.or(Filter::max("b<", 5).unwrap()).is_err());

        // Scalar functions remain legal in WHERE.
        assert!(WhereClause::create(Filter::date("created_at>=", "2020-01-01").unwrap()).is_ok());
    }

    #[test]
    fn test_having_accepts_aggregates() {
        let clause = HavingClause::create(Filter::sum("amount>", 100).unwrap())
            .unwrap()
            .and(Filter::count("id>=", 2).unwrap())
            .unwrap();
        assert_eq!(clause.render(), " HAVING SUM(amount)> ? AND COUNT(id)>= ?");
    }

    #[test]
    fn test_bind_continues_index() {
        let clause = HavingClause::create(filter("a=", 1)).unwrap();
        let mut values = vec![Value::Null, Value::Null];
        assert_eq!(clause.bind(&mut values, 2).unwrap(), 3);
        assert_eq!(values[2], Value::Integer(1));
    }
}
