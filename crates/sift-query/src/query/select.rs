//! The SELECT assembler.

use tracing::{debug, error};

use crate::{
    error::{BoxError, QueryError, Result},
    query::{
        clause::{HavingClause, WhereClause},
        fragment::{GroupBy, JoinClause, Limit, OrderBy},
    },
    row::RowSet,
    traits::{FromRow, ParamSink, StatementSink, TableDescriptor},
    value::Value,
};

/// An assembled statement: the SQL text and the clauses whose values fill its
/// placeholders.
///
/// WHERE placeholders always precede HAVING placeholders in the text, so
/// [`Statement::link`] binds WHERE from index 0 and HAVING from wherever WHERE
/// stopped.
#[derive(Debug, Clone)]
pub struct Statement<'q> {
    head: String,
    fragment: String,
    where_clause: Option<&'q WhereClause>,
    having: Option<&'q HavingClause>,
}

impl<'q> Statement<'q> {
    /// `SELECT ... FROM table`.
    pub fn head(&self) -> &str {
        &self.head
    }

    /// Everything after the head, starting with a space.
    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    pub fn sql(&self) -> String {
        format!("{}{}", self.head, self.fragment)
    }

    /// Binds WHERE then HAVING values into `sink` and returns the number of
    /// values bound. A rejected value is reported with the full statement
    /// text.
    pub fn link<P: ParamSink + ?Sized>(&self, sink: &mut P) -> Result<usize> {
        self.link_clauses(sink)
            .map_err(|err| err.within(self.sql()))
    }

    fn link_clauses<P: ParamSink + ?Sized>(&self, sink: &mut P) -> Result<usize> {
        let mut index = 0;
        if let Some(clause) = self.where_clause {
            index = clause.bind(sink, index)?;
        }
        if let Some(clause) = self.having {
            index = clause.bind(sink, index)?;
        }
        Ok(index)
    }

    /// The bound values in placeholder order.
    pub fn values(&self) -> Result<Vec<Value>> {
        let mut values = Vec::with_capacity(self.placeholder_count());
        self.link(&mut values)?;
        Ok(values)
    }

    pub fn placeholder_count(&self) -> usize {
        self.where_clause.map_or(0, WhereClause::placeholder_count)
            + self.having.map_or(0, HavingClause::placeholder_count)
    }

    /// Wraps a sink failure together with the statement text.
    pub fn execution_error<E: Into<BoxError>>(&self, source: E) -> QueryError {
        QueryError::execution(self.sql(), source)
    }
}

/// A SELECT query builder over a [`StatementSink`].
///
/// Fragments render in a fixed order regardless of the order the builder
/// methods are called in: JOIN, WHERE, GROUP BY, HAVING, ORDER BY, LIMIT.
///
/// # Example
///
/// ```rust
/// use sift_query::{Filter, GroupBy, HavingClause, RowSet, SelectQuery, Statement, StatementSink, WhereClause};
///
/// struct Dry;
///
/// impl StatementSink for Dry {
///     fn execute(&self, _statement: &Statement<'_>) -> sift_query::Result<RowSet> {
///         Ok(RowSet::default())
///     }
/// }
///
/// let query = SelectQuery::from(&Dry, "orders")
///     .filter(WhereClause::create(Filter::of("status=", "paid")?)?)
///     .group_by(GroupBy::of("customer"))
///     .having(HavingClause::create(Filter::sum("total>", 100)?)?);
///
/// let statement = query.build();
/// assert_eq!(
///     statement.sql(),
///     "SELECT * FROM orders WHERE status= ? GROUP BY customer HAVING SUM(total)> ?"
/// );
/// assert_eq!(statement.values()?.len(), 2);
/// # Ok::<(), sift_query::QueryError>(())
/// ```
pub struct SelectQuery<'s, S: ?Sized> {
    sink: &'s S,
    table: String,
    columns: Vec<String>,
    joins: Vec<JoinClause>,
    where_clause: Option<WhereClause>,
    group_by: Option<GroupBy>,
    having: Option<HavingClause>,
    order_by: Option<OrderBy>,
    limit: Option<Limit>,
}

impl<'s, S: StatementSink + ?Sized> SelectQuery<'s, S> {
    /// Starts a new query on the given table.
    pub fn from(sink: &'s S, table: impl Into<String>) -> Self {
        Self {
            sink,
            table: table.into(),
            columns: vec![],
            joins: vec![],
            where_clause: None,
            group_by: None,
            having: None,
            order_by: None,
            limit: None,
        }
    }

    /// Starts a new query selecting every column of `T`.
    pub fn of<T: TableDescriptor>(sink: &'s S) -> Self {
        Self::from(sink, T::TABLE).columns(T::COLUMNS.iter().copied())
    }

    /// Select specific columns. An empty selection means `*`.
    pub fn columns<I, C>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<String>,
    {
        self.columns.extend(columns.into_iter().map(Into::into));
        self
    }

    pub fn join(mut self, join: JoinClause) -> Self {
        self.joins.push(join);
        self
    }

    /// Sets the WHERE clause.
    pub fn filter(mut self, clause: WhereClause) -> Self {
        self.where_clause = Some(clause);
        self
    }

    pub fn group_by(mut self, group_by: GroupBy) -> Self {
        self.group_by = Some(group_by);
        self
    }

    pub fn having(mut self, clause: HavingClause) -> Self {
        self.having = Some(clause);
        self
    }

    pub fn order_by(mut self, order_by: OrderBy) -> Self {
        self.order_by = Some(order_by);
        self
    }

    pub fn limit(mut self, limit: Limit) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Renders the statement without executing it.
    pub fn build(&self) -> Statement<'_> {
        let select = if self.columns.is_empty() {
            "*".to_string()
        } else {
            self.columns.join(", ")
        };
        self.assemble(format!("SELECT {} FROM {}", select, self.table), true)
    }

    fn build_count(&self) -> Statement<'_> {
        self.assemble(format!("SELECT COUNT(*) FROM {}", self.table), false)
    }

    fn assemble(&self, head: String, with_tail: bool) -> Statement<'_> {
        let mut fragment = String::new();

        for join in &self.joins {
            fragment.push_str(&join.to_string());
        }

        if let Some(clause) = &self.where_clause {
            fragment.push_str(&clause.render());
        }

        if let Some(group_by) = &self.group_by {
            fragment.push_str(&group_by.to_string());
        }

        if let Some(clause) = &self.having {
            fragment.push_str(&clause.render());
        }

        if with_tail {
            if let Some(order_by) = &self.order_by {
                fragment.push_str(&order_by.to_string());
            }

            if let Some(limit) = &self.limit {
                fragment.push_str(&limit.to_string());
            }
        }

        Statement {
            head,
            fragment,
            where_clause: self.where_clause.as_ref(),
            having: self.having.as_ref(),
        }
    }

    fn run<R, F>(&self, statement: Statement<'_>, f: F) -> Result<R>
    where
        F: FnOnce(RowSet) -> Result<R>,
    {
        let sql = statement.sql();
        if self.sink.log_statements() {
            debug!("Executing query: \"{}\"", sql);
        }

        self.sink.transform(&statement, f).inspect_err(|err| {
            error!("Failed to execute database query: \"{}\": {}", sql, err);
        })
    }

    pub fn execute(&self) -> Result<RowSet> {
        self.run(self.build(), Ok)
    }

    /// Executes the query and hands the raw rows to `transform`.
    pub fn transform<R, F>(&self, transform: F) -> Result<R>
    where
        F: FnOnce(RowSet) -> Result<R>,
    {
        self.run(self.build(), transform)
    }

    pub fn fetch<E: FromRow>(&self) -> Result<Vec<E>> {
        self.transform(|rows| rows.materialize())
    }

    pub fn fetch_one<E: FromRow>(self) -> Result<Option<E>> {
        let mut results = self.limit(Limit::rows(1)).fetch()?;
        Ok(results.pop())
    }

    /// Counts matching rows; ORDER BY and LIMIT are ignored.
    pub fn count(&self) -> Result<u64> {
        self.run(self.build_count(), |rows| {
            rows.iter()
                .next()
                .ok_or_else(|| QueryError::ColumnNotFound("COUNT(*)".to_string()))?
                .get_index(0)
        })
    }
}
