//! The filter chain, its renderer and its binder.
//!
//! A [`Filter`] is a non-empty group of atoms joined by [`BoolOp`]s, plus an
//! optional continuation: the next filter in a right-leaning chain. A group
//! with more than one atom renders inside one pair of parentheses; a
//! continuation is never absorbed into the group before it.
//!
//! ```text
//!  (a= AND b=) ──OR──▶ c= ──AND──▶ (d= OR e=)
//! ```
//!
//! renders as `( a= ? AND b= ?) OR c= ? AND( d= ? OR e= ?)`.
//!
//! Rendering and binding walk the chain in the same order, so the `n`-th
//! value handed to a [`ParamSink`] always belongs to the `n`-th `?`.

use tracing::trace;

use crate::{
    atom::{AggregateFunction, Atom, BoolOp, CombinedAtom, FunctionKind, ScalarFunction},
    error::{QueryError, Result},
    traits::ParamSink,
    value::Value,
};

/// A group of atoms plus an optional continuation.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    atoms: Vec<CombinedAtom>,
    continuation: Option<Box<Continuation>>,
}

/// The filter following another one in the chain.
#[derive(Debug, Clone, PartialEq)]
pub struct Continuation {
    pub operator: BoolOp,
    pub filter: Filter,
}

impl Filter {
    /// Starts a single-atom filter.
    pub fn new(atom: Atom) -> Self {
        Self {
            atoms: vec![CombinedAtom {
                operator: None,
                atom,
            }],
            continuation: None,
        }
    }

    /// Shorthand for [`Atom::of`] wrapped in a filter.
    pub fn of(text: impl AsRef<str>, value: impl Into<Value>) -> Result<Self> {
        Atom::of(text, value).map(Self::new)
    }

    /// Shorthand for [`Atom::with_function`] wrapped in a filter.
    pub fn with_function(
        function: impl Into<FunctionKind>,
        text: impl AsRef<str>,
        value: impl Into<Value>,
    ) -> Result<Self> {
        Atom::with_function(function, text, value).map(Self::new)
    }

    /// Pushes `atom` into this filter's own group, inside its parentheses.
    pub fn append_same_group(mut self, operator: BoolOp, atom: Atom) -> Self {
        self.atoms.push(CombinedAtom {
            operator: Some(operator),
            atom,
        });
        self
    }

    pub fn and_atom(self, atom: Atom) -> Self {
        self.append_same_group(BoolOp::And, atom)
    }

    pub fn or_atom(self, atom: Atom) -> Self {
        self.append_same_group(BoolOp::Or, atom)
    }

    pub fn not_atom(self, atom: Atom) -> Self {
        self.append_same_group(BoolOp::Not, atom)
    }

    /// Attaches `other` at the end of the continuation chain.
    ///
    /// Repeated calls always extend the right-most filter, so terms render in
    /// call order and earlier terms are never re-nested.
    pub fn attach_continuation(&mut self, operator: BoolOp, other: Filter) {
        let mut slot = &mut self.continuation;
        while let Some(next) = slot {
            slot = &mut next.filter.continuation;
        }

        *slot = Some(Box::new(Continuation {
            operator,
            filter: other,
        }));
    }

    pub fn atoms(&self) -> &[CombinedAtom] {
        &self.atoms
    }

    pub fn continuation(&self) -> Option<&Continuation> {
        self.continuation.as_deref()
    }

    /// Iterates over this filter and every filter after it, with the operator
    /// that joins each one to its predecessor.
    pub fn chain(&self) -> impl Iterator<Item = (Option<BoolOp>, &Filter)> {
        std::iter::successors(Some((None, self)), |&(_, filter)| {
            filter
                .continuation()
                .map(|next| (Some(next.operator), &next.filter))
        })
    }

    /// Number of `?` placeholders the rendered text will contain.
    pub fn placeholder_count(&self) -> usize {
        self.chain().map(|(_, filter)| filter.atoms.len()).sum()
    }

    pub fn has_aggregate(&self) -> bool {
        self.chain()
            .flat_map(|(_, filter)| filter.atoms.iter())
            .any(|combined| combined.atom.is_aggregate())
    }

    /// Renders the chain to a fragment with `?` placeholders.
    pub fn render(&self) -> String {
        let mut sql = String::new();
        self.render_into(&mut sql);
        sql
    }

    pub fn render_into(&self, sql: &mut String) {
        for (operator, filter) in self.chain() {
            if let Some(operator) = operator {
                sql.push(' ');
                sql.push_str(operator.keyword());
            }

            let grouped = filter.atoms.len() > 1;
            if grouped {
                sql.push('(');
            }

            for combined in &filter.atoms {
                sql.push(' ');
                if let Some(operator) = combined.operator {
                    sql.push_str(operator.keyword());
                    sql.push(' ');
                }
                sql.push_str(combined.atom.text());
                sql.push_str(" ?");
            }

            if grouped {
                sql.push(')');
            }
        }
    }

    /// Binds every value in render order starting at `index`, returning the
    /// next free index.
    ///
    /// # Errors
    ///
    /// [`QueryError::Binding`] with the offending index if the sink rejects a
    /// value. Binding stops at the first rejection.
    pub fn bind<S: ParamSink + ?Sized>(&self, sink: &mut S, mut index: usize) -> Result<usize> {
        for (_, filter) in self.chain() {
            for combined in &filter.atoms {
                let value = combined.atom.value();
                trace!(index, value = %value, "binding parameter");
                sink.bind_value(index, value)
                    .map_err(|err| QueryError::binding(self.render(), index, err))?;
                index += 1;
            }
        }
        Ok(index)
    }

    /// Collects the bound values in placeholder order.
    pub fn values(&self) -> Vec<Value> {
        let mut values = Vec::with_capacity(self.placeholder_count());
        for (_, filter) in self.chain() {
            values.extend(filter.atoms.iter().map(|c| c.atom.value().clone()));
        }
        values
    }
}

impl From<Atom> for Filter {
    fn from(atom: Atom) -> Self {
        Self::new(atom)
    }
}

macro_rules! function_constructors {
    ($kind:ident => $($name:ident: $function:ident),* $(,)?) => {
        impl Filter {
            $(
                #[doc = concat!("Single-atom filter on `", stringify!($function), "(column)`.")]
                pub fn $name(column: impl AsRef<str>, value: impl Into<Value>) -> Result<Self> {
                    Self::with_function($kind::$function, column, value)
                }
            )*
        }
    };
}

function_constructors!(ScalarFunction =>
    distinct: Distinct,
    date: Date,
    year: Year,
    quarter: Quarter,
    month: Month,
    week: Week,
    week_of_year: WeekOfYear,
    day: Day,
    day_of_week: DayOfWeek,
    day_of_month: DayOfMonth,
    day_of_year: DayOfYear,
    hour: Hour,
    minute: Minute,
    second: Second,
);

function_constructors!(AggregateFunction =>
    sum: Sum,
    avg: Avg,
    min: Min,
    max: Max,
    count: Count,
);
