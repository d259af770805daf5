//! Represents a typed database column.
//!
//! `Col<T>` ties a column name to a Rust type `T`. Its comparison methods
//! build single-atom [`Filter`]s without going through text validation, since
//! the operator is always one of the known comparisons.

use std::marker::PhantomData;

use crate::{
    atom::{Atom, FunctionKind},
    filter::Filter,
    value::Value,
};

/// A typed reference to a database column.
///
/// The type parameter `T` indicates the expected Rust type of the column; it
/// constrains the values that can be compared against it.
///
/// # Example
///
/// ```rust
/// use sift_query::expr::{Col, Compare as _};
///
/// const AGE: Col<i64> = Col::new("age");
/// assert_eq!(AGE.gte(18).render(), " age>= ?");
/// ```
pub struct Col<T> {
    pub name: &'static str,
    _type: PhantomData<T>,
}

impl<T> Col<T> {
    /// Creates a new column reference.
    ///
    /// # Parameters
    ///
    /// - `name`: the actual column name in the database (e.g., `"user_name"`)
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _type: PhantomData,
        }
    }

    /// Wraps the column in a scalar or aggregate function.
    pub fn apply(self, function: impl Into<FunctionKind>) -> Applied<T> {
        Applied {
            column: self,
            function: function.into(),
        }
    }
}

impl<T> Clone for Col<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Col<T> {}

/// A column wrapped in a function, such as `DATE(created_at)`.
pub struct Applied<T> {
    column: Col<T>,
    function: FunctionKind,
}

impl<T> Clone for Applied<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Applied<T> {}

/// Comparison constructors shared by plain and function-wrapped columns.
pub trait Compare: Sized {
    type Operand;

    fn comparison(self, op: &'static str, value: Value) -> Filter;

    /// Creates a `=` condition.
    fn eq<V: Into<Self::Operand>>(self, value: V) -> Filter
    where
        Self::Operand: Into<Value>,
    {
        self.comparison("=", value.into().into())
    }

    /// Creates a `!=` condition.
    fn ne<V: Into<Self::Operand>>(self, value: V) -> Filter
    where
        Self::Operand: Into<Value>,
    {
        self.comparison("!=", value.into().into())
    }

    /// Creates a `>` condition.
    fn gt<V: Into<Self::Operand>>(self, value: V) -> Filter
    where
        Self::Operand: Into<Value>,
    {
        self.comparison(">", value.into().into())
    }

    /// Creates a `<` condition.
    fn lt<V: Into<Self::Operand>>(self, value: V) -> Filter
    where
        Self::Operand: Into<Value>,
    {
        self.comparison("<", value.into().into())
    }

    /// Creates a `>=` condition.
    fn gte<V: Into<Self::Operand>>(self, value: V) -> Filter
    where
        Self::Operand: Into<Value>,
    {
        self.comparison(">=", value.into().into())
    }

    /// Creates a `<=` condition.
    fn lte<V: Into<Self::Operand>>(self, value: V) -> Filter
    where
        Self::Operand: Into<Value>,
    {
        self.comparison("<=", value.into().into())
    }
}

impl<T> Compare for Col<T> {
    type Operand = T;

    fn comparison(self, op: &'static str, value: Value) -> Filter {
        Filter::new(Atom::comparison(self.name, None, op, value))
    }
}

/// Function results are not typed by the column (`COUNT(name)` is an
/// integer), so any bindable value is accepted.
impl<T> Compare for Applied<T> {
    type Operand = Value;

    fn comparison(self, op: &'static str, value: Value) -> Filter {
        Filter::new(Atom::comparison(
            self.column.name,
            Some(self.function),
            op,
            value,
        ))
    }
}
