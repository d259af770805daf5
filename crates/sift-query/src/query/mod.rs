//! The query builder.
//!
//! This module turns filter chains into executable statements. Clauses and
//! fragments are built independently and handed to [`SelectQuery`], which
//! concatenates them in a fixed order and links the WHERE and HAVING values
//! into one contiguous parameter sequence.
//!
//! # Overview
//!
//! - [`WhereClause`] / [`HavingClause`]: named roots over a [`crate::Filter`],
//!   extended with `and`, `or` and `not`.
//! - [`JoinClause`], [`GroupBy`], [`OrderBy`], [`Limit`]: fragments without
//!   placeholders.
//! - [`SelectQuery`]: assembles a [`Statement`] and hands it to a
//!   [`crate::StatementSink`].
//!
//! # Submodules
//!
//! - [`clause`]: WHERE and HAVING clauses.
//! - [`fragment`]: placeholder-free fragments.
//! - [`select`]: Implementation of [`SelectQuery`].

pub mod clause;
pub mod fragment;
pub mod select;

pub use clause::{Clause, ClauseKind, Having, HavingClause, Where, WhereClause};
pub use fragment::{GroupBy, JoinClause, JoinKind, Limit, OrderBy, SortDirection};
pub use select::{SelectQuery, Statement};
