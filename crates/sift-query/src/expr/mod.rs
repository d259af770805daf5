//! Typed column references.
//!
//! This module contains the building blocks for writing filters against
//! columns declared with [`crate::define_entity!`] instead of raw strings.

pub mod column;

pub use column::{Applied, Col, Compare};
