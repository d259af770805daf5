//! Macros for defining entity schemas.
//!
//! The [`define_entity!`] macro generates column constants for a table,
//! tying database column names to Rust types, plus a [`crate::TableDescriptor`]
//! marker the assembler can select from.

/// Defines a module with typed column constants for a database table.
///
/// # Syntax
///
/// ```ignore
/// define_entity!(
///     users {
///         table: "users",
///         columns: {
///             ID: i64 => "id",
///             NAME: String => "name"
///         }
///     }
/// );
/// ```
///
/// This expands to:
///
/// ```ignore
/// pub mod users {
///     pub const TABLE: &str = "users";
///     pub const COLUMNS: &[&str] = &["id", "name"];
///     pub const ID: sift_query::expr::Col<i64> = sift_query::expr::Col::new("id");
///     pub const NAME: sift_query::expr::Col<String> = sift_query::expr::Col::new("name");
///     pub struct Table;
///     // impl sift_query::TableDescriptor for Table { .. }
/// }
/// ```
///
/// # Usage
///
/// ```rust
/// use sift_query::{define_entity, expr::Compare as _, TableDescriptor};
///
/// define_entity!(
///     users {
///         table: "users",
///         columns: {
///             ID: i64 => "id",
///             NAME: String => "name"
///         }
///     }
/// );
///
/// assert_eq!(<users::Table as TableDescriptor>::TABLE, "users");
/// assert_eq!(users::COLUMNS, ["id", "name"]);
/// assert_eq!(users::NAME.eq("alice").render(), " name= ?");
/// ```
#[macro_export]
macro_rules! define_entity {
    (
        $entity:ident {
            table: $table:literal,
            columns: {
                $($col_name:ident: $col_type:ty => $db_col:literal),* $(,)?
            }
        }
    ) => {
        pub mod $entity {
            #[allow(unused_imports)]
            use super::*;
            use $crate::expr::Col;

            pub const TABLE: &str = $table;

            pub const COLUMNS: &[&str] = &[$($db_col),*];

            $(
                pub const $col_name: Col<$col_type> = Col::new($db_col);
            )*

            /// Table descriptor for this entity.
            pub struct Table;

            impl $crate::TableDescriptor for Table {
                const TABLE: &'static str = TABLE;
                const COLUMNS: &'static [&'static str] = COLUMNS;
            }
        }
    };
}
