//! Update builder types for entity mutations.
//!
//! Each builder produces an update struct with `Option` fields. Only `Some`
//! fields generate SET clauses in the dynamic UPDATE SQL. Nullable columns
//! use `Option<Option<T>>`: the outer `Option` is "touch this column at all",
//! the inner one is "set it to NULL".

pub mod configuration;
pub mod lender;
pub mod loan;
pub mod project;
pub mod template;
pub mod transaction;
