//! # soli-template
//!
//! The merge-tag template engine behind document and email templates.
//!
//! Templates are plain text with two tag forms: scalar placeholders
//! (`{{loan.name}}`) and loop blocks (`{{#transactions}}...{{/transactions}}`).
//! The engine never fails: unresolved placeholders survive verbatim so a
//! half-filled template is still inspectable output.
//!
//! The [`catalog`] module enumerates every supported tag for the template
//! editor, and [`context`] assembles the merge data object for a loan.

pub mod catalog;
pub mod context;
pub mod engine;

pub use catalog::{MergeTag, MergeTagGroup, merge_tag_catalog};
pub use context::{format_cents, loan_context};
pub use engine::process_template;
