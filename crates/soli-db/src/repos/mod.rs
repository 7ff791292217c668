//! Repository modules implementing CRUD operations for all Soliloan entities.
//!
//! Each module adds methods to `SoliService` via `impl SoliService` blocks.
//! Repos are plain persistence: schema validation, authorization, and
//! change-log entries happen one layer up, in the actions.

pub mod change;
pub mod configuration;
pub mod dashboard;
pub mod file;
pub mod lender;
pub mod loan;
pub mod note;
pub mod project;
pub mod template;
pub mod transaction;
pub mod user;
pub mod view;
