//! # soli-schema
//!
//! JSON Schema generation, validation, and registry for Soliloan.
//!
//! This crate provides:
//! - `SchemaRegistry`: central store of all JSON Schemas in the system
//! - Validation of action input payloads before they are deserialized
//!
//! ## Architecture
//!
//! Entity and input types are defined in `soli-core` with
//! `#[derive(JsonSchema)]`. This crate imports those types and provides the
//! registry and validation layer; `soli-actions` validates every
//! payload-carrying action input through it.

mod error;
mod registry;

pub use error::SchemaError;
pub use registry::SchemaRegistry;
