//! # soli-core
//!
//! Core types, ID generation constants, and error types for Soliloan.
//!
//! This crate provides the foundational types shared across all Soliloan crates:
//! - Entity structs for all domain objects (lenders, loans, transactions, etc.)
//! - Action input payloads validated by the schema registry
//! - Kind/status enums with stable snake_case SQL representations
//! - ID prefix constants
//! - Cross-cutting error types
//! - Audit diffing (`changed_fields`, `strip_null_fields`) for Change entries
//! - IBAN normalization and validation
//! - The base64 view-state codec used for URL round-tripping

pub mod audit;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod iban;
pub mod identity;
pub mod ids;
pub mod inputs;
pub mod responses;
pub mod viewstate;
