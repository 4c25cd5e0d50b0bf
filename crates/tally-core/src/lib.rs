//! # tally-core
//!
//! Core types, ID prefixes, and error types for Tally.
//!
//! This crate provides the foundational types shared across all Tally crates:
//! - Entity structs for inventory items, tools, projects, transactions,
//!   tool movements, reconciliations and audit entries
//! - Status enums with state machine transitions
//! - ID prefix constants
//! - Cross-cutting error types
//! - CLI response types
//! - Pricing arithmetic and report aggregation over fetched rows

pub mod audit_detail;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
pub mod pricing;
pub mod reports;
pub mod responses;
