//! # kb-core
//!
//! Core types, traits, and utilities for the kanban client.
//!
//! This crate provides the foundational building blocks used across all other crates:
//! - Common error types
//! - Result type aliases and the typed action outcome
//! - Core traits (Identifiable)
//! - Configuration types
//! - Shallow record diffing for partial updates

pub mod error;
pub mod result;
pub mod traits;
pub mod config;
pub mod diff;

pub use error::*;
pub use result::*;
pub use traits::*;
pub use diff::{diff_objects, modified_fields};
