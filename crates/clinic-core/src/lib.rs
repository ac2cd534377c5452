//! # clinic-core
//!
//! Core types, traits, and utilities for the clinic backend.
//!
//! This crate provides the foundational building blocks used across all other crates:
//! - Common error types and the validation error collection
//! - Result type aliases
//! - The `Document` trait implemented by every stored resource
//! - Slug derivation
//! - Configuration types

pub mod config;
pub mod error;
pub mod result;
pub mod slug;
pub mod traits;

pub use error::*;
pub use result::*;
pub use slug::*;
pub use traits::*;
