//! # clinic-contracts
//!
//! Validation contracts for the clinic backend.
//!
//! Each resource declares its required fields as a table of [`FieldRule`]s;
//! one shared evaluator turns missing or blank values into messages that name
//! the field. Contracts run before any upload or write.

pub mod albums;
pub mod appointments;
pub mod base;
pub mod blogs;
pub mod profiles;
pub mod treatments;
pub mod videos;

pub use base::*;
