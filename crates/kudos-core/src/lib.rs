//! Core types and trait definitions for the kudos vote recorder.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing heavier than serde.

pub mod candidate;
pub mod error;
pub mod store;
pub mod submission;
pub mod tally;
pub mod vote;

pub use error::{Error, Result};
