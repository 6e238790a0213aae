//! Core types, invariants, and components for the sales performance tracker.
//!
//! This crate is deliberately free of HTTP and database dependencies. Storage
//! backends implement the repository traits in [`store`]; the components in
//! [`records`], [`salesmen`], and [`coordinator`] enforce every cross-entity
//! invariant on top of them, whatever the backend.

pub mod bonus;
pub mod coordinator;
pub mod error;
pub mod id;
pub mod memory;
pub mod record;
pub mod records;
pub mod salesman;
pub mod salesmen;
pub mod store;

pub use error::{Error, Result};
