//! SQLite backend for the sales performance tracker.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Implements both
//! [`salesperf_core::store::RecordRepository`] and
//! [`salesperf_core::store::SalesmanRepository`] on one connection.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
