//! Repository traits for the two persisted collections.
//!
//! Backends (e.g. `salesperf-store-sqlite`, or [`crate::memory::MemoryStore`]
//! in tests) implement these. The components in [`crate::records`] and
//! [`crate::salesmen`] depend only on this abstraction.
//!
//! All methods return `Send` futures so the traits can be used in
//! multi-threaded async runtimes (e.g. tokio with `axum`).

use std::future::Future;

use crate::{
  id::{RecordId, SalesmanId},
  record::{Record, RecordSnapshot},
  salesman::Salesman,
};

// ─── Records ─────────────────────────────────────────────────────────────────

/// The canonical `performanceRecords` collection.
pub trait RecordRepository: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Every stored record. Ordering is backend-defined.
  fn list_records(
    &self,
  ) -> impl Future<Output = Result<Vec<Record>, Self::Error>> + Send + '_;

  fn find_record(
    &self,
    id: RecordId,
  ) -> impl Future<Output = Result<Option<Record>, Self::Error>> + Send + '_;

  fn insert_record(
    &self,
    record: Record,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Overwrite the record with the same id. Returns `false` if none matched.
  fn replace_record(
    &self,
    record: Record,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Returns `false` if no record had this id.
  fn delete_record(
    &self,
    id: RecordId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Delete every record; returns how many were removed. Does not cascade.
  fn clear_records(
    &self,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;
}

// ─── Salesmen ────────────────────────────────────────────────────────────────

/// Result of [`SalesmanRepository::append_snapshot`].
#[derive(Debug, Clone)]
pub enum AppendOutcome {
  /// The snapshot was appended; carries the updated aggregate.
  Appended(Salesman),
  /// A snapshot with the same `rid` was already present; nothing changed.
  Duplicate,
  MissingSalesman,
}

/// The `salesmen` collection, including each salesman's embedded snapshots.
pub trait SalesmanRepository: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn list_salesmen(
    &self,
  ) -> impl Future<Output = Result<Vec<Salesman>, Self::Error>> + Send + '_;

  fn find_salesman(
    &self,
    id: SalesmanId,
  ) -> impl Future<Output = Result<Option<Salesman>, Self::Error>> + Send + '_;

  fn insert_salesman(
    &self,
    salesman: Salesman,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Overwrite names and snapshot list wholesale. Returns `false` if no
  /// salesman had this id.
  fn replace_salesman(
    &self,
    salesman: Salesman,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  fn delete_salesman(
    &self,
    id: SalesmanId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Append `snapshot` to the salesman's list only if no snapshot with the
  /// same `rid` is present.
  ///
  /// Implementations must perform the check and the write as one atomic step
  /// so concurrent attaches of the same pair cannot both succeed.
  fn append_snapshot(
    &self,
    id: SalesmanId,
    snapshot: RecordSnapshot,
  ) -> impl Future<Output = Result<AppendOutcome, Self::Error>> + Send + '_;

  /// Remove the snapshot keyed by `rid` from every salesman holding one.
  /// Returns the number of salesmen modified.
  fn remove_snapshots(
    &self,
    rid: RecordId,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  /// Delete every salesman; returns how many were removed.
  fn clear_salesmen(
    &self,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;
}

/// A backend that stores both collections.
pub trait Backend: RecordRepository + SalesmanRepository + 'static {}

impl<T> Backend for T where T: RecordRepository + SalesmanRepository + 'static {}
