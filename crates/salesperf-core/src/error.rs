//! Error types for `salesperf-core`.

use thiserror::Error;

use crate::id::{RecordId, SalesmanId};

#[derive(Debug, Error)]
pub enum Error {
  /// A required field is missing or empty. Raised before any store mutation.
  #[error("validation failed: {0}")]
  Validation(String),

  #[error("invalid identifier: {0:?}")]
  InvalidIdentifier(String),

  #[error("performance record not found: {0}")]
  RecordNotFound(RecordId),

  #[error("salesman not found: {0}")]
  SalesmanNotFound(SalesmanId),

  #[error("record {record_id} is already attached to salesman {salesman_id}")]
  DuplicateAttachment {
    salesman_id: SalesmanId,
    record_id:   RecordId,
  },

  /// The backing store failed for infrastructure reasons.
  #[error("store unavailable: {0}")]
  StoreUnavailable(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Box a backend error into [`Error::StoreUnavailable`].
  pub fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::StoreUnavailable(Box::new(err))
  }

  pub fn is_not_found(&self) -> bool {
    matches!(self, Self::RecordNotFound(_) | Self::SalesmanNotFound(_))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
