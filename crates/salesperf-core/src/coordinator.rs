//! Keeps embedded snapshots from outliving their canonical record.

use std::sync::Arc;

use tracing::{error, info};

use crate::{Error, Result, id::RecordId, store::SalesmanRepository};

/// Sweeps a deleted record's snapshots out of every salesman.
///
/// The sweep is best-effort: a failure is logged and reported, but the record
/// deletion that triggered it is never rolled back.
pub struct ConsistencyCoordinator<B> {
  backend: Arc<B>,
}

impl<B> Clone for ConsistencyCoordinator<B> {
  fn clone(&self) -> Self { Self { backend: Arc::clone(&self.backend) } }
}

impl<B: SalesmanRepository> ConsistencyCoordinator<B> {
  pub fn new(backend: Arc<B>) -> Self { Self { backend } }

  /// Remove `record_id` from every salesman's snapshot list.
  ///
  /// Returns the number of salesmen modified; a repeated call returns zero.
  pub async fn on_record_deleted(&self, record_id: RecordId) -> Result<u64> {
    match self.backend.remove_snapshots(record_id).await {
      Ok(swept) => {
        if swept > 0 {
          info!(%record_id, swept, "removed snapshots of deleted record");
        }
        Ok(swept)
      }
      Err(e) => {
        error!(%record_id, error = %e, "snapshot sweep failed");
        Err(Error::store(e))
      }
    }
  }
}
