//! The record store. Canonical CRUD for performance records.

use std::sync::Arc;

use tracing::{debug, info};

use crate::{
  Error, Result,
  coordinator::ConsistencyCoordinator,
  id::RecordId,
  record::{Record, RecordDraft},
  store::Backend,
};

pub struct RecordStore<B> {
  backend:     Arc<B>,
  coordinator: ConsistencyCoordinator<B>,
}

impl<B> Clone for RecordStore<B> {
  fn clone(&self) -> Self {
    Self {
      backend:     Arc::clone(&self.backend),
      coordinator: self.coordinator.clone(),
    }
  }
}

impl<B: Backend> RecordStore<B> {
  pub fn new(backend: Arc<B>) -> Self {
    let coordinator = ConsistencyCoordinator::new(Arc::clone(&backend));
    Self { backend, coordinator }
  }

  pub async fn list(&self) -> Result<Vec<Record>> {
    self.backend.list_records().await.map_err(Error::store)
  }

  pub async fn get(&self, record_id: &str) -> Result<Record> {
    let id: RecordId = record_id.parse()?;
    self
      .backend
      .find_record(id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::RecordNotFound(id))
  }

  pub async fn create(&self, draft: RecordDraft) -> Result<Record> {
    let record = Record::new(RecordId::generate(), draft.validate()?);
    self
      .backend
      .insert_record(record.clone())
      .await
      .map_err(Error::store)?;
    debug!(record_id = %record.record_id(), bonus = record.bonus(), "created record");
    Ok(record)
  }

  /// Replace all four fields and re-derive the bonus.
  pub async fn update(&self, record_id: &str, draft: RecordDraft) -> Result<Record> {
    let id: RecordId = record_id.parse()?;
    let record = Record::new(id, draft.validate()?);
    let matched = self
      .backend
      .replace_record(record.clone())
      .await
      .map_err(Error::store)?;
    if !matched {
      return Err(Error::RecordNotFound(id));
    }
    Ok(record)
  }

  /// Delete the record, then sweep its snapshots out of every salesman.
  ///
  /// If the sweep fails the record stays deleted and the error is returned.
  pub async fn delete(&self, record_id: &str) -> Result<()> {
    let id: RecordId = record_id.parse()?;
    let deleted = self.backend.delete_record(id).await.map_err(Error::store)?;
    if !deleted {
      return Err(Error::RecordNotFound(id));
    }
    info!(record_id = %id, "deleted record");
    self.coordinator.on_record_deleted(id).await?;
    Ok(())
  }

  /// Bulk reset of the record collection. Salesmen are left untouched.
  pub async fn clear(&self) -> Result<u64> {
    let removed = self.backend.clear_records().await.map_err(Error::store)?;
    info!(removed, "cleared performance records");
    Ok(removed)
  }
}
