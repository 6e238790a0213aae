//! The salesman store. CRUD for salesmen plus attaching record snapshots.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::{
  Error, Result,
  coordinator::ConsistencyCoordinator,
  id::{RecordId, SalesmanId},
  salesman::{Salesman, SalesmanDraft, SalesmanUpdate},
  store::{AppendOutcome, Backend},
};

pub struct SalesmanStore<B> {
  backend:     Arc<B>,
  coordinator: ConsistencyCoordinator<B>,
}

impl<B> Clone for SalesmanStore<B> {
  fn clone(&self) -> Self {
    Self {
      backend:     Arc::clone(&self.backend),
      coordinator: self.coordinator.clone(),
    }
  }
}

impl<B: Backend> SalesmanStore<B> {
  pub fn new(backend: Arc<B>) -> Self {
    let coordinator = ConsistencyCoordinator::new(Arc::clone(&backend));
    Self { backend, coordinator }
  }

  pub async fn list(&self) -> Result<Vec<Salesman>> {
    self.backend.list_salesmen().await.map_err(Error::store)
  }

  pub async fn get(&self, salesman_id: &str) -> Result<Salesman> {
    let id: SalesmanId = salesman_id.parse()?;
    self
      .backend
      .find_salesman(id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::SalesmanNotFound(id))
  }

  pub async fn create(&self, draft: SalesmanDraft) -> Result<Salesman> {
    let salesman = Salesman::new(SalesmanId::generate(), draft.validate()?);
    self
      .backend
      .insert_salesman(salesman.clone())
      .await
      .map_err(Error::store)?;
    debug!(salesman_id = %salesman.salesman_id, "created salesman");
    Ok(salesman)
  }

  /// Wholesale replace of names and snapshot list.
  pub async fn update(&self, salesman_id: &str, update: SalesmanUpdate) -> Result<()> {
    let id: SalesmanId = salesman_id.parse()?;
    let name = SalesmanDraft {
      firstname: update.firstname,
      lastname:  update.lastname,
    }
    .validate()?;
    let salesman = Salesman::restore(id, name.firstname, name.lastname, update.records)?;

    let matched = self
      .backend
      .replace_salesman(salesman)
      .await
      .map_err(Error::store)?;
    if !matched {
      return Err(Error::SalesmanNotFound(id));
    }
    Ok(())
  }

  /// Delete a salesman. Canonical records are not affected.
  pub async fn delete(&self, salesman_id: &str) -> Result<()> {
    let id: SalesmanId = salesman_id.parse()?;
    let deleted = self.backend.delete_salesman(id).await.map_err(Error::store)?;
    if !deleted {
      return Err(Error::SalesmanNotFound(id));
    }
    info!(salesman_id = %id, "deleted salesman");
    Ok(())
  }

  /// Embed a snapshot of the canonical record in the salesman's list.
  pub async fn attach(&self, salesman_id: &str, record_id: &str) -> Result<Salesman> {
    let salesman_id: SalesmanId = salesman_id.parse()?;
    let record_id: RecordId = record_id.parse()?;

    let record = self
      .backend
      .find_record(record_id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::RecordNotFound(record_id))?;

    let salesman = match self
      .backend
      .append_snapshot(salesman_id, record.snapshot())
      .await
      .map_err(Error::store)?
    {
      AppendOutcome::Appended(salesman) => salesman,
      AppendOutcome::Duplicate => {
        return Err(Error::DuplicateAttachment { salesman_id, record_id });
      }
      AppendOutcome::MissingSalesman => {
        return Err(Error::SalesmanNotFound(salesman_id));
      }
    };

    // A delete may have swept between the lookup and the append.
    if self
      .backend
      .find_record(record_id)
      .await
      .map_err(Error::store)?
      .is_none()
    {
      warn!(%salesman_id, %record_id, "record deleted during attach; sweeping again");
      self.coordinator.on_record_deleted(record_id).await?;
      return Err(Error::RecordNotFound(record_id));
    }

    debug!(%salesman_id, %record_id, "attached record");
    Ok(salesman)
  }

  /// Bulk reset of the salesman collection. Records are left untouched.
  pub async fn clear(&self) -> Result<u64> {
    let removed = self.backend.clear_salesmen().await.map_err(Error::store)?;
    info!(removed, "cleared salesmen");
    Ok(removed)
  }
}
