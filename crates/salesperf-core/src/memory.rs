//! In-memory backend implementing both repository traits.
//!
//! Used as the test fake for the components, and usable anywhere a
//! throwaway store is good enough. Each write happens under a single write
//! lock, which makes [`SalesmanRepository::append_snapshot`] atomic.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use thiserror::Error;

use crate::{
  id::{RecordId, SalesmanId},
  record::{Record, RecordSnapshot},
  salesman::Salesman,
  store::{AppendOutcome, RecordRepository, SalesmanRepository},
};

#[derive(Debug, Error)]
pub enum MemoryError {
  #[error("memory store lock poisoned")]
  Poisoned,

  #[error("duplicate key: {0}")]
  DuplicateKey(String),
}

#[derive(Default)]
struct Collections {
  records:  Vec<Record>,
  salesmen: Vec<Salesman>,
}

/// A backend holding both collections in insertion order.
#[derive(Default)]
pub struct MemoryStore {
  inner: RwLock<Collections>,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }

  fn read(&self) -> Result<RwLockReadGuard<'_, Collections>, MemoryError> {
    self.inner.read().map_err(|_| MemoryError::Poisoned)
  }

  fn write(&self) -> Result<RwLockWriteGuard<'_, Collections>, MemoryError> {
    self.inner.write().map_err(|_| MemoryError::Poisoned)
  }
}

impl RecordRepository for MemoryStore {
  type Error = MemoryError;

  async fn list_records(&self) -> Result<Vec<Record>, MemoryError> {
    Ok(self.read()?.records.clone())
  }

  async fn find_record(&self, id: RecordId) -> Result<Option<Record>, MemoryError> {
    Ok(self.read()?.records.iter().find(|r| r.record_id() == id).cloned())
  }

  async fn insert_record(&self, record: Record) -> Result<(), MemoryError> {
    let mut inner = self.write()?;
    if inner.records.iter().any(|r| r.record_id() == record.record_id()) {
      return Err(MemoryError::DuplicateKey(record.record_id().to_string()));
    }
    inner.records.push(record);
    Ok(())
  }

  async fn replace_record(&self, record: Record) -> Result<bool, MemoryError> {
    let mut inner = self.write()?;
    match inner.records.iter_mut().find(|r| r.record_id() == record.record_id()) {
      Some(slot) => {
        *slot = record;
        Ok(true)
      }
      None => Ok(false),
    }
  }

  async fn delete_record(&self, id: RecordId) -> Result<bool, MemoryError> {
    let mut inner = self.write()?;
    let before = inner.records.len();
    inner.records.retain(|r| r.record_id() != id);
    Ok(inner.records.len() != before)
  }

  async fn clear_records(&self) -> Result<u64, MemoryError> {
    let mut inner = self.write()?;
    let removed = inner.records.len() as u64;
    inner.records.clear();
    Ok(removed)
  }
}

impl SalesmanRepository for MemoryStore {
  type Error = MemoryError;

  async fn list_salesmen(&self) -> Result<Vec<Salesman>, MemoryError> {
    Ok(self.read()?.salesmen.clone())
  }

  async fn find_salesman(
    &self,
    id: SalesmanId,
  ) -> Result<Option<Salesman>, MemoryError> {
    Ok(self.read()?.salesmen.iter().find(|s| s.salesman_id == id).cloned())
  }

  async fn insert_salesman(&self, salesman: Salesman) -> Result<(), MemoryError> {
    let mut inner = self.write()?;
    if inner.salesmen.iter().any(|s| s.salesman_id == salesman.salesman_id) {
      return Err(MemoryError::DuplicateKey(salesman.salesman_id.to_string()));
    }
    inner.salesmen.push(salesman);
    Ok(())
  }

  async fn replace_salesman(&self, salesman: Salesman) -> Result<bool, MemoryError> {
    let mut inner = self.write()?;
    match inner.salesmen.iter_mut().find(|s| s.salesman_id == salesman.salesman_id) {
      Some(slot) => {
        *slot = salesman;
        Ok(true)
      }
      None => Ok(false),
    }
  }

  async fn delete_salesman(&self, id: SalesmanId) -> Result<bool, MemoryError> {
    let mut inner = self.write()?;
    let before = inner.salesmen.len();
    inner.salesmen.retain(|s| s.salesman_id != id);
    Ok(inner.salesmen.len() != before)
  }

  async fn append_snapshot(
    &self,
    id: SalesmanId,
    snapshot: RecordSnapshot,
  ) -> Result<AppendOutcome, MemoryError> {
    let mut inner = self.write()?;
    let Some(salesman) = inner.salesmen.iter_mut().find(|s| s.salesman_id == id) else {
      return Ok(AppendOutcome::MissingSalesman);
    };
    if salesman.attach(snapshot).is_err() {
      return Ok(AppendOutcome::Duplicate);
    }
    Ok(AppendOutcome::Appended(salesman.clone()))
  }

  async fn remove_snapshots(&self, rid: RecordId) -> Result<u64, MemoryError> {
    let mut inner = self.write()?;
    let swept = inner
      .salesmen
      .iter_mut()
      .map(|s| s.detach(rid))
      .filter(|&removed| removed)
      .count();
    Ok(swept as u64)
  }

  async fn clear_salesmen(&self) -> Result<u64, MemoryError> {
    let mut inner = self.write()?;
    let removed = inner.salesmen.len() as u64;
    inner.salesmen.clear();
    Ok(removed)
  }
}
