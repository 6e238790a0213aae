//! [`SqliteStore`], the SQLite implementation of both repositories.

use std::path::Path;

use rusqlite::{OptionalExtension as _, TransactionBehavior};

use salesperf_core::{
  id::{RecordId, SalesmanId},
  record::{Record, RecordSnapshot},
  salesman::Salesman,
  store::{AppendOutcome, RecordRepository, SalesmanRepository},
};

use crate::{
  Error, Result,
  encode::{
    RECORD_COLUMNS, RawRecord, RawSalesman, SALESMAN_COLUMNS, encode_snapshots,
    encode_uuid,
  },
  schema::SCHEMA,
};

/// Surface a decoding failure from inside a `Connection::call` closure.
fn in_call(e: Error) -> tokio_rusqlite::Error { tokio_rusqlite::Error::Other(Box::new(e)) }

// ─── Store ───────────────────────────────────────────────────────────────────

/// A store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted. Every call
/// runs on the connection's single worker thread, and the conditional writes
/// run inside `IMMEDIATE` transactions.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, mostly for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── RecordRepository impl ───────────────────────────────────────────────────

impl RecordRepository for SqliteStore {
  type Error = Error;

  async fn list_records(&self) -> Result<Vec<Record>> {
    let raws: Vec<RawRecord> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {RECORD_COLUMNS} FROM performance_records ORDER BY rowid"
        ))?;
        let rows = stmt
          .query_map([], RawRecord::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawRecord::into_record).collect()
  }

  async fn find_record(&self, id: RecordId) -> Result<Option<Record>> {
    let id_str = encode_uuid(id.as_uuid());

    let raw: Option<RawRecord> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {RECORD_COLUMNS} FROM performance_records WHERE record_id = ?1"
              ),
              rusqlite::params![id_str],
              RawRecord::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawRecord::into_record).transpose()
  }

  async fn insert_record(&self, record: Record) -> Result<()> {
    let id_str = encode_uuid(record.record_id().as_uuid());

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO performance_records (
             record_id, category, target_value, actual_value, year, bonus
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![
            id_str,
            record.category(),
            record.target_value(),
            record.actual_value(),
            record.year(),
            record.bonus(),
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn replace_record(&self, record: Record) -> Result<bool> {
    let id_str = encode_uuid(record.record_id().as_uuid());

    let matched = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE performance_records
             SET category = ?2, target_value = ?3, actual_value = ?4,
                 year = ?5, bonus = ?6
           WHERE record_id = ?1",
          rusqlite::params![
            id_str,
            record.category(),
            record.target_value(),
            record.actual_value(),
            record.year(),
            record.bonus(),
          ],
        )?)
      })
      .await?;
    Ok(matched > 0)
  }

  async fn delete_record(&self, id: RecordId) -> Result<bool> {
    let id_str = encode_uuid(id.as_uuid());

    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM performance_records WHERE record_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;
    Ok(deleted > 0)
  }

  async fn clear_records(&self) -> Result<u64> {
    let removed = self
      .conn
      .call(|conn| Ok(conn.execute("DELETE FROM performance_records", [])?))
      .await?;
    Ok(removed as u64)
  }
}

// ─── SalesmanRepository impl ─────────────────────────────────────────────────

impl SalesmanRepository for SqliteStore {
  type Error = Error;

  async fn list_salesmen(&self) -> Result<Vec<Salesman>> {
    let raws: Vec<RawSalesman> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {SALESMAN_COLUMNS} FROM salesmen ORDER BY rowid"
        ))?;
        let rows = stmt
          .query_map([], RawSalesman::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSalesman::into_salesman).collect()
  }

  async fn find_salesman(&self, id: SalesmanId) -> Result<Option<Salesman>> {
    let id_str = encode_uuid(id.as_uuid());

    let raw: Option<RawSalesman> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {SALESMAN_COLUMNS} FROM salesmen WHERE salesman_id = ?1"),
              rusqlite::params![id_str],
              RawSalesman::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawSalesman::into_salesman).transpose()
  }

  async fn insert_salesman(&self, salesman: Salesman) -> Result<()> {
    let id_str       = encode_uuid(salesman.salesman_id.as_uuid());
    let records_json = encode_snapshots(salesman.records())?;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO salesmen (salesman_id, firstname, lastname, records_json)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![id_str, salesman.firstname, salesman.lastname, records_json],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn replace_salesman(&self, salesman: Salesman) -> Result<bool> {
    let id_str       = encode_uuid(salesman.salesman_id.as_uuid());
    let records_json = encode_snapshots(salesman.records())?;

    let matched = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE salesmen
             SET firstname = ?2, lastname = ?3, records_json = ?4
           WHERE salesman_id = ?1",
          rusqlite::params![id_str, salesman.firstname, salesman.lastname, records_json],
        )?)
      })
      .await?;
    Ok(matched > 0)
  }

  async fn delete_salesman(&self, id: SalesmanId) -> Result<bool> {
    let id_str = encode_uuid(id.as_uuid());

    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM salesmen WHERE salesman_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;
    Ok(deleted > 0)
  }

  async fn append_snapshot(
    &self,
    id:       SalesmanId,
    snapshot: RecordSnapshot,
  ) -> Result<AppendOutcome> {
    let id_str = encode_uuid(id.as_uuid());

    let outcome = self
      .conn
      .call(move |conn| {
        // Read, check, and write under one write lock.
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let raw = tx
          .query_row(
            &format!("SELECT {SALESMAN_COLUMNS} FROM salesmen WHERE salesman_id = ?1"),
            rusqlite::params![id_str],
            RawSalesman::from_row,
          )
          .optional()?;
        let Some(raw) = raw else {
          return Ok(AppendOutcome::MissingSalesman);
        };

        let mut salesman = raw.into_salesman().map_err(in_call)?;
        if salesman.attach(snapshot).is_err() {
          return Ok(AppendOutcome::Duplicate);
        }

        let records_json = encode_snapshots(salesman.records()).map_err(in_call)?;
        tx.execute(
          "UPDATE salesmen SET records_json = ?2 WHERE salesman_id = ?1",
          rusqlite::params![id_str, records_json],
        )?;
        tx.commit()?;

        Ok(AppendOutcome::Appended(salesman))
      })
      .await?;

    Ok(outcome)
  }

  async fn remove_snapshots(&self, rid: RecordId) -> Result<u64> {
    let rid_str = encode_uuid(rid.as_uuid());

    let swept = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        // `instr` narrows the scan; `detach` decides on the decoded list.
        let raws = {
          let mut stmt = tx.prepare(&format!(
            "SELECT {SALESMAN_COLUMNS} FROM salesmen WHERE instr(records_json, ?1) > 0"
          ))?;
          stmt
            .query_map(rusqlite::params![rid_str], RawSalesman::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };

        let mut swept = 0_u64;
        for raw in raws {
          let mut salesman = raw.into_salesman().map_err(in_call)?;
          if !salesman.detach(rid) {
            continue;
          }
          let records_json = encode_snapshots(salesman.records()).map_err(in_call)?;
          tx.execute(
            "UPDATE salesmen SET records_json = ?2 WHERE salesman_id = ?1",
            rusqlite::params![encode_uuid(salesman.salesman_id.as_uuid()), records_json],
          )?;
          swept += 1;
        }

        tx.commit()?;
        Ok(swept)
      })
      .await?;

    Ok(swept)
  }

  async fn clear_salesmen(&self) -> Result<u64> {
    let removed = self
      .conn
      .call(|conn| Ok(conn.execute("DELETE FROM salesmen", [])?))
      .await?;
    Ok(removed as u64)
  }
}
