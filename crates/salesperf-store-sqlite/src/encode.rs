//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! UUIDs are stored as hyphenated lowercase strings. The embedded snapshot
//! list is stored as a compact JSON array.

use salesperf_core::{
  id::{RecordId, SalesmanId},
  record::{Record, RecordFields, RecordSnapshot},
  salesman::Salesman,
};
use uuid::Uuid;

use crate::Result;

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── Snapshots ───────────────────────────────────────────────────────────────

pub fn encode_snapshots(records: &[RecordSnapshot]) -> Result<String> {
  Ok(serde_json::to_string(records)?)
}

pub fn decode_snapshots(s: &str) -> Result<Vec<RecordSnapshot>> {
  Ok(serde_json::from_str(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

pub const RECORD_COLUMNS: &str =
  "record_id, category, target_value, actual_value, year";

/// Raw values read directly from a `performance_records` row.
pub struct RawRecord {
  pub record_id:    String,
  pub category:     String,
  pub target_value: f64,
  pub actual_value: f64,
  pub year:         i32,
}

impl RawRecord {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      record_id:    row.get(0)?,
      category:     row.get(1)?,
      target_value: row.get(2)?,
      actual_value: row.get(3)?,
      year:         row.get(4)?,
    })
  }

  /// The stored bonus column is not read; [`Record::new`] re-derives it.
  pub fn into_record(self) -> Result<Record> {
    Ok(Record::new(
      RecordId::from_uuid(decode_uuid(&self.record_id)?),
      RecordFields {
        category:     self.category,
        target_value: self.target_value,
        actual_value: self.actual_value,
        year:         self.year,
      },
    ))
  }
}

pub const SALESMAN_COLUMNS: &str =
  "salesman_id, firstname, lastname, records_json";

/// Raw strings read directly from a `salesmen` row.
pub struct RawSalesman {
  pub salesman_id:  String,
  pub firstname:    String,
  pub lastname:     String,
  pub records_json: String,
}

impl RawSalesman {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      salesman_id:  row.get(0)?,
      firstname:    row.get(1)?,
      lastname:     row.get(2)?,
      records_json: row.get(3)?,
    })
  }

  pub fn into_salesman(self) -> Result<Salesman> {
    Ok(Salesman::restore(
      SalesmanId::from_uuid(decode_uuid(&self.salesman_id)?),
      self.firstname,
      self.lastname,
      decode_snapshots(&self.records_json)?,
    )?)
  }
}
