//! Social performance records and their embedded snapshots.
//!
//! [`Record`] is the canonical entity owned by the record store. Its bonus is
//! private and computed in the constructor, so no code path can set it.
//! [`RecordSnapshot`] is the frozen copy a salesman carries after an attach;
//! it is a separate type so the two are never confused.

use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  bonus::{BonusTier, derive_bonus},
  id::RecordId,
};

// ─── Input ───────────────────────────────────────────────────────────────────

/// Unvalidated input for creating or updating a record.
///
/// Every field is optional so that a missing value can be told apart from
/// zero. A `bonus` supplied alongside these fields is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordDraft {
  pub category:     Option<String>,
  pub target_value: Option<f64>,
  pub actual_value: Option<f64>,
  pub year:         Option<i32>,
}

impl RecordDraft {
  pub fn validate(self) -> Result<RecordFields> {
    let category = self
      .category
      .filter(|c| !c.trim().is_empty())
      .ok_or_else(|| Error::Validation("category is required".into()))?;
    let target_value = finite("targetValue", self.target_value)?;
    let actual_value = finite("actualValue", self.actual_value)?;
    let year = self
      .year
      .ok_or_else(|| Error::Validation("year is required".into()))?;

    Ok(RecordFields { category, target_value, actual_value, year })
  }
}

fn finite(field: &str, value: Option<f64>) -> Result<f64> {
  match value {
    None => Err(Error::Validation(format!("{field} is required"))),
    Some(v) if !v.is_finite() => {
      Err(Error::Validation(format!("{field} must be a finite number")))
    }
    Some(v) => Ok(v),
  }
}

/// The four caller-controlled fields of a record, already validated.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordFields {
  pub category:     String,
  pub target_value: f64,
  pub actual_value: f64,
  pub year:         i32,
}

impl RecordFields {
  pub fn new(
    category: impl Into<String>,
    target_value: f64,
    actual_value: f64,
    year: i32,
  ) -> Self {
    Self { category: category.into(), target_value, actual_value, year }
  }
}

// ─── Record ──────────────────────────────────────────────────────────────────

/// A canonical social performance record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
  #[serde(rename = "id")]
  record_id:    RecordId,
  category:     String,
  target_value: f64,
  actual_value: f64,
  year:         i32,
  bonus:        u32,
}

impl Record {
  /// Build a record, deriving its bonus from the target and actual values.
  pub fn new(record_id: RecordId, fields: RecordFields) -> Self {
    let bonus = derive_bonus(fields.target_value, fields.actual_value);
    Self {
      record_id,
      category: fields.category,
      target_value: fields.target_value,
      actual_value: fields.actual_value,
      year: fields.year,
      bonus,
    }
  }

  pub fn record_id(&self) -> RecordId { self.record_id }

  pub fn category(&self) -> &str { &self.category }

  pub fn target_value(&self) -> f64 { self.target_value }

  pub fn actual_value(&self) -> f64 { self.actual_value }

  pub fn year(&self) -> i32 { self.year }

  pub fn bonus(&self) -> u32 { self.bonus }

  pub fn tier(&self) -> BonusTier {
    BonusTier::classify(self.target_value, self.actual_value)
  }

  /// Freeze the current state of this record for embedding in a salesman.
  pub fn snapshot(&self) -> RecordSnapshot {
    RecordSnapshot {
      rid:          self.record_id,
      category:     self.category.clone(),
      target_value: self.target_value,
      actual_value: self.actual_value,
      year:         self.year,
      bonus:        self.bonus,
    }
  }
}

// ─── Snapshot ────────────────────────────────────────────────────────────────

/// A point-in-time copy of a record embedded inside a salesman.
///
/// Later updates to the canonical record are not reflected here. The `rid`
/// keys the snapshot within its salesman.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSnapshot {
  pub rid:          RecordId,
  pub category:     String,
  pub target_value: f64,
  pub actual_value: f64,
  pub year:         i32,
  pub bonus:        u32,
}
