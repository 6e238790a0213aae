//! Salesman aggregate: identity, names, and the embedded snapshot list.
//!
//! The snapshot list is private. Every way of changing it goes through
//! [`Salesman::attach`], [`Salesman::detach`], or [`Salesman::restore`], which
//! together keep the `rid`s within one salesman unique.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  id::{RecordId, SalesmanId},
  record::RecordSnapshot,
};

// ─── Input ───────────────────────────────────────────────────────────────────

/// Unvalidated input for `createSalesman`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SalesmanDraft {
  pub firstname: Option<String>,
  pub lastname:  Option<String>,
}

impl SalesmanDraft {
  pub fn new(firstname: impl Into<String>, lastname: impl Into<String>) -> Self {
    Self { firstname: Some(firstname.into()), lastname: Some(lastname.into()) }
  }

  pub fn validate(self) -> Result<SalesmanName> {
    Ok(SalesmanName {
      firstname: required("firstname", self.firstname)?,
      lastname:  required("lastname", self.lastname)?,
    })
  }
}

/// Input for the wholesale `updateSalesman` replace.
///
/// Snapshots are passed through as given; only `rid` uniqueness is checked.
/// An omitted `records` field replaces the list with an empty one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SalesmanUpdate {
  pub firstname: Option<String>,
  pub lastname:  Option<String>,
  #[serde(default)]
  pub records:   Vec<RecordSnapshot>,
}

fn required(field: &str, value: Option<String>) -> Result<String> {
  value
    .filter(|v| !v.trim().is_empty())
    .ok_or_else(|| Error::Validation(format!("{field} is required")))
}

/// Validated first and last name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalesmanName {
  pub firstname: String,
  pub lastname:  String,
}

// ─── Aggregate ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Salesman {
  #[serde(rename = "id")]
  pub salesman_id: SalesmanId,
  pub firstname:   String,
  pub lastname:    String,
  records:         Vec<RecordSnapshot>,
}

impl Salesman {
  /// A new salesman with no attached records.
  pub fn new(salesman_id: SalesmanId, name: SalesmanName) -> Self {
    Self {
      salesman_id,
      firstname: name.firstname,
      lastname: name.lastname,
      records: Vec::new(),
    }
  }

  /// Rebuild a salesman from stored or caller-supplied parts.
  ///
  /// Fails with [`Error::DuplicateAttachment`] if two snapshots share a `rid`.
  pub fn restore(
    salesman_id: SalesmanId,
    firstname: String,
    lastname: String,
    records: Vec<RecordSnapshot>,
  ) -> Result<Self> {
    ensure_unique_snapshots(salesman_id, &records)?;
    Ok(Self { salesman_id, firstname, lastname, records })
  }

  pub fn records(&self) -> &[RecordSnapshot] { &self.records }

  pub fn holds(&self, rid: RecordId) -> bool {
    self.records.iter().any(|s| s.rid == rid)
  }

  /// Append `snapshot` unless a snapshot with the same `rid` is present.
  pub fn attach(&mut self, snapshot: RecordSnapshot) -> Result<()> {
    if self.holds(snapshot.rid) {
      return Err(Error::DuplicateAttachment {
        salesman_id: self.salesman_id,
        record_id:   snapshot.rid,
      });
    }
    self.records.push(snapshot);
    Ok(())
  }

  /// Remove the snapshot keyed by `rid`. Returns whether one was removed.
  pub fn detach(&mut self, rid: RecordId) -> bool {
    let before = self.records.len();
    self.records.retain(|s| s.rid != rid);
    self.records.len() != before
  }
}

/// Check that no two snapshots in `records` share a `rid`.
pub fn ensure_unique_snapshots(
  salesman_id: SalesmanId,
  records: &[RecordSnapshot],
) -> Result<()> {
  let mut seen = HashSet::with_capacity(records.len());
  for snapshot in records {
    if !seen.insert(snapshot.rid) {
      return Err(Error::DuplicateAttachment {
        salesman_id,
        record_id: snapshot.rid,
      });
    }
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::record::{Record, RecordFields};

  fn snapshot(category: &str) -> RecordSnapshot {
    Record::new(RecordId::generate(), RecordFields::new(category, 1.0, 2.0, 2024))
      .snapshot()
  }

  fn salesman() -> Salesman {
    Salesman::new(
      SalesmanId::generate(),
      SalesmanDraft::new("Ada", "Lovelace").validate().unwrap(),
    )
  }

  #[test]
  fn empty_names_are_rejected() {
    for draft in [
      SalesmanDraft::new("", "B"),
      SalesmanDraft::new("A", "   "),
      SalesmanDraft { firstname: None, lastname: Some("B".into()) },
    ] {
      assert!(matches!(draft.validate(), Err(Error::Validation(_))));
    }
  }

  #[test]
  fn attach_rejects_duplicate_rid() {
    let mut s = salesman();
    let snap = snapshot("eco");
    s.attach(snap.clone()).unwrap();

    let err = s.attach(snap.clone()).unwrap_err();
    assert!(matches!(
      err,
      Error::DuplicateAttachment { record_id, .. } if record_id == snap.rid
    ));
    assert_eq!(s.records().len(), 1);
  }

  #[test]
  fn detach_leaves_other_snapshots() {
    let mut s = salesman();
    let a = snapshot("a");
    let b = snapshot("b");
    s.attach(a.clone()).unwrap();
    s.attach(b.clone()).unwrap();

    assert!(s.detach(a.rid));
    assert!(!s.detach(a.rid));
    assert_eq!(s.records(), &[b]);
  }

  #[test]
  fn restore_rejects_duplicates() {
    let snap = snapshot("eco");
    let result = Salesman::restore(
      SalesmanId::generate(),
      "A".into(),
      "B".into(),
      vec![snap.clone(), snap],
    );
    assert!(matches!(result, Err(Error::DuplicateAttachment { .. })));
  }
}
