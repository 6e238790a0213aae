//! Identifiers for records and salesmen.
//!
//! Both are UUIDs on the inside and opaque strings at the boundary. Parsing a
//! malformed string yields [`Error::InvalidIdentifier`], never a not-found.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Error;

/// Identity of a canonical performance record.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RecordId(Uuid);

impl RecordId {
  /// A fresh, globally unique identifier.
  pub fn generate() -> Self { Self(Uuid::new_v4()) }

  pub fn from_uuid(id: Uuid) -> Self { Self(id) }

  pub fn as_uuid(&self) -> Uuid { self.0 }
}

impl FromStr for RecordId {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Uuid::parse_str(s.trim())
      .map(Self)
      .map_err(|_| Error::InvalidIdentifier(s.to_owned()))
  }
}

impl fmt::Display for RecordId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}

/// Identity of a salesman aggregate.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SalesmanId(Uuid);

impl SalesmanId {
  pub fn generate() -> Self { Self(Uuid::new_v4()) }

  pub fn from_uuid(id: Uuid) -> Self { Self(id) }

  pub fn as_uuid(&self) -> Uuid { self.0 }
}

impl FromStr for SalesmanId {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Uuid::parse_str(s.trim())
      .map(Self)
      .map_err(|_| Error::InvalidIdentifier(s.to_owned()))
  }
}

impl fmt::Display for SalesmanId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}
