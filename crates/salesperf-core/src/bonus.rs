//! The bonus-tier derivation rule.
//!
//! A record's bonus is a pure function of its target and actual values. It is
//! never accepted from callers and is re-derived on every create and update.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// How the actual value compares with the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BonusTier {
  /// `actual < target`
  Missed,
  /// `actual == target`
  Met,
  /// `actual > target`
  Exceeded,
}

impl BonusTier {
  pub fn classify(target: f64, actual: f64) -> Self {
    match actual.partial_cmp(&target) {
      Some(Ordering::Less) => Self::Missed,
      Some(Ordering::Equal) => Self::Met,
      // Non-finite inputs are rejected during validation.
      Some(Ordering::Greater) | None => Self::Exceeded,
    }
  }

  /// The bonus value awarded for this tier.
  pub const fn points(self) -> u32 {
    match self {
      Self::Missed => 20,
      Self::Met => 50,
      Self::Exceeded => 100,
    }
  }
}

/// Derive the bonus for a `(target, actual)` pair: 20, 50 or 100.
pub fn derive_bonus(target: f64, actual: f64) -> u32 {
  BonusTier::classify(target, actual).points()
}
