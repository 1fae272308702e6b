//! Half-open time slots and the overlap predicate at the heart of conflict
//! detection.
//!
//! A slot covers `[start, end)`. Two slots overlap iff
//! `a.start < b.end && b.start < a.end`, so a booking ending at 10:00 and
//! one starting at 10:00 never conflict — back-to-back meetings are always
//! legal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A validated half-open interval: `start < end` strictly.
///
/// Deserialization goes through [`Slot::new`], so an inverted slot cannot
/// enter through a wire payload either.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SlotRepr")]
pub struct Slot {
  start: DateTime<Utc>,
  end:   DateTime<Utc>,
}

#[derive(Deserialize)]
struct SlotRepr {
  start: DateTime<Utc>,
  end:   DateTime<Utc>,
}

impl TryFrom<SlotRepr> for Slot {
  type Error = Error;

  fn try_from(repr: SlotRepr) -> Result<Self> {
    Self::new(repr.start, repr.end)
  }
}

impl Slot {
  /// Build a slot, rejecting inverted and zero-length intervals.
  pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
    if start >= end {
      return Err(Error::InvertedSlot);
    }
    Ok(Self { start, end })
  }

  pub fn start(&self) -> DateTime<Utc> { self.start }

  pub fn end(&self) -> DateTime<Utc> { self.end }

  /// Half-open overlap test. Shared endpoints do not overlap.
  pub fn overlaps(&self, other: &Slot) -> bool {
    self.start < other.end && other.start < self.end
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 10, hour, minute, 0).unwrap()
  }

  fn slot(s: (u32, u32), e: (u32, u32)) -> Slot {
    Slot::new(at(s.0, s.1), at(e.0, e.1)).unwrap()
  }

  #[test]
  fn rejects_inverted_slot() {
    assert!(matches!(
      Slot::new(at(10, 0), at(9, 0)),
      Err(Error::InvertedSlot)
    ));
  }

  #[test]
  fn rejects_zero_length_slot() {
    assert!(matches!(
      Slot::new(at(10, 0), at(10, 0)),
      Err(Error::InvertedSlot)
    ));
  }

  #[test]
  fn overlap_is_symmetric() {
    let a = slot((9, 0), (10, 0));
    let b = slot((9, 30), (10, 30));
    assert!(a.overlaps(&b));
    assert!(b.overlaps(&a));
  }

  #[test]
  fn back_to_back_does_not_overlap() {
    let a = slot((9, 0), (10, 0));
    let b = slot((10, 0), (11, 0));
    assert!(!a.overlaps(&b));
    assert!(!b.overlaps(&a));
  }

  #[test]
  fn containment_overlaps() {
    let outer = slot((9, 0), (12, 0));
    let inner = slot((10, 0), (10, 30));
    assert!(outer.overlaps(&inner));
    assert!(inner.overlaps(&outer));
  }

  #[test]
  fn identical_slots_overlap() {
    let a = slot((9, 0), (10, 0));
    assert!(a.overlaps(&a));
  }

  #[test]
  fn disjoint_slots_do_not_overlap() {
    let a = slot((9, 0), (10, 0));
    let b = slot((11, 0), (12, 0));
    assert!(!a.overlaps(&b));
    assert!(!b.overlaps(&a));
  }

  #[test]
  fn deserialization_rejects_inverted_slot() {
    let json = format!(
      r#"{{"start":"{}","end":"{}"}}"#,
      at(10, 0).to_rfc3339(),
      at(9, 0).to_rfc3339()
    );
    assert!(serde_json::from_str::<Slot>(&json).is_err());
  }

  #[test]
  fn deserialization_roundtrips_a_valid_slot() {
    let original = slot((9, 0), (10, 0));
    let json = serde_json::to_string(&original).unwrap();
    assert_eq!(serde_json::from_str::<Slot>(&json).unwrap(), original);
  }

  // The scenario grid: existing booking 09:00–10:00.
  #[test]
  fn scenario_grid_against_nine_to_ten() {
    let existing = slot((9, 0), (10, 0));
    assert!(slot((8, 30), (9, 15)).overlaps(&existing));
    assert!(!slot((10, 0), (10, 30)).overlaps(&existing));
    assert!(!slot((8, 0), (9, 0)).overlaps(&existing));
    assert!(slot((9, 30), (9, 45)).overlaps(&existing));
  }
}
