//! Bookings — reserved time slots on a room.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::interval::Slot;

/// A reserved slot on a room.
///
/// `room_name` is a denormalized copy of the room's name at creation time.
/// `participants` is a set with insertion order; it never contains
/// `created_by_email` — the creator is an implicit attendee.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
  pub booking_id:       Uuid,
  pub room_id:          Uuid,
  pub room_name:        String,
  pub title:            String,
  pub description:      Option<String>,
  pub slot:             Slot,
  pub created_by:       Uuid,
  pub created_by_email: String,
  pub participants:     Vec<String>,
  pub created_at:       DateTime<Utc>,
}

impl Booking {
  /// Add an email to the participant set. Duplicates and the creator's own
  /// email are ignored. Returns whether the set changed.
  pub fn add_participant(&mut self, email: &str) -> bool {
    if email == self.created_by_email
      || self.participants.iter().any(|p| p == email)
    {
      return false;
    }
    self.participants.push(email.to_owned());
    true
  }
}

/// Input to [`crate::bookings::BookingService::create`].
#[derive(Debug, Clone)]
pub struct NewBooking {
  pub room_id:     Uuid,
  pub title:       String,
  pub description: Option<String>,
  pub slot:        Slot,
}

/// Partial update for a booking, with explicit present/absent markers.
///
/// `None` means "leave unchanged". For `description`, `Some(None)` clears
/// the field — "no change requested" and "clear this field" are distinct.
#[derive(Debug, Clone, Default)]
pub struct BookingPatch {
  pub title:       Option<String>,
  pub description: Option<Option<String>>,
  pub start:       Option<DateTime<Utc>>,
  pub end:         Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  fn booking() -> Booking {
    let start = Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2025, 3, 10, 10, 0, 0).unwrap();
    Booking {
      booking_id:       Uuid::new_v4(),
      room_id:          Uuid::new_v4(),
      room_name:        "War room".into(),
      title:            "Standup".into(),
      description:      None,
      slot:             Slot::new(start, end).unwrap(),
      created_by:       Uuid::new_v4(),
      created_by_email: "alice@example.com".into(),
      participants:     Vec::new(),
      created_at:       Utc::now(),
    }
  }

  #[test]
  fn add_participant_is_idempotent() {
    let mut b = booking();
    assert!(b.add_participant("bob@example.com"));
    assert!(!b.add_participant("bob@example.com"));
    assert_eq!(b.participants, ["bob@example.com"]);
  }

  #[test]
  fn creator_is_never_a_participant() {
    let mut b = booking();
    assert!(!b.add_participant("alice@example.com"));
    assert!(b.participants.is_empty());
  }
}
