//! Encoding and decoding helpers between Rust domain types and the
//! plain-text representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings (which sort
//! lexicographically in UTC, so `ORDER BY start_time` is chronological).
//! Member and participant lists are stored as compact JSON. UUIDs are
//! stored as hyphenated lowercase strings.

use chrono::{DateTime, Utc};
use huddle_core::{
  account::Account,
  booking::Booking,
  interval::Slot,
  room::{Membership, Room},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Embedded JSON lists ─────────────────────────────────────────────────────

pub fn encode_members(members: &[Membership]) -> Result<String> {
  Ok(serde_json::to_string(members)?)
}

pub fn decode_members(s: &str) -> Result<Vec<Membership>> {
  Ok(serde_json::from_str(s)?)
}

pub fn encode_participants(participants: &[String]) -> Result<String> {
  Ok(serde_json::to_string(participants)?)
}

pub fn decode_participants(s: &str) -> Result<Vec<String>> {
  Ok(serde_json::from_str(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from an `accounts` row.
pub struct RawAccount {
  pub account_id:   String,
  pub email:        String,
  pub display_name: String,
  pub created_at:   String,
}

impl RawAccount {
  pub fn into_account(self) -> Result<Account> {
    Ok(Account {
      account_id:   decode_uuid(&self.account_id)?,
      email:        self.email,
      display_name: self.display_name,
      created_at:   decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `rooms` row.
pub struct RawRoom {
  pub room_id:     String,
  pub name:        String,
  pub description: String,
  pub owner_id:    String,
  pub created_at:  String,
  pub members:     String,
}

impl RawRoom {
  pub fn into_room(self) -> Result<Room> {
    Ok(Room {
      room_id:     decode_uuid(&self.room_id)?,
      name:        self.name,
      description: self.description,
      owner_id:    decode_uuid(&self.owner_id)?,
      created_at:  decode_dt(&self.created_at)?,
      members:     decode_members(&self.members)?,
    })
  }
}

/// Raw strings read directly from a `bookings` row.
pub struct RawBooking {
  pub booking_id:       String,
  pub room_id:          String,
  pub room_name:        String,
  pub title:            String,
  pub description:      Option<String>,
  pub start_time:       String,
  pub end_time:         String,
  pub created_by:       String,
  pub created_by_email: String,
  pub participants:     String,
  pub created_at:       String,
}

impl RawBooking {
  pub fn into_booking(self) -> Result<Booking> {
    let slot =
      Slot::new(decode_dt(&self.start_time)?, decode_dt(&self.end_time)?)
        .map_err(|e| Error::DateParse(e.to_string()))?;
    Ok(Booking {
      booking_id:       decode_uuid(&self.booking_id)?,
      room_id:          decode_uuid(&self.room_id)?,
      room_name:        self.room_name,
      title:            self.title,
      description:      self.description,
      slot,
      created_by:       decode_uuid(&self.created_by)?,
      created_by_email: self.created_by_email,
      participants:     decode_participants(&self.participants)?,
      created_at:       decode_dt(&self.created_at)?,
    })
  }
}
