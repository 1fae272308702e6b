//! The booking lifecycle manager.
//!
//! Orchestrates create/update/delete/join, enforcing authorization and
//! conflict-freedom before anything is persisted. All checks live here, not
//! in the presentation layer, so the core is safe to call directly.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::{
  Error, Result,
  account::Principal,
  booking::{Booking, BookingPatch, NewBooking},
  interval::Slot,
  locks::RoomLocks,
  room::Room,
  store::ScheduleStore,
};

// ─── Conflict detector ───────────────────────────────────────────────────────

/// Whether `slot` overlaps any booking in `existing`, skipping the one whose
/// id equals `exclude` (so an edit is never checked against its own prior
/// slot). Half-open semantics: shared endpoints never conflict.
pub fn has_conflict(
  existing: &[Booking],
  slot: &Slot,
  exclude: Option<Uuid>,
) -> bool {
  existing
    .iter()
    .filter(|b| Some(b.booking_id) != exclude)
    .any(|b| b.slot.overlaps(slot))
}

// ─── Service ─────────────────────────────────────────────────────────────────

/// Stateless booking lifecycle manager over any [`ScheduleStore`].
///
/// Cloning is cheap; the store and the lock registry are shared. The lock
/// registry must be the same instance the [`crate::rooms::RoomService`]
/// uses, so booking writes and room-delete cascades serialize against each
/// other.
pub struct BookingService<S> {
  store: Arc<S>,
  locks: Arc<RoomLocks>,
}

// Not derived: a derive would demand `S: Clone`, but only the handles are
// cloned.
impl<S> Clone for BookingService<S> {
  fn clone(&self) -> Self {
    Self {
      store: Arc::clone(&self.store),
      locks: Arc::clone(&self.locks),
    }
  }
}

impl<S: ScheduleStore> BookingService<S> {
  pub fn new(store: Arc<S>, locks: Arc<RoomLocks>) -> Self {
    Self { store, locks }
  }

  async fn room(&self, room_id: Uuid) -> Result<Room> {
    self
      .store
      .get_room(room_id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::RoomNotFound(room_id))
  }

  async fn booking(&self, booking_id: Uuid) -> Result<Booking> {
    self
      .store
      .get_booking(booking_id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::BookingNotFound(booking_id))
  }

  /// Creator-or-admin rule shared by `update` and `delete`.
  fn authorize_mutation(
    requester: &Principal,
    booking: &Booking,
    room: &Room,
  ) -> Result<()> {
    if booking.created_by_email == requester.email
      || room.is_admin(&requester.email)
    {
      Ok(())
    } else {
      Err(Error::NotBookingOwner(booking.booking_id))
    }
  }

  /// Create a booking. The requester must be a member of the room; the slot
  /// must be conflict-free against every existing booking in it.
  ///
  /// The conflict check and the insert run under the room's write lock, so
  /// two concurrent creators cannot both pass the check.
  pub async fn create(
    &self,
    requester: &Principal,
    input: NewBooking,
  ) -> Result<Booking> {
    if input.title.trim().is_empty() {
      return Err(Error::BlankField("title"));
    }

    // The lock comes before the room read: a concurrent room delete either
    // finished already (the read fails) or is queued behind us. A room read
    // outside the lock could go stale mid-cascade and leave an orphan
    // booking.
    let _guard = self.locks.acquire(input.room_id).await;

    let room = self.room(input.room_id).await?;
    if !room.is_member(&requester.email) {
      return Err(Error::NotAMember(room.room_id));
    }

    let existing = self
      .store
      .bookings_by_room(room.room_id)
      .await
      .map_err(Error::store)?;
    if has_conflict(&existing, &input.slot, None) {
      return Err(Error::SlotTaken(room.room_id));
    }

    let booking = Booking {
      booking_id:       Uuid::new_v4(),
      room_id:          room.room_id,
      room_name:        room.name.clone(),
      title:            input.title,
      description:      input.description,
      slot:             input.slot,
      created_by:       requester.account_id,
      created_by_email: requester.email.clone(),
      participants:     Vec::new(),
      created_at:       Utc::now(),
    };
    self
      .store
      .insert_booking(&booking)
      .await
      .map_err(Error::store)?;
    Ok(booking)
  }

  /// Fetch one booking. Requires room membership.
  pub async fn get(
    &self,
    requester: &Principal,
    booking_id: Uuid,
  ) -> Result<Booking> {
    let booking = self.booking(booking_id).await?;
    let room = self.room(booking.room_id).await?;
    if !room.is_member(&requester.email) {
      return Err(Error::NotAMember(room.room_id));
    }
    Ok(booking)
  }

  /// Apply a partial update. The requester must be the booking's creator or
  /// a room admin. A rescheduled slot is re-validated and re-checked for
  /// conflicts, excluding the booking's own id.
  pub async fn update(
    &self,
    requester: &Principal,
    booking_id: Uuid,
    patch: BookingPatch,
  ) -> Result<Booking> {
    let mut booking = self.booking(booking_id).await?;

    if let Some(title) = &patch.title
      && title.trim().is_empty()
    {
      return Err(Error::BlankField("title"));
    }

    let slot = Slot::new(
      patch.start.unwrap_or_else(|| booking.slot.start()),
      patch.end.unwrap_or_else(|| booking.slot.end()),
    )?;

    let _guard = self.locks.acquire(booking.room_id).await;

    // Room read under the lock, as in `create`: fails if a concurrent
    // delete already cascaded this room away.
    let room = self.room(booking.room_id).await?;
    Self::authorize_mutation(requester, &booking, &room)?;

    // Recomputed even when the slot is unchanged; excluding the booking's
    // own id keeps an unmoved slot from conflicting with itself.
    let existing = self
      .store
      .bookings_by_room(room.room_id)
      .await
      .map_err(Error::store)?;
    if has_conflict(&existing, &slot, Some(booking_id)) {
      return Err(Error::SlotTaken(room.room_id));
    }

    if let Some(title) = patch.title {
      booking.title = title;
    }
    if let Some(description) = patch.description {
      booking.description = description;
    }
    booking.slot = slot;

    self
      .store
      .update_booking(&booking)
      .await
      .map_err(Error::store)?;
    Ok(booking)
  }

  /// Delete a booking. The requester must be the creator or a room admin.
  /// Deleting an id that no longer exists is a no-op.
  pub async fn delete(
    &self,
    requester: &Principal,
    booking_id: Uuid,
  ) -> Result<()> {
    let booking = match self
      .store
      .get_booking(booking_id)
      .await
      .map_err(Error::store)?
    {
      Some(b) => b,
      // Already gone; nothing left to protect.
      None => return Ok(()),
    };
    let room = self.room(booking.room_id).await?;
    Self::authorize_mutation(requester, &booking, &room)?;

    self
      .store
      .delete_booking(booking_id)
      .await
      .map_err(Error::store)
  }

  /// Join a booking as a participant. Requires room membership. Joining
  /// twice, or joining one's own booking, changes nothing.
  pub async fn join(
    &self,
    requester: &Principal,
    booking_id: Uuid,
  ) -> Result<Booking> {
    let mut booking = self.booking(booking_id).await?;
    let room = self.room(booking.room_id).await?;
    if !room.is_member(&requester.email) {
      return Err(Error::NotAMember(room.room_id));
    }

    if booking.add_participant(&requester.email) {
      self
        .store
        .update_booking(&booking)
        .await
        .map_err(Error::store)?;
    }
    Ok(booking)
  }

  /// Every booking in a room, ascending by start time. Requires membership.
  pub async fn list_by_room(
    &self,
    requester: &Principal,
    room_id: Uuid,
  ) -> Result<Vec<Booking>> {
    let room = self.room(room_id).await?;
    if !room.is_member(&requester.email) {
      return Err(Error::NotAMember(room_id));
    }
    self
      .store
      .bookings_by_room(room_id)
      .await
      .map_err(Error::store)
  }

  /// Bookings created by the requester, ascending by start time.
  pub async fn list_mine(&self, requester: &Principal) -> Result<Vec<Booking>> {
    self
      .store
      .bookings_by_creator(&requester.email)
      .await
      .map_err(Error::store)
  }
}

#[cfg(test)]
mod tests {
  use chrono::{TimeZone, Utc};

  use super::*;

  fn slot(start_hour: u32, end_hour: u32) -> Slot {
    Slot::new(
      Utc.with_ymd_and_hms(2025, 3, 10, start_hour, 0, 0).unwrap(),
      Utc.with_ymd_and_hms(2025, 3, 10, end_hour, 0, 0).unwrap(),
    )
    .unwrap()
  }

  fn booking(s: Slot) -> Booking {
    Booking {
      booking_id:       Uuid::new_v4(),
      room_id:          Uuid::new_v4(),
      room_name:        "War room".into(),
      title:            "Standup".into(),
      description:      None,
      slot:             s,
      created_by:       Uuid::new_v4(),
      created_by_email: "alice@example.com".into(),
      participants:     Vec::new(),
      created_at:       Utc::now(),
    }
  }

  #[test]
  fn empty_room_never_conflicts() {
    assert!(!has_conflict(&[], &slot(9, 10), None));
  }

  #[test]
  fn a_booking_conflicts_with_its_own_slot() {
    let existing = [booking(slot(9, 10))];
    assert!(has_conflict(&existing, &slot(9, 10), None));
  }

  #[test]
  fn excluding_own_id_skips_the_self_conflict() {
    let existing = [booking(slot(9, 10))];
    let own_id = existing[0].booking_id;
    assert!(!has_conflict(&existing, &slot(9, 10), Some(own_id)));
  }

  #[test]
  fn exclusion_does_not_skip_other_bookings() {
    let existing = [booking(slot(9, 10)), booking(slot(11, 12))];
    let first_id = existing[0].booking_id;
    assert!(has_conflict(&existing, &slot(11, 12), Some(first_id)));
  }

  #[test]
  fn back_to_back_bookings_do_not_conflict() {
    let existing = [booking(slot(9, 10))];
    assert!(!has_conflict(&existing, &slot(10, 11), None));
    assert!(!has_conflict(&existing, &slot(8, 9), None));
  }
}
