//! The room lifecycle manager.
//!
//! Room-level state (name, description, member list) is admin-only to
//! mutate. Deleting a room cascades to its bookings here, by explicit
//! per-booking deletes — the store has no native cascade.

use std::sync::Arc;

use uuid::Uuid;

use crate::{
  Error, Result,
  account::Principal,
  locks::RoomLocks,
  room::{Role, Room},
  store::ScheduleStore,
};

/// Stateless room lifecycle manager over any [`ScheduleStore`].
pub struct RoomService<S> {
  store: Arc<S>,
  locks: Arc<RoomLocks>,
}

// Not derived: a derive would demand `S: Clone`, but only the handles are
// cloned.
impl<S> Clone for RoomService<S> {
  fn clone(&self) -> Self {
    Self {
      store: Arc::clone(&self.store),
      locks: Arc::clone(&self.locks),
    }
  }
}

impl<S: ScheduleStore> RoomService<S> {
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

  /// Load a room and require the requester to hold the admin role in it.
  async fn admin_room(
    &self,
    requester: &Principal,
    room_id: Uuid,
  ) -> Result<Room> {
    let room = self.room(room_id).await?;
    match room.role_of(&requester.email) {
      Some(Role::Admin) => Ok(room),
      Some(Role::User) => Err(Error::AdminRequired(room_id)),
      None => Err(Error::NotAMember(room_id)),
    }
  }

  /// Create a room. The creator becomes its sole member, with role admin.
  pub async fn create(
    &self,
    requester: &Principal,
    name: &str,
    description: &str,
  ) -> Result<Room> {
    if name.trim().is_empty() {
      return Err(Error::BlankField("name"));
    }
    let room = Room::new(
      name,
      description,
      requester.account_id,
      requester.email.clone(),
    );
    self.store.insert_room(&room).await.map_err(Error::store)?;
    Ok(room)
  }

  /// Rooms visible to the requester — exactly those they are a member of.
  /// There is no public or discover mode.
  pub async fn list_for(&self, requester: &Principal) -> Result<Vec<Room>> {
    let rooms = self.store.list_rooms().await.map_err(Error::store)?;
    Ok(
      rooms
        .into_iter()
        .filter(|r| r.is_member(&requester.email))
        .collect(),
    )
  }

  /// Fetch one room. Non-members are refused, matching the visibility rule.
  pub async fn get(
    &self,
    requester: &Principal,
    room_id: Uuid,
  ) -> Result<Room> {
    let room = self.room(room_id).await?;
    if !room.is_member(&requester.email) {
      return Err(Error::NotAMember(room_id));
    }
    Ok(room)
  }

  /// Replace a room's name and description. Admin only.
  pub async fn update(
    &self,
    requester: &Principal,
    room_id: Uuid,
    name: &str,
    description: &str,
  ) -> Result<Room> {
    if name.trim().is_empty() {
      return Err(Error::BlankField("name"));
    }
    let mut room = self.admin_room(requester, room_id).await?;
    room.name = name.to_owned();
    room.description = description.to_owned();
    self.store.update_room(&room).await.map_err(Error::store)?;
    Ok(room)
  }

  /// Delete a room and every booking in it. Admin only.
  ///
  /// Runs under the room's write lock so no booking can be created into the
  /// room mid-cascade and survive it.
  pub async fn delete(
    &self,
    requester: &Principal,
    room_id: Uuid,
  ) -> Result<()> {
    let room = self.admin_room(requester, room_id).await?;

    let guard = self.locks.acquire(room.room_id).await;

    let bookings = self
      .store
      .bookings_by_room(room.room_id)
      .await
      .map_err(Error::store)?;
    for booking in &bookings {
      self
        .store
        .delete_booking(booking.booking_id)
        .await
        .map_err(Error::store)?;
    }
    self
      .store
      .delete_room(room.room_id)
      .await
      .map_err(Error::store)?;

    // The room is gone; retire its lock entry.
    drop(guard);
    self.locks.discard(room.room_id);
    Ok(())
  }

  /// Add a member, or change an existing member's role. Admin only.
  /// Upsert semantics: an email appears at most once.
  pub async fn add_member(
    &self,
    requester: &Principal,
    room_id: Uuid,
    email: &str,
    role: Role,
  ) -> Result<Room> {
    if email.trim().is_empty() {
      return Err(Error::BlankField("email"));
    }
    let mut room = self.admin_room(requester, room_id).await?;
    room.upsert_member(email, role);
    self.store.update_room(&room).await.map_err(Error::store)?;
    Ok(room)
  }

  /// Remove a member by email. Admin only. Removing the last admin is
  /// permitted and leaves the room without one (documented behavior).
  pub async fn remove_member(
    &self,
    requester: &Principal,
    room_id: Uuid,
    email: &str,
  ) -> Result<Room> {
    let mut room = self.admin_room(requester, room_id).await?;
    room.remove_member(email);
    self.store.update_room(&room).await.map_err(Error::store)?;
    Ok(room)
  }
}
