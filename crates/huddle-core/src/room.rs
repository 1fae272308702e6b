//! Rooms, memberships, and the role lookup that answers every authorization
//! question.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Room-scoped authorization level. Admins manage the room and any booking
/// in it; users manage only bookings they created, and may join others'.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  Admin,
  User,
}

/// An (email, role) pair granting a principal access to a room. Exists only
/// inside a room's member list; never addressed independently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Membership {
  pub email:    String,
  pub role:     Role,
  pub added_at: DateTime<Utc>,
}

/// A shared bookable resource with a role-based member list.
///
/// `members` is keyed by email (no duplicates) but kept as an ordered
/// sequence — insertion order is preserved for display only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
  pub room_id:     Uuid,
  pub name:        String,
  pub description: String,
  pub owner_id:    Uuid,
  pub created_at:  DateTime<Utc>,
  pub members:     Vec<Membership>,
}

impl Room {
  /// Create a room whose sole member is its creator, with role admin.
  pub fn new(
    name: impl Into<String>,
    description: impl Into<String>,
    owner_id: Uuid,
    owner_email: impl Into<String>,
  ) -> Self {
    let now = Utc::now();
    Self {
      room_id:     Uuid::new_v4(),
      name:        name.into(),
      description: description.into(),
      owner_id,
      created_at:  now,
      members:     vec![Membership {
        email:    owner_email.into(),
        role:     Role::Admin,
        added_at: now,
      }],
    }
  }

  /// The membership model: the role an email holds in this room, if any.
  /// `None` means "not authorized for any room-scoped action".
  pub fn role_of(&self, email: &str) -> Option<Role> {
    self
      .members
      .iter()
      .find(|m| m.email == email)
      .map(|m| m.role)
  }

  pub fn is_admin(&self, email: &str) -> bool {
    self.role_of(email) == Some(Role::Admin)
  }

  pub fn is_member(&self, email: &str) -> bool {
    self.role_of(email).is_some()
  }

  /// Add a member, or update the role of an existing one in place.
  ///
  /// Re-adding an email never duplicates it: the role is last-write-wins and
  /// the original position and `added_at` are kept.
  pub fn upsert_member(&mut self, email: impl Into<String>, role: Role) {
    let email = email.into();
    match self.members.iter_mut().find(|m| m.email == email) {
      Some(existing) => existing.role = role,
      None => self.members.push(Membership {
        email,
        role,
        added_at: Utc::now(),
      }),
    }
  }

  /// Remove a member by email. Removing an absent email is a no-op.
  ///
  /// No last-admin guard: removing the final admin leaves the room without
  /// one (documented current behavior).
  pub fn remove_member(&mut self, email: &str) {
    self.members.retain(|m| m.email != email);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn room() -> Room {
    Room::new("War room", "strategy", Uuid::new_v4(), "alice@example.com")
  }

  #[test]
  fn creator_is_sole_admin() {
    let r = room();
    assert_eq!(r.members.len(), 1);
    assert_eq!(r.role_of("alice@example.com"), Some(Role::Admin));
  }

  #[test]
  fn absent_email_has_no_role() {
    let r = room();
    assert_eq!(r.role_of("mallory@example.com"), None);
    assert!(!r.is_member("mallory@example.com"));
  }

  #[test]
  fn upsert_adds_new_member() {
    let mut r = room();
    r.upsert_member("bob@example.com", Role::User);
    assert_eq!(r.members.len(), 2);
    assert_eq!(r.role_of("bob@example.com"), Some(Role::User));
  }

  #[test]
  fn upsert_updates_role_without_duplicating() {
    let mut r = room();
    r.upsert_member("bob@example.com", Role::User);
    let added_at = r.members[1].added_at;

    r.upsert_member("bob@example.com", Role::Admin);
    assert_eq!(r.members.len(), 2);
    assert_eq!(r.role_of("bob@example.com"), Some(Role::Admin));
    // Position and added_at survive the role change.
    assert_eq!(r.members[1].email, "bob@example.com");
    assert_eq!(r.members[1].added_at, added_at);
  }

  #[test]
  fn remove_member_filters_by_email() {
    let mut r = room();
    r.upsert_member("bob@example.com", Role::User);
    r.remove_member("bob@example.com");
    assert_eq!(r.members.len(), 1);
    assert!(!r.is_member("bob@example.com"));
  }

  #[test]
  fn removing_last_admin_orphans_the_room() {
    let mut r = room();
    r.upsert_member("bob@example.com", Role::User);
    r.remove_member("alice@example.com");
    assert!(r.members.iter().all(|m| m.role != Role::Admin));
  }
}
