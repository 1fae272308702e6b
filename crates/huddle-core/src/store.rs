//! The `ScheduleStore` trait — the document-store contract the core writes
//! through.
//!
//! The trait is implemented by storage backends (e.g.
//! `huddle-store-sqlite`). It offers per-entity CRUD and simple equality
//! queries only: no joins, no transactions, no server-side conflict
//! detection. Every business invariant is enforced by the lifecycle
//! managers before a write is issued.
//!
//! All methods return `Send` futures so the trait can be used in
//! multi-threaded async runtimes (e.g. tokio with `axum`).

use std::future::Future;

use uuid::Uuid;

use crate::{
  account::{Account, NewAccount},
  booking::Booking,
  room::Room,
};

/// Abstraction over a Huddle storage backend.
///
/// Room and booking writes are whole-document: the caller reads, mutates,
/// and writes back the full record (read-modify-write, as the backing
/// document store works). The managers serialize racy sections themselves.
pub trait ScheduleStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Accounts ──────────────────────────────────────────────────────────

  /// Persist a new account. Returns `None` — without touching the store —
  /// when the email is already registered, so every backend reports the
  /// duplicate through the trait rather than through its own error type.
  fn add_account(
    &self,
    input: NewAccount,
  ) -> impl Future<Output = Result<Option<Account>, Self::Error>> + Send + '_;

  fn get_account(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Account>, Self::Error>> + Send + '_;

  fn find_account<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<Account>, Self::Error>> + Send + 'a;

  /// The account together with its stored argon2 PHC string, for the
  /// identity layer. The hash never rides on [`Account`] itself.
  fn account_credentials<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<(Account, String)>, Self::Error>> + Send + 'a;

  // ── Rooms ─────────────────────────────────────────────────────────────

  fn insert_room<'a>(
    &'a self,
    room: &'a Room,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  fn get_room(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Room>, Self::Error>> + Send + '_;

  /// All rooms, unfiltered. Membership visibility is applied by the caller
  /// (the store has no server-side joins to do it).
  fn list_rooms(
    &self,
  ) -> impl Future<Output = Result<Vec<Room>, Self::Error>> + Send + '_;

  /// Whole-document replace of an existing room.
  fn update_room<'a>(
    &'a self,
    room: &'a Room,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Delete a room record. Does NOT touch its bookings — the cascade is the
  /// caller's responsibility.
  fn delete_room(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Bookings ──────────────────────────────────────────────────────────

  fn insert_booking<'a>(
    &'a self,
    booking: &'a Booking,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  fn get_booking(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Booking>, Self::Error>> + Send + '_;

  /// Whole-document replace of an existing booking.
  fn update_booking<'a>(
    &'a self,
    booking: &'a Booking,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Delete a booking record. Deleting an absent id is a no-op.
  fn delete_booking(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Every booking in a room, ascending by start time.
  fn bookings_by_room(
    &self,
    room_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Booking>, Self::Error>> + Send + '_;

  /// Every booking created by an email, ascending by start time.
  fn bookings_by_creator<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Vec<Booking>, Self::Error>> + Send + 'a;
}
