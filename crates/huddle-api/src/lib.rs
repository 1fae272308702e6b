//! JSON REST API for Huddle.
//!
//! Exposes an axum [`Router`] backed by any
//! [`huddle_core::store::ScheduleStore`]. Every business decision —
//! authorization, validation, conflict detection — happens in the core
//! lifecycle managers; this crate only translates HTTP to core calls and
//! core errors to statuses.

pub mod accounts;
pub mod auth;
pub mod bookings;
pub mod error;
pub mod rooms;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{delete, get, post},
};
use serde::Deserialize;

use huddle_core::{
  bookings::BookingService, locks::RoomLocks, rooms::RoomService,
  store::ScheduleStore,
};

pub use error::ApiError;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
}

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
///
/// The two services share one store and one lock registry, so booking
/// writes and room-delete cascades serialize against each other.
pub struct AppState<S> {
  pub store:    Arc<S>,
  pub rooms:    RoomService<S>,
  pub bookings: BookingService<S>,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      store:    Arc::clone(&self.store),
      rooms:    self.rooms.clone(),
      bookings: self.bookings.clone(),
    }
  }
}

impl<S: ScheduleStore> AppState<S> {
  pub fn new(store: Arc<S>) -> Self {
    let locks = Arc::new(RoomLocks::new());
    Self {
      rooms:    RoomService::new(Arc::clone(&store), Arc::clone(&locks)),
      bookings: BookingService::new(Arc::clone(&store), locks),
      store,
    }
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `store`.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: ScheduleStore + 'static,
{
  let state = AppState::new(store);

  Router::new()
    // Accounts
    .route("/accounts", post(accounts::register::<S>))
    .route("/accounts/me", get(accounts::me::<S>))
    // Rooms
    .route("/rooms", get(rooms::list::<S>).post(rooms::create::<S>))
    .route(
      "/rooms/{id}",
      get(rooms::get_one::<S>)
        .put(rooms::update::<S>)
        .delete(rooms::delete_one::<S>),
    )
    .route("/rooms/{id}/members", post(rooms::add_member::<S>))
    .route(
      "/rooms/{id}/members/{email}",
      delete(rooms::remove_member::<S>),
    )
    // Bookings
    .route(
      "/rooms/{id}/bookings",
      get(bookings::list_by_room::<S>).post(bookings::create::<S>),
    )
    .route("/bookings/mine", get(bookings::mine::<S>))
    .route(
      "/bookings/{id}",
      get(bookings::get_one::<S>)
        .patch(bookings::update::<S>)
        .delete(bookings::delete_one::<S>),
    )
    .route("/bookings/{id}/join", post(bookings::join::<S>))
    .with_state(state)
}
