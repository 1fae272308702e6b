//! Core types, traits, and lifecycle logic for the Huddle room-booking
//! service.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.
//!
//! The two lifecycle managers ([`bookings::BookingService`] and
//! [`rooms::RoomService`]) enforce every business invariant — authorization,
//! interval validity, conflict-freedom — before touching the storage
//! backend, so the core is safe to call directly from any surface.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod account;
pub mod booking;
pub mod bookings;
pub mod error;
pub mod interval;
pub mod locks;
pub mod room;
pub mod rooms;
pub mod store;

pub use error::{Error, ErrorKind, Result};
