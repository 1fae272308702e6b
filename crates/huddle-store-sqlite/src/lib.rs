//! SQLite backend for the Huddle schedule store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated
//! thread without blocking the async runtime. Rooms and bookings are stored
//! document-style: member and participant lists live in JSON columns, as
//! they do in the upstream document store this mirrors.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
