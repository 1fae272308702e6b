//! Error types for `huddle-core`.

use thiserror::Error;
use uuid::Uuid;

/// Coarse classification of a core error, used by callers (e.g. the HTTP
/// surface) to pick a response without matching every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  /// Malformed input: inverted/zero-length slot, blank required field.
  Validation,
  /// The proposed slot overlaps an existing booking in the same room.
  Conflict,
  /// The requester lacks the role the operation requires.
  Forbidden,
  /// A referenced room or booking does not exist.
  NotFound,
  /// A storage/transport failure the core does not interpret.
  Infrastructure,
}

#[derive(Debug, Error)]
pub enum Error {
  // ── Validation ────────────────────────────────────────────────────────
  #[error("end time must be strictly after start time")]
  InvertedSlot,

  #[error("{0} must not be blank")]
  BlankField(&'static str),

  // ── Conflict ──────────────────────────────────────────────────────────
  #[error("the slot overlaps an existing booking in room {0}")]
  SlotTaken(Uuid),

  // ── Forbidden ─────────────────────────────────────────────────────────
  #[error("requester is not a member of room {0}")]
  NotAMember(Uuid),

  #[error("admin role required for room {0}")]
  AdminRequired(Uuid),

  #[error("only the creator or a room admin may modify booking {0}")]
  NotBookingOwner(Uuid),

  // ── Not found ─────────────────────────────────────────────────────────
  #[error("room not found: {0}")]
  RoomNotFound(Uuid),

  #[error("booking not found: {0}")]
  BookingNotFound(Uuid),

  // ── Infrastructure ────────────────────────────────────────────────────
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn kind(&self) -> ErrorKind {
    match self {
      Self::InvertedSlot | Self::BlankField(_) => ErrorKind::Validation,
      Self::SlotTaken(_) => ErrorKind::Conflict,
      Self::NotAMember(_) | Self::AdminRequired(_) | Self::NotBookingOwner(_) => {
        ErrorKind::Forbidden
      }
      Self::RoomNotFound(_) | Self::BookingNotFound(_) => ErrorKind::NotFound,
      Self::Store(_) => ErrorKind::Infrastructure,
    }
  }

  /// Wrap a backend error without interpreting it.
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
