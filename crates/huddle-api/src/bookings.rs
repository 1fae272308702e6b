//! Handlers for booking endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/rooms/:id/bookings` | Ascending by start time |
//! | `POST`   | `/rooms/:id/bookings` | Body: [`CreateBody`]; 409 on overlap |
//! | `GET`    | `/bookings/mine` | Bookings the requester created |
//! | `GET`    | `/bookings/:id` | Room membership required |
//! | `PATCH`  | `/bookings/:id` | Body: [`PatchBody`]; absent = unchanged |
//! | `DELETE` | `/bookings/:id` | Creator or room admin |
//! | `POST`   | `/bookings/:id/join` | Idempotent participant add |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use uuid::Uuid;

use huddle_core::{
  booking::{Booking, BookingPatch, NewBooking},
  interval::Slot,
  store::ScheduleStore,
};

use crate::{AppState, auth::Requester, error::ApiError};

// ─── List / create ───────────────────────────────────────────────────────────

/// `GET /rooms/:id/bookings`
pub async fn list_by_room<S>(
  State(state): State<AppState<S>>,
  Requester(principal): Requester,
  Path(room_id): Path<Uuid>,
) -> Result<Json<Vec<Booking>>, ApiError>
where
  S: ScheduleStore,
{
  let bookings = state.bookings.list_by_room(&principal, room_id).await?;
  Ok(Json(bookings))
}

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub title:       String,
  pub description: Option<String>,
  pub start:       DateTime<Utc>,
  pub end:         DateTime<Utc>,
}

/// `POST /rooms/:id/bookings` — returns 201 + the stored booking.
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Requester(principal): Requester,
  Path(room_id): Path<Uuid>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ScheduleStore,
{
  let slot = Slot::new(body.start, body.end)?;
  let booking = state
    .bookings
    .create(&principal, NewBooking {
      room_id,
      title: body.title,
      description: body.description,
      slot,
    })
    .await?;
  Ok((StatusCode::CREATED, Json(booking)))
}

// ─── Mine / get one ──────────────────────────────────────────────────────────

/// `GET /bookings/mine`
pub async fn mine<S>(
  State(state): State<AppState<S>>,
  Requester(principal): Requester,
) -> Result<Json<Vec<Booking>>, ApiError>
where
  S: ScheduleStore,
{
  let bookings = state.bookings.list_mine(&principal).await?;
  Ok(Json(bookings))
}

/// `GET /bookings/:id`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Requester(principal): Requester,
  Path(id): Path<Uuid>,
) -> Result<Json<Booking>, ApiError>
where
  S: ScheduleStore,
{
  let booking = state.bookings.get(&principal, id).await?;
  Ok(Json(booking))
}

// ─── Update ──────────────────────────────────────────────────────────────────

/// Deserialize a field that distinguishes "absent" (`None`) from
/// "present but null" (`Some(None)`). Pair with `#[serde(default)]`.
fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
  T: Deserialize<'de>,
  D: Deserializer<'de>,
{
  Option::<T>::deserialize(de).map(Some)
}

/// JSON body accepted by `PATCH /bookings/:id`. Absent fields are left
/// unchanged; `"description": null` clears the description.
#[derive(Debug, Deserialize)]
pub struct PatchBody {
  pub title:       Option<String>,
  #[serde(default, deserialize_with = "double_option")]
  pub description: Option<Option<String>>,
  pub start:       Option<DateTime<Utc>>,
  pub end:         Option<DateTime<Utc>>,
}

impl From<PatchBody> for BookingPatch {
  fn from(b: PatchBody) -> Self {
    BookingPatch {
      title:       b.title,
      description: b.description,
      start:       b.start,
      end:         b.end,
    }
  }
}

/// `PATCH /bookings/:id`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  Requester(principal): Requester,
  Path(id): Path<Uuid>,
  Json(body): Json<PatchBody>,
) -> Result<Json<Booking>, ApiError>
where
  S: ScheduleStore,
{
  let booking = state
    .bookings
    .update(&principal, id, BookingPatch::from(body))
    .await?;
  Ok(Json(booking))
}

// ─── Delete / join ───────────────────────────────────────────────────────────

/// `DELETE /bookings/:id` — 204 even if the booking is already gone.
pub async fn delete_one<S>(
  State(state): State<AppState<S>>,
  Requester(principal): Requester,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: ScheduleStore,
{
  state.bookings.delete(&principal, id).await?;
  Ok(StatusCode::NO_CONTENT)
}

/// `POST /bookings/:id/join`
pub async fn join<S>(
  State(state): State<AppState<S>>,
  Requester(principal): Requester,
  Path(id): Path<Uuid>,
) -> Result<Json<Booking>, ApiError>
where
  S: ScheduleStore,
{
  let booking = state.bookings.join(&principal, id).await?;
  Ok(Json(booking))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn patch_body_distinguishes_absent_from_null() {
    let absent: PatchBody = serde_json::from_str(r#"{}"#).unwrap();
    assert_eq!(absent.description, None);

    let null: PatchBody =
      serde_json::from_str(r#"{"description":null}"#).unwrap();
    assert_eq!(null.description, Some(None));

    let set: PatchBody =
      serde_json::from_str(r#"{"description":"weekly"}"#).unwrap();
    assert_eq!(set.description, Some(Some("weekly".into())));
  }
}
