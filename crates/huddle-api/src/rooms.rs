//! Handlers for `/rooms` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/rooms` | Rooms the requester is a member of |
//! | `POST`   | `/rooms` | Body: [`RoomBody`]; creator becomes admin |
//! | `GET`    | `/rooms/:id` | 403 for non-members |
//! | `PUT`    | `/rooms/:id` | Admin only; replaces name and description |
//! | `DELETE` | `/rooms/:id` | Admin only; cascades to the room's bookings |
//! | `POST`   | `/rooms/:id/members` | Admin only; upsert by email |
//! | `DELETE` | `/rooms/:id/members/:email` | Admin only |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use uuid::Uuid;

use huddle_core::{
  room::{Role, Room},
  store::ScheduleStore,
};

use crate::{AppState, auth::Requester, error::ApiError};

// ─── List / create ───────────────────────────────────────────────────────────

/// `GET /rooms`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Requester(principal): Requester,
) -> Result<Json<Vec<Room>>, ApiError>
where
  S: ScheduleStore,
{
  let rooms = state.rooms.list_for(&principal).await?;
  Ok(Json(rooms))
}

#[derive(Debug, Deserialize)]
pub struct RoomBody {
  pub name:        String,
  #[serde(default)]
  pub description: String,
}

/// `POST /rooms` — returns 201 + the new room.
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Requester(principal): Requester,
  Json(body): Json<RoomBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ScheduleStore,
{
  let room = state
    .rooms
    .create(&principal, &body.name, &body.description)
    .await?;
  Ok((StatusCode::CREATED, Json(room)))
}

// ─── Get / update / delete ───────────────────────────────────────────────────

/// `GET /rooms/:id`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Requester(principal): Requester,
  Path(id): Path<Uuid>,
) -> Result<Json<Room>, ApiError>
where
  S: ScheduleStore,
{
  let room = state.rooms.get(&principal, id).await?;
  Ok(Json(room))
}

/// `PUT /rooms/:id`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  Requester(principal): Requester,
  Path(id): Path<Uuid>,
  Json(body): Json<RoomBody>,
) -> Result<Json<Room>, ApiError>
where
  S: ScheduleStore,
{
  let room = state
    .rooms
    .update(&principal, id, &body.name, &body.description)
    .await?;
  Ok(Json(room))
}

/// `DELETE /rooms/:id`
pub async fn delete_one<S>(
  State(state): State<AppState<S>>,
  Requester(principal): Requester,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: ScheduleStore,
{
  state.rooms.delete(&principal, id).await?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Members ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MemberBody {
  pub email: String,
  pub role:  Role,
}

/// `POST /rooms/:id/members` — add or re-role a member.
pub async fn add_member<S>(
  State(state): State<AppState<S>>,
  Requester(principal): Requester,
  Path(id): Path<Uuid>,
  Json(body): Json<MemberBody>,
) -> Result<Json<Room>, ApiError>
where
  S: ScheduleStore,
{
  let room = state
    .rooms
    .add_member(&principal, id, &body.email, body.role)
    .await?;
  Ok(Json(room))
}

/// `DELETE /rooms/:id/members/:email`
pub async fn remove_member<S>(
  State(state): State<AppState<S>>,
  Requester(principal): Requester,
  Path((id, email)): Path<(Uuid, String)>,
) -> Result<Json<Room>, ApiError>
where
  S: ScheduleStore,
{
  let room = state.rooms.remove_member(&principal, id, &email).await?;
  Ok(Json(room))
}
