//! Handlers for `/accounts` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/accounts` | Open registration; body: [`RegisterBody`] |
//! | `GET`  | `/accounts/me` | The authenticated account |

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;

use huddle_core::{
  account::{Account, NewAccount},
  store::ScheduleStore,
};

use crate::{
  AppState,
  auth::{Requester, hash_password},
  error::ApiError,
};

// ─── Register ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
  pub email:        String,
  pub display_name: String,
  pub password:     String,
}

/// `POST /accounts` — returns 201 + the new account, 409 on a taken email.
pub async fn register<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<RegisterBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ScheduleStore,
{
  if body.email.trim().is_empty() {
    return Err(ApiError::BadRequest("email must not be blank".into()));
  }
  if body.password.is_empty() {
    return Err(ApiError::BadRequest("password must not be blank".into()));
  }

  // No pre-check here; the store decides atomically whether the email is
  // free, so concurrent registrations of the same address race safely and
  // the loser still gets a 409.
  let email = body.email.clone();
  let account = state
    .store
    .add_account(NewAccount {
      email:         body.email,
      display_name:  body.display_name,
      password_hash: hash_password(&body.password)?,
    })
    .await
    .map_err(|e| ApiError::Internal(Box::new(e)))?
    .ok_or_else(|| {
      ApiError::Conflict(format!("email already registered: {email}"))
    })?;

  Ok((StatusCode::CREATED, Json(account)))
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use axum::{Json, extract::State};
  use huddle_store_sqlite::SqliteStore;

  use super::*;

  fn body(email: &str) -> RegisterBody {
    RegisterBody {
      email:        email.into(),
      display_name: "Alice".into(),
      password:     "hunter2".into(),
    }
  }

  #[tokio::test]
  async fn concurrent_registrations_of_one_email_yield_one_conflict() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let state = AppState::new(Arc::new(store));

    let (a, b) = tokio::join!(
      register(State(state.clone()), Json(body("alice@example.com"))),
      register(State(state.clone()), Json(body("alice@example.com"))),
    );

    let oks = [a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count();
    assert_eq!(oks, 1);
    let loser = if a.is_ok() { b } else { a };
    assert!(matches!(loser, Err(ApiError::Conflict(_))));
  }
}

// ─── Me ──────────────────────────────────────────────────────────────────────

/// `GET /accounts/me`
pub async fn me<S>(
  State(state): State<AppState<S>>,
  Requester(principal): Requester,
) -> Result<Json<Account>, ApiError>
where
  S: ScheduleStore,
{
  let account = state
    .store
    .get_account(principal.account_id)
    .await
    .map_err(|e| ApiError::Internal(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound("account not found".into()))?;
  Ok(Json(account))
}
