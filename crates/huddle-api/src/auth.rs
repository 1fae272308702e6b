//! HTTP Basic-auth identity layer.
//!
//! The username is the account email; the password is verified against the
//! argon2 PHC string stored at registration. Successful extraction yields
//! the [`Principal`] every lifecycle-manager operation takes — the core
//! itself never sees credentials.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use axum::{extract::FromRequestParts, http::HeaderMap, http::request::Parts};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use rand_core::OsRng;

use huddle_core::{account::Principal, store::ScheduleStore};

use crate::{AppState, error::ApiError};

/// The authenticated requester. Present in a handler's signature means the
/// request carried valid credentials.
pub struct Requester(pub Principal);

/// Hash a freshly-registered password into an argon2 PHC string.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|h| h.to_string())
    .map_err(|e| ApiError::Internal(format!("argon2 error: {e}").into()))
}

fn basic_credentials(headers: &HeaderMap) -> Result<(String, String), ApiError> {
  let header_val = headers
    .get(axum::http::header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or(ApiError::Unauthorized)?;

  let encoded = header_val
    .strip_prefix("Basic ")
    .ok_or(ApiError::Unauthorized)?;

  let decoded = B64.decode(encoded).map_err(|_| ApiError::Unauthorized)?;
  let creds =
    String::from_utf8(decoded).map_err(|_| ApiError::Unauthorized)?;

  let (email, password) =
    creds.split_once(':').ok_or(ApiError::Unauthorized)?;
  Ok((email.to_owned(), password.to_owned()))
}

/// Verify credentials against the store and produce the principal.
pub async fn authenticate<S>(
  headers: &HeaderMap,
  state: &AppState<S>,
) -> Result<Principal, ApiError>
where
  S: ScheduleStore,
{
  let (email, password) = basic_credentials(headers)?;

  let (account, hash) = state
    .store
    .account_credentials(&email)
    .await
    .map_err(|e| ApiError::Internal(Box::new(e)))?
    .ok_or(ApiError::Unauthorized)?;

  let parsed_hash =
    PasswordHash::new(&hash).map_err(|_| ApiError::Unauthorized)?;
  Argon2::default()
    .verify_password(password.as_bytes(), &parsed_hash)
    .map_err(|_| ApiError::Unauthorized)?;

  Ok(Principal::new(account.account_id, account.email))
}

impl<S> FromRequestParts<AppState<S>> for Requester
where
  S: ScheduleStore + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let principal = authenticate(&parts.headers, state).await?;
    Ok(Requester(principal))
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use axum::http::{Request, header};
  use huddle_core::account::NewAccount;
  use huddle_store_sqlite::SqliteStore;

  use super::*;
  use crate::AppState;

  async fn state_with_account(
    email: &str,
    password: &str,
  ) -> AppState<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    store
      .add_account(NewAccount {
        email:         email.into(),
        display_name:  "Test".into(),
        password_hash: hash_password(password).unwrap(),
      })
      .await
      .unwrap()
      .unwrap();
    AppState::new(Arc::new(store))
  }

  async fn extract(
    req: Request<axum::body::Body>,
    state: &AppState<SqliteStore>,
  ) -> Result<Requester, ApiError> {
    let (mut parts, _) = req.into_parts();
    Requester::from_request_parts(&mut parts, state).await
  }

  fn basic(user: &str, pass: &str) -> String {
    let encoded = B64.encode(format!("{user}:{pass}"));
    format!("Basic {encoded}")
  }

  #[tokio::test]
  async fn correct_credentials() {
    let state = state_with_account("alice@example.com", "secret").await;
    let req = Request::builder()
      .header(header::AUTHORIZATION, basic("alice@example.com", "secret"))
      .body(axum::body::Body::empty())
      .unwrap();
    let requester = extract(req, &state).await.unwrap();
    assert_eq!(requester.0.email, "alice@example.com");
  }

  #[tokio::test]
  async fn wrong_password() {
    let state = state_with_account("alice@example.com", "secret").await;
    let req = Request::builder()
      .header(header::AUTHORIZATION, basic("alice@example.com", "wrong"))
      .body(axum::body::Body::empty())
      .unwrap();
    assert!(matches!(
      extract(req, &state).await,
      Err(ApiError::Unauthorized)
    ));
  }

  #[tokio::test]
  async fn unknown_account() {
    let state = state_with_account("alice@example.com", "secret").await;
    let req = Request::builder()
      .header(header::AUTHORIZATION, basic("bob@example.com", "secret"))
      .body(axum::body::Body::empty())
      .unwrap();
    assert!(matches!(
      extract(req, &state).await,
      Err(ApiError::Unauthorized)
    ));
  }

  #[tokio::test]
  async fn missing_header() {
    let state = state_with_account("alice@example.com", "secret").await;
    let req = Request::builder().body(axum::body::Body::empty()).unwrap();
    assert!(matches!(
      extract(req, &state).await,
      Err(ApiError::Unauthorized)
    ));
  }

  #[tokio::test]
  async fn invalid_base64() {
    let state = state_with_account("alice@example.com", "secret").await;
    let req = Request::builder()
      .header(header::AUTHORIZATION, "Basic !!!not-base64!!!")
      .body(axum::body::Body::empty())
      .unwrap();
    assert!(matches!(
      extract(req, &state).await,
      Err(ApiError::Unauthorized)
    ));
  }
}
