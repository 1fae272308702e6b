//! Accounts and the authenticated requester identity.
//!
//! Accounts are owned by the identity/storage side of the system; the core
//! references them by id (booking ownership) and by email (membership
//! matching). Credentials never appear on the domain type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered account. Immutable after registration except `display_name`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
  pub account_id:   Uuid,
  pub email:        String,
  pub display_name: String,
  pub created_at:   DateTime<Utc>,
}

/// Input to [`crate::store::ScheduleStore::add_account`].
///
/// `password_hash` is an argon2 PHC string produced by the surface that
/// registered the account; the store persists it opaquely.
#[derive(Debug, Clone)]
pub struct NewAccount {
  pub email:         String,
  pub display_name:  String,
  pub password_hash: String,
}

/// The authenticated requester, as established by the identity collaborator.
/// Every lifecycle-manager operation takes one of these; the core never
/// authenticates, it only authorizes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
  pub account_id: Uuid,
  pub email:      String,
}

impl Principal {
  pub fn new(account_id: Uuid, email: impl Into<String>) -> Self {
    Self { account_id, email: email.into() }
  }
}

impl From<&Account> for Principal {
  fn from(a: &Account) -> Self {
    Self {
      account_id: a.account_id,
      email:      a.email.clone(),
    }
  }
}
