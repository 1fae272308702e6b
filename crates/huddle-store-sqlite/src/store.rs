//! [`SqliteStore`] — the SQLite implementation of [`ScheduleStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use huddle_core::{
  account::{Account, NewAccount},
  booking::Booking,
  room::Room,
  store::ScheduleStore,
};

use crate::{
  Error, Result,
  encode::{
    RawAccount, RawBooking, RawRoom, encode_dt, encode_members,
    encode_participants, encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Huddle schedule store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn account_row(
    &self,
    sql: &'static str,
    key: String,
  ) -> Result<Option<RawAccount>> {
    let raw = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(sql, rusqlite::params![key], |row| {
              Ok(RawAccount {
                account_id:   row.get(0)?,
                email:        row.get(1)?,
                display_name: row.get(2)?,
                created_at:   row.get(3)?,
              })
            })
            .optional()?,
        )
      })
      .await?;
    Ok(raw)
  }

  async fn booking_rows(
    &self,
    sql: &'static str,
    key: String,
  ) -> Result<Vec<Booking>> {
    let raws: Vec<RawBooking> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt
          .query_map(rusqlite::params![key], booking_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    raws.into_iter().map(RawBooking::into_booking).collect()
  }
}

fn booking_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawBooking> {
  Ok(RawBooking {
    booking_id:       row.get(0)?,
    room_id:          row.get(1)?,
    room_name:        row.get(2)?,
    title:            row.get(3)?,
    description:      row.get(4)?,
    start_time:       row.get(5)?,
    end_time:         row.get(6)?,
    created_by:       row.get(7)?,
    created_by_email: row.get(8)?,
    participants:     row.get(9)?,
    created_at:       row.get(10)?,
  })
}

fn room_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawRoom> {
  Ok(RawRoom {
    room_id:     row.get(0)?,
    name:        row.get(1)?,
    description: row.get(2)?,
    owner_id:    row.get(3)?,
    created_at:  row.get(4)?,
    members:     row.get(5)?,
  })
}

// ─── ScheduleStore impl ──────────────────────────────────────────────────────

impl ScheduleStore for SqliteStore {
  type Error = Error;

  // ── Accounts ──────────────────────────────────────────────────────────────

  async fn add_account(&self, input: NewAccount) -> Result<Option<Account>> {
    let account = Account {
      account_id:   Uuid::new_v4(),
      email:        input.email,
      display_name: input.display_name,
      created_at:   Utc::now(),
    };

    let id_str    = encode_uuid(account.account_id);
    let email     = account.email.clone();
    let name      = account.display_name.clone();
    let hash      = input.password_hash;
    let at_str    = encode_dt(account.created_at);
    let lookup    = account.email.clone();

    // Existence check and insert inside one closure: both run on the
    // single connection thread, so two concurrent registrations cannot
    // both see the email as free. The UNIQUE constraint backs this up.
    let inserted: bool = self
      .conn
      .call(move |conn| {
        let taken: bool = conn
          .query_row(
            "SELECT 1 FROM accounts WHERE email = ?1",
            rusqlite::params![lookup],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);
        if taken {
          return Ok(false);
        }
        conn.execute(
          "INSERT INTO accounts
             (account_id, email, display_name, password_hash, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, email, name, hash, at_str],
        )?;
        Ok(true)
      })
      .await?;

    Ok(inserted.then_some(account))
  }

  async fn get_account(&self, id: Uuid) -> Result<Option<Account>> {
    let raw = self
      .account_row(
        "SELECT account_id, email, display_name, created_at
         FROM accounts WHERE account_id = ?1",
        encode_uuid(id),
      )
      .await?;
    raw.map(RawAccount::into_account).transpose()
  }

  async fn find_account(&self, email: &str) -> Result<Option<Account>> {
    let raw = self
      .account_row(
        "SELECT account_id, email, display_name, created_at
         FROM accounts WHERE email = ?1",
        email.to_owned(),
      )
      .await?;
    raw.map(RawAccount::into_account).transpose()
  }

  async fn account_credentials(
    &self,
    email: &str,
  ) -> Result<Option<(Account, String)>> {
    let key = email.to_owned();
    let raw: Option<(RawAccount, String)> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT account_id, email, display_name, created_at,
                      password_hash
               FROM accounts WHERE email = ?1",
              rusqlite::params![key],
              |row| {
                Ok((
                  RawAccount {
                    account_id:   row.get(0)?,
                    email:        row.get(1)?,
                    display_name: row.get(2)?,
                    created_at:   row.get(3)?,
                  },
                  row.get(4)?,
                ))
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw
      .map(|(raw, hash)| Ok((raw.into_account()?, hash)))
      .transpose()
  }

  // ── Rooms ─────────────────────────────────────────────────────────────────

  async fn insert_room(&self, room: &Room) -> Result<()> {
    let id_str      = encode_uuid(room.room_id);
    let name        = room.name.clone();
    let description = room.description.clone();
    let owner_str   = encode_uuid(room.owner_id);
    let at_str      = encode_dt(room.created_at);
    let members     = encode_members(&room.members)?;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO rooms
             (room_id, name, description, owner_id, created_at, members)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![
            id_str,
            name,
            description,
            owner_str,
            at_str,
            members
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn get_room(&self, id: Uuid) -> Result<Option<Room>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawRoom> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT room_id, name, description, owner_id, created_at,
                      members
               FROM rooms WHERE room_id = ?1",
              rusqlite::params![id_str],
              room_from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawRoom::into_room).transpose()
  }

  async fn list_rooms(&self) -> Result<Vec<Room>> {
    let raws: Vec<RawRoom> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT room_id, name, description, owner_id, created_at, members
           FROM rooms ORDER BY created_at ASC",
        )?;
        let rows = stmt
          .query_map([], room_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawRoom::into_room).collect()
  }

  async fn update_room(&self, room: &Room) -> Result<()> {
    let id_str      = encode_uuid(room.room_id);
    let name        = room.name.clone();
    let description = room.description.clone();
    let members     = encode_members(&room.members)?;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE rooms SET name = ?2, description = ?3, members = ?4
           WHERE room_id = ?1",
          rusqlite::params![id_str, name, description, members],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn delete_room(&self, id: Uuid) -> Result<()> {
    let id_str = encode_uuid(id);
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM rooms WHERE room_id = ?1",
          rusqlite::params![id_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Bookings ──────────────────────────────────────────────────────────────

  async fn insert_booking(&self, booking: &Booking) -> Result<()> {
    let booking_id   = encode_uuid(booking.booking_id);
    let room_id      = encode_uuid(booking.room_id);
    let room_name    = booking.room_name.clone();
    let title        = booking.title.clone();
    let description  = booking.description.clone();
    let start_time   = encode_dt(booking.slot.start());
    let end_time     = encode_dt(booking.slot.end());
    let created_by   = encode_uuid(booking.created_by);
    let creator      = booking.created_by_email.clone();
    let participants = encode_participants(&booking.participants)?;
    let created_at   = encode_dt(booking.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO bookings
             (booking_id, room_id, room_name, title, description,
              start_time, end_time, created_by, created_by_email,
              participants, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
          rusqlite::params![
            booking_id,
            room_id,
            room_name,
            title,
            description,
            start_time,
            end_time,
            created_by,
            creator,
            participants,
            created_at
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn get_booking(&self, id: Uuid) -> Result<Option<Booking>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawBooking> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT booking_id, room_id, room_name, title, description,
                      start_time, end_time, created_by, created_by_email,
                      participants, created_at
               FROM bookings WHERE booking_id = ?1",
              rusqlite::params![id_str],
              booking_from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawBooking::into_booking).transpose()
  }

  async fn update_booking(&self, booking: &Booking) -> Result<()> {
    let booking_id   = encode_uuid(booking.booking_id);
    let title        = booking.title.clone();
    let description  = booking.description.clone();
    let start_time   = encode_dt(booking.slot.start());
    let end_time     = encode_dt(booking.slot.end());
    let participants = encode_participants(&booking.participants)?;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE bookings
           SET title = ?2, description = ?3, start_time = ?4, end_time = ?5,
               participants = ?6
           WHERE booking_id = ?1",
          rusqlite::params![
            booking_id,
            title,
            description,
            start_time,
            end_time,
            participants
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn delete_booking(&self, id: Uuid) -> Result<()> {
    let id_str = encode_uuid(id);
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM bookings WHERE booking_id = ?1",
          rusqlite::params![id_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn bookings_by_room(&self, room_id: Uuid) -> Result<Vec<Booking>> {
    self
      .booking_rows(
        "SELECT booking_id, room_id, room_name, title, description,
                start_time, end_time, created_by, created_by_email,
                participants, created_at
         FROM bookings WHERE room_id = ?1 ORDER BY start_time ASC",
        encode_uuid(room_id),
      )
      .await
  }

  async fn bookings_by_creator(&self, email: &str) -> Result<Vec<Booking>> {
    self
      .booking_rows(
        "SELECT booking_id, room_id, room_name, title, description,
                start_time, end_time, created_by, created_by_email,
                participants, created_at
         FROM bookings WHERE created_by_email = ?1 ORDER BY start_time ASC",
        email.to_owned(),
      )
      .await
  }
}
