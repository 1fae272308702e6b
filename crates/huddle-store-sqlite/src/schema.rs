//! SQL schema for the Huddle SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS accounts (
    account_id    TEXT PRIMARY KEY,
    email         TEXT NOT NULL UNIQUE,
    display_name  TEXT NOT NULL,
    password_hash TEXT NOT NULL,    -- argon2 PHC string; opaque to the store
    created_at    TEXT NOT NULL     -- ISO 8601 UTC
);

-- Rooms are whole-document rows: the member list is embedded JSON, keyed by
-- email in the application layer.
CREATE TABLE IF NOT EXISTS rooms (
    room_id     TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    description TEXT NOT NULL,
    owner_id    TEXT NOT NULL,
    created_at  TEXT NOT NULL,
    members     TEXT NOT NULL DEFAULT '[]'   -- JSON array of memberships
);

-- No foreign key to rooms: the cascade on room deletion is issued by the
-- room lifecycle manager, never by the database.
CREATE TABLE IF NOT EXISTS bookings (
    booking_id       TEXT PRIMARY KEY,
    room_id          TEXT NOT NULL,
    room_name        TEXT NOT NULL,   -- denormalized copy at creation time
    title            TEXT NOT NULL,
    description      TEXT,
    start_time       TEXT NOT NULL,   -- ISO 8601 UTC; half-open [start, end)
    end_time         TEXT NOT NULL,
    created_by       TEXT NOT NULL,
    created_by_email TEXT NOT NULL,
    participants     TEXT NOT NULL DEFAULT '[]',  -- JSON array of emails
    created_at       TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS bookings_room_idx    ON bookings(room_id);
CREATE INDEX IF NOT EXISTS bookings_creator_idx ON bookings(created_by_email);
CREATE INDEX IF NOT EXISTS bookings_start_idx   ON bookings(start_time);

PRAGMA user_version = 1;
";
