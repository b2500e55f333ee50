// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the event booking backend.
//!
//! This crate stores users, events, booking records and each user's ordered
//! booking list in `SQLite` through Diesel. Records are converted to domain
//! types at this boundary; a stored record that breaks a domain invariant is
//! reported as `PersistenceError::CorruptRecord`.
//!
//! ## Store Targets
//!
//! - **In-memory** (`:memory:`): a uniquely named shared-cache database per
//!   adapter, used by tests and throwaway runs
//! - **File**: a database file in WAL mode; several adapters (or processes)
//!   may open the same file
//!
//! ## Seat Consistency
//!
//! Booking relies on a guarded decrement executed by the store itself, so
//! the seat invariant `0 <= available_seats <= total_seats` holds no matter
//! how many connections book concurrently. See `mutations::bookings`.
//!
//! ## Referential Integrity
//!
//! The schema declares no foreign keys. Callers check that referenced users
//! and events exist before writing.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use event_booking_domain::{
    Booking, Event, EventId, EventStatus, NewEvent, OrganizerStatus, Role, User, UserId,
};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// The store target that selects an in-memory database.
pub const IN_MEMORY_TARGET: &str = ":memory:";

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use data_models::ProfileChanges;
pub use error::PersistenceError;

/// Persistence adapter over one `SQLite` connection.
pub struct Persistence {
    pub(crate) conn: SqliteConnection,
}

impl Persistence {
    /// Opens the configured store target.
    ///
    /// `:memory:` selects a fresh in-memory database; anything else is a
    /// file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn open(target: &str) -> Result<Self, PersistenceError> {
        if target == IN_MEMORY_TARGET {
            Self::new_in_memory()
        } else {
            Self::new_with_file(target)
        }
    }

    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique database instance via atomic counter,
    /// ensuring deterministic test isolation without time-based collisions.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url = format!("file:event_booking_memdb_{db_id}?mode=memory&cache=shared");

        let conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;

        Ok(Self { conn })
    }

    // ========================================================================
    // Users
    // ========================================================================

    /// Creates an account and returns its ID.
    ///
    /// # Arguments
    ///
    /// * `email` - The normalized email address
    /// * `full_name` - The display name
    /// * `password_hash` - The already hashed password
    /// * `role` - The account role
    /// * `status` - The initial approval status (organizers only)
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::DuplicateEmail` if the email is taken.
    pub fn create_user(
        &mut self,
        email: &str,
        full_name: &str,
        password_hash: &str,
        role: Role,
        status: Option<OrganizerStatus>,
    ) -> Result<UserId, PersistenceError> {
        mutations::create_user(
            &mut self.conn,
            email,
            full_name,
            password_hash,
            role,
            status,
        )
        .map(UserId::new)
    }

    /// Creates the first admin account and returns its ID.
    ///
    /// Counting admins and inserting happen atomically, so concurrent
    /// callers cannot each create a first admin.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::AdminAlreadyExists` if an admin exists, or
    /// `PersistenceError::DuplicateEmail` if the email is taken.
    pub fn create_first_admin(
        &mut self,
        email: &str,
        full_name: &str,
        password_hash: &str,
    ) -> Result<UserId, PersistenceError> {
        mutations::create_first_admin(&mut self.conn, email, full_name, password_hash)
            .map(UserId::new)
    }

    /// Retrieves a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the record is corrupt.
    pub fn get_user_by_id(&mut self, user_id: UserId) -> Result<Option<User>, PersistenceError> {
        queries::get_user_by_id(&mut self.conn, user_id.value())
    }

    /// Retrieves a user by normalized email.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the record is corrupt.
    pub fn get_user_by_email(&mut self, email: &str) -> Result<Option<User>, PersistenceError> {
        queries::get_user_by_email(&mut self.conn, email)
    }

    /// Counts admin accounts.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_admins(&mut self) -> Result<i64, PersistenceError> {
        queries::count_admins(&mut self.conn)
    }

    /// Lists organizers, optionally filtered by approval status.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a record is corrupt.
    pub fn list_organizers(
        &mut self,
        status: Option<OrganizerStatus>,
    ) -> Result<Vec<User>, PersistenceError> {
        queries::list_organizers(&mut self.conn, status)
    }

    /// Sets the approval status of an organizer.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if no organizer has this ID.
    pub fn set_organizer_status(
        &mut self,
        user_id: UserId,
        status: OrganizerStatus,
    ) -> Result<(), PersistenceError> {
        mutations::set_organizer_status(&mut self.conn, user_id.value(), status)
    }

    /// Sets or clears the disabled flag of an account.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if no user has this ID.
    pub fn set_user_disabled(
        &mut self,
        user_id: UserId,
        disabled: bool,
    ) -> Result<(), PersistenceError> {
        mutations::set_user_disabled(&mut self.conn, user_id.value(), disabled)
    }

    /// Applies a profile update.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::DuplicateEmail` if the new email is taken,
    /// or `PersistenceError::NotFound` if no user has this ID.
    pub fn update_user_profile(
        &mut self,
        user_id: UserId,
        changes: &ProfileChanges,
    ) -> Result<(), PersistenceError> {
        mutations::update_user_profile(&mut self.conn, user_id.value(), changes)
    }

    // ========================================================================
    // Events
    // ========================================================================

    /// Persists a new pending event and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_event(&mut self, event: &NewEvent) -> Result<EventId, PersistenceError> {
        mutations::create_event(&mut self.conn, event).map(EventId::new)
    }

    /// Retrieves an event by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the record is corrupt.
    pub fn get_event(&mut self, event_id: EventId) -> Result<Option<Event>, PersistenceError> {
        queries::get_event(&mut self.conn, event_id.value())
    }

    /// Lists events with the given status.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a record is corrupt.
    pub fn list_events_by_status(
        &mut self,
        status: EventStatus,
    ) -> Result<Vec<Event>, PersistenceError> {
        queries::list_events_by_status(&mut self.conn, status)
    }

    /// Lists every event submitted by one organizer.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a record is corrupt.
    pub fn list_events_by_organizer(
        &mut self,
        organizer_id: UserId,
    ) -> Result<Vec<Event>, PersistenceError> {
        queries::list_events_by_organizer(&mut self.conn, organizer_id.value())
    }

    /// Loads the events with the given IDs, skipping IDs that do not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a record is corrupt.
    pub fn list_events_by_ids(
        &mut self,
        event_ids: &[EventId],
    ) -> Result<Vec<Event>, PersistenceError> {
        let raw_ids: Vec<i64> = event_ids.iter().map(EventId::value).collect();
        queries::list_events_by_ids(&mut self.conn, &raw_ids)
    }

    /// Sets an event's moderation status.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if no event has this ID.
    pub fn set_event_status(
        &mut self,
        event_id: EventId,
        status: EventStatus,
    ) -> Result<(), PersistenceError> {
        mutations::set_event_status(&mut self.conn, event_id.value(), status)
    }

    // ========================================================================
    // Bookings
    // ========================================================================

    /// Takes one seat of an approved event through the guarded decrement and
    /// records the booking.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::SoldOut` if no seat was left at mutation
    /// time, or `PersistenceError::NotFound` if the event does not exist or is
    /// not approved.
    pub fn book_seat(
        &mut self,
        event_id: EventId,
        user_id: UserId,
        user_email: &str,
    ) -> Result<Booking, PersistenceError> {
        mutations::book_seat(&mut self.conn, event_id.value(), user_id.value(), user_email)
    }

    /// Lists a user's booking records, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a record is corrupt.
    pub fn list_bookings_for_user(
        &mut self,
        user_id: UserId,
    ) -> Result<Vec<Booking>, PersistenceError> {
        queries::list_bookings_for_user(&mut self.conn, user_id.value())
    }

    /// Lists the booking records of one event.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a record is corrupt.
    pub fn list_bookings_for_event(
        &mut self,
        event_id: EventId,
    ) -> Result<Vec<Booking>, PersistenceError> {
        queries::list_bookings_for_event(&mut self.conn, event_id.value())
    }
}
