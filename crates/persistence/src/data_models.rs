// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row types and their conversion into domain entities.
//!
//! Every record read from the store passes through one of the `into_*`
//! conversions below. A record that violates a domain invariant is reported
//! as `PersistenceError::CorruptRecord` instead of being patched with defaults.

use std::str::FromStr;

use diesel::prelude::*;
use event_booking_domain::{
    Booking, BookingEntry, BookingId, DomainError, Event, EventId, EventStatus, OrganizerStatus,
    Role, User, UserId,
};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::diesel_schema::{bookings, events, user_booked_events, users};
use crate::error::PersistenceError;

/// Diesel Queryable struct for user rows.
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UserRow {
    pub user_id: i64,
    pub email: String,
    pub full_name: String,
    pub password_hash: String,
    pub role: String,
    pub status: Option<String>,
    pub is_disabled: i32,
    pub created_at: String,
}

/// Diesel Queryable struct for event rows.
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = events)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct EventRow {
    pub event_id: i64,
    pub title: String,
    pub description: String,
    pub event_date: String,
    pub location: String,
    pub price: f64,
    pub organizer_email: String,
    pub organizer_id: i64,
    pub total_seats: i64,
    pub available_seats: i64,
    pub status: String,
    pub image_url: Option<String>,
}

/// Diesel Queryable struct for booking rows.
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = bookings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct BookingRow {
    pub booking_id: i64,
    pub event_id: i64,
    pub user_id: i64,
    pub user_email: String,
    pub booking_date: String,
}

/// Diesel Queryable struct for booking list entries.
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = user_booked_events)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct BookedEventRow {
    pub event_id: i64,
    pub user_email: String,
}

/// Formats a timestamp for storage.
///
/// # Errors
///
/// Returns an error if the timestamp cannot be represented as RFC 3339.
pub fn format_timestamp(value: OffsetDateTime) -> Result<String, PersistenceError> {
    value
        .format(&Rfc3339)
        .map_err(|e| PersistenceError::QueryFailed(format!("Failed to format timestamp: {e}")))
}

fn parse_timestamp(raw: &str) -> Result<OffsetDateTime, DomainError> {
    OffsetDateTime::parse(raw, &Rfc3339).map_err(|e| DomainError::InvalidTimestamp {
        value: raw.to_string(),
        error: e.to_string(),
    })
}

fn corrupt(table: &'static str, id: i64) -> impl FnOnce(DomainError) -> PersistenceError {
    move |err| PersistenceError::CorruptRecord {
        table,
        id,
        reason: err.to_string(),
    }
}

impl UserRow {
    /// Converts this row into a `User` carrying the given booking list.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::CorruptRecord` if a stored field is invalid.
    pub fn into_user(self, booked_events: Vec<BookingEntry>) -> Result<User, PersistenceError> {
        let id: i64 = self.user_id;

        let role: Role = Role::from_str(&self.role).map_err(corrupt("users", id))?;
        let status: Option<OrganizerStatus> = self
            .status
            .as_deref()
            .map(OrganizerStatus::from_str)
            .transpose()
            .map_err(corrupt("users", id))?;
        let created_at: OffsetDateTime =
            parse_timestamp(&self.created_at).map_err(corrupt("users", id))?;

        User::new(
            UserId::new(id),
            self.email,
            self.full_name,
            self.password_hash,
            role,
            status,
            self.is_disabled != 0,
            created_at,
            booked_events,
        )
        .map_err(corrupt("users", id))
    }
}

impl EventRow {
    /// Converts this row into an `Event`.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::CorruptRecord` if a stored field is invalid
    /// or the seat counts break the seat invariant.
    pub fn into_event(self) -> Result<Event, PersistenceError> {
        let id: i64 = self.event_id;

        let status: EventStatus =
            EventStatus::from_str(&self.status).map_err(corrupt("events", id))?;
        let date: OffsetDateTime =
            parse_timestamp(&self.event_date).map_err(corrupt("events", id))?;

        Event::new(
            EventId::new(id),
            self.title,
            self.description,
            date,
            self.location,
            self.price,
            self.organizer_email,
            UserId::new(self.organizer_id),
            self.total_seats,
            self.available_seats,
            status,
            self.image_url,
        )
        .map_err(corrupt("events", id))
    }
}

impl BookingRow {
    /// Converts this row into a `Booking`.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::CorruptRecord` if the booking date is invalid.
    pub fn into_booking(self) -> Result<Booking, PersistenceError> {
        let booking_date: OffsetDateTime =
            parse_timestamp(&self.booking_date).map_err(corrupt("bookings", self.booking_id))?;

        Ok(Booking {
            id: BookingId::new(self.booking_id),
            event_id: EventId::new(self.event_id),
            user_id: UserId::new(self.user_id),
            user_email: self.user_email,
            booking_date,
        })
    }
}

impl From<BookedEventRow> for BookingEntry {
    fn from(row: BookedEventRow) -> Self {
        Self {
            event_id: EventId::new(row.event_id),
            user_email: row.user_email,
        }
    }
}

/// Profile fields to overwrite. `None` leaves the stored value unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, AsChangeset)]
#[diesel(table_name = users)]
pub struct ProfileChanges {
    /// New normalized email address.
    pub email: Option<String>,
    /// New display name.
    pub full_name: Option<String>,
    /// New password hash.
    pub password_hash: Option<String>,
}

impl ProfileChanges {
    /// Returns whether no field would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.email.is_none() && self.full_name.is_none() && self.password_hash.is_none()
    }
}
