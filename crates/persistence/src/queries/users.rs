// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Account queries.

use std::collections::HashMap;

use diesel::SqliteConnection;
use diesel::dsl::count;
use diesel::prelude::*;
use event_booking_domain::{BookingEntry, OrganizerStatus, Role, User};
use tracing::debug;

use crate::data_models::{BookedEventRow, UserRow};
use crate::diesel_schema::{user_booked_events, users};
use crate::error::PersistenceError;

/// Loads a user's booking list in booking order.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn load_booked_events(
    conn: &mut SqliteConnection,
    user_id: i64,
) -> Result<Vec<BookingEntry>, PersistenceError> {
    let rows: Vec<BookedEventRow> = user_booked_events::table
        .filter(user_booked_events::user_id.eq(user_id))
        .order(user_booked_events::entry_id.asc())
        .select(BookedEventRow::as_select())
        .load(conn)?;

    Ok(rows.into_iter().map(BookingEntry::from).collect())
}

/// Loads the booking lists of several users with one query.
///
/// Users without bookings have no entry in the returned map.
fn load_booked_events_for(
    conn: &mut SqliteConnection,
    user_ids: &[i64],
) -> Result<HashMap<i64, Vec<BookingEntry>>, PersistenceError> {
    if user_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows: Vec<(i64, BookedEventRow)> = user_booked_events::table
        .filter(user_booked_events::user_id.eq_any(user_ids))
        .order(user_booked_events::entry_id.asc())
        .select((user_booked_events::user_id, BookedEventRow::as_select()))
        .load(conn)?;

    let mut by_user: HashMap<i64, Vec<BookingEntry>> = HashMap::new();
    for (user_id, row) in rows {
        by_user
            .entry(user_id)
            .or_default()
            .push(BookingEntry::from(row));
    }
    Ok(by_user)
}

fn hydrate(conn: &mut SqliteConnection, row: UserRow) -> Result<User, PersistenceError> {
    let booked_events: Vec<BookingEntry> = load_booked_events(conn, row.user_id)?;
    row.into_user(booked_events)
}

/// Retrieves a user by ID, including the booking list.
///
/// # Errors
///
/// Returns an error if the database query fails or the record is corrupt.
/// Returns `Ok(None)` if the user is not found.
pub fn get_user_by_id(
    conn: &mut SqliteConnection,
    user_id: i64,
) -> Result<Option<User>, PersistenceError> {
    debug!("Looking up user by ID: {}", user_id);

    let row: Option<UserRow> = users::table
        .filter(users::user_id.eq(user_id))
        .select(UserRow::as_select())
        .first(conn)
        .optional()?;

    row.map(|row| hydrate(conn, row)).transpose()
}

/// Retrieves a user by normalized email address.
///
/// # Errors
///
/// Returns an error if the database query fails or the record is corrupt.
/// Returns `Ok(None)` if no account uses this email.
pub fn get_user_by_email(
    conn: &mut SqliteConnection,
    email: &str,
) -> Result<Option<User>, PersistenceError> {
    debug!("Looking up user by email");

    let row: Option<UserRow> = users::table
        .filter(users::email.eq(email))
        .select(UserRow::as_select())
        .first(conn)
        .optional()?;

    row.map(|row| hydrate(conn, row)).transpose()
}

/// Counts admin accounts, including disabled ones.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_admins(conn: &mut SqliteConnection) -> Result<i64, PersistenceError> {
    let admins: i64 = users::table
        .filter(users::role.eq(Role::Admin.as_str()))
        .select(count(users::user_id))
        .first(conn)?;

    debug!("Admin accounts: {}", admins);
    Ok(admins)
}

/// Lists organizer accounts, optionally restricted to one approval status.
///
/// # Errors
///
/// Returns an error if the database query fails or a record is corrupt.
pub fn list_organizers(
    conn: &mut SqliteConnection,
    status: Option<OrganizerStatus>,
) -> Result<Vec<User>, PersistenceError> {
    let mut query = users::table
        .filter(users::role.eq(Role::Organizer.as_str()))
        .order(users::user_id.asc())
        .select(UserRow::as_select())
        .into_boxed();

    if let Some(status) = status {
        query = query.filter(users::status.eq(status.as_str()));
    }

    let rows: Vec<UserRow> = query.load(conn)?;
    debug!(count = rows.len(), "Loaded organizers");

    let user_ids: Vec<i64> = rows.iter().map(|row| row.user_id).collect();
    let mut booked_events: HashMap<i64, Vec<BookingEntry>> =
        load_booked_events_for(conn, &user_ids)?;

    rows.into_iter()
        .map(|row| {
            let entries: Vec<BookingEntry> =
                booked_events.remove(&row.user_id).unwrap_or_default();
            row.into_user(entries)
        })
        .collect()
}
