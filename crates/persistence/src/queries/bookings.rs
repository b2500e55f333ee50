// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Booking record queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use event_booking_domain::Booking;
use tracing::debug;

use crate::data_models::BookingRow;
use crate::diesel_schema::bookings;
use crate::error::PersistenceError;

/// Lists a user's booking records, newest first.
///
/// # Errors
///
/// Returns an error if the database query fails or a record is corrupt.
pub fn list_bookings_for_user(
    conn: &mut SqliteConnection,
    user_id: i64,
) -> Result<Vec<Booking>, PersistenceError> {
    let rows: Vec<BookingRow> = bookings::table
        .filter(bookings::user_id.eq(user_id))
        .order(bookings::booking_id.desc())
        .select(BookingRow::as_select())
        .load(conn)?;

    debug!(user_id, count = rows.len(), "Loaded bookings for user");
    rows.into_iter().map(BookingRow::into_booking).collect()
}

/// Lists the booking records of one event in booking order.
///
/// # Errors
///
/// Returns an error if the database query fails or a record is corrupt.
pub fn list_bookings_for_event(
    conn: &mut SqliteConnection,
    event_id: i64,
) -> Result<Vec<Booking>, PersistenceError> {
    let rows: Vec<BookingRow> = bookings::table
        .filter(bookings::event_id.eq(event_id))
        .order(bookings::booking_id.asc())
        .select(BookingRow::as_select())
        .load(conn)?;

    debug!(event_id, count = rows.len(), "Loaded bookings for event");
    rows.into_iter().map(BookingRow::into_booking).collect()
}
