// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The guarded seat decrement.
//!
//! Seat scarcity is enforced by the store, never by an in-process lock: the
//! decrement is a single conditional `UPDATE` that only matches while seats
//! remain, so concurrent bookers on separate connections or processes can
//! never drive `available_seats` below zero. The booking record and the
//! booking-list entry are written in the same `BEGIN IMMEDIATE` transaction
//! as the decrement.

use diesel::SqliteConnection;
use diesel::prelude::*;
use event_booking_domain::{Booking, BookingId, EventId, EventStatus, UserId};
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::format_timestamp;
use crate::diesel_schema::{bookings, events, user_booked_events};
use crate::error::PersistenceError;

#[derive(Insertable)]
#[diesel(table_name = bookings)]
struct NewBookingRow<'a> {
    event_id: i64,
    user_id: i64,
    user_email: &'a str,
    booking_date: &'a str,
}

#[derive(Insertable)]
#[diesel(table_name = user_booked_events)]
struct NewBookedEventRow<'a> {
    user_id: i64,
    event_id: i64,
    user_email: &'a str,
}

/// Takes one seat of an approved event and records the booking.
///
/// # Errors
///
/// Returns `PersistenceError::SoldOut` if the guarded decrement matched no
/// row because no seat was left, `PersistenceError::NotFound` if the event
/// does not exist or is not approved, or another error if a write fails. On
/// any error nothing is written.
pub fn book_seat(
    conn: &mut SqliteConnection,
    event_id: i64,
    user_id: i64,
    user_email: &str,
) -> Result<Booking, PersistenceError> {
    let booked_at: OffsetDateTime = OffsetDateTime::now_utc();
    let booking_date: String = format_timestamp(booked_at)?;

    conn.immediate_transaction(|conn| {
        let decremented: usize = diesel::update(events::table)
            .filter(events::event_id.eq(event_id))
            .filter(events::status.eq(EventStatus::Approved.as_str()))
            .filter(events::available_seats.gt(0))
            .set(events::available_seats.eq(events::available_seats - 1))
            .execute(conn)?;

        if decremented == 0 {
            // Tell a vanished or withdrawn event apart from an exhausted one
            let still_bookable: Option<String> = events::table
                .filter(events::event_id.eq(event_id))
                .select(events::status)
                .first(conn)
                .optional()?;

            return match still_bookable.as_deref() {
                Some(status) if status == EventStatus::Approved.as_str() => {
                    debug!(event_id, user_id, "Guarded decrement matched no row");
                    Err(PersistenceError::SoldOut(event_id))
                }
                _ => Err(PersistenceError::NotFound(format!("event {event_id}"))),
            };
        }

        diesel::insert_into(bookings::table)
            .values(NewBookingRow {
                event_id,
                user_id,
                user_email,
                booking_date: &booking_date,
            })
            .execute(conn)?;
        let booking_id: i64 = get_last_insert_rowid(conn)?;

        diesel::insert_into(user_booked_events::table)
            .values(NewBookedEventRow {
                user_id,
                event_id,
                user_email,
            })
            .execute(conn)?;

        info!(booking_id, event_id, user_id, "Seat booked");

        Ok(Booking {
            id: BookingId::new(booking_id),
            event_id: EventId::new(event_id),
            user_id: UserId::new(user_id),
            user_email: user_email.to_string(),
            booking_date: booked_at,
        })
    })
}
