// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Event mutations.

use diesel::SqliteConnection;
use diesel::prelude::*;
use event_booking_domain::{EventStatus, NewEvent};
use time::OffsetDateTime;
use tracing::info;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::format_timestamp;
use crate::diesel_schema::events;
use crate::error::PersistenceError;

#[derive(Insertable)]
#[diesel(table_name = events)]
struct NewEventRow<'a> {
    title: &'a str,
    description: &'a str,
    event_date: &'a str,
    location: &'a str,
    price: f64,
    organizer_email: &'a str,
    organizer_id: i64,
    total_seats: i64,
    available_seats: i64,
    status: &'a str,
    image_url: Option<&'a str>,
    created_at: &'a str,
}

/// Persists a new event as `pending` with every seat available.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_event(conn: &mut SqliteConnection, event: &NewEvent) -> Result<i64, PersistenceError> {
    let event_date: String = format_timestamp(event.date)?;
    let created_at: String = format_timestamp(OffsetDateTime::now_utc())?;
    let seats: i64 = i64::from(event.total_seats);

    diesel::insert_into(events::table)
        .values(NewEventRow {
            title: &event.title,
            description: &event.description,
            event_date: &event_date,
            location: &event.location,
            price: event.price,
            organizer_email: &event.organizer_email,
            organizer_id: event.organizer_id.value(),
            total_seats: seats,
            available_seats: seats,
            status: EventStatus::Pending.as_str(),
            image_url: event.image_url.as_deref(),
            created_at: &created_at,
        })
        .execute(conn)?;

    let event_id: i64 = get_last_insert_rowid(conn)?;

    info!(
        event_id,
        organizer_id = event.organizer_id.value(),
        total_seats = seats,
        "Event submitted"
    );
    Ok(event_id)
}

/// Sets an event's moderation status.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if no event has this ID.
pub fn set_event_status(
    conn: &mut SqliteConnection,
    event_id: i64,
    status: EventStatus,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(events::table)
        .filter(events::event_id.eq(event_id))
        .set(events::status.eq(status.as_str()))
        .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::NotFound(format!("event {event_id}")));
    }

    info!(event_id, status = %status, "Event status updated");
    Ok(())
}
