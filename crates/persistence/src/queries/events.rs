// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Event queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use event_booking_domain::{Event, EventStatus};
use tracing::debug;

use crate::data_models::EventRow;
use crate::diesel_schema::events;
use crate::error::PersistenceError;

/// Retrieves an event by ID.
///
/// # Errors
///
/// Returns an error if the database query fails or the record is corrupt.
/// Returns `Ok(None)` if the event is not found.
pub fn get_event(
    conn: &mut SqliteConnection,
    event_id: i64,
) -> Result<Option<Event>, PersistenceError> {
    debug!("Looking up event by ID: {}", event_id);

    events::table
        .filter(events::event_id.eq(event_id))
        .select(EventRow::as_select())
        .first::<EventRow>(conn)
        .optional()?
        .map(EventRow::into_event)
        .transpose()
}

/// Lists events with the given status in submission order.
///
/// # Errors
///
/// Returns an error if the database query fails or a record is corrupt.
pub fn list_events_by_status(
    conn: &mut SqliteConnection,
    status: EventStatus,
) -> Result<Vec<Event>, PersistenceError> {
    let rows: Vec<EventRow> = events::table
        .filter(events::status.eq(status.as_str()))
        .order(events::event_id.asc())
        .select(EventRow::as_select())
        .load(conn)?;

    debug!(status = %status, count = rows.len(), "Loaded events by status");
    rows.into_iter().map(EventRow::into_event).collect()
}

/// Lists every event submitted by one organizer, regardless of status.
///
/// # Errors
///
/// Returns an error if the database query fails or a record is corrupt.
pub fn list_events_by_organizer(
    conn: &mut SqliteConnection,
    organizer_id: i64,
) -> Result<Vec<Event>, PersistenceError> {
    let rows: Vec<EventRow> = events::table
        .filter(events::organizer_id.eq(organizer_id))
        .order(events::event_id.asc())
        .select(EventRow::as_select())
        .load(conn)?;

    debug!(organizer_id, count = rows.len(), "Loaded events by organizer");
    rows.into_iter().map(EventRow::into_event).collect()
}

/// Loads the events whose IDs appear in `event_ids`. Missing IDs are skipped.
///
/// # Errors
///
/// Returns an error if the database query fails or a record is corrupt.
pub fn list_events_by_ids(
    conn: &mut SqliteConnection,
    event_ids: &[i64],
) -> Result<Vec<Event>, PersistenceError> {
    if event_ids.is_empty() {
        return Ok(Vec::new());
    }

    let rows: Vec<EventRow> = events::table
        .filter(events::event_id.eq_any(event_ids))
        .select(EventRow::as_select())
        .load(conn)?;

    rows.into_iter().map(EventRow::into_event).collect()
}
