// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The booking engine.

use crate::auth::AuthorizationService;
use crate::error::{ApiError, translate_domain_error, translate_persistence_error};
use crate::events::load_event;
use crate::request_response::{BookingRequest, BookingResponse};
use event_booking_domain::{Booking, Event, EventId, EventStatus, Role, User};
use event_booking_persistence::{Persistence, PersistenceError};
use tracing::{info, warn};

/// Books one seat of an approved event. Attendees only.
///
/// The seat check here is only a fast path. The authoritative check is the
/// guarded decrement in the store: if the last seat goes between the read
/// and the decrement, the booking still fails with `SoldOut` and nothing is
/// written. The booking is always made under the caller's own email.
///
/// # Errors
///
/// Returns `ApiError::Forbidden` for non-attendees, `ApiError::InvalidId`
/// for a malformed id, `ApiError::NotFound` if the event does not exist or
/// is not approved, and `ApiError::SoldOut` if no seat is left.
pub fn book_event(
    persistence: &mut Persistence,
    caller: &User,
    request: &BookingRequest,
) -> Result<BookingResponse, ApiError> {
    AuthorizationService::require_role(caller, &[Role::Attendee], "book_event")?;

    let event_id: EventId = EventId::try_from(request.event_id).map_err(translate_domain_error)?;

    let event: Event = load_event(persistence, event_id)?;
    if event.status != EventStatus::Approved {
        return Err(ApiError::not_found(
            "Event",
            format!("No bookable event with id {event_id}"),
        ));
    }
    if !event.has_available_seats() {
        warn!(%event_id, user_id = %caller.id, "Booking rejected: sold out");
        return Err(ApiError::SoldOut { event_id });
    }

    let booking: Booking = persistence
        .book_seat(event_id, caller.id, &caller.email)
        .map_err(|e| match e {
            PersistenceError::SoldOut(_) => {
                warn!(%event_id, user_id = %caller.id, "Booking lost the race for the last seat");
                ApiError::SoldOut { event_id }
            }
            PersistenceError::NotFound(_) => ApiError::not_found(
                "Event",
                format!("No bookable event with id {event_id}"),
            ),
            other => translate_persistence_error(other),
        })?;

    info!(
        booking_id = %booking.id,
        %event_id,
        user_id = %caller.id,
        "Booked seat"
    );

    BookingResponse::try_from(&booking)
}

/// Lists the caller's booking records, newest first.
///
/// # Errors
///
/// Returns an error if the store fails.
pub fn list_my_bookings(
    persistence: &mut Persistence,
    caller: &User,
) -> Result<Vec<BookingResponse>, ApiError> {
    persistence
        .list_bookings_for_user(caller.id)
        .map_err(translate_persistence_error)?
        .iter()
        .map(BookingResponse::try_from)
        .collect()
}
