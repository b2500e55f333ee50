// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Event lifecycle: submission, listing and moderation.

use std::str::FromStr;

use crate::auth::AuthorizationService;
use crate::error::{ApiError, translate_domain_error, translate_persistence_error};
use crate::request_response::{CreateEventRequest, EventResponse};
use event_booking_domain::{DomainError, Event, EventId, EventStatus, NewEvent, User};
use event_booking_persistence::Persistence;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::{debug, info};

fn parse_event_date(raw: &str) -> Result<OffsetDateTime, ApiError> {
    OffsetDateTime::parse(raw.trim(), &Rfc3339).map_err(|e| {
        translate_domain_error(DomainError::InvalidTimestamp {
            value: raw.to_string(),
            error: e.to_string(),
        })
    })
}

fn render_events(events: &[Event]) -> Result<Vec<EventResponse>, ApiError> {
    events.iter().map(EventResponse::try_from).collect()
}

/// Loads an event or reports it as not found.
pub(crate) fn load_event(
    persistence: &mut Persistence,
    event_id: EventId,
) -> Result<Event, ApiError> {
    persistence
        .get_event(event_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::not_found("Event", format!("No event with id {event_id}")))
}

/// Submits an event. Approved organizers only.
///
/// The organizer id is always taken from the caller. The submitted
/// organizer email is only a display contact and defaults to the caller's
/// email.
///
/// # Errors
///
/// Returns `ApiError::Forbidden` for non-organizers,
/// `ApiError::OrganizerNotApproved` for unapproved organizers, and
/// `ApiError::InvalidInput` for bad fields.
pub fn submit_event(
    persistence: &mut Persistence,
    caller: &User,
    request: &CreateEventRequest,
) -> Result<EventResponse, ApiError> {
    AuthorizationService::require_active_organizer(caller, "submit_event")?;

    let date: OffsetDateTime = parse_event_date(&request.date)?;
    let organizer_email: String = request
        .organizer_email
        .as_deref()
        .map(str::trim)
        .filter(|email| !email.is_empty())
        .map_or_else(|| caller.email.clone(), str::to_string);

    let new_event: NewEvent = NewEvent::new(
        &request.title,
        request.description.clone(),
        date,
        request.location.clone(),
        request.price,
        organizer_email,
        caller.id,
        request.total_seats,
        request.image_url.clone(),
    )
    .map_err(translate_domain_error)?;

    let event_id: EventId = persistence
        .create_event(&new_event)
        .map_err(translate_persistence_error)?;

    info!(
        %event_id,
        organizer_id = %caller.id,
        total_seats = new_event.total_seats,
        "Submitted event"
    );

    EventResponse::try_from(&load_event(persistence, event_id)?)
}

/// Lists approved events. Public.
///
/// # Errors
///
/// Returns an error if the store fails.
pub fn list_approved_events(persistence: &mut Persistence) -> Result<Vec<EventResponse>, ApiError> {
    let events: Vec<Event> = persistence
        .list_events_by_status(EventStatus::Approved)
        .map_err(translate_persistence_error)?;
    debug!(count = events.len(), "Listed approved events");
    render_events(&events)
}

/// Lists every event the caller submitted, whatever its status.
///
/// # Errors
///
/// Returns `ApiError::Forbidden` for non-organizers and
/// `ApiError::OrganizerNotApproved` for unapproved organizers.
pub fn list_my_events(
    persistence: &mut Persistence,
    caller: &User,
) -> Result<Vec<EventResponse>, ApiError> {
    AuthorizationService::require_active_organizer(caller, "list_my_events")?;

    let events: Vec<Event> = persistence
        .list_events_by_organizer(caller.id)
        .map_err(translate_persistence_error)?;
    render_events(&events)
}

fn moderate_event(
    persistence: &mut Persistence,
    admin: &User,
    event_id: &str,
    target: EventStatus,
    action: &str,
) -> Result<EventResponse, ApiError> {
    AuthorizationService::require_admin(admin, action)?;

    let event_id: EventId = EventId::from_str(event_id).map_err(translate_domain_error)?;
    let event: Event = load_event(persistence, event_id)?;
    let status: EventStatus = event
        .status
        .transition_to(target)
        .map_err(translate_domain_error)?;

    persistence
        .set_event_status(event_id, status)
        .map_err(translate_persistence_error)?;

    info!(
        %event_id,
        admin_id = %admin.id,
        previous = %event.status,
        %status,
        "Moderated event"
    );

    EventResponse::try_from(&load_event(persistence, event_id)?)
}

/// Approves an event. Admin only.
///
/// Approval is unconditional: an already moderated event may be approved
/// again.
///
/// # Errors
///
/// Returns `ApiError::InvalidId` for a malformed id and `ApiError::NotFound`
/// if the event does not exist.
pub fn approve_event(
    persistence: &mut Persistence,
    admin: &User,
    event_id: &str,
) -> Result<EventResponse, ApiError> {
    moderate_event(persistence, admin, event_id, EventStatus::Approved, "approve_event")
}

/// Rejects an event. Admin only.
///
/// # Errors
///
/// Returns `ApiError::InvalidId` for a malformed id and `ApiError::NotFound`
/// if the event does not exist.
pub fn reject_event(
    persistence: &mut Persistence,
    admin: &User,
    event_id: &str,
) -> Result<EventResponse, ApiError> {
    moderate_event(persistence, admin, event_id, EventStatus::Rejected, "reject_event")
}

/// Looks up one event by id. Public.
///
/// # Errors
///
/// Returns `ApiError::InvalidId` for a malformed id and `ApiError::NotFound`
/// if the event does not exist.
pub fn get_event(persistence: &mut Persistence, event_id: &str) -> Result<EventResponse, ApiError> {
    let event_id: EventId = EventId::from_str(event_id).map_err(translate_domain_error)?;
    EventResponse::try_from(&load_event(persistence, event_id)?)
}
