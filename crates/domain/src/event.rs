// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::{BookingId, EventId, EventStatus, UserId};
use crate::validation::{validate_price, validate_seat_count, validate_title};
use time::OffsetDateTime;

/// A submitted event.
///
/// Invariant: `available_seats <= total_seats`. Both counts are unsigned, so
/// neither can go below zero. `available_seats` is the only field that booking
/// mutates.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// The store-assigned identifier.
    pub id: EventId,
    /// Event title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// When the event takes place.
    pub date: OffsetDateTime,
    /// Where the event takes place.
    pub location: String,
    /// Ticket price, never negative.
    pub price: f64,
    /// Organizer contact shown to attendees. Display only.
    pub organizer_email: String,
    /// The organizer that submitted the event, taken from the caller's identity.
    pub organizer_id: UserId,
    /// Seat capacity.
    pub total_seats: u32,
    /// Seats still bookable.
    pub available_seats: u32,
    /// Moderation status.
    pub status: EventStatus,
    /// Optional image shown with the event.
    pub image_url: Option<String>,
}

impl Event {
    /// Creates an event after checking the seat invariant.
    ///
    /// # Errors
    ///
    /// Returns an error if a seat count is negative, does not fit, or if
    /// `available_seats` exceeds `total_seats`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: EventId,
        title: String,
        description: String,
        date: OffsetDateTime,
        location: String,
        price: f64,
        organizer_email: String,
        organizer_id: UserId,
        total_seats: i64,
        available_seats: i64,
        status: EventStatus,
        image_url: Option<String>,
    ) -> Result<Self, DomainError> {
        let total: u32 = validate_seat_count(total_seats)?;
        let available: u32 = u32::try_from(available_seats)
            .ok()
            .filter(|available| *available <= total)
            .ok_or(DomainError::SeatCountOutOfRange {
                available: available_seats,
                total: total_seats,
            })?;

        Ok(Self {
            id,
            title,
            description,
            date,
            location,
            price,
            organizer_email,
            organizer_id,
            total_seats: total,
            available_seats: available,
            status,
            image_url,
        })
    }

    /// Returns whether at least one seat is still available.
    #[must_use]
    pub const fn has_available_seats(&self) -> bool {
        self.available_seats > 0
    }
}

/// A validated event submission, ready to be persisted.
///
/// New events always start `Pending` with every seat available.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    /// Event title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// When the event takes place.
    pub date: OffsetDateTime,
    /// Where the event takes place.
    pub location: String,
    /// Ticket price.
    pub price: f64,
    /// Organizer contact shown to attendees.
    pub organizer_email: String,
    /// The submitting organizer.
    pub organizer_id: UserId,
    /// Seat capacity. Also the initial available count.
    pub total_seats: u32,
    /// Optional image shown with the event.
    pub image_url: Option<String>,
}

impl NewEvent {
    /// Validates submission fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the title is empty, the price is negative or not
    /// finite, or the seat count is negative.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        title: &str,
        description: String,
        date: OffsetDateTime,
        location: String,
        price: f64,
        organizer_email: String,
        organizer_id: UserId,
        total_seats: i64,
        image_url: Option<String>,
    ) -> Result<Self, DomainError> {
        let title: String = validate_title(title)?;
        validate_price(price)?;
        let total_seats: u32 = validate_seat_count(total_seats)?;

        Ok(Self {
            title,
            description,
            date,
            location,
            price,
            organizer_email,
            organizer_id,
            total_seats,
            image_url,
        })
    }
}

/// A booking record, created once per successful guarded seat decrement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Booking {
    /// The store-assigned identifier.
    pub id: BookingId,
    /// The booked event.
    pub event_id: EventId,
    /// The booking user.
    pub user_id: UserId,
    /// The booking user's email at booking time.
    pub user_email: String,
    /// When the booking was made.
    pub booking_date: OffsetDateTime,
}
