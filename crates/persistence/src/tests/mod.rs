// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod event_tests;

use event_booking_domain::{EventId, EventStatus, NewEvent, OrganizerStatus, Role, UserId};
use time::macros::datetime;

use crate::Persistence;

pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory().unwrap()
}

pub fn create_test_organizer(persistence: &mut Persistence, email: &str) -> UserId {
    persistence
        .create_user(
            email,
            "Test Organizer",
            "$2b$04$hash",
            Role::Organizer,
            Some(OrganizerStatus::Approved),
        )
        .unwrap()
}

pub fn create_test_attendee(persistence: &mut Persistence, email: &str) -> UserId {
    persistence
        .create_user(email, "Test Attendee", "$2b$04$hash", Role::Attendee, None)
        .unwrap()
}

pub fn create_test_new_event(organizer_id: UserId, total_seats: i64) -> NewEvent {
    NewEvent::new(
        "Rust Meetup",
        String::from("Talks and pizza"),
        datetime!(2026-11-20 18:30 UTC),
        String::from("Community Hall"),
        15.0,
        String::from("organizer@example.com"),
        organizer_id,
        total_seats,
        None,
    )
    .unwrap()
}

/// Creates an approved event with `total_seats` seats.
pub fn create_test_approved_event(persistence: &mut Persistence, total_seats: i64) -> EventId {
    let organizer_id: UserId = create_test_organizer(persistence, "organizer@example.com");
    let event_id: EventId = persistence
        .create_event(&create_test_new_event(organizer_id, total_seats))
        .unwrap();
    persistence
        .set_event_status(event_id, EventStatus::Approved)
        .unwrap();
    event_id
}
