// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::str::FromStr;

use time::OffsetDateTime;

use crate::{
    DomainError, Event, EventId, EventStatus, NewEvent, OrganizerStatus, Role, User, UserId,
    check_organizer_status_change, initial_status_for, validate_account_status,
};

fn create_test_event(total_seats: i64, available_seats: i64) -> Result<Event, DomainError> {
    Event::new(
        EventId::new(1),
        String::from("Rust Meetup"),
        String::from("Monthly meetup"),
        OffsetDateTime::UNIX_EPOCH,
        String::from("Berlin"),
        0.0,
        String::from("o@x.com"),
        UserId::new(2),
        total_seats,
        available_seats,
        EventStatus::Pending,
        None,
    )
}

#[test]
fn test_id_parses_positive_integers() {
    let id: EventId = EventId::from_str("42").unwrap();
    assert_eq!(id.value(), 42);
    assert_eq!(id.to_string(), "42");
}

#[test]
fn test_id_rejects_malformed_values() {
    for raw in ["", "abc", "0", "-7", "65f1c0ffee", "1.5"] {
        let result: Result<UserId, DomainError> = UserId::from_str(raw);
        assert_eq!(
            result,
            Err(DomainError::InvalidId {
                entity: "user",
                value: raw.to_string(),
            }),
            "expected '{raw}' to be rejected"
        );
    }
}

#[test]
fn test_id_from_raw_integer() {
    let id: EventId = EventId::try_from(7).unwrap();
    assert_eq!(id, EventId::new(7));

    let result: Result<EventId, DomainError> = EventId::try_from(0);
    assert_eq!(
        result,
        Err(DomainError::InvalidId {
            entity: "event",
            value: String::from("0"),
        })
    );
}

#[test]
fn test_role_string_round_trip() {
    for role in [Role::Admin, Role::Organizer, Role::Attendee] {
        assert_eq!(Role::from_str(role.as_str()), Ok(role));
    }
    assert_eq!(
        Role::from_str("superuser"),
        Err(DomainError::InvalidRole(String::from("superuser")))
    );
}

#[test]
fn test_enums_serialize_lowercase() {
    assert_eq!(serde_json::to_string(&Role::Organizer).unwrap(), "\"organizer\"");
    assert_eq!(
        serde_json::to_string(&OrganizerStatus::Pending).unwrap(),
        "\"pending\""
    );
    let status: EventStatus = serde_json::from_str("\"approved\"").unwrap();
    assert_eq!(status, EventStatus::Approved);
}

#[test]
fn test_event_status_never_returns_to_pending() {
    for from in [
        EventStatus::Pending,
        EventStatus::Approved,
        EventStatus::Rejected,
    ] {
        assert!(!from.can_transition_to(EventStatus::Pending));
        assert!(from.transition_to(EventStatus::Pending).is_err());
    }
}

#[test]
fn test_event_status_moderation_is_unconditional() {
    assert_eq!(
        EventStatus::Pending.transition_to(EventStatus::Approved),
        Ok(EventStatus::Approved)
    );
    assert_eq!(
        EventStatus::Approved.transition_to(EventStatus::Approved),
        Ok(EventStatus::Approved)
    );
    assert_eq!(
        EventStatus::Approved.transition_to(EventStatus::Rejected),
        Ok(EventStatus::Rejected)
    );
    assert_eq!(
        EventStatus::Rejected.transition_to(EventStatus::Approved),
        Ok(EventStatus::Approved)
    );
}

#[test]
fn test_initial_status_only_for_organizers() {
    assert_eq!(
        initial_status_for(Role::Organizer),
        Some(OrganizerStatus::Pending)
    );
    assert_eq!(initial_status_for(Role::Attendee), None);
    assert_eq!(initial_status_for(Role::Admin), None);
}

#[test]
fn test_account_status_invariant() {
    assert!(validate_account_status(Role::Organizer, Some(OrganizerStatus::Rejected)).is_ok());
    assert!(validate_account_status(Role::Attendee, None).is_ok());
    assert_eq!(
        validate_account_status(Role::Organizer, None),
        Err(DomainError::MissingOrganizerStatus)
    );
    assert_eq!(
        validate_account_status(Role::Admin, Some(OrganizerStatus::Approved)),
        Err(DomainError::StatusWithoutOrganizerRole { role: Role::Admin })
    );
}

#[test]
fn test_user_new_rejects_attendee_with_status() {
    let result: Result<User, DomainError> = User::new(
        UserId::new(1),
        String::from("a@x.com"),
        String::from("Attendee"),
        String::from("hash"),
        Role::Attendee,
        Some(OrganizerStatus::Pending),
        false,
        OffsetDateTime::UNIX_EPOCH,
        Vec::new(),
    );
    assert!(result.is_err());
}

#[test]
fn test_is_approved_organizer() {
    let mut user: User = User::new(
        UserId::new(1),
        String::from("o@x.com"),
        String::from("Organizer"),
        String::from("hash"),
        Role::Organizer,
        Some(OrganizerStatus::Pending),
        false,
        OffsetDateTime::UNIX_EPOCH,
        Vec::new(),
    )
    .unwrap();
    assert!(!user.is_approved_organizer());

    user.status = Some(OrganizerStatus::Approved);
    assert!(user.is_approved_organizer());
}

#[test]
fn test_organizer_status_change_rejects_no_op() {
    assert_eq!(
        check_organizer_status_change(
            Some(OrganizerStatus::Approved),
            OrganizerStatus::Approved
        ),
        Err(DomainError::NoOpStatusChange {
            status: OrganizerStatus::Approved
        })
    );
    assert!(
        check_organizer_status_change(Some(OrganizerStatus::Pending), OrganizerStatus::Approved)
            .is_ok()
    );
}

#[test]
fn test_event_seat_invariant() {
    let event: Event = create_test_event(10, 10).unwrap();
    assert_eq!(event.available_seats, 10);
    assert!(event.has_available_seats());

    let sold_out: Event = create_test_event(10, 0).unwrap();
    assert!(!sold_out.has_available_seats());

    assert_eq!(
        create_test_event(10, 11),
        Err(DomainError::SeatCountOutOfRange {
            available: 11,
            total: 10
        })
    );
    assert_eq!(
        create_test_event(10, -1),
        Err(DomainError::SeatCountOutOfRange {
            available: -1,
            total: 10
        })
    );
    assert_eq!(
        create_test_event(-1, 0),
        Err(DomainError::InvalidSeatCount(-1))
    );
}

#[test]
fn test_new_event_validation() {
    let valid: Result<NewEvent, DomainError> = NewEvent::new(
        "  Launch party ",
        String::new(),
        OffsetDateTime::UNIX_EPOCH,
        String::from("Oslo"),
        12.5,
        String::from("o@x.com"),
        UserId::new(3),
        10,
        None,
    );
    let valid: NewEvent = valid.unwrap();
    assert_eq!(valid.title, "Launch party");
    assert_eq!(valid.total_seats, 10);

    let negative_price: Result<NewEvent, DomainError> = NewEvent::new(
        "Launch party",
        String::new(),
        OffsetDateTime::UNIX_EPOCH,
        String::from("Oslo"),
        -1.0,
        String::from("o@x.com"),
        UserId::new(3),
        10,
        None,
    );
    assert!(matches!(negative_price, Err(DomainError::InvalidPrice(_))));

    let blank_title: Result<NewEvent, DomainError> = NewEvent::new(
        "   ",
        String::new(),
        OffsetDateTime::UNIX_EPOCH,
        String::from("Oslo"),
        0.0,
        String::from("o@x.com"),
        UserId::new(3),
        10,
        None,
    );
    assert!(matches!(blank_title, Err(DomainError::InvalidTitle(_))));
}
