// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::RunQueryDsl;
use event_booking_domain::{Event, EventId, EventStatus, UserId};
use time::macros::datetime;

use super::{create_test_new_event, create_test_organizer, create_test_persistence};
use crate::{Persistence, PersistenceError};

#[test]
fn test_created_event_is_pending_with_all_seats_available() {
    let mut persistence: Persistence = create_test_persistence();
    let organizer: UserId = create_test_organizer(&mut persistence, "o@example.com");

    let event_id: EventId = persistence
        .create_event(&create_test_new_event(organizer, 10))
        .unwrap();

    let event: Event = persistence.get_event(event_id).unwrap().unwrap();
    assert_eq!(event.status, EventStatus::Pending);
    assert_eq!(event.total_seats, 10);
    assert_eq!(event.available_seats, 10);
    assert_eq!(event.organizer_id, organizer);
    assert_eq!(event.title, "Rust Meetup");
    assert_eq!(event.date, datetime!(2026-11-20 18:30 UTC));
    assert!((event.price - 15.0).abs() < f64::EPSILON);
    assert_eq!(event.image_url, None);
}

#[test]
fn test_missing_event_is_none() {
    let mut persistence: Persistence = create_test_persistence();
    assert!(persistence.get_event(EventId::new(12)).unwrap().is_none());
}

#[test]
fn test_list_events_by_status() {
    let mut persistence: Persistence = create_test_persistence();
    let organizer: UserId = create_test_organizer(&mut persistence, "o@example.com");

    let first: EventId = persistence
        .create_event(&create_test_new_event(organizer, 5))
        .unwrap();
    let second: EventId = persistence
        .create_event(&create_test_new_event(organizer, 5))
        .unwrap();
    let third: EventId = persistence
        .create_event(&create_test_new_event(organizer, 5))
        .unwrap();

    persistence
        .set_event_status(first, EventStatus::Approved)
        .unwrap();
    persistence
        .set_event_status(third, EventStatus::Rejected)
        .unwrap();

    let approved: Vec<Event> = persistence
        .list_events_by_status(EventStatus::Approved)
        .unwrap();
    assert_eq!(approved.len(), 1);
    assert_eq!(approved[0].id, first);

    let pending: Vec<Event> = persistence
        .list_events_by_status(EventStatus::Pending)
        .unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, second);
}

#[test]
fn test_list_events_by_organizer_is_scoped() {
    let mut persistence: Persistence = create_test_persistence();
    let mine: UserId = create_test_organizer(&mut persistence, "me@example.com");
    let theirs: UserId = create_test_organizer(&mut persistence, "them@example.com");

    let own_event: EventId = persistence
        .create_event(&create_test_new_event(mine, 5))
        .unwrap();
    persistence
        .create_event(&create_test_new_event(theirs, 5))
        .unwrap();
    persistence
        .set_event_status(own_event, EventStatus::Rejected)
        .unwrap();

    let events: Vec<Event> = persistence.list_events_by_organizer(mine).unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].id, own_event);
    assert_eq!(events[0].status, EventStatus::Rejected);
}

#[test]
fn test_list_events_by_ids_skips_missing() {
    let mut persistence: Persistence = create_test_persistence();
    let organizer: UserId = create_test_organizer(&mut persistence, "o@example.com");
    let event_id: EventId = persistence
        .create_event(&create_test_new_event(organizer, 5))
        .unwrap();

    let events: Vec<Event> = persistence
        .list_events_by_ids(&[event_id, EventId::new(999)])
        .unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].id, event_id);

    assert!(persistence.list_events_by_ids(&[]).unwrap().is_empty());
}

#[test]
fn test_set_status_on_missing_event() {
    let mut persistence: Persistence = create_test_persistence();

    assert!(matches!(
        persistence.set_event_status(EventId::new(3), EventStatus::Approved),
        Err(PersistenceError::NotFound(_))
    ));
}

#[test]
fn test_store_rejects_seat_invariant_violation() {
    let mut persistence: Persistence = create_test_persistence();
    let organizer: UserId = create_test_organizer(&mut persistence, "o@example.com");
    persistence
        .create_event(&create_test_new_event(organizer, 2))
        .unwrap();

    let result = diesel::sql_query("UPDATE events SET available_seats = 3")
        .execute(&mut persistence.conn);
    assert!(result.is_err());

    let result = diesel::sql_query("UPDATE events SET available_seats = -1")
        .execute(&mut persistence.conn);
    assert!(result.is_err());
}

#[test]
fn test_corrupt_event_date_is_rejected_at_read() {
    let mut persistence: Persistence = create_test_persistence();
    let organizer: UserId = create_test_organizer(&mut persistence, "o@example.com");
    let event_id: EventId = persistence
        .create_event(&create_test_new_event(organizer, 2))
        .unwrap();

    diesel::sql_query("UPDATE events SET event_date = 'soon'")
        .execute(&mut persistence.conn)
        .unwrap();

    assert!(matches!(
        persistence.get_event(event_id),
        Err(PersistenceError::CorruptRecord {
            table: "events",
            ..
        })
    ));
}
