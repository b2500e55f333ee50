// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use event_booking::{CredentialStore, MIN_COST, SigningAlgorithm, TokenService};
use event_booking_domain::{EventId, User, UserId};
use event_booking_persistence::Persistence;
use time::Duration;

use crate::{
    AuthConfig, CreateEventRequest, EventResponse, OrganizerStatusRequest, RegisterAdminRequest,
    RegisterRequest, UserResponse, approve_event, register, register_admin, set_organizer_status,
    submit_event,
};

pub const TEST_SECRET: &str = "api-test-signing-secret";
pub const TEST_SETUP_TOKEN: &str = "let-me-bootstrap";
pub const TEST_PASSWORD: &str = "Secret123!";

pub fn create_test_config() -> AuthConfig {
    create_test_config_with_cost(MIN_COST)
}

pub fn create_test_config_with_cost(cost: u32) -> AuthConfig {
    AuthConfig::new(
        CredentialStore::new(cost).unwrap(),
        TokenService::new(TEST_SECRET, SigningAlgorithm::Hs256, Duration::minutes(30)).unwrap(),
        Some(String::from(TEST_SETUP_TOKEN)),
    )
}

pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory().unwrap()
}

pub fn load_user(persistence: &mut Persistence, user_id: i64) -> User {
    persistence
        .get_user_by_id(UserId::new(user_id))
        .unwrap()
        .unwrap()
}

pub fn register_request(email: &str, role: &str) -> RegisterRequest {
    RegisterRequest {
        email: email.to_string(),
        full_name: String::from("Test User"),
        password: String::from(TEST_PASSWORD),
        role: role.to_string(),
    }
}

pub fn create_test_attendee(
    persistence: &mut Persistence,
    config: &AuthConfig,
    email: &str,
) -> User {
    let response: UserResponse =
        register(persistence, config, &register_request(email, "attendee")).unwrap();
    load_user(persistence, response.id)
}

/// Registers an organizer, who starts out pending.
pub fn create_test_organizer(
    persistence: &mut Persistence,
    config: &AuthConfig,
    email: &str,
) -> User {
    let response: UserResponse =
        register(persistence, config, &register_request(email, "organizer")).unwrap();
    load_user(persistence, response.id)
}

/// Creates the first admin through the setup token.
pub fn create_test_admin(persistence: &mut Persistence, config: &AuthConfig) -> User {
    let request: RegisterAdminRequest = RegisterAdminRequest {
        email: String::from("admin@example.com"),
        full_name: String::from("Test Admin"),
        password: String::from(TEST_PASSWORD),
    };
    let response: UserResponse =
        register_admin(persistence, config, None, Some(TEST_SETUP_TOKEN), &request).unwrap();
    load_user(persistence, response.id)
}

pub fn create_approved_organizer(
    persistence: &mut Persistence,
    config: &AuthConfig,
    admin: &User,
    email: &str,
) -> User {
    let organizer: User = create_test_organizer(persistence, config, email);
    set_organizer_status(
        persistence,
        admin,
        &organizer.id.to_string(),
        &OrganizerStatusRequest {
            status: String::from("approved"),
            reason: None,
        },
    )
    .unwrap();
    load_user(persistence, organizer.id.value())
}

pub fn create_event_request(total_seats: i64) -> CreateEventRequest {
    CreateEventRequest {
        title: String::from("Rust Meetup"),
        description: String::from("Talks and pizza"),
        date: String::from("2026-11-20T18:30:00Z"),
        location: String::from("Community Hall"),
        price: 15.0,
        organizer_email: None,
        total_seats,
        image_url: None,
    }
}

/// Submits an event as `organizer` and approves it as `admin`.
pub fn create_approved_event(
    persistence: &mut Persistence,
    admin: &User,
    organizer: &User,
    total_seats: i64,
) -> EventId {
    let submitted: EventResponse =
        submit_event(persistence, organizer, &create_event_request(total_seats)).unwrap();
    let approved: EventResponse =
        approve_event(persistence, admin, &submitted.id.to_string()).unwrap();
    EventId::new(approved.id)
}
