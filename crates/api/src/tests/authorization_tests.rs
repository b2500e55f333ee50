// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for the authorization gate.

use event_booking::IssuedToken;
use event_booking_domain::{OrganizerStatus, Role, User, UserId};
use event_booking_persistence::Persistence;
use time::{Duration, OffsetDateTime};

use crate::tests::helpers::{
    create_approved_organizer, create_event_request, create_test_admin, create_test_attendee,
    create_test_config, create_test_organizer, create_test_persistence,
};
use crate::{
    ApiError, AuthConfig, AuthError, AuthenticationService, AuthorizationService, EventResponse,
    UserResponse, approve_event, list_my_events, list_organizers, submit_event,
};

fn issue(config: &AuthConfig, user: &User) -> String {
    config.tokens.issue(user.id, user.role).unwrap().token
}

#[test]
fn test_authenticate_resolves_stored_user() {
    let mut persistence: Persistence = create_test_persistence();
    let config: AuthConfig = create_test_config();
    let user: User = create_test_attendee(&mut persistence, &config, "a@x.com");

    let authenticated: User =
        AuthenticationService::authenticate(&mut persistence, &config.tokens, &issue(&config, &user))
            .unwrap();

    assert_eq!(authenticated, user);
}

#[test]
fn test_authenticate_rejects_expired_token() {
    let mut persistence: Persistence = create_test_persistence();
    let config: AuthConfig = create_test_config();
    let user: User = create_test_attendee(&mut persistence, &config, "a@x.com");

    let issued: IssuedToken = config
        .tokens
        .issue_at(user.id, user.role, OffsetDateTime::now_utc() - Duration::hours(2))
        .unwrap();
    let result: Result<User, AuthError> =
        AuthenticationService::authenticate(&mut persistence, &config.tokens, &issued.token);

    assert_eq!(
        result,
        Err(AuthError::Unauthenticated {
            reason: String::from("Token has expired")
        })
    );
}

#[test]
fn test_authenticate_rejects_malformed_token() {
    let mut persistence: Persistence = create_test_persistence();
    let config: AuthConfig = create_test_config();

    for token in ["", "not-a-token", "a.b.c"] {
        let result: Result<User, AuthError> =
            AuthenticationService::authenticate(&mut persistence, &config.tokens, token);
        assert_eq!(
            result,
            Err(AuthError::Unauthenticated {
                reason: String::from("Invalid token")
            }),
            "token {token:?}"
        );
    }
}

#[test]
fn test_authenticate_reports_missing_subject() {
    let mut persistence: Persistence = create_test_persistence();
    let config: AuthConfig = create_test_config();

    let token: String = config
        .tokens
        .issue(UserId::new(404), Role::Attendee)
        .unwrap()
        .token;
    let result: Result<User, AuthError> =
        AuthenticationService::authenticate(&mut persistence, &config.tokens, &token);

    assert_eq!(result, Err(AuthError::UserNotFound));
    assert_eq!(
        result.map_err(ApiError::from),
        Err(ApiError::UserNotFound)
    );
}

#[test]
fn test_authenticate_rejects_disabled_account() {
    let mut persistence: Persistence = create_test_persistence();
    let config: AuthConfig = create_test_config();
    let user: User = create_test_attendee(&mut persistence, &config, "a@x.com");
    let token: String = issue(&config, &user);
    persistence.set_user_disabled(user.id, true).unwrap();

    let result: Result<User, AuthError> =
        AuthenticationService::authenticate(&mut persistence, &config.tokens, &token);

    assert!(matches!(result, Err(AuthError::Unauthenticated { .. })));
}

#[test]
fn test_stored_role_is_authoritative() {
    let mut persistence: Persistence = create_test_persistence();
    let config: AuthConfig = create_test_config();
    let user: User = create_test_attendee(&mut persistence, &config, "a@x.com");

    // A token claiming admin for an attendee account
    let token: String = config.tokens.issue(user.id, Role::Admin).unwrap().token;
    let authenticated: User =
        AuthenticationService::authenticate(&mut persistence, &config.tokens, &token).unwrap();

    assert_eq!(authenticated.role, Role::Attendee);
    let result: Result<Vec<UserResponse>, ApiError> =
        list_organizers(&mut persistence, &authenticated, None);
    assert!(matches!(result, Err(ApiError::Forbidden { .. })));
}

#[test]
fn test_require_role_lists_allowed_roles() {
    let mut persistence: Persistence = create_test_persistence();
    let config: AuthConfig = create_test_config();
    let attendee: User = create_test_attendee(&mut persistence, &config, "a@x.com");

    assert!(AuthorizationService::require_role(&attendee, &[Role::Attendee], "book").is_ok());

    let result: Result<(), AuthError> = AuthorizationService::require_role(
        &attendee,
        &[Role::Admin, Role::Organizer],
        "moderate",
    );
    assert_eq!(
        result,
        Err(AuthError::Forbidden {
            action: String::from("moderate"),
            required_role: String::from("admin or organizer"),
        })
    );
}

#[test]
fn test_approval_check_only_applies_to_organizers() {
    let mut persistence: Persistence = create_test_persistence();
    let config: AuthConfig = create_test_config();
    let admin: User = create_test_admin(&mut persistence, &config);
    let attendee: User = create_test_attendee(&mut persistence, &config, "a@x.com");
    let pending: User = create_test_organizer(&mut persistence, &config, "p@x.com");
    let approved: User = create_approved_organizer(&mut persistence, &config, &admin, "o@x.com");

    assert!(AuthorizationService::require_approved_organizer(&admin, "x").is_ok());
    assert!(AuthorizationService::require_approved_organizer(&attendee, "x").is_ok());
    assert!(AuthorizationService::require_approved_organizer(&approved, "x").is_ok());
    assert_eq!(
        AuthorizationService::require_approved_organizer(&pending, "x"),
        Err(AuthError::OrganizerNotApproved {
            status: OrganizerStatus::Pending
        })
    );
}

#[test]
fn test_role_is_checked_before_approval() {
    let mut persistence: Persistence = create_test_persistence();
    let config: AuthConfig = create_test_config();
    let attendee: User = create_test_attendee(&mut persistence, &config, "a@x.com");
    let pending: User = create_test_organizer(&mut persistence, &config, "p@x.com");

    let attendee_result: Result<EventResponse, ApiError> =
        submit_event(&mut persistence, &attendee, &create_event_request(10));
    assert!(matches!(attendee_result, Err(ApiError::Forbidden { .. })));

    let pending_result: Result<EventResponse, ApiError> =
        submit_event(&mut persistence, &pending, &create_event_request(10));
    assert_eq!(
        pending_result,
        Err(ApiError::OrganizerNotApproved {
            status: OrganizerStatus::Pending
        })
    );

    let dashboard: Result<Vec<EventResponse>, ApiError> =
        list_my_events(&mut persistence, &attendee);
    assert!(matches!(dashboard, Err(ApiError::Forbidden { .. })));
}

#[test]
fn test_attendee_cannot_use_admin_operations() {
    let mut persistence: Persistence = create_test_persistence();
    let config: AuthConfig = create_test_config();
    let attendee: User = create_test_attendee(&mut persistence, &config, "a@x.com");

    let moderation: Result<EventResponse, ApiError> =
        approve_event(&mut persistence, &attendee, "1");
    assert!(matches!(moderation, Err(ApiError::Forbidden { .. })));

    let listing: Result<Vec<UserResponse>, ApiError> =
        list_organizers(&mut persistence, &attendee, None);
    assert!(matches!(listing, Err(ApiError::Forbidden { .. })));
}
