// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::str::FromStr;

use event_booking_domain::{Role, UserId};
use time::{Duration, OffsetDateTime};

use crate::tests::helpers::{TEST_SECRET, create_test_token_service};
use crate::{IssuedToken, SigningAlgorithm, TokenError, TokenService, VerifiedToken};

#[test]
fn test_issue_then_verify_carries_subject_and_role() {
    let service: TokenService = create_test_token_service();
    let issued: IssuedToken = service.issue(UserId::new(7), Role::Attendee).unwrap();

    let verified: VerifiedToken = service.verify(&issued.token).unwrap();
    assert_eq!(verified.subject, UserId::new(7));
    assert_eq!(verified.role, Role::Attendee);
    assert_eq!(
        verified.expires_at.unix_timestamp(),
        issued.expires_at.unix_timestamp()
    );
}

#[test]
fn test_expiry_is_one_lifetime_after_issue() {
    let service: TokenService = create_test_token_service();
    let issued_at: OffsetDateTime = OffsetDateTime::now_utc();
    let issued: IssuedToken = service
        .issue_at(UserId::new(1), Role::Admin, issued_at)
        .unwrap();

    assert_eq!(issued.expires_at, issued_at + Duration::minutes(30));
}

#[test]
fn test_expired_token_is_reported_as_expired() {
    let service: TokenService = create_test_token_service();
    let issued: IssuedToken = service
        .issue_at(
            UserId::new(1),
            Role::Organizer,
            OffsetDateTime::now_utc() - Duration::hours(2),
        )
        .unwrap();

    assert_eq!(service.verify(&issued.token), Err(TokenError::Expired));
}

#[test]
fn test_wrong_secret_is_malformed() {
    let service: TokenService = create_test_token_service();
    let other: TokenService =
        TokenService::new("another-secret", SigningAlgorithm::Hs256, Duration::minutes(30))
            .unwrap();
    let issued: IssuedToken = other.issue(UserId::new(1), Role::Attendee).unwrap();

    assert!(matches!(
        service.verify(&issued.token),
        Err(TokenError::Malformed(_))
    ));
}

#[test]
fn test_expired_token_with_bad_signature_is_malformed() {
    let service: TokenService = create_test_token_service();
    let other: TokenService =
        TokenService::new("another-secret", SigningAlgorithm::Hs256, Duration::minutes(30))
            .unwrap();
    let issued: IssuedToken = other
        .issue_at(
            UserId::new(1),
            Role::Attendee,
            OffsetDateTime::now_utc() - Duration::days(1),
        )
        .unwrap();

    assert!(matches!(
        service.verify(&issued.token),
        Err(TokenError::Malformed(_))
    ));
}

#[test]
fn test_algorithm_mismatch_is_malformed() {
    let service: TokenService = create_test_token_service();
    let hs512: TokenService =
        TokenService::new(TEST_SECRET, SigningAlgorithm::Hs512, Duration::minutes(30)).unwrap();
    let issued: IssuedToken = hs512.issue(UserId::new(1), Role::Attendee).unwrap();

    assert!(matches!(
        service.verify(&issued.token),
        Err(TokenError::Malformed(_))
    ));
    assert!(hs512.verify(&issued.token).is_ok());
}

#[test]
fn test_garbage_is_malformed() {
    let service: TokenService = create_test_token_service();

    for token in ["", "abc", "a.b.c", "Bearer xyz"] {
        assert!(
            matches!(service.verify(token), Err(TokenError::Malformed(_))),
            "expected '{token}' to be malformed"
        );
    }
}

#[test]
fn test_empty_secret_is_rejected() {
    let result: Result<TokenService, TokenError> =
        TokenService::new("", SigningAlgorithm::Hs256, Duration::minutes(30));
    assert!(matches!(result, Err(TokenError::InvalidConfiguration(_))));
}

#[test]
fn test_non_positive_ttl_is_rejected() {
    let result: Result<TokenService, TokenError> =
        TokenService::new(TEST_SECRET, SigningAlgorithm::Hs256, Duration::ZERO);
    assert!(matches!(result, Err(TokenError::InvalidConfiguration(_))));
}

#[test]
fn test_signing_algorithm_parsing() {
    assert_eq!(
        SigningAlgorithm::from_str("HS384").unwrap(),
        SigningAlgorithm::Hs384
    );
    assert_eq!(
        SigningAlgorithm::from_str("hs512").unwrap(),
        SigningAlgorithm::Hs512
    );
    assert!(SigningAlgorithm::from_str("RS256").is_err());
    assert_eq!(SigningAlgorithm::default().to_string(), "HS256");
}
