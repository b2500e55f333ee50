// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for creating the first admin and adding further admins.

use std::path::PathBuf;
use std::sync::{Arc, Barrier};
use std::thread;

use event_booking::{CredentialStore, MIN_COST, SigningAlgorithm, TokenService};
use event_booking_domain::{Role, User};
use event_booking_persistence::Persistence;
use time::Duration;

use crate::tests::helpers::{
    TEST_PASSWORD, TEST_SECRET, TEST_SETUP_TOKEN, create_test_admin, create_test_attendee,
    create_test_config, create_test_persistence, load_user,
};
use crate::{
    ApiError, AuthConfig, PreparedAdmin, RegisterAdminRequest, UserResponse,
    authorize_admin_registration, complete_admin_registration, prepare_admin_registration,
    register_admin,
};

fn admin_request(email: &str) -> RegisterAdminRequest {
    RegisterAdminRequest {
        email: email.to_string(),
        full_name: String::from("Another Admin"),
        password: String::from(TEST_PASSWORD),
    }
}

#[test]
fn test_first_admin_requires_matching_setup_token() {
    let mut persistence: Persistence = create_test_persistence();
    let config: AuthConfig = create_test_config();

    let response: UserResponse = register_admin(
        &mut persistence,
        &config,
        None,
        Some(TEST_SETUP_TOKEN),
        &admin_request("root@x.com"),
    )
    .unwrap();

    assert_eq!(response.role, "admin");
    assert_eq!(response.status, None);
    assert_eq!(persistence.count_admins().unwrap(), 1);
}

#[test]
fn test_first_admin_rejects_bad_setup_token() {
    let mut persistence: Persistence = create_test_persistence();
    let config: AuthConfig = create_test_config();

    for token in [None, Some(""), Some("let-me-bootstra"), Some("let-me-bootstrapp")] {
        let result: Result<UserResponse, ApiError> = register_admin(
            &mut persistence,
            &config,
            None,
            token,
            &admin_request("root@x.com"),
        );
        assert_eq!(result, Err(ApiError::InvalidSetupToken), "token {token:?}");
    }

    assert_eq!(persistence.count_admins().unwrap(), 0);
}

#[test]
fn test_bootstrap_disabled_without_configured_token() {
    let mut persistence: Persistence = create_test_persistence();
    let config: AuthConfig = AuthConfig::new(
        CredentialStore::new(MIN_COST).unwrap(),
        TokenService::new(TEST_SECRET, SigningAlgorithm::Hs256, Duration::minutes(30)).unwrap(),
        None,
    );

    let result: Result<UserResponse, ApiError> = register_admin(
        &mut persistence,
        &config,
        None,
        Some(TEST_SETUP_TOKEN),
        &admin_request("root@x.com"),
    );

    assert_eq!(result, Err(ApiError::InvalidSetupToken));
}

#[test]
fn test_setup_token_is_useless_once_an_admin_exists() {
    let mut persistence: Persistence = create_test_persistence();
    let config: AuthConfig = create_test_config();
    create_test_admin(&mut persistence, &config);

    let result: Result<UserResponse, ApiError> = register_admin(
        &mut persistence,
        &config,
        None,
        Some(TEST_SETUP_TOKEN),
        &admin_request("second@x.com"),
    );

    assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
    assert_eq!(persistence.count_admins().unwrap(), 1);
}

#[test]
fn test_non_admin_cannot_add_admins() {
    let mut persistence: Persistence = create_test_persistence();
    let config: AuthConfig = create_test_config();
    create_test_admin(&mut persistence, &config);
    let attendee: User = create_test_attendee(&mut persistence, &config, "a@x.com");

    let result: Result<UserResponse, ApiError> = register_admin(
        &mut persistence,
        &config,
        Some(&attendee),
        Some(TEST_SETUP_TOKEN),
        &admin_request("second@x.com"),
    );

    assert!(matches!(result, Err(ApiError::Forbidden { .. })));
}

#[test]
fn test_admin_can_add_admins() {
    let mut persistence: Persistence = create_test_persistence();
    let config: AuthConfig = create_test_config();
    let admin: User = create_test_admin(&mut persistence, &config);

    let response: UserResponse = register_admin(
        &mut persistence,
        &config,
        Some(&admin),
        None,
        &admin_request("second@x.com"),
    )
    .unwrap();

    let created: User = load_user(&mut persistence, response.id);
    assert_eq!(created.role, Role::Admin);
    assert_eq!(persistence.count_admins().unwrap(), 2);
}

#[test]
fn test_admin_creation_rejects_duplicate_email() {
    let mut persistence: Persistence = create_test_persistence();
    let config: AuthConfig = create_test_config();
    let admin: User = create_test_admin(&mut persistence, &config);
    create_test_attendee(&mut persistence, &config, "taken@x.com");

    let result: Result<UserResponse, ApiError> = register_admin(
        &mut persistence,
        &config,
        Some(&admin),
        None,
        &admin_request("taken@x.com"),
    );

    assert_eq!(
        result,
        Err(ApiError::DuplicateEmail {
            email: String::from("taken@x.com")
        })
    );
}

#[test]
fn test_bootstrap_after_authorization_loses_to_an_earlier_admin() {
    let mut persistence: Persistence = create_test_persistence();
    let config: AuthConfig = create_test_config();

    authorize_admin_registration(&mut persistence, &config, None, Some(TEST_SETUP_TOKEN)).unwrap();
    let prepared: PreparedAdmin =
        prepare_admin_registration(&config, &admin_request("late@x.com")).unwrap();

    // Another request finishes the bootstrap in between
    register_admin(
        &mut persistence,
        &config,
        None,
        Some(TEST_SETUP_TOKEN),
        &admin_request("root@x.com"),
    )
    .unwrap();

    let result: Result<UserResponse, ApiError> = complete_admin_registration(
        &mut persistence,
        &config,
        None,
        Some(TEST_SETUP_TOKEN),
        &prepared,
    );

    assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
    assert_eq!(persistence.count_admins().unwrap(), 1);
    assert!(persistence.get_user_by_email("late@x.com").unwrap().is_none());
}

#[test]
fn test_completion_rechecks_an_invalid_token() {
    let mut persistence: Persistence = create_test_persistence();
    let config: AuthConfig = create_test_config();
    let prepared: PreparedAdmin =
        prepare_admin_registration(&config, &admin_request("root@x.com")).unwrap();

    let result: Result<UserResponse, ApiError> =
        complete_admin_registration(&mut persistence, &config, None, Some("guess"), &prepared);

    assert_eq!(result, Err(ApiError::InvalidSetupToken));
    assert_eq!(persistence.count_admins().unwrap(), 0);
}

#[test]
fn test_concurrent_bootstrap_creates_one_admin() {
    const CALLERS: usize = 4;

    let dir: tempfile::TempDir = tempfile::tempdir().unwrap();
    let path: PathBuf = dir.path().join("bootstrap.sqlite");
    let connections: Vec<Persistence> = (0..CALLERS)
        .map(|_| Persistence::new_with_file(&path).unwrap())
        .collect();

    let config: Arc<AuthConfig> = Arc::new(create_test_config());
    let barrier: Arc<Barrier> = Arc::new(Barrier::new(CALLERS));
    let handles: Vec<thread::JoinHandle<Result<UserResponse, ApiError>>> = connections
        .into_iter()
        .enumerate()
        .map(|(i, mut persistence)| {
            let config: Arc<AuthConfig> = Arc::clone(&config);
            let barrier: Arc<Barrier> = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                register_admin(
                    &mut persistence,
                    &config,
                    None,
                    Some(TEST_SETUP_TOKEN),
                    &admin_request(&format!("root{i}@x.com")),
                )
            })
        })
        .collect();

    let results: Vec<Result<UserResponse, ApiError>> = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect();

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(
        results
            .iter()
            .filter(|r| r.is_err())
            .all(|r| matches!(r, Err(ApiError::Unauthorized { .. })))
    );

    let mut check: Persistence = Persistence::new_with_file(&path).unwrap();
    assert_eq!(check.count_admins().unwrap(), 1);
}
