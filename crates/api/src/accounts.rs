// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Account lifecycle: registration, admin bootstrap, login and organizer
//! moderation.

use std::str::FromStr;

use crate::auth::{AuthConfig, AuthorizationService};
use crate::capabilities::compute_user_capabilities;
use crate::error::{ApiError, translate_domain_error, translate_persistence_error};
use crate::request_response::{
    BookedEventInfo, EventResponse, LoginRequest, LoginResponse, OrganizerStatusRequest,
    RegisterAdminRequest, RegisterRequest, UpdateProfileRequest, UserDetailsResponse,
    UserResponse, WhoAmIResponse, format_timestamp,
};
use event_booking::IssuedToken;
use event_booking_domain::{
    Event, EventId, OrganizerStatus, Role, User, UserId, check_organizer_status_change,
    initial_status_for, normalize_email, validate_full_name,
};
use event_booking_persistence::{Persistence, PersistenceError, ProfileChanges};
use tracing::{debug, info, warn};

/// Validated account fields with the password already hashed.
struct NewAccount {
    email: String,
    full_name: String,
    password_hash: String,
}

/// A public registration that passed validation and hashing.
///
/// Built without the store so the bcrypt work can run off the store lock.
pub struct PreparedRegistration {
    account: NewAccount,
    role: Role,
}

/// An admin registration that passed validation and hashing.
pub struct PreparedAdmin {
    account: NewAccount,
}

/// Validates account fields, checks the password policy and hashes the
/// password.
fn prepare_account(
    config: &AuthConfig,
    email: &str,
    full_name: &str,
    password: &str,
) -> Result<NewAccount, ApiError> {
    let email: String = normalize_email(email).map_err(translate_domain_error)?;
    let full_name: String = validate_full_name(full_name).map_err(translate_domain_error)?;
    config
        .password_policy
        .validate(password, &email, &full_name)?;

    let password_hash: String = config.credentials.hash(password)?;

    Ok(NewAccount {
        email,
        full_name,
        password_hash,
    })
}

/// Loads a user that was just written.
fn reload_user(persistence: &mut Persistence, user_id: UserId) -> Result<User, ApiError> {
    persistence
        .get_user_by_id(user_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::Internal {
            message: format!("User {user_id} vanished after write"),
        })
}

/// Compares a supplied setup token with the configured one without
/// short-circuiting on the first differing byte.
fn setup_token_matches(expected: &str, supplied: &str) -> bool {
    let expected: &[u8] = expected.as_bytes();
    let supplied: &[u8] = supplied.as_bytes();

    expected.len() == supplied.len()
        && expected
            .iter()
            .zip(supplied)
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}

fn setup_token_valid(config: &AuthConfig, setup_token: Option<&str>) -> bool {
    match (config.admin_setup_token.as_deref(), setup_token) {
        (Some(expected), Some(supplied)) => setup_token_matches(expected, supplied),
        _ => false,
    }
}

fn require_admin_caller(caller: Option<&User>) -> Result<&User, ApiError> {
    let Some(caller) = caller else {
        return Err(ApiError::Unauthorized {
            reason: String::from("An admin must be authenticated to add admins"),
        });
    };
    AuthorizationService::require_admin(caller, "register_admin")?;
    Ok(caller)
}

/// Validates a public registration and hashes its password. Does not touch
/// the store.
///
/// # Errors
///
/// Returns `ApiError::ForbiddenRoleRegistration` for the admin role, and
/// validation or password policy errors for bad input.
pub fn prepare_registration(
    config: &AuthConfig,
    request: &RegisterRequest,
) -> Result<PreparedRegistration, ApiError> {
    let role: Role = Role::from_str(request.role.trim()).map_err(translate_domain_error)?;
    if role == Role::Admin {
        warn!("Public registration requested the admin role");
        return Err(ApiError::ForbiddenRoleRegistration {
            role: role.to_string(),
        });
    }

    let account: NewAccount =
        prepare_account(config, &request.email, &request.full_name, &request.password)?;

    Ok(PreparedRegistration { account, role })
}

/// Stores a prepared public registration.
///
/// Organizers start `pending`; attendees carry no status.
///
/// # Errors
///
/// Returns `ApiError::DuplicateEmail` if the email is taken.
pub fn complete_registration(
    persistence: &mut Persistence,
    prepared: &PreparedRegistration,
) -> Result<UserResponse, ApiError> {
    let PreparedRegistration { account, role } = prepared;

    let user_id: UserId = persistence
        .create_user(
            &account.email,
            &account.full_name,
            &account.password_hash,
            *role,
            initial_status_for(*role),
        )
        .map_err(translate_persistence_error)?;

    info!(%user_id, %role, "Registered account");

    UserResponse::try_from(&reload_user(persistence, user_id)?)
}

/// Registers an account through the public path.
///
/// # Errors
///
/// Returns `ApiError::ForbiddenRoleRegistration` for the admin role,
/// `ApiError::DuplicateEmail` if the email is taken, and validation or
/// password policy errors for bad input.
pub fn register(
    persistence: &mut Persistence,
    config: &AuthConfig,
    request: &RegisterRequest,
) -> Result<UserResponse, ApiError> {
    let prepared: PreparedRegistration = prepare_registration(config, request)?;
    complete_registration(persistence, &prepared)
}

/// Checks whether an admin may be created, before any hashing happens.
///
/// With no admin in the store, `setup_token` must match the configured
/// bootstrap secret. Once an admin exists, `caller` must be an authenticated
/// admin and the setup token is ignored. [`complete_admin_registration`]
/// repeats the decision atomically with the insert.
///
/// # Errors
///
/// Returns `ApiError::InvalidSetupToken` during bootstrap if the token is
/// missing, wrong or not configured, and `ApiError::Unauthorized` or
/// `ApiError::Forbidden` if an admin exists and the caller is not one.
pub fn authorize_admin_registration(
    persistence: &mut Persistence,
    config: &AuthConfig,
    caller: Option<&User>,
    setup_token: Option<&str>,
) -> Result<(), ApiError> {
    let admin_count: i64 = persistence
        .count_admins()
        .map_err(translate_persistence_error)?;

    if admin_count == 0 {
        if !setup_token_valid(config, setup_token) {
            warn!("Admin bootstrap attempted with an invalid setup token");
            return Err(ApiError::InvalidSetupToken);
        }
        return Ok(());
    }

    require_admin_caller(caller).map(|_| ())
}

/// Validates an admin registration and hashes its password. Does not touch
/// the store.
///
/// # Errors
///
/// Returns validation or password policy errors for bad input.
pub fn prepare_admin_registration(
    config: &AuthConfig,
    request: &RegisterAdminRequest,
) -> Result<PreparedAdmin, ApiError> {
    let account: NewAccount =
        prepare_account(config, &request.email, &request.full_name, &request.password)?;
    Ok(PreparedAdmin { account })
}

/// Stores a prepared admin registration.
///
/// A valid setup token first tries the bootstrap insert, which only succeeds
/// while no admin exists. If an admin already exists the caller must be an
/// authenticated admin.
///
/// # Errors
///
/// Returns `ApiError::InvalidSetupToken` if no admin exists and the token is
/// not valid, `ApiError::Unauthorized` or `ApiError::Forbidden` if an admin
/// exists and the caller is not one, and `ApiError::DuplicateEmail` if the
/// email is taken.
pub fn complete_admin_registration(
    persistence: &mut Persistence,
    config: &AuthConfig,
    caller: Option<&User>,
    setup_token: Option<&str>,
    prepared: &PreparedAdmin,
) -> Result<UserResponse, ApiError> {
    let account: &NewAccount = &prepared.account;

    if setup_token_valid(config, setup_token) {
        match persistence.create_first_admin(
            &account.email,
            &account.full_name,
            &account.password_hash,
        ) {
            Ok(user_id) => {
                info!(%user_id, bootstrap = true, "Created admin account");
                return UserResponse::try_from(&reload_user(persistence, user_id)?);
            }
            Err(PersistenceError::AdminAlreadyExists) => {
                debug!("Setup token ignored: an admin already exists");
            }
            Err(err) => return Err(translate_persistence_error(err)),
        }
    } else if persistence
        .count_admins()
        .map_err(translate_persistence_error)?
        == 0
    {
        warn!("Admin bootstrap attempted with an invalid setup token");
        return Err(ApiError::InvalidSetupToken);
    }

    let caller: &User = require_admin_caller(caller)?;

    let user_id: UserId = persistence
        .create_user(
            &account.email,
            &account.full_name,
            &account.password_hash,
            Role::Admin,
            None,
        )
        .map_err(translate_persistence_error)?;

    info!(
        %user_id,
        bootstrap = false,
        created_by = %caller.id,
        "Created admin account"
    );

    UserResponse::try_from(&reload_user(persistence, user_id)?)
}

/// Creates an admin account.
///
/// The setup token creates the first admin; later admins need an admin
/// caller. See [`authorize_admin_registration`].
///
/// # Errors
///
/// Returns `ApiError::InvalidSetupToken` during bootstrap if the token is
/// missing, wrong or not configured, `ApiError::Unauthorized` or
/// `ApiError::Forbidden` if an admin exists and the caller is not one, and
/// `ApiError::DuplicateEmail` if the email is taken.
pub fn register_admin(
    persistence: &mut Persistence,
    config: &AuthConfig,
    caller: Option<&User>,
    setup_token: Option<&str>,
    request: &RegisterAdminRequest,
) -> Result<UserResponse, ApiError> {
    authorize_admin_registration(persistence, config, caller, setup_token)?;
    let prepared: PreparedAdmin = prepare_admin_registration(config, request)?;
    complete_admin_registration(persistence, config, caller, setup_token, &prepared)
}

/// Looks up the account a login attempt names.
///
/// A malformed email finds nothing.
///
/// # Errors
///
/// Returns an error only if the store lookup fails.
pub fn find_login_account(
    persistence: &mut Persistence,
    email: &str,
) -> Result<Option<User>, ApiError> {
    let Ok(email) = normalize_email(email) else {
        return Ok(None);
    };

    persistence
        .get_user_by_email(&email)
        .map_err(translate_persistence_error)
}

/// Checks the password for a looked-up account and issues an identity
/// token. Does not touch the store.
///
/// A missing account still pays for one password verification.
///
/// # Errors
///
/// Returns `ApiError::InvalidCredentials` if the credentials do not match,
/// or `ApiError::OrganizerNotApproved` for an unapproved organizer.
pub fn finish_login(
    config: &AuthConfig,
    account: Option<&User>,
    password: &str,
) -> Result<LoginResponse, ApiError> {
    let Some(user) = account else {
        config.credentials.verify_decoy(password);
        debug!("Login rejected: unknown email");
        return Err(ApiError::InvalidCredentials);
    };

    if !config.credentials.verify(password, &user.password_hash) {
        warn!(user_id = %user.id, "Login rejected: password mismatch");
        return Err(ApiError::InvalidCredentials);
    }

    if user.disabled {
        warn!(user_id = %user.id, "Login rejected: account disabled");
        return Err(ApiError::InvalidCredentials);
    }

    if user.role == Role::Organizer && !user.is_approved_organizer() {
        let status: OrganizerStatus = user.status.unwrap_or(OrganizerStatus::Pending);
        warn!(user_id = %user.id, %status, "Login rejected: organizer not approved");
        return Err(ApiError::OrganizerNotApproved { status });
    }

    let issued: IssuedToken = config.tokens.issue(user.id, user.role)?;

    info!(user_id = %user.id, role = %user.role, "User logged in");

    Ok(LoginResponse {
        id: user.id.value(),
        access_token: issued.token,
        token_type: String::from("bearer"),
        expires_at: format_timestamp(issued.expires_at)?,
        user_role: user.role.to_string(),
        user_status: user.status.map(|status| status.to_string()),
    })
}

/// Logs in with email and password and issues an identity token.
///
/// Unknown emails, wrong passwords and disabled accounts all fail with the
/// same error. The organizer approval check runs only after the password
/// has been verified.
///
/// # Errors
///
/// Returns `ApiError::InvalidCredentials` if the credentials do not match,
/// or `ApiError::OrganizerNotApproved` for an unapproved organizer.
pub fn login(
    persistence: &mut Persistence,
    config: &AuthConfig,
    request: &LoginRequest,
) -> Result<LoginResponse, ApiError> {
    let account: Option<User> = find_login_account(persistence, &request.email)?;
    finish_login(config, account.as_ref(), &request.password)
}

/// Sets an organizer's approval status. Admin only.
///
/// The optional reason is logged and not stored.
///
/// # Errors
///
/// Returns `ApiError::InvalidId` for a malformed id, `ApiError::NotFound` if
/// the target is not an organizer, and `ApiError::NoOpStatusChange` if the
/// status is already set.
pub fn set_organizer_status(
    persistence: &mut Persistence,
    admin: &User,
    target_id: &str,
    request: &OrganizerStatusRequest,
) -> Result<UserResponse, ApiError> {
    AuthorizationService::require_admin(admin, "set_organizer_status")?;

    let target_id: UserId = UserId::from_str(target_id).map_err(translate_domain_error)?;
    let status: OrganizerStatus =
        OrganizerStatus::from_str(request.status.trim()).map_err(translate_domain_error)?;

    let target: User = persistence
        .get_user_by_id(target_id)
        .map_err(translate_persistence_error)?
        .filter(|user| user.role == Role::Organizer)
        .ok_or_else(|| ApiError::not_found("Organizer", format!("No organizer with id {target_id}")))?;

    check_organizer_status_change(target.status, status).map_err(translate_domain_error)?;

    persistence
        .set_organizer_status(target_id, status)
        .map_err(translate_persistence_error)?;

    info!(
        admin_id = %admin.id,
        organizer_id = %target_id,
        previous = ?target.status,
        %status,
        reason = request.reason.as_deref().unwrap_or(""),
        "Changed organizer status"
    );

    UserResponse::try_from(&reload_user(persistence, target_id)?)
}

/// Lists organizers, optionally filtered by status. Admin only.
///
/// # Errors
///
/// Returns `ApiError::Forbidden` for non-admins and `ApiError::InvalidInput`
/// for an unknown status filter.
pub fn list_organizers(
    persistence: &mut Persistence,
    admin: &User,
    status: Option<&str>,
) -> Result<Vec<UserResponse>, ApiError> {
    AuthorizationService::require_admin(admin, "list_organizers")?;

    let status: Option<OrganizerStatus> = status
        .map(|raw| OrganizerStatus::from_str(raw.trim()))
        .transpose()
        .map_err(translate_domain_error)?;

    persistence
        .list_organizers(status)
        .map_err(translate_persistence_error)?
        .iter()
        .map(UserResponse::try_from)
        .collect()
}

/// Returns the caller's profile with advisory capabilities.
///
/// # Errors
///
/// Returns an error if the profile cannot be rendered.
pub fn whoami(user: &User) -> Result<WhoAmIResponse, ApiError> {
    Ok(WhoAmIResponse {
        user: UserResponse::try_from(user)?,
        capabilities: compute_user_capabilities(user),
    })
}

/// Validates a profile update and hashes a new password. Does not touch
/// the store.
///
/// Role and status cannot be changed this way.
///
/// # Errors
///
/// Returns validation or password policy errors for bad input.
pub fn prepare_profile_update(
    config: &AuthConfig,
    caller: &User,
    request: &UpdateProfileRequest,
) -> Result<ProfileChanges, ApiError> {
    let email: Option<String> = request
        .email
        .as_deref()
        .map(normalize_email)
        .transpose()
        .map_err(translate_domain_error)?
        .filter(|email| *email != caller.email);
    let full_name: Option<String> = request
        .full_name
        .as_deref()
        .map(validate_full_name)
        .transpose()
        .map_err(translate_domain_error)?;

    let password_hash: Option<String> = match request.password.as_deref() {
        Some(password) => {
            config.password_policy.validate(
                password,
                email.as_deref().unwrap_or(&caller.email),
                full_name.as_deref().unwrap_or(&caller.full_name),
            )?;
            Some(config.credentials.hash(password)?)
        }
        None => None,
    };

    Ok(ProfileChanges {
        email,
        full_name,
        password_hash,
    })
}

/// Writes prepared profile changes for the caller.
///
/// # Errors
///
/// Returns `ApiError::DuplicateEmail` if the new email is taken.
pub fn apply_profile_update(
    persistence: &mut Persistence,
    caller: &User,
    changes: &ProfileChanges,
) -> Result<UserResponse, ApiError> {
    if !changes.is_empty() {
        persistence
            .update_user_profile(caller.id, changes)
            .map_err(translate_persistence_error)?;
        info!(
            user_id = %caller.id,
            email_changed = changes.email.is_some(),
            name_changed = changes.full_name.is_some(),
            password_changed = changes.password_hash.is_some(),
            "Updated profile"
        );
    }

    UserResponse::try_from(&reload_user(persistence, caller.id)?)
}

/// Updates the caller's own name, email or password.
///
/// # Errors
///
/// Returns `ApiError::DuplicateEmail` if the new email is taken, and
/// validation or password policy errors for bad input.
pub fn update_profile(
    persistence: &mut Persistence,
    config: &AuthConfig,
    caller: &User,
    request: &UpdateProfileRequest,
) -> Result<UserResponse, ApiError> {
    let changes: ProfileChanges = prepare_profile_update(config, caller, request)?;
    apply_profile_update(persistence, caller, &changes)
}

/// Returns a user's public profile and expanded booking list.
///
/// The caller must be the same user or an admin. Booking entries whose
/// event no longer exists are skipped.
///
/// # Errors
///
/// Returns `ApiError::InvalidId` for a malformed id, `ApiError::Forbidden`
/// for other non-admin callers, and `ApiError::NotFound` if the user does
/// not exist.
pub fn get_user_details(
    persistence: &mut Persistence,
    caller: &User,
    user_id: &str,
) -> Result<UserDetailsResponse, ApiError> {
    let user_id: UserId = UserId::from_str(user_id).map_err(translate_domain_error)?;

    if caller.id != user_id {
        AuthorizationService::require_admin(caller, "get_user_details")?;
    }

    let user: User = persistence
        .get_user_by_id(user_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::not_found("User", format!("No user with id {user_id}")))?;

    let event_ids: Vec<EventId> = user
        .booked_events
        .iter()
        .map(|entry| entry.event_id)
        .collect();
    let events: Vec<Event> = persistence
        .list_events_by_ids(&event_ids)
        .map_err(translate_persistence_error)?;

    let mut booked_events: Vec<BookedEventInfo> = Vec::with_capacity(user.booked_events.len());
    for entry in &user.booked_events {
        let Some(event) = events.iter().find(|event| event.id == entry.event_id) else {
            continue;
        };
        booked_events.push(BookedEventInfo {
            user_email: entry.user_email.clone(),
            event: EventResponse::try_from(event)?,
        });
    }

    Ok(UserDetailsResponse {
        user: UserResponse::try_from(&user)?,
        booked_events,
    })
}
