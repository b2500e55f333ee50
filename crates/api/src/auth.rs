// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The authorization gate.
//!
//! Protected operations run three checks, always in this order:
//!
//! 1. [`AuthenticationService::authenticate`] resolves the bearer token to a
//!    stored user
//! 2. [`AuthorizationService::require_role`] checks the caller's role
//! 3. [`AuthorizationService::require_approved_organizer`] checks organizer
//!    approval
//!
//! Checking the role first means a non-organizer never sees an
//! organizer-specific error.

use crate::error::AuthError;
use crate::password_policy::PasswordPolicy;
use event_booking::{CredentialStore, TokenError, TokenService, VerifiedToken};
use event_booking_domain::{OrganizerStatus, Role, User};
use event_booking_persistence::Persistence;
use tracing::{debug, warn};

/// Credential and token settings shared by every request.
pub struct AuthConfig {
    /// Password hashing.
    pub credentials: CredentialStore,
    /// Identity token issuing and verification.
    pub tokens: TokenService,
    /// Secret required to create the first admin. `None` disables bootstrap.
    pub admin_setup_token: Option<String>,
    /// Password requirements for new and changed passwords.
    pub password_policy: PasswordPolicy,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("credentials", &self.credentials)
            .field("tokens", &self.tokens)
            .field("admin_setup_token", &self.admin_setup_token.is_some())
            .field("password_policy", &self.password_policy)
            .finish()
    }
}

impl AuthConfig {
    /// Creates a configuration with the default password policy.
    #[must_use]
    pub fn new(
        credentials: CredentialStore,
        tokens: TokenService,
        admin_setup_token: Option<String>,
    ) -> Self {
        Self {
            credentials,
            tokens,
            admin_setup_token,
            password_policy: PasswordPolicy::default(),
        }
    }
}

/// Resolves identity tokens to stored users.
pub struct AuthenticationService;

impl AuthenticationService {
    /// Authenticates a bearer token.
    ///
    /// The stored role is authoritative; the role carried in the token is
    /// informational only.
    ///
    /// # Arguments
    ///
    /// * `persistence` - The persistence layer
    /// * `tokens` - The token service
    /// * `token` - The raw bearer token
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Unauthenticated` if the token is invalid or
    /// expired or the account is disabled, and `AuthError::UserNotFound` if
    /// the subject no longer exists.
    pub fn authenticate(
        persistence: &mut Persistence,
        tokens: &TokenService,
        token: &str,
    ) -> Result<User, AuthError> {
        let verified: VerifiedToken = tokens.verify(token).map_err(|e| {
            warn!(error = %e, "Rejected identity token");
            AuthError::Unauthenticated {
                reason: match e {
                    TokenError::Expired => String::from("Token has expired"),
                    _ => String::from("Invalid token"),
                },
            }
        })?;

        let user: User = persistence
            .get_user_by_id(verified.subject)
            .map_err(|e| AuthError::StoreFailure(e.to_string()))?
            .ok_or_else(|| {
                warn!(user_id = %verified.subject, "Token subject no longer exists");
                AuthError::UserNotFound
            })?;

        if user.disabled {
            warn!(user_id = %user.id, "Disabled account presented a token");
            return Err(AuthError::Unauthenticated {
                reason: String::from("Account is disabled"),
            });
        }

        if user.role != verified.role {
            debug!(
                user_id = %user.id,
                token_role = %verified.role,
                stored_role = %user.role,
                "Token role differs from stored role"
            );
        }

        Ok(user)
    }
}

/// Authorization service for enforcing role-based access control.
///
/// This service determines whether an authenticated user has permission to
/// perform a specific action based on their role and approval status.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Checks that the user's role is one of `allowed`.
    ///
    /// # Arguments
    ///
    /// * `user` - The authenticated user
    /// * `allowed` - The roles allowed to perform the action
    /// * `action` - The action name, for error reporting
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Forbidden` if the role is not allowed.
    pub fn require_role(user: &User, allowed: &[Role], action: &str) -> Result<(), AuthError> {
        if allowed.contains(&user.role) {
            return Ok(());
        }

        warn!(user_id = %user.id, role = %user.role, action, "Role check failed");
        Err(AuthError::Forbidden {
            action: action.to_string(),
            required_role: allowed
                .iter()
                .map(Role::as_str)
                .collect::<Vec<&str>>()
                .join(" or "),
        })
    }

    /// Checks that an organizer is approved.
    ///
    /// Attendees and admins pass unconditionally.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::OrganizerNotApproved` if the user is an organizer
    /// whose status is not `approved`.
    pub fn require_approved_organizer(user: &User, action: &str) -> Result<(), AuthError> {
        if user.role != Role::Organizer || user.is_approved_organizer() {
            return Ok(());
        }

        let status: OrganizerStatus = user.status.unwrap_or(OrganizerStatus::Pending);
        warn!(user_id = %user.id, %status, action, "Unapproved organizer attempted action");
        Err(AuthError::OrganizerNotApproved { status })
    }

    /// Checks that the user is an admin.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Forbidden` if the user is not an admin.
    pub fn require_admin(user: &User, action: &str) -> Result<(), AuthError> {
        Self::require_role(user, &[Role::Admin], action)
    }

    /// Checks that the user is an approved organizer, role first.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Forbidden` for non-organizers and
    /// `AuthError::OrganizerNotApproved` for unapproved organizers.
    pub fn require_active_organizer(user: &User, action: &str) -> Result<(), AuthError> {
        Self::require_role(user, &[Role::Organizer], action)?;
        Self::require_approved_organizer(user, action)
    }
}
