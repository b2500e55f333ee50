// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::{EventId, OrganizerStatus, Role, UserId};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// One entry of a user's ordered booking list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingEntry {
    /// The booked event.
    pub event_id: EventId,
    /// The email the booking was made under.
    pub user_email: String,
}

/// A registered account.
///
/// Construct persisted users through [`User::new`], which enforces the
/// role/status invariant: only organizers carry an approval status, and
/// every organizer carries one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// The store-assigned identifier.
    pub id: UserId,
    /// Globally unique, normalized email address.
    pub email: String,
    /// Display name.
    pub full_name: String,
    /// Salted one-way password hash.
    pub password_hash: String,
    /// The account role.
    pub role: Role,
    /// Approval status; `Some` exactly when `role` is `Organizer`.
    pub status: Option<OrganizerStatus>,
    /// Disabled accounts can neither log in nor authenticate.
    pub disabled: bool,
    /// When the account was created.
    pub created_at: OffsetDateTime,
    /// Booked events, in booking order.
    pub booked_events: Vec<BookingEntry>,
}

impl User {
    /// Creates a user after checking the role/status invariant.
    ///
    /// # Errors
    ///
    /// Returns an error if the status does not match the role.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: UserId,
        email: String,
        full_name: String,
        password_hash: String,
        role: Role,
        status: Option<OrganizerStatus>,
        disabled: bool,
        created_at: OffsetDateTime,
        booked_events: Vec<BookingEntry>,
    ) -> Result<Self, DomainError> {
        validate_account_status(role, status)?;
        Ok(Self {
            id,
            email,
            full_name,
            password_hash,
            role,
            status,
            disabled,
            created_at,
            booked_events,
        })
    }

    /// Returns whether this user is an organizer with `status = approved`.
    #[must_use]
    pub fn is_approved_organizer(&self) -> bool {
        self.role == Role::Organizer && self.status == Some(OrganizerStatus::Approved)
    }
}

/// Returns the initial approval status for a newly registered role.
#[must_use]
pub const fn initial_status_for(role: Role) -> Option<OrganizerStatus> {
    match role {
        Role::Organizer => Some(OrganizerStatus::Pending),
        Role::Admin | Role::Attendee => None,
    }
}

/// Validates that a status is present exactly when the role is `Organizer`.
///
/// # Errors
///
/// Returns an error if a non-organizer carries a status or an organizer has none.
pub fn validate_account_status(
    role: Role,
    status: Option<OrganizerStatus>,
) -> Result<(), DomainError> {
    match (role, status) {
        (Role::Organizer, Some(_)) | (Role::Admin | Role::Attendee, None) => Ok(()),
        (Role::Organizer, None) => Err(DomainError::MissingOrganizerStatus),
        (role, Some(_)) => Err(DomainError::StatusWithoutOrganizerRole { role }),
    }
}

/// Checks that an organizer status update actually changes the status.
///
/// # Errors
///
/// Returns `DomainError::NoOpStatusChange` if `requested` equals `current`.
pub fn check_organizer_status_change(
    current: Option<OrganizerStatus>,
    requested: OrganizerStatus,
) -> Result<(), DomainError> {
    if current == Some(requested) {
        return Err(DomainError::NoOpStatusChange { status: requested });
    }
    Ok(())
}
