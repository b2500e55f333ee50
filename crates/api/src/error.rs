// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use crate::password_policy::PasswordPolicyError;
use event_booking::{CredentialError, TokenError};
use event_booking_domain::{DomainError, EventId, OrganizerStatus};
use event_booking_persistence::PersistenceError;
use tracing::error;

/// Authentication and authorization errors raised by the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The bearer token is missing, malformed or expired, or the account is
    /// disabled.
    Unauthenticated {
        /// The reason authentication failed.
        reason: String,
    },
    /// The token's subject no longer exists.
    UserNotFound,
    /// The caller's role is not allowed to perform the action.
    Forbidden {
        /// The action that was attempted.
        action: String,
        /// The role(s) allowed to perform the action.
        required_role: String,
    },
    /// The caller is an organizer whose account is not approved.
    OrganizerNotApproved {
        /// The organizer's current status.
        status: OrganizerStatus,
    },
    /// The user lookup failed.
    StoreFailure(String),
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unauthenticated { reason } => write!(f, "Authentication failed: {reason}"),
            Self::UserNotFound => write!(f, "User no longer exists"),
            Self::Forbidden {
                action,
                required_role,
            } => {
                write!(f, "Forbidden: '{action}' requires {required_role} role")
            }
            Self::OrganizerNotApproved { status } => {
                write!(f, "Organizer account is {status}, not approved")
            }
            Self::StoreFailure(msg) => write!(f, "User lookup failed: {msg}"),
        }
    }
}

impl std::error::Error for AuthError {}

/// API-level errors.
///
/// These are distinct from domain, core and persistence errors and represent
/// the API contract. Every variant has a stable machine-readable code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Login failed. Deliberately silent about which part was wrong.
    InvalidCredentials,
    /// The bearer token is missing, malformed or expired.
    Unauthorized {
        /// The reason authentication failed.
        reason: String,
    },
    /// The authenticated subject no longer exists.
    UserNotFound,
    /// The caller is not allowed to perform the action.
    Forbidden {
        /// The action that was attempted.
        action: String,
        /// The role(s) allowed to perform the action.
        required_role: String,
    },
    /// An organizer tried to act before approval.
    OrganizerNotApproved {
        /// The organizer's current status.
        status: OrganizerStatus,
    },
    /// The setup token for the first admin is missing or wrong.
    InvalidSetupToken,
    /// The public registration path refused the requested role.
    ForbiddenRoleRegistration {
        /// The refused role.
        role: String,
    },
    /// A requested resource was not found.
    NotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description.
        message: String,
    },
    /// An identifier was malformed.
    InvalidId {
        /// The kind of entity the identifier refers to.
        entity: String,
        /// The raw value that was supplied.
        value: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// Password does not meet policy requirements.
    PasswordPolicyViolation {
        /// A human-readable description of the violation.
        message: String,
    },
    /// The email address is already registered.
    DuplicateEmail {
        /// The normalized email address.
        email: String,
    },
    /// No seat was left at booking time.
    SoldOut {
        /// The event that is sold out.
        event_id: EventId,
    },
    /// The requested organizer status is already set.
    NoOpStatusChange {
        /// The status that is already set.
        status: OrganizerStatus,
    },
    /// An unexpected internal failure. The message is for logs only.
    Internal {
        /// A description of the failure.
        message: String,
    },
}

impl ApiError {
    /// Returns the stable machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "invalid_credentials",
            Self::Unauthorized { .. } => "unauthorized",
            Self::UserNotFound => "user_not_found",
            Self::Forbidden { .. } => "forbidden",
            Self::OrganizerNotApproved { .. } => "organizer_not_approved",
            Self::InvalidSetupToken => "invalid_setup_token",
            Self::ForbiddenRoleRegistration { .. } => "forbidden_role_registration",
            Self::NotFound { .. } => "not_found",
            Self::InvalidId { .. } => "invalid_id",
            Self::InvalidInput { .. } => "invalid_input",
            Self::PasswordPolicyViolation { .. } => "password_policy_violation",
            Self::DuplicateEmail { .. } => "duplicate_email",
            Self::SoldOut { .. } => "sold_out",
            Self::NoOpStatusChange { .. } => "no_op_status_change",
            Self::Internal { .. } => "internal_failure",
        }
    }

    pub(crate) fn not_found(resource_type: &str, message: String) -> Self {
        Self::NotFound {
            resource_type: resource_type.to_string(),
            message,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCredentials => write!(f, "Invalid email or password"),
            Self::Unauthorized { reason } => write!(f, "Not authenticated: {reason}"),
            Self::UserNotFound => write!(f, "User not found"),
            Self::Forbidden {
                action,
                required_role,
            } => {
                write!(f, "Forbidden: '{action}' requires {required_role} role")
            }
            Self::OrganizerNotApproved { status } => {
                write!(f, "Organizer account is {status}, not approved")
            }
            Self::InvalidSetupToken => write!(f, "Invalid admin setup token"),
            Self::ForbiddenRoleRegistration { role } => {
                write!(f, "Cannot register with role '{role}'")
            }
            Self::NotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::InvalidId { entity, value } => write!(f, "Invalid {entity} id: '{value}'"),
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::PasswordPolicyViolation { message } => {
                write!(f, "Password policy violation: {message}")
            }
            Self::DuplicateEmail { email } => write!(f, "Email '{email}' is already registered"),
            Self::SoldOut { event_id } => write!(f, "Event {event_id} is sold out"),
            Self::NoOpStatusChange { status } => write!(f, "Status already set to '{status}'"),
            Self::Internal { message } => write!(f, "Internal error: {message}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Unauthenticated { reason } => Self::Unauthorized { reason },
            AuthError::UserNotFound => Self::UserNotFound,
            AuthError::Forbidden {
                action,
                required_role,
            } => Self::Forbidden {
                action,
                required_role,
            },
            AuthError::OrganizerNotApproved { status } => Self::OrganizerNotApproved { status },
            AuthError::StoreFailure(message) => Self::Internal { message },
        }
    }
}

impl From<PasswordPolicyError> for ApiError {
    fn from(err: PasswordPolicyError) -> Self {
        Self::PasswordPolicyViolation {
            message: err.to_string(),
        }
    }
}

impl From<CredentialError> for ApiError {
    fn from(err: CredentialError) -> Self {
        error!(error = %err, "Password hashing failed");
        Self::Internal {
            message: err.to_string(),
        }
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => Self::Unauthorized {
                reason: String::from("Token has expired"),
            },
            TokenError::Malformed(_) => Self::Unauthorized {
                reason: String::from("Invalid token"),
            },
            TokenError::InvalidConfiguration(message) | TokenError::SigningFailed(message) => {
                error!(error = %message, "Token signing failed");
                Self::Internal { message }
            }
        }
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::InvalidId { entity, value } => ApiError::InvalidId {
            entity: entity.to_string(),
            value,
        },
        DomainError::InvalidEmail(message) => ApiError::InvalidInput {
            field: String::from("email"),
            message,
        },
        DomainError::InvalidName(message) => ApiError::InvalidInput {
            field: String::from("full_name"),
            message,
        },
        DomainError::InvalidTitle(message) => ApiError::InvalidInput {
            field: String::from("title"),
            message,
        },
        DomainError::InvalidPrice(message) => ApiError::InvalidInput {
            field: String::from("price"),
            message,
        },
        DomainError::InvalidSeatCount(count) => ApiError::InvalidInput {
            field: String::from("total_seats"),
            message: format!("Seat count must be between 0 and {}, got {count}", u32::MAX),
        },
        DomainError::InvalidRole(value) => ApiError::InvalidInput {
            field: String::from("role"),
            message: format!("Unknown role '{value}'"),
        },
        DomainError::InvalidOrganizerStatus(value) | DomainError::InvalidEventStatus(value) => {
            ApiError::InvalidInput {
                field: String::from("status"),
                message: format!("Unknown status '{value}'"),
            }
        }
        DomainError::InvalidEventTransition { from, to } => ApiError::InvalidInput {
            field: String::from("status"),
            message: format!("Event cannot move from '{from}' to '{to}'"),
        },
        DomainError::NoOpStatusChange { status } => ApiError::NoOpStatusChange { status },
        DomainError::InvalidTimestamp { value, error } => ApiError::InvalidInput {
            field: String::from("date"),
            message: format!("'{value}' is not an RFC 3339 timestamp: {error}"),
        },
        err @ (DomainError::SeatCountOutOfRange { .. }
        | DomainError::StatusWithoutOrganizerRole { .. }
        | DomainError::MissingOrganizerStatus) => {
            error!(error = %err, "Domain invariant violated");
            ApiError::Internal {
                message: err.to_string(),
            }
        }
    }
}

/// Translates a persistence error into an API error.
///
/// Store failures become `ApiError::Internal`; their detail is logged here
/// and must not reach the client.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::DuplicateEmail(email) => ApiError::DuplicateEmail { email },
        PersistenceError::SoldOut(event_id) => ApiError::SoldOut {
            event_id: EventId::new(event_id),
        },
        PersistenceError::NotFound(message) => ApiError::not_found("Resource", message),
        PersistenceError::AdminAlreadyExists => ApiError::Unauthorized {
            reason: String::from("An admin must be authenticated to add admins"),
        },
        other => {
            error!(error = %other, "Store operation failed");
            ApiError::Internal {
                message: other.to_string(),
            }
        }
    }
}
