// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::types::{EventStatus, OrganizerStatus, Role};

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// An identifier could not be parsed.
    InvalidId {
        /// The kind of entity the identifier refers to.
        entity: &'static str,
        /// The raw value that was supplied.
        value: String,
    },
    /// Email address is empty or malformed.
    InvalidEmail(String),
    /// Full name is empty or invalid.
    InvalidName(String),
    /// Event title is empty or invalid.
    InvalidTitle(String),
    /// Event price is negative or not a finite number.
    InvalidPrice(String),
    /// Seat count is negative or does not fit the seat range.
    InvalidSeatCount(i64),
    /// Available seats fall outside `0..=total_seats`.
    SeatCountOutOfRange {
        /// The available seat count.
        available: i64,
        /// The total seat count.
        total: i64,
    },
    /// Role value is not recognized.
    InvalidRole(String),
    /// Organizer status value is not recognized.
    InvalidOrganizerStatus(String),
    /// Event status value is not recognized.
    InvalidEventStatus(String),
    /// A non-organizer account carries an approval status.
    StatusWithoutOrganizerRole {
        /// The role of the account.
        role: Role,
    },
    /// An organizer account has no approval status.
    MissingOrganizerStatus,
    /// The requested event transition is not permitted.
    InvalidEventTransition {
        /// The current status.
        from: EventStatus,
        /// The requested status.
        to: EventStatus,
    },
    /// The requested organizer status equals the current status.
    NoOpStatusChange {
        /// The status that is already set.
        status: OrganizerStatus,
    },
    /// A timestamp could not be parsed or formatted.
    InvalidTimestamp {
        /// The raw value.
        value: String,
        /// The underlying error message.
        error: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidId { entity, value } => {
                write!(f, "Invalid {entity} id: '{value}'")
            }
            Self::InvalidEmail(msg) => write!(f, "Invalid email: {msg}"),
            Self::InvalidName(msg) => write!(f, "Invalid name: {msg}"),
            Self::InvalidTitle(msg) => write!(f, "Invalid title: {msg}"),
            Self::InvalidPrice(msg) => write!(f, "Invalid price: {msg}"),
            Self::InvalidSeatCount(count) => {
                write!(f, "Invalid seat count: {count}")
            }
            Self::SeatCountOutOfRange { available, total } => {
                write!(
                    f,
                    "Available seats {available} outside of allowed range 0..={total}"
                )
            }
            Self::InvalidRole(value) => write!(f, "Invalid role: {value}"),
            Self::InvalidOrganizerStatus(value) => {
                write!(f, "Invalid organizer status: {value}")
            }
            Self::InvalidEventStatus(value) => write!(f, "Invalid event status: {value}"),
            Self::StatusWithoutOrganizerRole { role } => {
                write!(f, "Accounts with role '{role}' cannot carry an approval status")
            }
            Self::MissingOrganizerStatus => {
                write!(f, "Organizer accounts must carry an approval status")
            }
            Self::InvalidEventTransition { from, to } => {
                write!(f, "Event cannot transition from '{from}' to '{to}'")
            }
            Self::NoOpStatusChange { status } => {
                write!(f, "Status already set to '{status}'")
            }
            Self::InvalidTimestamp { value, error } => {
                write!(f, "Invalid timestamp '{value}': {error}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
