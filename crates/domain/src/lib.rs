// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod error;
mod event;
mod types;
mod user;
mod validation;

#[cfg(test)]
mod tests;

// Re-export public types
pub use error::DomainError;
pub use event::{Booking, Event, NewEvent};
pub use types::{BookingId, EventId, EventStatus, OrganizerStatus, Role, UserId};
pub use user::{
    BookingEntry, User, check_organizer_status_change, initial_status_for,
    validate_account_status,
};
pub use validation::{
    normalize_email, validate_full_name, validate_price, validate_seat_count, validate_title,
};
