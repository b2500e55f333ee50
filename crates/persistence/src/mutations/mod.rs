// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Mutation modules for persistence layer.
//!
//! This module contains all state-changing operations for the persistence layer.
//!
//! ## Module Organization
//!
//! - `users`: Account creation, organizer status, profile changes
//! - `events`: Event submission and moderation status
//! - `bookings`: The guarded seat decrement and its booking records

pub mod bookings;
pub mod events;
pub mod users;

pub use bookings::book_seat;
pub use events::{create_event, set_event_status};
pub use users::{
    create_first_admin, create_user, set_organizer_status, set_user_disabled, update_user_profile,
};
