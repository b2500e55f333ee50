// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Query modules for persistence layer.
//!
//! This module contains all read-only queries for the persistence layer.
//!
//! ## Module Organization
//!
//! - `users`: Account lookups, organizer listings, booking lists
//! - `events`: Event lookups and status-scoped listings
//! - `bookings`: Booking record listings

pub mod bookings;
pub mod events;
pub mod users;

pub use bookings::{list_bookings_for_event, list_bookings_for_user};
pub use events::{get_event, list_events_by_ids, list_events_by_organizer, list_events_by_status};
pub use users::{count_admins, get_user_by_email, get_user_by_id, list_organizers};
