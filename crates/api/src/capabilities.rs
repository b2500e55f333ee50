// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Capability computation for authorization-aware UI gating.
//!
//! Capabilities expose what actions a user is permitted to perform without
//! leaking domain internals. They are advisory only and do not replace the
//! gate checks in `auth`.

use crate::request_response::{Capability, UserCapabilities};
use event_booking_domain::{Role, User};

/// Computes capabilities for an authenticated user.
///
/// Capabilities depend on:
/// - User role
/// - Organizer approval status
/// - Disabled state
#[must_use]
pub fn compute_user_capabilities(user: &User) -> UserCapabilities {
    // Disabled users have no capabilities
    if user.disabled {
        return UserCapabilities {
            can_submit_events: Capability::Denied,
            can_moderate: Capability::Denied,
            can_book: Capability::Denied,
            can_manage_admins: Capability::Denied,
        };
    }

    match user.role {
        Role::Admin => UserCapabilities {
            can_submit_events: Capability::Denied,
            can_moderate: Capability::Allowed,
            can_book: Capability::Denied,
            can_manage_admins: Capability::Allowed,
        },
        Role::Organizer => UserCapabilities {
            can_submit_events: Capability::from_bool(user.is_approved_organizer()),
            can_moderate: Capability::Denied,
            can_book: Capability::Denied,
            can_manage_admins: Capability::Denied,
        },
        Role::Attendee => UserCapabilities {
            can_submit_events: Capability::Denied,
            can_moderate: Capability::Denied,
            can_book: Capability::Allowed,
            can_manage_admins: Capability::Denied,
        },
    }
}
