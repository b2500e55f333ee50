// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary layer for the event booking backend.
//!
//! Every operation is a free function over a `&mut Persistence`. Protected
//! operations take the caller as a `&User` already resolved by
//! [`AuthenticationService::authenticate`] and apply the role and approval
//! checks themselves. Transport concerns live in the server crate.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod accounts;
mod auth;
mod bookings;
mod capabilities;
mod error;
mod events;
mod password_policy;
mod request_response;

#[cfg(test)]
mod tests;

pub use accounts::{
    PreparedAdmin, PreparedRegistration, apply_profile_update, authorize_admin_registration,
    complete_admin_registration, complete_registration, find_login_account, finish_login,
    get_user_details, list_organizers, login, prepare_admin_registration, prepare_profile_update,
    prepare_registration, register, register_admin, set_organizer_status, update_profile, whoami,
};
pub use auth::{AuthConfig, AuthenticationService, AuthorizationService};
pub use bookings::{book_event, list_my_bookings};
pub use capabilities::compute_user_capabilities;
pub use error::{ApiError, AuthError, translate_domain_error, translate_persistence_error};
pub use events::{
    approve_event, get_event, list_approved_events, list_my_events, reject_event, submit_event,
};
pub use password_policy::{PasswordPolicy, PasswordPolicyError};
pub use request_response::{
    BookedEventInfo, BookingRequest, BookingResponse, Capability, CreateEventRequest,
    EventResponse, LoginRequest, LoginResponse, OrganizerStatusRequest, RegisterAdminRequest,
    RegisterRequest, UpdateProfileRequest, UserCapabilities, UserDetailsResponse, UserResponse,
    WhoAmIResponse, format_timestamp,
};
