// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.

use crate::error::ApiError;
use event_booking_domain::{Booking, Event, User};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// Formats a timestamp for a response body.
///
/// # Errors
///
/// Returns an error if the timestamp cannot be represented in RFC 3339.
pub fn format_timestamp(value: OffsetDateTime) -> Result<String, ApiError> {
    value.format(&Rfc3339).map_err(|e| ApiError::Internal {
        message: format!("Failed to format timestamp: {e}"),
    })
}

fn default_role() -> String {
    String::from("attendee")
}

/// API request to register an account through the public path.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RegisterRequest {
    /// The account email.
    pub email: String,
    /// The display name.
    pub full_name: String,
    /// The plaintext password.
    pub password: String,
    /// The requested role. Defaults to `attendee`.
    #[serde(default = "default_role")]
    pub role: String,
}

/// API request to create an admin account.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RegisterAdminRequest {
    /// The admin email.
    pub email: String,
    /// The display name.
    pub full_name: String,
    /// The plaintext password.
    pub password: String,
}

/// API request to log in.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LoginRequest {
    /// The account email.
    pub email: String,
    /// The plaintext password.
    pub password: String,
}

/// API response for a successful login.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LoginResponse {
    /// The user id.
    pub id: i64,
    /// The signed identity token.
    pub access_token: String,
    /// Always `bearer`.
    pub token_type: String,
    /// Token expiration timestamp (RFC 3339).
    pub expires_at: String,
    /// The user's role.
    pub user_role: String,
    /// The organizer approval status, if any.
    pub user_status: Option<String>,
}

/// Public profile of an account. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UserResponse {
    /// The user id.
    pub id: i64,
    /// The normalized email.
    pub email: String,
    /// The display name.
    pub full_name: String,
    /// The account role.
    pub role: String,
    /// The organizer approval status, if any.
    pub status: Option<String>,
    /// Whether the account is disabled.
    pub disabled: bool,
    /// Account creation timestamp (RFC 3339).
    pub created_at: String,
}

impl TryFrom<&User> for UserResponse {
    type Error = ApiError;

    fn try_from(user: &User) -> Result<Self, Self::Error> {
        Ok(Self {
            id: user.id.value(),
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            role: user.role.to_string(),
            status: user.status.map(|status| status.to_string()),
            disabled: user.disabled,
            created_at: format_timestamp(user.created_at)?,
        })
    }
}

/// One expanded entry of a user's booking list.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BookedEventInfo {
    /// The email the booking was made under.
    pub user_email: String,
    /// The booked event.
    pub event: EventResponse,
}

/// API response for the user details endpoint.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct UserDetailsResponse {
    /// The public profile.
    pub user: UserResponse,
    /// Booked events in booking order. Entries whose event is gone are omitted.
    pub booked_events: Vec<BookedEventInfo>,
}

/// API request to change an organizer's approval status.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct OrganizerStatusRequest {
    /// The new status.
    pub status: String,
    /// Optional reason, recorded in the log only.
    #[serde(default)]
    pub reason: Option<String>,
}

/// API request to update the caller's own profile.
///
/// Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UpdateProfileRequest {
    /// A new display name.
    #[serde(default)]
    pub full_name: Option<String>,
    /// A new email address.
    #[serde(default)]
    pub email: Option<String>,
    /// A new plaintext password.
    #[serde(default)]
    pub password: Option<String>,
}

/// API request to submit an event.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CreateEventRequest {
    /// Event title.
    pub title: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Event date and time (RFC 3339).
    pub date: String,
    /// Where the event takes place.
    pub location: String,
    /// Ticket price.
    pub price: f64,
    /// Contact shown to attendees. Defaults to the caller's email.
    #[serde(default)]
    pub organizer_email: Option<String>,
    /// Seat capacity.
    pub total_seats: i64,
    /// Optional image.
    #[serde(default)]
    pub image_url: Option<String>,
}

/// API representation of an event.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EventResponse {
    /// The event id.
    pub id: i64,
    /// Event title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Event date and time (RFC 3339).
    pub date: String,
    /// Where the event takes place.
    pub location: String,
    /// Ticket price.
    pub price: f64,
    /// Contact shown to attendees.
    pub organizer_email: String,
    /// The submitting organizer.
    pub organizer_id: i64,
    /// Seat capacity.
    pub total_seats: u32,
    /// Seats still bookable.
    pub available_seats: u32,
    /// Moderation status.
    pub status: String,
    /// Optional image.
    pub image_url: Option<String>,
}

impl TryFrom<&Event> for EventResponse {
    type Error = ApiError;

    fn try_from(event: &Event) -> Result<Self, Self::Error> {
        Ok(Self {
            id: event.id.value(),
            title: event.title.clone(),
            description: event.description.clone(),
            date: format_timestamp(event.date)?,
            location: event.location.clone(),
            price: event.price,
            organizer_email: event.organizer_email.clone(),
            organizer_id: event.organizer_id.value(),
            total_seats: event.total_seats,
            available_seats: event.available_seats,
            status: event.status.to_string(),
            image_url: event.image_url.clone(),
        })
    }
}

/// API request to book one seat.
///
/// Any other field in the body, such as an email, is ignored; bookings are
/// always made under the caller's own email.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BookingRequest {
    /// The event to book.
    pub event_id: i64,
}

/// API representation of a booking record.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BookingResponse {
    /// The booking id.
    pub id: i64,
    /// The booked event.
    pub event_id: i64,
    /// The booking user.
    pub user_id: i64,
    /// The email the booking was made under.
    pub user_email: String,
    /// When the booking was made (RFC 3339).
    pub booking_date: String,
}

impl TryFrom<&Booking> for BookingResponse {
    type Error = ApiError;

    fn try_from(booking: &Booking) -> Result<Self, Self::Error> {
        Ok(Self {
            id: booking.id.value(),
            event_id: booking.event_id.value(),
            user_id: booking.user_id.value(),
            user_email: booking.user_email.clone(),
            booking_date: format_timestamp(booking.booking_date)?,
        })
    }
}

/// Represents whether a specific action is permitted.
///
/// This enum provides better type safety than raw booleans and serializes
/// to JSON as true/false for API compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// The action is permitted.
    Allowed,
    /// The action is not permitted.
    Denied,
}

impl Capability {
    /// Returns true if the capability is allowed.
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allowed)
    }

    /// Creates a capability from a boolean value.
    #[must_use]
    pub const fn from_bool(value: bool) -> Self {
        if value { Self::Allowed } else { Self::Denied }
    }
}

impl serde::Serialize for Capability {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_bool(self.is_allowed())
    }
}

impl<'de> serde::Deserialize<'de> for Capability {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let b = bool::deserialize(deserializer)?;
        Ok(Self::from_bool(b))
    }
}

/// Advisory capabilities of an authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UserCapabilities {
    /// Whether the user can submit events.
    pub can_submit_events: Capability,
    /// Whether the user can moderate organizers and events.
    pub can_moderate: Capability,
    /// Whether the user can book seats.
    pub can_book: Capability,
    /// Whether the user can create further admins.
    pub can_manage_admins: Capability,
}

/// API response for the "who am I" endpoint.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WhoAmIResponse {
    /// The caller's public profile.
    pub user: UserResponse,
    /// Capabilities for this user.
    pub capabilities: UserCapabilities,
}
