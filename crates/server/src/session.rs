// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Bearer-token extraction for the server.
//!
//! These extractors pull the identity token out of the `Authorization`
//! header and resolve it to the stored user before a handler runs.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
    response::{IntoResponse, Response},
};
use event_booking_api::{ApiError, AuthenticationService};
use event_booking_domain::User;
use tracing::{debug, warn};

use crate::{AppState, HttpError};

/// Extractor for authenticated callers.
///
/// # Authentication Flow
///
/// 1. Extract `Authorization: Bearer <token>` header
/// 2. Verify signature and expiry via `AuthenticationService::authenticate`
/// 3. Load the subject from the store and reject disabled accounts
///
/// # Errors
///
/// Rejects with HTTP 401 when the header is missing or malformed, the token
/// does not verify, or the subject no longer exists.
pub struct SessionUser(pub User);

/// Like [`SessionUser`], but yields `None` when no `Authorization` header
/// was sent. A header that is present must still authenticate.
pub struct OptionalSessionUser(pub Option<User>);

impl FromRequestParts<AppState> for SessionUser {
    type Rejection = SessionError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token: &str = bearer_token(parts)?.ok_or_else(|| {
            debug!("Missing Authorization header");
            SessionError::MissingAuthorizationHeader
        })?;
        resolve(state, token).await.map(Self)
    }
}

impl FromRequestParts<AppState> for OptionalSessionUser {
    type Rejection = SessionError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match bearer_token(parts)? {
            Some(token) => resolve(state, token).await.map(|user| Self(Some(user))),
            None => Ok(Self(None)),
        }
    }
}

fn bearer_token(parts: &Parts) -> Result<Option<&str>, SessionError> {
    let Some(header) = parts.headers.get(AUTHORIZATION) else {
        return Ok(None);
    };

    let header: &str = header.to_str().map_err(|_| {
        warn!("Invalid Authorization header encoding");
        SessionError::InvalidAuthorizationHeader
    })?;

    header.strip_prefix("Bearer ").map(Some).ok_or_else(|| {
        warn!("Authorization header does not start with 'Bearer '");
        SessionError::InvalidAuthorizationHeader
    })
}

async fn resolve(state: &AppState, token: &str) -> Result<User, SessionError> {
    let mut persistence = state.persistence.lock().await;
    let user: User =
        AuthenticationService::authenticate(&mut persistence, &state.auth.tokens, token)
            .map_err(|e| {
                warn!(error = %e, "Token authentication failed");
                SessionError::Rejected(ApiError::from(e))
            })?;
    drop(persistence);

    debug!(user_id = %user.id, role = %user.role, "Caller authenticated");
    Ok(user)
}

/// Session extraction errors.
#[derive(Debug)]
pub enum SessionError {
    /// Authorization header is missing.
    MissingAuthorizationHeader,
    /// Authorization header format is invalid.
    InvalidAuthorizationHeader,
    /// The token did not resolve to an active user.
    Rejected(ApiError),
}

impl From<SessionError> for HttpError {
    fn from(err: SessionError) -> Self {
        let api_error: ApiError = match err {
            SessionError::MissingAuthorizationHeader => ApiError::Unauthorized {
                reason: String::from("Missing Authorization header"),
            },
            SessionError::InvalidAuthorizationHeader => ApiError::Unauthorized {
                reason: String::from(
                    "Invalid Authorization header format. Expected: 'Bearer <token>'",
                ),
            },
            SessionError::Rejected(api_error) => api_error,
        };
        Self::from(api_error)
    }
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        HttpError::from(self).into_response()
    }
}
