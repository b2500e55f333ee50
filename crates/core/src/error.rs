// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use thiserror::Error;

/// Errors raised while hashing credentials.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    /// The configured cost factor is outside the supported range.
    #[error("bcrypt cost {cost} is outside of the supported range {min}..={max}")]
    InvalidCost {
        /// The rejected cost.
        cost: u32,
        /// Lowest supported cost.
        min: u32,
        /// Highest supported cost.
        max: u32,
    },
    /// The hashing backend failed.
    #[error("failed to hash password: {0}")]
    HashFailed(String),
}

/// Errors raised while issuing or verifying identity tokens.
///
/// Verification reports exactly one of `Expired` or `Malformed`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// The token signature and structure are valid but its expiry has passed.
    #[error("token has expired")]
    Expired,
    /// The token could not be decoded or its signature does not match.
    #[error("token is malformed: {0}")]
    Malformed(String),
    /// The service was configured with unusable settings.
    #[error("invalid token configuration: {0}")]
    InvalidConfiguration(String),
    /// Signing a new token failed.
    #[error("failed to sign token: {0}")]
    SigningFailed(String),
}
