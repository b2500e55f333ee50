// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::str::FromStr;

use event_booking_domain::{Role, UserId};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::error::TokenError;

/// HMAC signature algorithms accepted for identity tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SigningAlgorithm {
    /// HMAC with SHA-256.
    #[default]
    Hs256,
    /// HMAC with SHA-384.
    Hs384,
    /// HMAC with SHA-512.
    Hs512,
}

impl SigningAlgorithm {
    /// Returns the conventional algorithm name, e.g. `HS256`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Hs256 => "HS256",
            Self::Hs384 => "HS384",
            Self::Hs512 => "HS512",
        }
    }

    const fn jwt_algorithm(self) -> Algorithm {
        match self {
            Self::Hs256 => Algorithm::HS256,
            Self::Hs384 => Algorithm::HS384,
            Self::Hs512 => Algorithm::HS512,
        }
    }
}

impl FromStr for SigningAlgorithm {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "HS256" => Ok(Self::Hs256),
            "HS384" => Ok(Self::Hs384),
            "HS512" => Ok(Self::Hs512),
            other => Err(TokenError::InvalidConfiguration(format!(
                "unsupported signing algorithm '{other}'"
            ))),
        }
    }
}

impl std::fmt::Display for SigningAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The signed payload. `sub` carries the user id as a decimal string.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Claims {
    sub: String,
    role: Role,
    iat: i64,
    exp: i64,
}

/// A freshly signed token and its expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    /// The encoded bearer token.
    pub token: String,
    /// When the token stops being accepted.
    pub expires_at: OffsetDateTime,
}

/// The identity carried by a token that passed verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifiedToken {
    /// The authenticated user.
    pub subject: UserId,
    /// The role recorded at issue time.
    pub role: Role,
    /// When the token expires.
    pub expires_at: OffsetDateTime,
}

/// Issues and verifies signed, time-limited identity tokens.
///
/// The secret and algorithm always come from configuration. Tokens are
/// stateless and are checked by signature and expiry only.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: SigningAlgorithm,
    ttl: Duration,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("algorithm", &self.algorithm)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    /// Creates a token service.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::InvalidConfiguration` if the secret is empty or
    /// the time-to-live is not positive.
    pub fn new(secret: &str, algorithm: SigningAlgorithm, ttl: Duration) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::InvalidConfiguration(String::from(
                "signing secret must not be empty",
            )));
        }
        if !ttl.is_positive() {
            return Err(TokenError::InvalidConfiguration(format!(
                "token lifetime must be positive, got {ttl}"
            )));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            algorithm,
            ttl,
        })
    }

    /// Returns the configured signature algorithm.
    #[must_use]
    pub const fn algorithm(&self) -> SigningAlgorithm {
        self.algorithm
    }

    /// Returns the configured token lifetime.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issues a token for `subject` that expires one lifetime from now.
    ///
    /// # Errors
    ///
    /// Returns an error if signing fails.
    pub fn issue(&self, subject: UserId, role: Role) -> Result<IssuedToken, TokenError> {
        self.issue_at(subject, role, OffsetDateTime::now_utc())
    }

    /// Issues a token as if the current time were `issued_at`.
    ///
    /// # Errors
    ///
    /// Returns an error if signing fails.
    pub fn issue_at(
        &self,
        subject: UserId,
        role: Role,
        issued_at: OffsetDateTime,
    ) -> Result<IssuedToken, TokenError> {
        let expires_at: OffsetDateTime = issued_at + self.ttl;
        let claims: Claims = Claims {
            sub: subject.to_string(),
            role,
            iat: issued_at.unix_timestamp(),
            exp: expires_at.unix_timestamp(),
        };

        let token: String = jsonwebtoken::encode(
            &Header::new(self.algorithm.jwt_algorithm()),
            &claims,
            &self.encoding_key,
        )
        .map_err(|e| TokenError::SigningFailed(e.to_string()))?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Verifies a token's signature and expiry and returns its identity.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Expired` when a correctly signed token is past its
    /// expiry, and `TokenError::Malformed` for everything else.
    pub fn verify(&self, token: &str) -> Result<VerifiedToken, TokenError> {
        let mut validation: Validation = Validation::new(self.algorithm.jwt_algorithm());
        validation.leeway = 0;

        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &validation).map_err(
            |e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed(e.to_string()),
            },
        )?;

        let subject: UserId = UserId::from_str(&data.claims.sub)
            .map_err(|e| TokenError::Malformed(e.to_string()))?;
        let expires_at: OffsetDateTime = OffsetDateTime::from_unix_timestamp(data.claims.exp)
            .map_err(|e| TokenError::Malformed(e.to_string()))?;

        Ok(VerifiedToken {
            subject,
            role: data.claims.role,
            expires_at,
        })
    }
}
