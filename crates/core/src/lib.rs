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

//! Credential hashing and identity tokens.
//!
//! Both services are pure: they hold configuration only and never touch
//! shared state, so callers may use them from any number of tasks at once.

mod credentials;
mod error;
mod token;

#[cfg(test)]
mod tests;

// Re-export public types
pub use credentials::{CredentialStore, MAX_COST, MIN_COST};
pub use error::{CredentialError, TokenError};
pub use token::{IssuedToken, SigningAlgorithm, TokenService, VerifiedToken};
