// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use tracing::debug;

use crate::error::CredentialError;

/// Lowest bcrypt cost accepted by the hashing backend.
pub const MIN_COST: u32 = 4;

/// Highest bcrypt cost accepted by the hashing backend.
pub const MAX_COST: u32 = 31;

/// Salt and digest of a well-formed bcrypt hash that no account uses.
const DECOY_HASH_BODY: &str = "CCCCCCCCCCCCCCCCCCCCC.E5YPO9kmyuRGyh0XouQYb4YMJKvyOeW";

/// Salted, cost-factored password hashing backed by bcrypt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CredentialStore {
    cost: u32,
}

impl CredentialStore {
    /// Creates a credential store with the given bcrypt cost.
    ///
    /// # Errors
    ///
    /// Returns `CredentialError::InvalidCost` if `cost` is outside
    /// `MIN_COST..=MAX_COST`.
    pub const fn new(cost: u32) -> Result<Self, CredentialError> {
        if cost < MIN_COST || cost > MAX_COST {
            return Err(CredentialError::InvalidCost {
                cost,
                min: MIN_COST,
                max: MAX_COST,
            });
        }
        Ok(Self { cost })
    }

    /// Returns the configured cost factor.
    #[must_use]
    pub const fn cost(&self) -> u32 {
        self.cost
    }

    /// Hashes a plain-text password with a fresh salt.
    ///
    /// # Errors
    ///
    /// Returns an error if the hashing backend fails.
    pub fn hash(&self, password: &str) -> Result<String, CredentialError> {
        bcrypt::hash(password, self.cost).map_err(|e| CredentialError::HashFailed(e.to_string()))
    }

    /// Verifies a plain-text password against a stored hash.
    ///
    /// A malformed hash is reported as a mismatch.
    #[must_use]
    pub fn verify(&self, password: &str, password_hash: &str) -> bool {
        match bcrypt::verify(password, password_hash) {
            Ok(matches) => matches,
            Err(e) => {
                debug!(error = %e, "Stored password hash could not be parsed");
                false
            }
        }
    }

    /// Runs a full verification against a hash no account owns.
    ///
    /// Login calls this when the email is unknown so that the response takes
    /// as long as a wrong password for a real account.
    pub fn verify_decoy(&self, password: &str) {
        let matched: bool = self.verify(password, &self.decoy_hash());
        debug!(matched, "Verified against decoy hash");
    }

    /// A bcrypt hash at this store's cost.
    #[must_use]
    pub(crate) fn decoy_hash(&self) -> String {
        let cost: u32 = self.cost;
        format!("$2b${cost:02}${DECOY_HASH_BODY}")
    }
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self {
            cost: bcrypt::DEFAULT_COST,
        }
    }
}
