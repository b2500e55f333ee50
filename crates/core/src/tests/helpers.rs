// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::Duration;

use crate::{CredentialStore, MIN_COST, SigningAlgorithm, TokenService};

pub const TEST_SECRET: &str = "unit-test-signing-secret";

pub fn create_test_credentials() -> CredentialStore {
    CredentialStore::new(MIN_COST).unwrap()
}

pub fn create_test_token_service() -> TokenService {
    TokenService::new(TEST_SECRET, SigningAlgorithm::Hs256, Duration::minutes(30)).unwrap()
}
