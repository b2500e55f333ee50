// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    DomainError, normalize_email, validate_full_name, validate_price, validate_seat_count,
};

#[test]
fn test_normalize_email_lowercases_and_trims() {
    assert_eq!(
        normalize_email("  Alice@Example.COM ").unwrap(),
        "alice@example.com"
    );
}

#[test]
fn test_normalize_email_rejects_malformed_addresses() {
    for raw in [
        "",
        "   ",
        "alice",
        "@example.com",
        "alice@",
        "alice@example",
        "alice@.com",
        "alice@example.",
        "a@b@example.com",
        "al ice@example.com",
    ] {
        assert!(
            matches!(normalize_email(raw), Err(DomainError::InvalidEmail(_))),
            "expected '{raw}' to be rejected"
        );
    }
}

#[test]
fn test_full_name_must_not_be_blank() {
    assert_eq!(validate_full_name(" Ada ").unwrap(), "Ada");
    assert!(validate_full_name("\t").is_err());
}

#[test]
fn test_price_must_be_finite_and_non_negative() {
    assert!(validate_price(0.0).is_ok());
    assert!(validate_price(99.99).is_ok());
    assert!(validate_price(-0.01).is_err());
    assert!(validate_price(f64::NAN).is_err());
    assert!(validate_price(f64::INFINITY).is_err());
}

#[test]
fn test_seat_count_range() {
    assert_eq!(validate_seat_count(0), Ok(0));
    assert_eq!(validate_seat_count(250), Ok(250));
    assert_eq!(
        validate_seat_count(-1),
        Err(DomainError::InvalidSeatCount(-1))
    );
    assert_eq!(
        validate_seat_count(i64::from(u32::MAX) + 1),
        Err(DomainError::InvalidSeatCount(i64::from(u32::MAX) + 1))
    );
}
