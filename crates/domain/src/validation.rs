// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;

/// Normalizes and validates an email address.
///
/// The address is trimmed and lower-cased so uniqueness checks are
/// case-insensitive.
///
/// # Errors
///
/// Returns an error if the address is empty, lacks a single `@`, has an
/// empty local part, or has a domain without an inner dot.
pub fn normalize_email(email: &str) -> Result<String, DomainError> {
    let normalized: String = email.trim().to_lowercase();

    if normalized.is_empty() {
        return Err(DomainError::InvalidEmail(String::from(
            "Email cannot be empty",
        )));
    }

    if normalized.chars().any(char::is_whitespace) {
        return Err(DomainError::InvalidEmail(format!(
            "'{normalized}' contains whitespace"
        )));
    }

    let Some((local, domain)) = normalized.split_once('@') else {
        return Err(DomainError::InvalidEmail(format!(
            "'{normalized}' is missing '@'"
        )));
    };

    if local.is_empty() || domain.contains('@') {
        return Err(DomainError::InvalidEmail(format!(
            "'{normalized}' is not a valid address"
        )));
    }

    // Rule: domain needs a dot that is neither leading nor trailing
    let domain_ok: bool = domain
        .find('.')
        .is_some_and(|idx| idx > 0 && !domain.ends_with('.'));
    if !domain_ok {
        return Err(DomainError::InvalidEmail(format!(
            "'{normalized}' has an invalid domain"
        )));
    }

    Ok(normalized)
}

/// Validates and trims a full name.
///
/// # Errors
///
/// Returns an error if the name is blank.
pub fn validate_full_name(full_name: &str) -> Result<String, DomainError> {
    let trimmed: &str = full_name.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidName(String::from(
            "Name cannot be empty",
        )));
    }
    Ok(trimmed.to_string())
}

/// Validates and trims an event title.
///
/// # Errors
///
/// Returns an error if the title is blank.
pub fn validate_title(title: &str) -> Result<String, DomainError> {
    let trimmed: &str = title.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidTitle(String::from(
            "Title cannot be empty",
        )));
    }
    Ok(trimmed.to_string())
}

/// Validates an event price.
///
/// # Errors
///
/// Returns an error if the price is negative, NaN or infinite.
pub fn validate_price(price: f64) -> Result<(), DomainError> {
    if !price.is_finite() {
        return Err(DomainError::InvalidPrice(format!(
            "Price must be a finite number, got {price}"
        )));
    }
    if price < 0.0 {
        return Err(DomainError::InvalidPrice(format!(
            "Price cannot be negative, got {price}"
        )));
    }
    Ok(())
}

/// Validates a seat count and narrows it to the domain seat range.
///
/// # Errors
///
/// Returns an error if the count is negative or larger than `u32::MAX`.
pub fn validate_seat_count(count: i64) -> Result<u32, DomainError> {
    u32::try_from(count).map_err(|_| DomainError::InvalidSeatCount(count))
}
