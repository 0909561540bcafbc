//! # Validation Module
//!
//! Input validation for checkout data.
//!
//! Validation runs before any collaborator is invoked: a malformed postal
//! code or an incomplete customer form is rejected here, with nothing
//! persisted and no external call made.

use chrono::NaiveDate;

use crate::error::{ValidationError, ValidationResult};
use crate::types::CustomerDetails;

/// Maximum accepted length for free-form name fields.
const MAX_NAME_LEN: usize = 200;

// =============================================================================
// Postal Codes
// =============================================================================

/// Normalizes and validates a US postal code.
///
/// Strips every character except digits and hyphens, then requires the
/// `NNNNN` or `NNNNN-NNNN` shape. Returns the normalized code.
///
/// ## Example
/// ```rust
/// use eventhire_core::validation::normalize_postal_code;
///
/// assert_eq!(normalize_postal_code(" 07927 ").unwrap(), "07927");
/// assert_eq!(normalize_postal_code("07927-1234").unwrap(), "07927-1234");
/// assert!(normalize_postal_code("ABCDE").is_err());
/// ```
pub fn normalize_postal_code(raw: &str) -> ValidationResult<String> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '-')
        .collect();

    if cleaned.is_empty() {
        return Err(ValidationError::Required {
            field: "postal_code".to_string(),
        });
    }

    let bytes = cleaned.as_bytes();
    let valid = match bytes.len() {
        5 => bytes.iter().all(u8::is_ascii_digit),
        10 => {
            bytes[5] == b'-'
                && bytes[..5].iter().all(u8::is_ascii_digit)
                && bytes[6..].iter().all(u8::is_ascii_digit)
        }
        _ => false,
    };

    if !valid {
        return Err(ValidationError::InvalidFormat {
            field: "postal_code".to_string(),
            reason: "expected a 5-digit ZIP code, optionally followed by -NNNN".to_string(),
        });
    }

    Ok(cleaned)
}

// =============================================================================
// Customer Details
// =============================================================================

/// Validates the checkout form data an order is assembled from.
///
/// ## Rules
/// - name, email, phone, company, and event name are required
/// - name, company, and event name are capped at 200 characters
/// - email must have a local part and a dotted domain
pub fn validate_customer(customer: &CustomerDetails) -> ValidationResult<()> {
    require("name", &customer.name)?;
    require("email", &customer.email)?;
    require("phone", &customer.phone)?;
    require("company", &customer.company)?;
    require("event_name", &customer.event_name)?;

    cap_length("name", &customer.name)?;
    cap_length("company", &customer.company)?;
    cap_length("event_name", &customer.event_name)?;

    validate_email(customer.email.trim())?;

    Ok(())
}

fn require(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

fn cap_length(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().len() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }
    Ok(())
}

fn validate_email(email: &str) -> ValidationResult<()> {
    let invalid = || ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: "expected an address like name@example.com".to_string(),
    };

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.is_empty() {
        return Err(invalid());
    }

    // The domain must contain a dot with labels on both sides.
    match domain.rsplit_once('.') {
        Some((host, tld)) if !host.is_empty() && !tld.is_empty() => Ok(()),
        _ => Err(invalid()),
    }
}

// =============================================================================
// Rental Dates
// =============================================================================

/// Validates that a rental period ends on or after the day it starts.
///
/// Runs in the layer that collects the dates; [`crate::cart::Cart::set_dates`]
/// itself overwrites unconditionally.
pub fn validate_rental_dates(start: NaiveDate, end: NaiveDate) -> ValidationResult<()> {
    if end < start {
        return Err(ValidationError::DateRange { start, end });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
