//! # Error Types
//!
//! Domain-specific error types for eventhire-core.
//!
//! Validation errors are raised before any business logic runs and are the
//! only hard failures this crate produces. Downstream layers wrap them:
//! `ValidationError` → `CheckoutError` → caller.

use chrono::NaiveDate;
use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when caller-supplied input does not meet requirements.
/// Each variant maps to a user-facing message.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format (e.g., malformed postal code or email address).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Rental end date precedes the start date.
    #[error("rental end date {end} is before start date {start}")]
    DateRange { start: NaiveDate, end: NaiveDate },
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Unit Tests
// =============================================================================
