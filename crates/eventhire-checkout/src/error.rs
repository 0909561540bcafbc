//! # Checkout Error Types
//!
//! The error taxonomy surfaced by the checkout services.
//!
//! ## Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Checkout Error Taxonomy                              │
//! │                                                                         │
//! │  InvalidInput / EmptyCart      → rejected before any collaborator      │
//! │                                  call, nothing persisted               │
//! │                                                                         │
//! │  (geocode / zone lookup fail)  → never surfaced: the shipping          │
//! │                                  resolver degrades to defaults         │
//! │                                                                         │
//! │  Persistence                   → order-creation failure; header may    │
//! │                                  be partially written (see pipeline)   │
//! │                                                                         │
//! │  PaymentSession                → order recorded but unpayable yet;     │
//! │                                  distinct from Persistence so callers  │
//! │                                  can tell the two apart                │
//! │                                                                         │
//! │  SubmissionInFlight            → duplicate submission suppressed       │
//! │                                  while a create-order call is          │
//! │                                  outstanding                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::payment::PaymentError;
use eventhire_core::ValidationError;
use eventhire_db::DbError;

/// Errors surfaced by the checkout services.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Caller-supplied input failed validation. Nothing was persisted and
    /// no collaborator was invoked.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    /// An order was submitted from an empty cart.
    #[error("cannot create an order from an empty cart")]
    EmptyCart,

    /// Order or line-item persistence failed.
    #[error("order persistence failed: {0}")]
    Persistence(#[from] DbError),

    /// The payment session could not be opened. The order header and items
    /// are already persisted; the order stays pending without a session
    /// reference for manual reconciliation.
    #[error("payment session creation failed: {0}")]
    PaymentSession(#[from] PaymentError),

    /// A create-order call is already outstanding for this session.
    #[error("an order submission is already in progress")]
    SubmissionInFlight,
}

/// Result type for checkout operations.
pub type CheckoutResult<T> = Result<T, CheckoutError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_wraps_as_invalid_input() {
        let err: CheckoutError = ValidationError::Required {
            field: "email".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "invalid input: email is required");
    }

    #[test]
    fn test_persistence_and_payment_are_distinct() {
        let persistence: CheckoutError = DbError::QueryFailed("disk full".to_string()).into();
        let payment: CheckoutError = PaymentError::Rejected("card declined".to_string()).into();

        assert!(matches!(persistence, CheckoutError::Persistence(_)));
        assert!(matches!(payment, CheckoutError::PaymentSession(_)));
    }
}
