//! Checkout service configuration.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults. Collaborator credentials are optional: a missing key disables
//! that collaborator, and the services degrade the way the shipping and
//! document layers document.

use serde::{Deserialize, Serialize};
use std::env;

use eventhire_core::Money;

/// Checkout configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutConfig {
    /// Path to the SQLite database file
    pub database_path: String,

    /// Google Maps geocoding API key (optional; geocoding degrades to the
    /// default region without it)
    pub google_maps_api_key: Option<String>,

    /// Stripe secret key (optional; payment sessions cannot be opened
    /// without it, quote-only orders still work)
    pub stripe_secret_key: Option<String>,

    /// HTML-to-PDF conversion service key (optional; documents fall back
    /// to HTML without it)
    pub pdf_api_key: Option<String>,

    /// Region assumed when geocoding is unavailable or returns no match
    pub default_region: String,

    /// Delivery cost applied for regions without a configured zone, cents
    pub default_shipping_cost_cents: i64,

    /// Collection cost applied for regions without a configured zone, cents
    pub default_collection_cost_cents: i64,

    /// ISO currency code passed to the payment collaborator
    pub currency: String,

    /// Where the payment provider redirects after a completed session
    pub payment_success_url: String,

    /// Where the payment provider redirects after an abandoned session
    pub payment_cancel_url: String,
}

impl CheckoutConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let config = CheckoutConfig {
            database_path: env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "./eventhire.db".to_string()),

            google_maps_api_key: env::var("GOOGLE_MAPS_API_KEY").ok(),

            stripe_secret_key: env::var("STRIPE_SECRET_KEY").ok(),

            pdf_api_key: env::var("PDF_API_KEY").ok(),

            default_region: env::var("DEFAULT_REGION").unwrap_or_else(|_| "CA".to_string()),

            default_shipping_cost_cents: env::var("DEFAULT_SHIPPING_COST_CENTS")
                .unwrap_or_else(|_| "7500".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("DEFAULT_SHIPPING_COST_CENTS".to_string()))?,

            default_collection_cost_cents: env::var("DEFAULT_COLLECTION_COST_CENTS")
                .unwrap_or_else(|_| "7500".to_string())
                .parse()
                .map_err(|_| {
                    ConfigError::InvalidValue("DEFAULT_COLLECTION_COST_CENTS".to_string())
                })?,

            currency: env::var("CURRENCY").unwrap_or_else(|_| "usd".to_string()),

            payment_success_url: env::var("PAYMENT_SUCCESS_URL")
                .unwrap_or_else(|_| "https://eventhire.example/payment-success".to_string()),

            payment_cancel_url: env::var("PAYMENT_CANCEL_URL")
                .unwrap_or_else(|_| "https://eventhire.example/checkout".to_string()),
        };

        if config.default_shipping_cost_cents < 0 || config.default_collection_cost_cents < 0 {
            return Err(ConfigError::InvalidValue(
                "default shipping costs must be non-negative".to_string(),
            ));
        }

        Ok(config)
    }

    /// Default delivery cost as Money.
    pub fn default_shipping_cost(&self) -> Money {
        Money::from_cents(self.default_shipping_cost_cents)
    }

    /// Default collection cost as Money.
    pub fn default_collection_cost(&self) -> Money {
        Money::from_cents(self.default_collection_cost_cents)
    }
}

impl Default for CheckoutConfig {
    /// Built-in defaults, no environment access. Used by tests.
    fn default() -> Self {
        CheckoutConfig {
            database_path: "./eventhire.db".to_string(),
            google_maps_api_key: None,
            stripe_secret_key: None,
            pdf_api_key: None,
            default_region: "CA".to_string(),
            default_shipping_cost_cents: 7500,
            default_collection_cost_cents: 7500,
            currency: "usd".to_string(),
            payment_success_url: "https://eventhire.example/payment-success".to_string(),
            payment_cancel_url: "https://eventhire.example/checkout".to_string(),
        }
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CheckoutConfig::default();

        assert_eq!(config.default_region, "CA");
        assert_eq!(config.default_shipping_cost().cents(), 7500);
        assert_eq!(config.default_collection_cost().cents(), 7500);
        assert_eq!(config.currency, "usd");
        assert!(config.google_maps_api_key.is_none());
    }
}
