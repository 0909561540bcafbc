//! Payment collaborator: checkout-session creation.
//!
//! The pipeline only depends on the [`PaymentGateway`] trait; the
//! production implementation is [`StripeGateway`], which opens a hosted
//! Checkout Session and returns its redirect URL. Amounts cross this
//! boundary in minor currency units only.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use eventhire_core::Money;

/// Errors from the payment collaborator.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// HTTP transport or deserialization failure.
    #[error("payment request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider rejected the session request.
    #[error("payment provider rejected the session: {0}")]
    Rejected(String),

    /// No payment credentials are configured for this deployment.
    #[error("no payment provider configured")]
    NotConfigured,
}

/// A request to open a payment session for an assembled order.
#[derive(Debug, Clone)]
pub struct PaymentRequest {
    /// Total to charge.
    pub amount: Money,
    /// ISO currency code ("usd").
    pub currency: String,
    /// Order metadata for later reconciliation.
    pub order_id: String,
    pub order_number: String,
}

/// An opened payment session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentSession {
    /// Provider-side session identifier, persisted on the order.
    pub session_ref: String,
    /// Where to send the customer to complete payment.
    pub redirect_url: String,
}

/// Opens payment sessions with the external provider.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Creates a session for the given amount and order metadata.
    async fn create_session(&self, request: &PaymentRequest)
        -> Result<PaymentSession, PaymentError>;
}

// =============================================================================
// Stripe Gateway
// =============================================================================

const CHECKOUT_SESSIONS_ENDPOINT: &str = "https://api.stripe.com/v1/checkout/sessions";

/// HTTP client for Stripe Checkout Sessions.
#[derive(Debug, Clone)]
pub struct StripeGateway {
    secret_key: String,
    success_url: String,
    cancel_url: String,
    http: Client,
}

impl StripeGateway {
    /// Create a new gateway with the given secret key and redirect URLs.
    pub fn new(
        secret_key: impl Into<String>,
        success_url: impl Into<String>,
        cancel_url: impl Into<String>,
    ) -> Self {
        StripeGateway {
            secret_key: secret_key.into(),
            success_url: success_url.into(),
            cancel_url: cancel_url.into(),
            http: Client::new(),
        }
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn create_session(
        &self,
        request: &PaymentRequest,
    ) -> Result<PaymentSession, PaymentError> {
        debug!(order_number = %request.order_number, amount = %request.amount, "Opening payment session");

        let amount_minor = request.amount.cents().to_string();
        let product_name = format!("Rental order {}", request.order_number);

        // The Sessions API takes form-encoded bracketed keys.
        let form: Vec<(&str, &str)> = vec![
            ("mode", "payment"),
            ("success_url", &self.success_url),
            ("cancel_url", &self.cancel_url),
            ("line_items[0][quantity]", "1"),
            ("line_items[0][price_data][currency]", &request.currency),
            ("line_items[0][price_data][unit_amount]", &amount_minor),
            ("line_items[0][price_data][product_data][name]", &product_name),
            ("metadata[order_id]", &request.order_id),
            ("metadata[order_number]", &request.order_number),
        ];

        let response = self
            .http
            .post(CHECKOUT_SESSIONS_ENDPOINT)
            .bearer_auth(&self.secret_key)
            .form(&form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(PaymentError::Rejected(format!(
                "session request failed with status {status}: {text}"
            )));
        }

        let parsed: SessionResponse = response.json().await?;

        Ok(PaymentSession {
            session_ref: parsed.id,
            redirect_url: parsed.url,
        })
    }
}

#[derive(Debug, Deserialize)]
struct SessionResponse {
    id: String,
    url: String,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_response_parsing() {
        let body = r#"{
            "id": "cs_test_a1b2c3",
            "url": "https://checkout.stripe.com/c/pay/cs_test_a1b2c3",
            "object": "checkout.session"
        }"#;

        let parsed: SessionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.id, "cs_test_a1b2c3");
        assert!(parsed.url.starts_with("https://checkout.stripe.com/"));
    }

    #[test]
    fn test_payment_request_amount_is_minor_units() {
        let request = PaymentRequest {
            amount: Money::from_cents(40825),
            currency: "usd".to_string(),
            order_id: "o-1".to_string(),
            order_number: "20260804-0001".to_string(),
        };

        assert_eq!(request.amount.cents().to_string(), "40825");
    }
}
