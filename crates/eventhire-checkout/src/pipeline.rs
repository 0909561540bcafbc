//! # Order Assembly Pipeline
//!
//! Converts a cart snapshot + customer form + shipping quote into a
//! persisted order, optionally opening a payment session.
//!
//! ## Assembly Steps
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Order Assembly                                       │
//! │                                                                         │
//! │  1. VALIDATE                                                           │
//! │     └── customer form + non-empty cart, nothing persisted on failure   │
//! │                                                                         │
//! │  2. ORDER NUMBER                                                       │
//! │     └── atomic database sequence → "20260804-0001"                     │
//! │                                                                         │
//! │  3. TOTALS (recomputed, client figures are never trusted)              │
//! │     └── subtotal = Σ unit_price × qty                                  │
//! │     └── total = subtotal + shipping + collection                       │
//! │                                                                         │
//! │  4. PERSIST header, then line items                                    │
//! │     └── status: quote (quote-only) or pending                          │
//! │     └── product ids canonicalized (bundle suffix stripped)             │
//! │                                                                         │
//! │  5. PAYMENT SESSION (real orders only)                                 │
//! │     └── session ref persisted on header; failure leaves the order      │
//! │         pending without a ref, for manual reconciliation               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{CheckoutError, CheckoutResult};
use crate::payment::{PaymentError, PaymentGateway, PaymentRequest};
use eventhire_core::cart::CartLine;
use eventhire_core::validation::validate_customer;
use eventhire_core::{
    canonical_product_id, CustomerDetails, Money, Order, OrderItem, OrderStatus, ShippingQuote,
};
use eventhire_db::{Database, OrderRepository};

/// The receipt returned for a created order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderReceipt {
    pub order_id: String,
    pub order_number: String,
    pub total_amount: Money,
    /// Where to send the customer to pay. `None` for quote-only orders.
    pub redirect_url: Option<String>,
}

/// Assembles and persists orders.
pub struct CheckoutPipeline {
    orders: OrderRepository,
    /// Payment collaborator. `None` (no credentials configured) fails real
    /// orders at the session step; quote-only orders are unaffected.
    payment: Option<Arc<dyn PaymentGateway>>,
    currency: String,
}

impl CheckoutPipeline {
    /// Creates a pipeline over the given database and payment gateway.
    pub fn new(
        db: &Database,
        payment: Option<Arc<dyn PaymentGateway>>,
        currency: impl Into<String>,
    ) -> Self {
        CheckoutPipeline {
            orders: db.orders(),
            payment,
            currency: currency.into(),
        }
    }

    /// Creates an order from a cart snapshot.
    ///
    /// The header is persisted before the line items are attempted, and
    /// each step reports its own failure. A payment-session failure leaves
    /// the already-written order in place (pending, no session reference)
    /// and surfaces [`CheckoutError::PaymentSession`] so the caller can
    /// distinguish "recorded but unpayable yet" from "not recorded".
    pub async fn create_order(
        &self,
        customer: &CustomerDetails,
        cart_lines: &[CartLine],
        quote: &ShippingQuote,
        quote_only: bool,
    ) -> CheckoutResult<OrderReceipt> {
        debug!(quote_only = quote_only, lines = cart_lines.len(), "create_order");

        validate_customer(customer)?;

        if cart_lines.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let order_number = self.orders.next_order_number().await?;

        // Recompute totals from the snapshot; client-side figures are not
        // part of this interface at all.
        let subtotal: Money = cart_lines.iter().map(|l| l.line_total()).sum();
        let total = subtotal + quote.shipping_cost + quote.collection_cost;

        let order_id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let order = Order {
            id: order_id.clone(),
            order_number: order_number.clone(),
            customer_name: customer.name.trim().to_string(),
            customer_email: customer.email.trim().to_string(),
            customer_phone: customer.phone.trim().to_string(),
            company_name: customer.company.trim().to_string(),
            event_name: customer.event_name.trim().to_string(),
            event_start_date: customer.event_start_date,
            event_end_date: customer.event_end_date,
            postal_code: customer.postal_code.clone(),
            shipping_address: customer.shipping_address.clone(),
            message: customer.message.clone(),
            subtotal_cents: subtotal.cents(),
            shipping_cost_cents: quote.shipping_cost.cents(),
            collection_cost_cents: quote.collection_cost.cents(),
            total_amount_cents: total.cents(),
            status: if quote_only {
                OrderStatus::Quote
            } else {
                OrderStatus::Pending
            },
            payment_session_ref: None,
            created_at: now,
            updated_at: now,
        };

        self.orders.insert_order(&order).await?;

        let items: Vec<OrderItem> = cart_lines
            .iter()
            .map(|line| OrderItem {
                id: Uuid::new_v4().to_string(),
                order_id: order_id.clone(),
                // Bundle-variant suffixes are a client-side display device;
                // stored items reference the catalog row.
                product_id: canonical_product_id(&line.product_id).to_string(),
                title: line.title.clone(),
                unit_price_cents: line.unit_price_cents,
                quantity: line.quantity,
                line_total_cents: line.line_total().cents(),
                created_at: now,
            })
            .collect();

        self.orders.insert_items(&items).await?;

        if quote_only {
            info!(order_id = %order_id, order_number = %order_number, total = %total, "Quote created");
            return Ok(OrderReceipt {
                order_id,
                order_number,
                total_amount: total,
                redirect_url: None,
            });
        }

        let session = match &self.payment {
            Some(gateway) => {
                gateway
                    .create_session(&PaymentRequest {
                        amount: total,
                        currency: self.currency.clone(),
                        order_id: order_id.clone(),
                        order_number: order_number.clone(),
                    })
                    .await
            }
            None => Err(PaymentError::NotConfigured),
        };

        let session = match session {
            Ok(session) => session,
            Err(e) => {
                // The header and items stay persisted: a pending order with
                // no session reference is the reconciliation marker.
                warn!(order_id = %order_id, error = %e, "Order recorded but payment session failed");
                return Err(CheckoutError::PaymentSession(e));
            }
        };

        self.orders
            .set_payment_session_ref(&order_id, &session.session_ref)
            .await?;

        info!(
            order_id = %order_id,
            order_number = %order_number,
            total = %total,
            session_ref = %session.session_ref,
            "Order created"
        );

        Ok(OrderReceipt {
            order_id,
            order_number,
            total_amount: total,
            redirect_url: Some(session.redirect_url),
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payment::PaymentSession;
    use async_trait::async_trait;
    use eventhire_db::DbConfig;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Fake gateway returning a fixed session and counting calls.
    struct FakeGateway {
        fail: bool,
        calls: AtomicUsize,
    }

    impl FakeGateway {
        fn ok() -> Arc<Self> {
            Arc::new(FakeGateway {
                fail: false,
                calls: AtomicUsize::new(0),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(FakeGateway {
                fail: true,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl PaymentGateway for FakeGateway {
        async fn create_session(
            &self,
            request: &PaymentRequest,
        ) -> Result<PaymentSession, PaymentError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(PaymentError::Rejected("card network down".to_string()));
            }
            Ok(PaymentSession {
                session_ref: format!("cs_test_{}", request.order_number),
                redirect_url: format!("https://pay.example/{}", request.order_number),
            })
        }
    }

    fn customer() -> CustomerDetails {
        CustomerDetails {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: "+1 602 555 0011".to_string(),
            company: "Analytical Events".to_string(),
            event_name: "Charity Gala".to_string(),
            postal_code: Some("07927".to_string()),
            ..CustomerDetails::default()
        }
    }

    fn line(product_id: &str, category: &str, unit_price: i64, qty: i64) -> CartLine {
        CartLine {
            product_id: product_id.to_string(),
            title: format!("Product {product_id}"),
            unit_price_cents: unit_price,
            image_url: None,
            category: category.to_string(),
            quantity: qty,
        }
    }

    fn quote() -> ShippingQuote {
        ShippingQuote {
            zone_name: "New Jersey Zone".to_string(),
            shipping_cost: Money::from_cents(4500),
            collection_cost: Money::from_cents(4500),
        }
    }

    async fn order_count(db: &Database) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(db.pool())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_real_order_persists_and_opens_session() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let gateway = FakeGateway::ok();
        let pipeline = CheckoutPipeline::new(&db, Some(gateway.clone()), "usd");

        let lines = [line("P1", "Individual", 3975, 3), line("P1", "Bundle-5", 19900, 1)];
        let receipt = pipeline
            .create_order(&customer(), &lines, &quote(), false)
            .await
            .unwrap();

        // Totals recomputed server-side: 39.75×3 + 199.00 = 318.25,
        // plus 45.00 + 45.00 shipping.
        assert_eq!(receipt.total_amount.cents(), 31825 + 9000);
        assert!(receipt.redirect_url.is_some());
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 1);

        let (order, items) = db.orders().get_hydrated(&receipt.order_id).await.unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(
            order.total_amount_cents,
            order.subtotal_cents + order.shipping_cost_cents + order.collection_cost_cents
        );
        assert_eq!(
            order.payment_session_ref.as_deref(),
            Some(format!("cs_test_{}", order.order_number).as_str())
        );
        assert_eq!(items.len(), 2);
    }

    #[tokio::test]
    async fn test_quote_only_never_calls_payment_gateway() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let gateway = FakeGateway::ok();
        let pipeline = CheckoutPipeline::new(&db, Some(gateway.clone()), "usd");

        let lines = [line("p1", "iPad", 3975, 2)];
        let receipt = pipeline
            .create_order(&customer(), &lines, &quote(), true)
            .await
            .unwrap();

        assert!(receipt.redirect_url.is_none());
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);

        let order = db.orders().get_by_id(&receipt.order_id).await.unwrap().unwrap();
        assert_eq!(order.status, OrderStatus::Quote);
        assert!(order.payment_session_ref.is_none());
    }

    #[tokio::test]
    async fn test_bundle_variant_ids_are_canonicalized() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let pipeline = CheckoutPipeline::new(&db, None, "usd");

        let base = "0b8ac1f2-4f6e-4a9e-9b63-0f3a5d2c7e11";
        let suffixed = format!("{base}-bundle-5");
        let lines = [line(&suffixed, "Bundle-5", 19900, 1)];

        let receipt = pipeline
            .create_order(&customer(), &lines, &quote(), true)
            .await
            .unwrap();

        let items = db.orders().get_items(&receipt.order_id).await.unwrap();
        assert_eq!(items[0].product_id, base);
        assert_eq!(items[0].line_total_cents, 19900);
    }

    #[tokio::test]
    async fn test_empty_cart_rejected_without_persistence() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let pipeline = CheckoutPipeline::new(&db, None, "usd");

        let err = pipeline
            .create_order(&customer(), &[], &quote(), true)
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::EmptyCart));
        assert_eq!(order_count(&db).await, 0);
    }

    #[tokio::test]
    async fn test_invalid_customer_rejected_before_sequence() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let pipeline = CheckoutPipeline::new(&db, None, "usd");

        let mut bad = customer();
        bad.email = "not-an-address".to_string();

        let lines = [line("p1", "iPad", 3975, 1)];
        let err = pipeline
            .create_order(&bad, &lines, &quote(), true)
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::InvalidInput(_)));
        assert_eq!(order_count(&db).await, 0);

        // Validation runs before number generation, so the sequence was
        // never consumed.
        let first = db.orders().next_order_number().await.unwrap();
        assert!(first.ends_with("-0001"));
    }

    #[tokio::test]
    async fn test_payment_failure_leaves_reconcilable_order() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let gateway = FakeGateway::failing();
        let pipeline = CheckoutPipeline::new(&db, Some(gateway), "usd");

        let lines = [line("p1", "iPad", 3975, 1)];
        let err = pipeline
            .create_order(&customer(), &lines, &quote(), false)
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::PaymentSession(_)));

        // The order survived: pending, no session reference.
        assert_eq!(order_count(&db).await, 1);
        let order_id: String = sqlx::query_scalar("SELECT id FROM orders")
            .fetch_one(db.pool())
            .await
            .unwrap();
        let order = db.orders().get_by_id(&order_id).await.unwrap().unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
        assert!(order.payment_session_ref.is_none());
    }

    #[tokio::test]
    async fn test_no_gateway_configured_fails_real_orders_only() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let pipeline = CheckoutPipeline::new(&db, None, "usd");

        let lines = [line("p1", "iPad", 3975, 1)];

        let err = pipeline
            .create_order(&customer(), &lines, &quote(), false)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::PaymentSession(PaymentError::NotConfigured)
        ));

        let receipt = pipeline
            .create_order(&customer(), &lines, &quote(), true)
            .await
            .unwrap();
        assert!(receipt.redirect_url.is_none());
    }
}
