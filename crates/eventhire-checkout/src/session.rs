//! # Storefront Session
//!
//! The session object owning the cart for one logical customer.
//!
//! ## Design
//! The cart is an explicitly constructed, passed-by-reference service
//! object, not a global singleton: whoever owns the session injects it into
//! the components that need it, preserving single-instance-per-session
//! semantics without hidden state.
//!
//! ## Thread Safety
//! The cart is wrapped in `Arc<Mutex<T>>` because:
//! 1. Multiple async tasks may access/modify the cart
//! 2. Only one should modify it at a time
//!
//! All mutations originate from one logical actor (the owning session), so
//! the mutex is about memory safety across await points, not about
//! multi-writer coordination.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use tracing::debug;

use crate::error::{CheckoutError, CheckoutResult};
use crate::pipeline::{CheckoutPipeline, OrderReceipt};
use eventhire_core::cart::{Cart, CartEntry, CartLine, LineKey};
use eventhire_core::validation::validate_rental_dates;
use eventhire_core::{CustomerDetails, Money, ShippingQuote};

/// A storefront session: cart state plus order submission.
pub struct StorefrontSession {
    cart: Arc<Mutex<Cart>>,
    pipeline: CheckoutPipeline,
    /// Guards against duplicate submission while a create-order call is
    /// outstanding.
    in_flight: AtomicBool,
}

impl StorefrontSession {
    /// Creates a session with an empty cart.
    pub fn new(pipeline: CheckoutPipeline) -> Self {
        StorefrontSession {
            cart: Arc::new(Mutex::new(Cart::new())),
            pipeline,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Executes a function with read access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let total = session.with_cart(|cart| cart.total_price());
    /// ```
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        let cart = self.cart.lock().expect("Cart mutex poisoned");
        f(&cart)
    }

    /// Executes a function with write access to the cart.
    pub fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Cart) -> R,
    {
        let mut cart = self.cart.lock().expect("Cart mutex poisoned");
        f(&mut cart)
    }

    /// Adds an entry to the cart.
    ///
    /// The aggregator itself accepts any quantity; coercing the requested
    /// amount to at least 1 is this caller's documented responsibility.
    pub fn add_to_cart(&self, entry: CartEntry, quantity: i64) {
        let quantity = quantity.max(1);
        self.with_cart_mut(|cart| cart.add_item(entry, quantity));
    }

    /// Removes the line with the given identity.
    pub fn remove_from_cart(&self, key: &LineKey) {
        self.with_cart_mut(|cart| cart.remove_item(key));
    }

    /// Sets the quantity of the line with the given identity.
    pub fn update_cart_quantity(&self, key: &LineKey, quantity: i64) {
        self.with_cart_mut(|cart| cart.update_quantity(key, quantity));
    }

    /// Sets the rental period after validating its ordering.
    ///
    /// The cart's own `set_dates` overwrites unconditionally; ordering is
    /// checked here, in the layer that collects the dates.
    pub fn set_rental_dates(&self, start: NaiveDate, end: NaiveDate) -> CheckoutResult<()> {
        validate_rental_dates(start, end)?;
        self.with_cart_mut(|cart| cart.set_dates(start, end));
        Ok(())
    }

    /// Total quantity across all cart lines.
    pub fn total_items(&self) -> i64 {
        self.with_cart(|cart| cart.total_items())
    }

    /// Sum of cart line totals.
    pub fn total_price(&self) -> Money {
        self.with_cart(|cart| cart.total_price())
    }

    /// Empties the cart lines (rental dates survive).
    pub fn clear_cart(&self) {
        self.with_cart_mut(|cart| cart.clear());
    }

    /// Whether a create-order call is currently outstanding.
    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Submits the current cart as an order.
    ///
    /// Re-entrancy: a second call while one is outstanding returns
    /// [`CheckoutError::SubmissionInFlight`] without touching the pipeline.
    /// On success the cart lines are cleared; on failure they are kept so
    /// the caller can retry without losing entered state.
    pub async fn submit_order(
        &self,
        customer: &CustomerDetails,
        quote: &ShippingQuote,
        quote_only: bool,
    ) -> CheckoutResult<OrderReceipt> {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            debug!("Duplicate submission suppressed");
            return Err(CheckoutError::SubmissionInFlight);
        }

        let (lines, rental_dates): (Vec<CartLine>, Option<(NaiveDate, NaiveDate)>) =
            self.with_cart(|cart| (cart.lines.clone(), cart.rental_dates()));

        // Event dates left blank on the form default to the rental period
        // chosen in the cart.
        let mut customer = customer.clone();
        if customer.event_start_date.is_none() {
            customer.event_start_date = rental_dates.map(|(start, _)| start);
        }
        if customer.event_end_date.is_none() {
            customer.event_end_date = rental_dates.map(|(_, end)| end);
        }

        let result = self
            .pipeline
            .create_order(&customer, &lines, quote, quote_only)
            .await;

        self.in_flight.store(false, Ordering::SeqCst);

        if result.is_ok() {
            self.clear_cart();
        }

        result
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payment::{PaymentError, PaymentGateway, PaymentRequest, PaymentSession};
    use async_trait::async_trait;
    use eventhire_db::{Database, DbConfig};
    use tokio::sync::Notify;

    fn entry(product_id: &str, category: &str, price_cents: i64) -> CartEntry {
        CartEntry {
            product_id: product_id.to_string(),
            title: format!("Product {product_id}"),
            unit_price_cents: price_cents,
            image_url: None,
            category: category.to_string(),
        }
    }

    fn customer() -> CustomerDetails {
        CustomerDetails {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: "+1 602 555 0011".to_string(),
            company: "Analytical Events".to_string(),
            event_name: "Charity Gala".to_string(),
            ..CustomerDetails::default()
        }
    }

    fn quote() -> ShippingQuote {
        ShippingQuote {
            zone_name: "New Jersey Zone".to_string(),
            shipping_cost: Money::from_cents(4500),
            collection_cost: Money::from_cents(4500),
        }
    }

    async fn session_with_db() -> (StorefrontSession, Database) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let session = StorefrontSession::new(CheckoutPipeline::new(&db, None, "usd"));
        (session, db)
    }

    async fn session() -> StorefrontSession {
        session_with_db().await.0
    }

    #[tokio::test]
    async fn test_add_to_cart_coerces_quantity() {
        let session = session().await;

        session.add_to_cart(entry("p1", "iPad", 3975), 0);
        session.add_to_cart(entry("p2", "Laptop", 7975), -5);

        assert_eq!(session.total_items(), 2);
    }

    #[tokio::test]
    async fn test_rental_dates_validated_before_set() {
        let session = session().await;
        let start = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 9, 4).unwrap();

        assert!(session.set_rental_dates(start, end).is_ok());

        let err = session.set_rental_dates(end, start).unwrap_err();
        assert!(matches!(err, CheckoutError::InvalidInput(_)));

        // The failed call did not overwrite the stored dates.
        let dates = session.with_cart(|cart| cart.rental_dates());
        assert_eq!(dates, Some((start, end)));
    }

    #[tokio::test]
    async fn test_submit_clears_cart_on_success() {
        let session = session().await;
        session.add_to_cart(entry("p1", "iPad", 3975), 2);

        let receipt = session
            .submit_order(&customer(), &quote(), true)
            .await
            .unwrap();

        assert_eq!(receipt.total_amount.cents(), 3975 * 2 + 9000);
        assert_eq!(session.total_items(), 0);
        assert!(!session.is_submitting());
    }

    #[tokio::test]
    async fn test_submit_keeps_cart_on_failure() {
        let session = session().await;
        session.add_to_cart(entry("p1", "iPad", 3975), 2);

        let mut bad = customer();
        bad.email = String::new();

        let err = session.submit_order(&bad, &quote(), true).await.unwrap_err();
        assert!(matches!(err, CheckoutError::InvalidInput(_)));

        // Entered state survives for the retry.
        assert_eq!(session.total_items(), 2);
        assert!(!session.is_submitting());

        // And the retry works once the input is fixed.
        session.submit_order(&customer(), &quote(), true).await.unwrap();
        assert_eq!(session.total_items(), 0);
    }

    #[tokio::test]
    async fn test_rental_dates_fill_missing_event_dates() {
        let (session, db) = session_with_db().await;
        let start = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 9, 4).unwrap();

        session.set_rental_dates(start, end).unwrap();
        session.add_to_cart(entry("p1", "iPad", 3975), 1);

        let receipt = session
            .submit_order(&customer(), &quote(), true)
            .await
            .unwrap();

        // The persisted order carries the cart's rental period.
        let order = db.orders().get_by_id(&receipt.order_id).await.unwrap().unwrap();
        assert_eq!(order.event_start_date, Some(start));
        assert_eq!(order.event_end_date, Some(end));
    }

    /// Gateway that blocks until released, to hold a submission open.
    struct BlockingGateway {
        release: Arc<Notify>,
    }

    #[async_trait]
    impl PaymentGateway for BlockingGateway {
        async fn create_session(
            &self,
            request: &PaymentRequest,
        ) -> Result<PaymentSession, PaymentError> {
            self.release.notified().await;
            Ok(PaymentSession {
                session_ref: format!("cs_{}", request.order_number),
                redirect_url: "https://pay.example".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_duplicate_submission_suppressed_while_in_flight() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let release = Arc::new(Notify::new());
        let gateway = Arc::new(BlockingGateway {
            release: release.clone(),
        });
        let session = Arc::new(StorefrontSession::new(CheckoutPipeline::new(
            &db,
            Some(gateway),
            "usd",
        )));

        session.add_to_cart(entry("p1", "iPad", 3975), 1);

        let first = {
            let session = session.clone();
            tokio::spawn(async move { session.submit_order(&customer(), &quote(), false).await })
        };

        // Wait until the first submission is holding the in-flight flag.
        while !session.is_submitting() {
            tokio::task::yield_now().await;
        }

        let second = session.submit_order(&customer(), &quote(), false).await;
        assert!(matches!(second, Err(CheckoutError::SubmissionInFlight)));

        release.notify_one();
        let receipt = first.await.unwrap().unwrap();
        assert!(receipt.redirect_url.is_some());
        assert!(!session.is_submitting());
    }
}
