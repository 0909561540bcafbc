//! # Cart Aggregation
//!
//! The in-memory shopping cart: line items, rental date range, and derived
//! totals.
//!
//! ## Line Identity
//! A cart line is identified by the pair `(product_id, category)`. Two adds
//! merge if and only if both components match, which lets the same base
//! product appear as distinct lines under different bundle variants
//! (`"Individual"` vs `"Bundle-5"`). Removal and quantity updates take the
//! same fully qualified [`LineKey`] used at insertion.
//!
//! ## Invariants
//! - Every present line has quantity > 0; an update that would drive a
//!   quantity to 0 removes the line.
//! - Unit prices are normalized numeric values from the moment a line enters
//!   the cart. Display formatting happens only at render time.
//! - The cart itself performs no validation and no I/O. Quantity coercion
//!   and date-ordering checks are caller responsibilities.

use std::time::{Duration, Instant};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::money::Money;

/// How long an added product stays marked as "recently added".
///
/// The marker drives transient UI highlighting only. It is filtered on read,
/// so no timer is needed and nothing observable leaks once it expires.
pub const RECENTLY_ADDED_TTL: Duration = Duration::from_secs(2);

// =============================================================================
// Line Items
// =============================================================================

/// The identity of a cart line: product id plus bundle-variant category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineKey {
    pub product_id: String,
    pub category: String,
}

/// A catalog entry being added to the cart (everything but the quantity).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartEntry {
    pub product_id: String,
    pub title: String,
    /// Normalized numeric unit price in cents.
    pub unit_price_cents: i64,
    pub image_url: Option<String>,
    /// Category, possibly carrying a bundle-variant tag (e.g. "Bundle-5").
    pub category: String,
}

impl CartEntry {
    /// Builds an entry from a catalog product, snapshotting its fields.
    pub fn from_product(product: &crate::types::Product) -> Self {
        CartEntry {
            product_id: product.id.clone(),
            title: product.title.clone(),
            unit_price_cents: product.price_cents,
            image_url: product.image_url.clone(),
            category: product.category.clone(),
        }
    }

    /// Replaces the category, used when adding a bundle variant of a product.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }
}

/// An item in the shopping cart.
///
/// Product fields are frozen copies taken at add time, so the cart displays
/// consistent data even if the catalog row changes afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: String,
    pub title: String,
    /// Price in cents at time of adding (frozen).
    pub unit_price_cents: i64,
    pub image_url: Option<String>,
    pub category: String,
    /// Quantity in cart, always > 0.
    pub quantity: i64,
}

impl CartLine {
    /// Returns the identity of this line.
    pub fn key(&self) -> LineKey {
        LineKey {
            product_id: self.product_id.clone(),
            category: self.category.clone(),
        }
    }

    /// Checks whether this line carries the given identity.
    pub fn matches(&self, key: &LineKey) -> bool {
        self.product_id == key.product_id && self.category == key.category
    }

    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Calculates the line total (unit price × quantity).
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart for one storefront session.
///
/// State is process-local and mutated by a single logical actor; the session
/// wrapper in `eventhire-checkout` provides the `Mutex` when the cart is
/// shared across tasks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    /// Line items in insertion order.
    pub lines: Vec<CartLine>,

    /// UI flag: whether the cart panel is open.
    pub is_open: bool,

    /// Rental period start, set at the beginning of checkout intent.
    pub rental_start: Option<NaiveDate>,

    /// Rental period end. Ordering against the start date is validated by
    /// the caller before [`Cart::set_dates`] is invoked.
    pub rental_end: Option<NaiveDate>,

    /// Transient "recently added" marker for UI feedback. Last write wins.
    #[serde(skip)]
    last_added: Option<(String, Instant)>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart::default()
    }

    /// Adds an entry to the cart, or increases the quantity of the line with
    /// the same `(product_id, category)` identity.
    ///
    /// Always marks the added product id as recently added (last write
    /// wins). The caller is responsible for coercing `quantity` to at least
    /// 1 before invocation; the aggregator does not reject bad input.
    ///
    /// ## Example
    /// ```rust
    /// use eventhire_core::cart::{Cart, CartEntry};
    ///
    /// let entry = CartEntry {
    ///     product_id: "p-1".into(),
    ///     title: "iPad 10.2 7-inch WiFi".into(),
    ///     unit_price_cents: 3975,
    ///     image_url: None,
    ///     category: "iPad".into(),
    /// };
    ///
    /// let mut cart = Cart::new();
    /// cart.add_item(entry.clone(), 2);
    /// cart.add_item(entry, 3);
    /// assert_eq!(cart.lines.len(), 1);
    /// assert_eq!(cart.total_items(), 5);
    /// ```
    pub fn add_item(&mut self, entry: CartEntry, quantity: i64) {
        self.last_added = Some((entry.product_id.clone(), Instant::now()));

        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|l| l.product_id == entry.product_id && l.category == entry.category)
        {
            line.quantity += quantity;
            return;
        }

        self.lines.push(CartLine {
            product_id: entry.product_id,
            title: entry.title,
            unit_price_cents: entry.unit_price_cents,
            image_url: entry.image_url,
            category: entry.category,
            quantity,
        });
    }

    /// Returns the product id most recently added, if the highlight window
    /// has not elapsed yet. At most one product is marked at a time.
    pub fn recently_added(&self) -> Option<&str> {
        match &self.last_added {
            Some((id, marked_at)) if marked_at.elapsed() < RECENTLY_ADDED_TTL => Some(id),
            _ => None,
        }
    }

    /// Removes the line with the given identity. No-op when absent.
    pub fn remove_item(&mut self, key: &LineKey) {
        self.lines.retain(|l| !l.matches(key));
    }

    /// Sets the quantity of the line with the given identity.
    ///
    /// Negative quantities are clamped to 0; a resulting quantity of 0
    /// removes the line. No-op when the line is absent.
    pub fn update_quantity(&mut self, key: &LineKey, quantity: i64) {
        let quantity = quantity.max(0);
        if quantity == 0 {
            self.remove_item(key);
            return;
        }

        if let Some(line) = self.lines.iter_mut().find(|l| l.matches(key)) {
            line.quantity = quantity;
        }
    }

    /// Unconditionally overwrites both rental dates.
    pub fn set_dates(&mut self, start: NaiveDate, end: NaiveDate) {
        self.rental_start = Some(start);
        self.rental_end = Some(end);
    }

    /// Returns both rental dates once both have been set.
    pub fn rental_dates(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.rental_start.zip(self.rental_end)
    }

    /// Opens the cart panel.
    pub fn open(&mut self) {
        self.is_open = true;
    }

    /// Closes the cart panel.
    pub fn close(&mut self) {
        self.is_open = false;
    }

    /// Returns the total quantity across all lines. 0 for an empty cart.
    pub fn total_items(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Returns the sum of line totals. Zero for an empty cart.
    pub fn total_price(&self) -> Money {
        self.lines.iter().map(|l| l.line_total()).sum()
    }

    /// Checks if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Empties the line items. Rental dates survive; they are cleared only
    /// when the whole session ends.
    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(product_id: &str, category: &str, price_cents: i64) -> CartEntry {
        CartEntry {
            product_id: product_id.to_string(),
            title: format!("Product {product_id}"),
            unit_price_cents: price_cents,
            image_url: None,
            category: category.to_string(),
        }
    }

    fn key(product_id: &str, category: &str) -> LineKey {
        LineKey {
            product_id: product_id.to_string(),
            category: category.to_string(),
        }
    }

    #[test]
    fn test_add_distinct_items_sums_quantities() {
        let mut cart = Cart::new();
        cart.add_item(entry("p1", "iPad", 3975), 2);
        cart.add_item(entry("p2", "Laptop", 7975), 1);
        cart.add_item(entry("p3", "Mobile", 2975), 4);

        assert_eq!(cart.lines.len(), 3);
        assert_eq!(cart.total_items(), 7);
    }

    #[test]
    fn test_add_same_identity_merges() {
        let mut cart = Cart::new();
        cart.add_item(entry("p1", "iPad", 3975), 2);
        cart.add_item(entry("p1", "iPad", 3975), 3);

        assert_eq!(cart.lines.len(), 1);
        assert_eq!(cart.lines[0].quantity, 5);
    }

    #[test]
    fn test_same_product_different_category_stays_distinct() {
        // Same base product as an individual line and as a bundle variant.
        let mut cart = Cart::new();
        cart.add_item(entry("P1", "Individual", 3975), 3);
        cart.add_item(entry("P1", "Bundle-5", 19900), 1);

        assert_eq!(cart.lines.len(), 2);
        assert_eq!(cart.total_items(), 4);
        assert_eq!(cart.total_price().cents(), 3975 * 3 + 19900); // $318.25
    }

    #[test]
    fn test_total_price_invariant_under_reordering() {
        let mut a = Cart::new();
        a.add_item(entry("p1", "iPad", 3975), 3);
        a.add_item(entry("p2", "Laptop", 7975), 2);

        let mut b = Cart::new();
        b.add_item(entry("p2", "Laptop", 7975), 2);
        b.add_item(entry("p1", "iPad", 3975), 1);
        b.add_item(entry("p1", "iPad", 3975), 2);

        assert_eq!(a.total_price(), b.total_price());
    }

    #[test]
    fn test_update_quantity_zero_removes() {
        let mut cart = Cart::new();
        cart.add_item(entry("p1", "iPad", 3975), 2);

        cart.update_quantity(&key("p1", "iPad"), 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_quantity_negative_behaves_like_zero() {
        let mut cart = Cart::new();
        cart.add_item(entry("p1", "iPad", 3975), 2);

        cart.update_quantity(&key("p1", "iPad"), -3);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_quantity_sets_value() {
        let mut cart = Cart::new();
        cart.add_item(entry("p1", "iPad", 3975), 2);

        cart.update_quantity(&key("p1", "iPad"), 7);
        assert_eq!(cart.lines[0].quantity, 7);

        // Unknown identity is a no-op.
        cart.update_quantity(&key("p9", "iPad"), 1);
        assert_eq!(cart.total_items(), 7);
    }

    #[test]
    fn test_remove_requires_full_identity() {
        let mut cart = Cart::new();
        cart.add_item(entry("P1", "Individual", 3975), 3);
        cart.add_item(entry("P1", "Bundle-5", 19900), 1);

        cart.remove_item(&key("P1", "Bundle-5"));
        assert_eq!(cart.lines.len(), 1);
        assert_eq!(cart.lines[0].category, "Individual");
    }

    #[test]
    fn test_clear_keeps_dates() {
        let mut cart = Cart::new();
        let start = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 9, 4).unwrap();
        cart.set_dates(start, end);
        cart.add_item(entry("p1", "iPad", 3975), 2);

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.rental_dates(), Some((start, end)));
    }

    #[test]
    fn test_set_dates_overwrites_unconditionally() {
        let mut cart = Cart::new();
        let d1 = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2026, 9, 4).unwrap();

        cart.set_dates(d1, d2);
        cart.set_dates(d2, d1); // ordering is the caller's concern
        assert_eq!(cart.rental_dates(), Some((d2, d1)));
    }

    #[test]
    fn test_recently_added_last_write_wins() {
        let mut cart = Cart::new();
        cart.add_item(entry("p1", "iPad", 3975), 1);
        cart.add_item(entry("p2", "Laptop", 7975), 1);

        assert_eq!(cart.recently_added(), Some("p2"));
    }

    #[test]
    fn test_empty_cart_totals() {
        let cart = Cart::new();
        assert_eq!(cart.total_items(), 0);
        assert!(cart.total_price().is_zero());
        assert_eq!(cart.recently_added(), None);
    }

    #[test]
    fn test_open_close_flag() {
        let mut cart = Cart::new();
        assert!(!cart.is_open);
        cart.open();
        assert!(cart.is_open);
        cart.close();
        assert!(!cart.is_open);
    }
}
