//! # Domain Types
//!
//! Core domain types used throughout the Eventhire storefront.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐
//! │    Product      │   │     Order       │   │   OrderItem     │
//! │  ─────────────  │   │  ─────────────  │   │  ─────────────  │
//! │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │
//! │  title          │   │  order_number   │   │  order_id (FK)  │
//! │  price_cents    │   │  status         │   │  product_id     │
//! │  category       │   │  total_cents    │   │  line_total     │
//! └─────────────────┘   └─────────────────┘   └─────────────────┘
//! ```
//!
//! Every entity has a UUID `id` for relations plus, where humans need one, a
//! business identifier (the order number).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Product Identity
// =============================================================================

/// Structural length of a canonical product identifier (a UUID).
pub const CANONICAL_PRODUCT_ID_LEN: usize = 36;

/// Strips a client-side bundle-variant suffix from a product identifier.
///
/// The storefront distinguishes bundle sizes of the same base product by
/// appending a synthetic suffix to the product id (e.g.
/// `"<uuid>-bundle-5"`). Order line items must reference the catalog row, so
/// anything past the canonical UUID length is dropped before storage.
///
/// ## Example
/// ```rust
/// use eventhire_core::types::canonical_product_id;
///
/// let id = "0b8ac1f2-4f6e-4a9e-9b63-0f3a5d2c7e11-bundle-5";
/// assert_eq!(
///     canonical_product_id(id),
///     "0b8ac1f2-4f6e-4a9e-9b63-0f3a5d2c7e11"
/// );
/// assert_eq!(canonical_product_id("short-id"), "short-id");
/// ```
pub fn canonical_product_id(id: &str) -> &str {
    match id.char_indices().nth(CANONICAL_PRODUCT_ID_LEN) {
        Some((idx, _)) => &id[..idx],
        None => id,
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product available for rental.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown in the catalog and on documents.
    pub title: String,

    /// Optional description for product details.
    pub description: Option<String>,

    /// Rental price in cents (smallest currency unit).
    pub price_cents: i64,

    /// Catalog category ("iPad", "Laptop", "Bundle", ...).
    pub category: String,

    /// Image reference snapshotted into the cart for display.
    pub image_url: Option<String>,

    /// Whether the product is offered (soft delete).
    pub is_active: bool,

    /// When the product was created.
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the rental price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

// =============================================================================
// Order Status
// =============================================================================

/// The status of a persisted order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Order recorded, payment session pending or in progress.
    Pending,
    /// Quote request: no payment is expected.
    Quote,
    /// Payment confirmed.
    Paid,
    /// Order was cancelled.
    Cancelled,
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

// =============================================================================
// Customer Details
// =============================================================================

/// Customer-supplied checkout form data.
///
/// Validated by [`crate::validation::validate_customer`] before an order is
/// assembled from it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub event_name: String,
    pub event_start_date: Option<NaiveDate>,
    pub event_end_date: Option<NaiveDate>,
    pub postal_code: Option<String>,
    pub shipping_address: Option<String>,
    pub message: Option<String>,
}

// =============================================================================
// Order
// =============================================================================

/// A persisted order header.
///
/// Monetary fields are stored in cents. `total_amount_cents` always equals
/// `subtotal_cents + shipping_cost_cents + collection_cost_cents`; the
/// assembly pipeline computes it rather than trusting client input.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Order {
    pub id: String,
    pub order_number: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub company_name: String,
    pub event_name: String,
    pub event_start_date: Option<NaiveDate>,
    pub event_end_date: Option<NaiveDate>,
    pub postal_code: Option<String>,
    pub shipping_address: Option<String>,
    pub message: Option<String>,
    pub subtotal_cents: i64,
    pub shipping_cost_cents: i64,
    pub collection_cost_cents: i64,
    pub total_amount_cents: i64,
    pub status: OrderStatus,
    /// Reference of the payment session opened for this order, if any.
    pub payment_session_ref: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Returns the item subtotal as Money.
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }

    /// Returns the delivery cost as Money.
    #[inline]
    pub fn shipping_cost(&self) -> Money {
        Money::from_cents(self.shipping_cost_cents)
    }

    /// Returns the collection cost as Money.
    #[inline]
    pub fn collection_cost(&self) -> Money {
        Money::from_cents(self.collection_cost_cents)
    }

    /// Returns the grand total as Money.
    #[inline]
    pub fn total_amount(&self) -> Money {
        Money::from_cents(self.total_amount_cents)
    }
}

// =============================================================================
// Order Item
// =============================================================================

/// A line item owned by exactly one order.
///
/// Uses the snapshot pattern: title and unit price are frozen at insertion
/// so the order history is immune to later catalog changes. `line_total`
/// is computed once at insertion and never recomputed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: String,
    pub order_id: String,
    /// Canonical product id (bundle-variant suffix stripped).
    pub product_id: String,
    /// Product title at time of ordering (frozen).
    pub title: String,
    /// Unit price in cents at time of ordering (frozen).
    pub unit_price_cents: i64,
    /// Quantity ordered.
    pub quantity: i64,
    /// unit_price × quantity, computed at insertion.
    pub line_total_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl OrderItem {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the line total as Money.
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.line_total_cents)
    }
}

// =============================================================================
// Shipping Quote
// =============================================================================

/// A resolved shipping/collection cost pair for a delivery region.
///
/// Derived, never persisted: recomputed whenever the postal code input
/// changes and passes format validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingQuote {
    /// Display name of the matched zone (or `"<region> Zone"` fallback).
    pub zone_name: String,
    /// Delivery and setup cost.
    pub shipping_cost: Money,
    /// Pickup and collection cost.
    pub collection_cost: Money,
}

impl ShippingQuote {
    /// Total shipping figure: delivery plus collection, in fixed-point cents.
    #[inline]
    pub fn total_shipping(&self) -> Money {
        self.shipping_cost + self.collection_cost
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
