//! # eventhire-core: Pure Business Logic for Eventhire
//!
//! This crate is the heart of the Eventhire rental storefront. It contains
//! the cart aggregation model, monetary arithmetic, domain types, and input
//! validation as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  eventhire-checkout   shipping quotes, order assembly,       │
//! │                       payment handoff, documents             │
//! └──────────────────────────────┬───────────────────────────────┘
//!                                │
//! ┌──────────────────────────────▼───────────────────────────────┐
//! │               ★ eventhire-core (THIS CRATE) ★                │
//! │                                                              │
//! │   types      money      cart       validation                │
//! │   Product    Money      Cart       postal code               │
//! │   Order      cents      CartLine   customer fields           │
//! │                                                              │
//! │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS         │
//! └──────────────────────────────┬───────────────────────────────┘
//!                                │
//! ┌──────────────────────────────▼───────────────────────────────┐
//! │  eventhire-db        SQLite repositories, migrations         │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Order, OrderItem, ShippingQuote)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`cart`] - In-memory cart aggregation and totals
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation rules
//!
//! ## Example Usage
//!
//! ```rust
//! use eventhire_core::cart::{Cart, CartEntry};
//!
//! let mut cart = Cart::new();
//! cart.add_item(
//!     CartEntry {
//!         product_id: "p-1".into(),
//!         title: "iPad 10.2 7-inch WiFi".into(),
//!         unit_price_cents: 3975,
//!         image_url: None,
//!         category: "iPad".into(),
//!     },
//!     3,
//! );
//!
//! assert_eq!(cart.total_items(), 3);
//! assert_eq!(cart.total_price().cents(), 11925);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartEntry, CartLine, LineKey};
pub use error::{ValidationError, ValidationResult};
pub use money::Money;
pub use types::*;
