//! # eventhire-checkout: Checkout Services for Eventhire
//!
//! The service layer of the rental storefront: shipping resolution, order
//! assembly with payment handoff, document generation, and the session
//! object owning the cart.
//!
//! ## Architecture Position
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │          ★ eventhire-checkout (THIS CRATE) ★                 │
//! │                                                              │
//! │   session     shipping      pipeline      document           │
//! │   cart owner  postal code → order         quote/receipt      │
//! │   in-flight   cost pair     assembly      rendering          │
//! │   guard                                                      │
//! │                                                              │
//! │   geocode     payment       pdf           email              │
//! │   (reqwest clients behind traits, degrade gracefully)        │
//! └───────────┬────────────────────────────────────┬─────────────┘
//!             │                                    │
//! ┌───────────▼──────────────┐      ┌──────────────▼─────────────┐
//! │  eventhire-core          │      │  eventhire-db              │
//! │  cart, money, validation │      │  SQLite repositories       │
//! └──────────────────────────┘      └────────────────────────────┘
//! ```
//!
//! ## Data Flow
//!
//! UI mutates the session's cart → at checkout, [`shipping::ShippingResolver`]
//! turns a postal code into a [`eventhire_core::ShippingQuote`] → the session
//! submits customer data + cart snapshot + quote to
//! [`pipeline::CheckoutPipeline`], which persists the order and opens a
//! payment session → [`document::DocumentService`] renders a quote or receipt
//! for any persisted order id.
//!
//! External collaborators (geocoding, payment, PDF conversion) sit behind
//! traits with reqwest production implementations; a missing credential or a
//! collaborator outage degrades per the contracts documented on each module.
//!
//! [`storefront::Storefront`] assembles the whole service set from a
//! [`config::CheckoutConfig`].

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod document;
pub mod email;
pub mod error;
pub mod geocode;
pub mod payment;
pub mod pdf;
pub mod pipeline;
pub mod session;
pub mod shipping;
pub mod storefront;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use config::{CheckoutConfig, ConfigError};
pub use document::{DocumentKind, DocumentService, RenderedDocument};
pub use error::{CheckoutError, CheckoutResult};
pub use geocode::{AddressSummary, GoogleGeocoder, RegionSource};
pub use payment::{PaymentGateway, PaymentRequest, PaymentSession, StripeGateway};
pub use pdf::{HtmlToPdfClient, PdfRenderer};
pub use pipeline::{CheckoutPipeline, OrderReceipt};
pub use session::StorefrontSession;
pub use shipping::ShippingResolver;
pub use storefront::Storefront;
