//! # Storefront Bootstrap
//!
//! Builds the full service set from a [`CheckoutConfig`] and hands back one
//! handle owning all of it.
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Storefront Startup                                │
//! │                                                                         │
//! │  1. Connect to Database ──────────────────────────────────────────────► │
//! │     • SQLite with WAL mode                                              │
//! │     • Run pending migrations                                            │
//! │                                                                         │
//! │  2. Build Collaborator Clients ───────────────────────────────────────► │
//! │     • GoogleGeocoder     (only if GOOGLE_MAPS_API_KEY is set)           │
//! │     • StripeGateway      (only if STRIPE_SECRET_KEY is set)             │
//! │     • HtmlToPdfClient    (only if PDF_API_KEY is set)                   │
//! │     A missing credential disables that collaborator; the owning         │
//! │     service degrades per its documented contract.                       │
//! │                                                                         │
//! │  3. Build Services ───────────────────────────────────────────────────► │
//! │     • ShippingResolver: zone repository + geocoder + default costs      │
//! │     • CheckoutPipeline: order repository + payment gateway              │
//! │     • StorefrontSession: empty cart owning the pipeline                 │
//! │     • DocumentService: order repository + PDF renderer                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use tracing::info;

use crate::config::CheckoutConfig;
use crate::document::DocumentService;
use crate::error::CheckoutResult;
use crate::geocode::{GoogleGeocoder, RegionSource};
use crate::payment::{PaymentGateway, StripeGateway};
use crate::pdf::{HtmlToPdfClient, PdfRenderer};
use crate::pipeline::CheckoutPipeline;
use crate::session::StorefrontSession;
use crate::shipping::ShippingResolver;
use eventhire_db::{Database, DbConfig};

/// The assembled storefront: one cart session plus the services around it.
///
/// Constructed once per logical customer session and passed by reference to
/// whatever layer drives it. There is no global instance.
pub struct Storefront {
    db: Database,
    shipping: ShippingResolver,
    session: StorefrontSession,
    documents: DocumentService,
}

impl Storefront {
    /// Connects the database and assembles the services.
    pub async fn from_config(config: &CheckoutConfig) -> CheckoutResult<Self> {
        let db = Database::new(DbConfig::new(&config.database_path)).await?;
        info!("Database connected and migrations applied");

        Ok(Storefront::with_database(config, db))
    }

    /// Assembles the services over an existing database handle.
    ///
    /// Tests use this with an in-memory database.
    pub fn with_database(config: &CheckoutConfig, db: Database) -> Self {
        let geocoder: Option<Arc<dyn RegionSource>> = config
            .google_maps_api_key
            .as_ref()
            .map(|key| Arc::new(GoogleGeocoder::new(key.clone())) as Arc<dyn RegionSource>);

        let payment: Option<Arc<dyn PaymentGateway>> =
            config.stripe_secret_key.as_ref().map(|key| {
                Arc::new(StripeGateway::new(
                    key.clone(),
                    config.payment_success_url.clone(),
                    config.payment_cancel_url.clone(),
                )) as Arc<dyn PaymentGateway>
            });

        let pdf: Option<Arc<dyn PdfRenderer>> = config
            .pdf_api_key
            .as_ref()
            .map(|key| Arc::new(HtmlToPdfClient::new(key.clone())) as Arc<dyn PdfRenderer>);

        info!(
            geocoding = geocoder.is_some(),
            payment = payment.is_some(),
            pdf = pdf.is_some(),
            "Collaborators configured"
        );

        let shipping = ShippingResolver::new(
            db.shipping_zones(),
            geocoder,
            config.default_region.clone(),
            config.default_shipping_cost(),
            config.default_collection_cost(),
        );

        let session = StorefrontSession::new(CheckoutPipeline::new(
            &db,
            payment,
            config.currency.clone(),
        ));

        let documents = DocumentService::new(&db, pdf);

        Storefront {
            db,
            shipping,
            session,
            documents,
        }
    }

    /// The underlying database handle (catalog queries, diagnostics).
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// The shipping resolver.
    pub fn shipping(&self) -> &ShippingResolver {
        &self.shipping
    }

    /// The cart session.
    pub fn session(&self) -> &StorefrontSession {
        &self.session
    }

    /// The document service.
    pub fn documents(&self) -> &DocumentService {
        &self.documents
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
