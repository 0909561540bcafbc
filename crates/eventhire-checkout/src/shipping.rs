//! # Shipping Resolver
//!
//! Maps a customer-supplied postal code to a shipping/collection cost pair.
//!
//! ## Resolution Steps
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Shipping Resolution                                  │
//! │                                                                         │
//! │  raw postal code                                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  1. normalize + validate ──── malformed? ──► InvalidInput (hard error) │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  2. region lookup (geocoder) ─ unavailable? ─► default region          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  3. zone lookup (database) ── no match? ────► default cost pair,       │
//! │       │                                        "<region> Zone"         │
//! │       ▼                                                                 │
//! │  4. ShippingQuote                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A structurally invalid postal code is the only hard error. Every
//! downstream failure degrades to a documented default so checkout never
//! blocks on a third-party outage.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::CheckoutResult;
use crate::geocode::{AddressSummary, RegionSource};
use eventhire_core::validation::normalize_postal_code;
use eventhire_core::{Money, ShippingQuote};
use eventhire_db::ShippingZoneRepository;

/// Resolves shipping quotes for postal codes.
pub struct ShippingResolver {
    zones: ShippingZoneRepository,
    /// Geocoding collaborator. `None` (no API key configured) degrades to
    /// the default region immediately.
    region_source: Option<Arc<dyn RegionSource>>,
    default_region: String,
    default_shipping_cost: Money,
    default_collection_cost: Money,
}

impl ShippingResolver {
    /// Creates a resolver.
    pub fn new(
        zones: ShippingZoneRepository,
        region_source: Option<Arc<dyn RegionSource>>,
        default_region: impl Into<String>,
        default_shipping_cost: Money,
        default_collection_cost: Money,
    ) -> Self {
        ShippingResolver {
            zones,
            region_source,
            default_region: default_region.into(),
            default_shipping_cost,
            default_collection_cost,
        }
    }

    /// Resolves a shipping quote for a raw postal code.
    ///
    /// Recomputed whenever the postal code input changes; the quote is
    /// derived state and never persisted.
    pub async fn resolve(&self, raw_postal_code: &str) -> CheckoutResult<ShippingQuote> {
        let postal_code = normalize_postal_code(raw_postal_code)?;

        let region = self.resolve_region(&postal_code).await;
        let quote = self.quote_for_region(&region).await;

        debug!(
            postal_code = %postal_code,
            region = %region,
            zone = %quote.zone_name,
            total = %quote.total_shipping(),
            "Shipping quote resolved"
        );

        Ok(quote)
    }

    /// Resolves an address summary for checkout-form prefill.
    ///
    /// Same degradation contract as [`resolve`](Self::resolve): only a
    /// malformed postal code is an error, everything else falls back to the
    /// placeholder summary.
    pub async fn lookup_address(&self, raw_postal_code: &str) -> CheckoutResult<AddressSummary> {
        let postal_code = normalize_postal_code(raw_postal_code)?;

        let Some(source) = &self.region_source else {
            debug!("No geocoding collaborator configured, using address fallback");
            return Ok(AddressSummary::fallback(&postal_code));
        };

        match source.address_for_postal_code(&postal_code).await {
            Ok(summary) => Ok(summary),
            Err(e) => {
                warn!(error = %e, "Address lookup degraded to fallback");
                Ok(AddressSummary::fallback(&postal_code))
            }
        }
    }

    /// Resolves the region for a postal code, falling back to the default.
    async fn resolve_region(&self, postal_code: &str) -> String {
        let Some(source) = &self.region_source else {
            debug!("No geocoding collaborator configured, using default region");
            return self.default_region.clone();
        };

        match source.region_for_postal_code(postal_code).await {
            Ok(region) => region,
            Err(e) => {
                warn!(error = %e, default_region = %self.default_region, "Geocoding degraded to default region");
                self.default_region.clone()
            }
        }
    }

    /// Looks up the cost pair for a region, falling back to the default.
    async fn quote_for_region(&self, region: &str) -> ShippingQuote {
        match self.zones.find_by_region(region).await {
            Ok(Some(zone)) => zone.to_quote(),
            Ok(None) => {
                debug!(region = %region, "No configured zone, using default costs");
                self.default_quote(region)
            }
            Err(e) => {
                warn!(error = %e, region = %region, "Zone lookup degraded to default costs");
                self.default_quote(region)
            }
        }
    }

    fn default_quote(&self, region: &str) -> ShippingQuote {
        ShippingQuote {
            zone_name: format!("{region} Zone"),
            shipping_cost: self.default_shipping_cost,
            collection_cost: self.default_collection_cost,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CheckoutError;
    use crate::geocode::GeocodeError;
    use async_trait::async_trait;
    use eventhire_db::{Database, DbConfig};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Fake geocoder returning a fixed region and counting calls.
    struct FixedRegion {
        region: Option<String>,
        calls: AtomicUsize,
    }

    impl FixedRegion {
        fn some(region: &str) -> Self {
            FixedRegion {
                region: Some(region.to_string()),
                calls: AtomicUsize::new(0),
            }
        }

        fn unavailable() -> Self {
            FixedRegion {
                region: None,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl RegionSource for FixedRegion {
        async fn region_for_postal_code(&self, _postal_code: &str) -> Result<String, GeocodeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.region.clone().ok_or(GeocodeError::NoMatch)
        }

        async fn address_for_postal_code(
            &self,
            postal_code: &str,
        ) -> Result<AddressSummary, GeocodeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.region {
                Some(region) => Ok(AddressSummary {
                    formatted_address: format!("Somewhere, {region} {postal_code}, USA"),
                    city: "Somewhere".to_string(),
                    region: region.clone(),
                    country: "US".to_string(),
                    postal_code: postal_code.to_string(),
                }),
                None => Err(GeocodeError::NoMatch),
            }
        }
    }

    async fn resolver(source: Option<Arc<dyn RegionSource>>) -> ShippingResolver {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        ShippingResolver::new(
            db.shipping_zones(),
            source,
            "CA",
            Money::from_cents(7500),
            Money::from_cents(7500),
        )
    }

    #[tokio::test]
    async fn test_known_region_uses_configured_zone() {
        let resolver = resolver(Some(Arc::new(FixedRegion::some("NJ")))).await;

        let quote = resolver.resolve("07927").await.unwrap();
        assert_eq!(quote.zone_name, "New Jersey Zone");
        assert_eq!(quote.shipping_cost.cents(), 4500);
        assert_eq!(quote.total_shipping().cents(), 9000);
    }

    #[tokio::test]
    async fn test_unknown_region_falls_back_to_default_costs() {
        let resolver = resolver(Some(Arc::new(FixedRegion::some("ZZ")))).await;

        let quote = resolver.resolve("99999").await.unwrap();
        assert_eq!(quote.zone_name, "ZZ Zone");
        assert_eq!(quote.shipping_cost.cents(), 7500);
        assert_eq!(quote.collection_cost.cents(), 7500);
    }

    #[tokio::test]
    async fn test_geocoder_failure_degrades_to_default_region() {
        let resolver = resolver(Some(Arc::new(FixedRegion::unavailable()))).await;

        // Default region CA has a seeded zone, so the quote is still named.
        let quote = resolver.resolve("07927").await.unwrap();
        assert_eq!(quote.zone_name, "California Zone");
        assert!(quote.shipping_cost.cents() >= 0);
        assert!(quote.collection_cost.cents() >= 0);
    }

    #[tokio::test]
    async fn test_no_geocoder_configured_still_quotes() {
        let resolver = resolver(None).await;

        let quote = resolver.resolve("07927").await.unwrap();
        assert_eq!(
            quote.total_shipping(),
            quote.shipping_cost + quote.collection_cost
        );
    }

    #[tokio::test]
    async fn test_malformed_postal_code_rejected_before_collaborators() {
        let source = Arc::new(FixedRegion::some("NJ"));
        let counting: Arc<dyn RegionSource> = source.clone();
        let resolver = resolver(Some(counting)).await;

        let err = resolver.resolve("ABCDE").await.unwrap_err();
        assert!(matches!(err, CheckoutError::InvalidInput(_)));
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_address_lookup_degrades_to_placeholder() {
        let resolver = resolver(Some(Arc::new(FixedRegion::unavailable()))).await;

        let summary = resolver.lookup_address("07927").await.unwrap();
        assert_eq!(summary, AddressSummary::fallback("07927"));
    }

    #[tokio::test]
    async fn test_address_lookup_uses_geocoder_result() {
        let resolver = resolver(Some(Arc::new(FixedRegion::some("NJ")))).await;

        let summary = resolver.lookup_address("07927").await.unwrap();
        assert_eq!(summary.region, "NJ");
        assert_eq!(summary.full_address(), "Somewhere, NJ 07927, US");
    }
}
