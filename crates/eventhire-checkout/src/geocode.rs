//! Geocoding collaborator: postal code to region lookup.
//!
//! The production implementation is [`GoogleGeocoder`], a thin reqwest
//! client for the Maps geocoding endpoint. The resolver only depends on the
//! [`RegionSource`] trait, so tests substitute a fake and no network is
//! required.
//!
//! Every failure mode here (missing key, rate limit, transport error, no
//! results) is an explicit [`GeocodeError`]; the shipping resolver maps
//! them all to the default region and never propagates them.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

/// Errors from the geocoding collaborator.
///
/// These never cross the shipping resolver boundary; they exist so the
/// resolver can log what it degraded from.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// HTTP transport or deserialization failure.
    #[error("geocoding request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider reported a rate limit (OVER_QUERY_LIMIT).
    #[error("geocoding provider rate limited")]
    RateLimited,

    /// The provider returned no usable result for the postal code.
    #[error("no geocoding result for postal code")]
    NoMatch,
}

/// A summary of the address a postal code resolves to.
///
/// Used to prefill the shipping address on the checkout form. Fields fall
/// back to placeholders when the provider is unavailable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressSummary {
    pub formatted_address: String,
    pub city: String,
    pub region: String,
    pub country: String,
    pub postal_code: String,
}

impl AddressSummary {
    /// The placeholder summary used when lookup degrades.
    pub fn fallback(postal_code: &str) -> Self {
        AddressSummary {
            formatted_address: format!("{postal_code}, USA"),
            city: "Unknown City".to_string(),
            region: "Unknown".to_string(),
            country: "US".to_string(),
            postal_code: postal_code.to_string(),
        }
    }

    /// Single-line rendering: "City, Region 07927, US".
    pub fn full_address(&self) -> String {
        format!(
            "{}, {} {}, {}",
            self.city, self.region, self.postal_code, self.country
        )
    }
}

/// Maps a normalized postal code to a region code.
#[async_trait]
pub trait RegionSource: Send + Sync {
    /// Resolves the two-letter region code for a postal code.
    async fn region_for_postal_code(&self, postal_code: &str) -> Result<String, GeocodeError>;

    /// Resolves the full address summary for a postal code.
    async fn address_for_postal_code(
        &self,
        postal_code: &str,
    ) -> Result<AddressSummary, GeocodeError>;
}

// =============================================================================
// Google Geocoder
// =============================================================================

const GEOCODE_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/geocode/json";

/// HTTP client for the Google Maps geocoding API.
#[derive(Debug, Clone)]
pub struct GoogleGeocoder {
    api_key: String,
    http: Client,
}

impl GoogleGeocoder {
    /// Create a new client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        GoogleGeocoder {
            api_key: api_key.into(),
            http: Client::new(),
        }
    }

    async fn geocode(&self, postal_code: &str) -> Result<GeocodeResult, GeocodeError> {
        let response = self
            .http
            .get(GEOCODE_ENDPOINT)
            .query(&[
                ("address", postal_code),
                ("key", self.api_key.as_str()),
                ("components", "country:US"),
            ])
            .send()
            .await?;

        let parsed: GeocodeResponse = response.json().await?;

        if parsed.status == "OVER_QUERY_LIMIT" {
            return Err(GeocodeError::RateLimited);
        }
        if parsed.status != "OK" {
            return Err(GeocodeError::NoMatch);
        }

        parsed.results.into_iter().next().ok_or(GeocodeError::NoMatch)
    }
}

#[async_trait]
impl RegionSource for GoogleGeocoder {
    async fn region_for_postal_code(&self, postal_code: &str) -> Result<String, GeocodeError> {
        let result = self.geocode(postal_code).await?;

        result
            .address_components
            .iter()
            .find(|c| c.types.iter().any(|t| t == "administrative_area_level_1"))
            .map(|c| c.short_name.clone())
            .ok_or(GeocodeError::NoMatch)
    }

    async fn address_for_postal_code(
        &self,
        postal_code: &str,
    ) -> Result<AddressSummary, GeocodeError> {
        let result = self.geocode(postal_code).await?;

        let mut city = String::new();
        let mut region = String::new();
        let mut country = String::new();

        for component in &result.address_components {
            if component.types.iter().any(|t| t == "locality") {
                city = component.long_name.clone();
            }
            if component.types.iter().any(|t| t == "administrative_area_level_1") {
                region = component.short_name.clone();
            }
            if component.types.iter().any(|t| t == "country") {
                country = component.short_name.clone();
            }
        }

        Ok(AddressSummary {
            formatted_address: result.formatted_address,
            city,
            region,
            country,
            postal_code: postal_code.to_string(),
        })
    }
}

// =============================================================================
// Response Shapes
// =============================================================================

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    formatted_address: String,
    address_components: Vec<AddressComponent>,
}

#[derive(Debug, Deserialize)]
struct AddressComponent {
    long_name: String,
    short_name: String,
    types: Vec<String>,
}

// =============================================================================
// Unit Tests
// =============================================================================
