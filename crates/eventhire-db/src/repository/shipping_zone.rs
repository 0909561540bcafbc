//! # Shipping Zone Repository
//!
//! Region code to shipping/collection cost lookup.
//!
//! The zone table is seeded by migration with the known delivery regions.
//! An unmatched region is not an error at this layer: the resolver in
//! eventhire-checkout substitutes the default cost pair.

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use eventhire_core::{Money, ShippingQuote};

/// A row of the `shipping_zones` table.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ShippingZone {
    /// Two-letter region code ("NJ", "CA", ...). Unique.
    pub region: String,
    /// Display name of the zone.
    pub zone_name: String,
    pub shipping_cost_cents: i64,
    pub collection_cost_cents: i64,
}

impl ShippingZone {
    /// Converts the stored row into the derived quote shape.
    pub fn to_quote(&self) -> ShippingQuote {
        ShippingQuote {
            zone_name: self.zone_name.clone(),
            shipping_cost: Money::from_cents(self.shipping_cost_cents),
            collection_cost: Money::from_cents(self.collection_cost_cents),
        }
    }
}

/// Repository for shipping zone lookups.
#[derive(Debug, Clone)]
pub struct ShippingZoneRepository {
    pool: SqlitePool,
}

impl ShippingZoneRepository {
    /// Creates a new ShippingZoneRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ShippingZoneRepository { pool }
    }

    /// Finds the zone for a region code. Exact match only.
    pub async fn find_by_region(&self, region: &str) -> DbResult<Option<ShippingZone>> {
        debug!(region = %region, "Looking up shipping zone");

        let zone = sqlx::query_as::<_, ShippingZone>(
            r#"
            SELECT region, zone_name, shipping_cost_cents, collection_cost_cents
            FROM shipping_zones
            WHERE region = ?1
            "#,
        )
        .bind(region)
        .fetch_optional(&self.pool)
        .await?;

        Ok(zone)
    }

    /// Lists all configured zones, sorted by region code.
    pub async fn list(&self) -> DbResult<Vec<ShippingZone>> {
        let zones = sqlx::query_as::<_, ShippingZone>(
            r#"
            SELECT region, zone_name, shipping_cost_cents, collection_cost_cents
            FROM shipping_zones
            ORDER BY region
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(zones)
    }

    /// Inserts or replaces a zone row.
    pub async fn upsert(&self, zone: &ShippingZone) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO shipping_zones (region, zone_name, shipping_cost_cents, collection_cost_cents)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(region) DO UPDATE SET
                zone_name = excluded.zone_name,
                shipping_cost_cents = excluded.shipping_cost_cents,
                collection_cost_cents = excluded.collection_cost_cents
            "#,
        )
        .bind(&zone.region)
        .bind(&zone.zone_name)
        .bind(zone.shipping_cost_cents)
        .bind(zone.collection_cost_cents)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
