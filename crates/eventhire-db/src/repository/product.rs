//! # Product Repository
//!
//! Database operations for the rental catalog.
//!
//! ## Key Operations
//! - Storefront listing (`list_active`)
//! - CRUD operations
//! - Soft delete via `is_active`

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use eventhire_core::Product;

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// // Storefront catalog
/// let products = repo.list_active(50).await?;
///
/// // Get by ID
/// let product = repo.get_by_id("uuid-here").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists active products for the storefront, sorted by title.
    pub async fn list_active(&self, limit: u32) -> DbResult<Vec<Product>> {
        debug!(limit = %limit, "Listing active products");

        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT
                id, title, description, price_cents, category, image_url,
                is_active, created_at, updated_at
            FROM products
            WHERE is_active = 1
            ORDER BY title
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = products.len(), "Catalog query returned products");
        Ok(products)
    }

    /// Gets a product by ID.
    ///
    /// Returns `None` when the id does not exist. Soft-deleted products are
    /// still returned so persisted orders can resolve their references.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT
                id, title, description, price_cents, category, image_url,
                is_active, created_at, updated_at
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Inserts a product.
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, title = %product.title, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, title, description, price_cents, category, image_url,
                is_active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&product.id)
        .bind(&product.title)
        .bind(&product.description)
        .bind(product.price_cents)
        .bind(&product.category)
        .bind(&product.image_url)
        .bind(product.is_active)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Sets whether a product is offered (soft delete).
    pub async fn set_active(&self, id: &str, active: bool) -> DbResult<()> {
        let now: DateTime<Utc> = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products SET is_active = ?2, updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(active)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts all products (active and inactive).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
