//! # Order Repository
//!
//! Database operations for orders and order line items.
//!
//! ## Order Persistence Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Order Persistence                                    │
//! │                                                                         │
//! │  1. ORDER NUMBER                                                       │
//! │     └── next_order_number() → "20260804-0001"                          │
//! │         (atomic per-day counter, collision-free under concurrency)     │
//! │                                                                         │
//! │  2. HEADER                                                             │
//! │     └── insert_order() → orders row                                    │
//! │                                                                         │
//! │  3. LINE ITEMS (header must exist first: FK back-reference)            │
//! │     └── insert_items() → order_items rows                              │
//! │                                                                         │
//! │  4. (REAL ORDERS ONLY) PAYMENT SESSION                                 │
//! │     └── set_payment_session_ref() → session ref stored on header       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use eventhire_core::{Order, OrderItem, OrderStatus};

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Generates the next order number: `YYYYMMDD-NNNN`.
    ///
    /// ## Collision Freedom
    /// The per-day sequence is incremented inside the database with a single
    /// upsert, so concurrent callers each observe a distinct value. The
    /// counter restarts at 1 each day; the date prefix keeps the full number
    /// unique.
    pub async fn next_order_number(&self) -> DbResult<String> {
        let day = Utc::now().format("%Y%m%d").to_string();

        let seq: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO order_counters (day, next_seq) VALUES (?1, 1)
            ON CONFLICT(day) DO UPDATE SET next_seq = next_seq + 1
            RETURNING next_seq
            "#,
        )
        .bind(&day)
        .fetch_one(&self.pool)
        .await?;

        let number = format!("{day}-{seq:04}");
        debug!(order_number = %number, "Generated order number");
        Ok(number)
    }

    /// Inserts an order header.
    pub async fn insert_order(&self, order: &Order) -> DbResult<()> {
        debug!(id = %order.id, order_number = %order.order_number, "Inserting order");

        sqlx::query(
            r#"
            INSERT INTO orders (
                id, order_number,
                customer_name, customer_email, customer_phone, company_name,
                event_name, event_start_date, event_end_date,
                postal_code, shipping_address, message,
                subtotal_cents, shipping_cost_cents, collection_cost_cents,
                total_amount_cents,
                status, payment_session_ref,
                created_at, updated_at
            ) VALUES (
                ?1, ?2,
                ?3, ?4, ?5, ?6,
                ?7, ?8, ?9,
                ?10, ?11, ?12,
                ?13, ?14, ?15,
                ?16,
                ?17, ?18,
                ?19, ?20
            )
            "#,
        )
        .bind(&order.id)
        .bind(&order.order_number)
        .bind(&order.customer_name)
        .bind(&order.customer_email)
        .bind(&order.customer_phone)
        .bind(&order.company_name)
        .bind(&order.event_name)
        .bind(order.event_start_date)
        .bind(order.event_end_date)
        .bind(&order.postal_code)
        .bind(&order.shipping_address)
        .bind(&order.message)
        .bind(order.subtotal_cents)
        .bind(order.shipping_cost_cents)
        .bind(order.collection_cost_cents)
        .bind(order.total_amount_cents)
        .bind(order.status)
        .bind(&order.payment_session_ref)
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Inserts line items for an order.
    ///
    /// ## Snapshot Pattern
    /// Title, unit price, and line total are frozen copies computed at
    /// assembly time. The order header must already be persisted: each item
    /// holds a foreign-key back-reference to its order id.
    pub async fn insert_items(&self, items: &[OrderItem]) -> DbResult<()> {
        for item in items {
            debug!(order_id = %item.order_id, product_id = %item.product_id, "Adding order item");

            sqlx::query(
                r#"
                INSERT INTO order_items (
                    id, order_id, product_id, title,
                    unit_price_cents, quantity, line_total_cents,
                    created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
            )
            .bind(&item.id)
            .bind(&item.order_id)
            .bind(&item.product_id)
            .bind(&item.title)
            .bind(item.unit_price_cents)
            .bind(item.quantity)
            .bind(item.line_total_cents)
            .bind(item.created_at)
            .execute(&self.pool)
            .await?;
        }

        Ok(())
    }

    /// Gets an order header by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(
            r#"
            SELECT
                id, order_number,
                customer_name, customer_email, customer_phone, company_name,
                event_name, event_start_date, event_end_date,
                postal_code, shipping_address, message,
                subtotal_cents, shipping_cost_cents, collection_cost_cents,
                total_amount_cents,
                status, payment_session_ref,
                created_at, updated_at
            FROM orders
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    /// Gets all line items for an order, in insertion order.
    pub async fn get_items(&self, order_id: &str) -> DbResult<Vec<OrderItem>> {
        let items = sqlx::query_as::<_, OrderItem>(
            r#"
            SELECT
                id, order_id, product_id, title,
                unit_price_cents, quantity, line_total_cents,
                created_at
            FROM order_items
            WHERE order_id = ?1
            ORDER BY created_at, rowid
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Loads an order together with its line items.
    ///
    /// This is the fully hydrated record the document renderer takes as
    /// input. Returns `NotFound` when the order id does not exist.
    pub async fn get_hydrated(&self, id: &str) -> DbResult<(Order, Vec<OrderItem>)> {
        let order = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Order", id))?;
        let items = self.get_items(id).await?;

        Ok((order, items))
    }

    /// Stores the payment session reference on an order.
    pub async fn set_payment_session_ref(&self, order_id: &str, session_ref: &str) -> DbResult<()> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE orders SET payment_session_ref = ?2, updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(order_id)
        .bind(session_ref)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order", order_id));
        }

        Ok(())
    }

    /// Updates the status of an order.
    ///
    /// Used by payment reconciliation to mark a pending order as paid once
    /// the session completes.
    pub async fn set_status(&self, order_id: &str, status: OrderStatus) -> DbResult<()> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE orders SET status = ?2, updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(order_id)
        .bind(status)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order", order_id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use uuid::Uuid;

    fn order(number: &str) -> Order {
        let now = Utc::now();
        Order {
            id: Uuid::new_v4().to_string(),
            order_number: number.to_string(),
            customer_name: "Ada Lovelace".to_string(),
            customer_email: "ada@example.com".to_string(),
            customer_phone: "+1 602 555 0011".to_string(),
            company_name: "Analytical Events".to_string(),
            event_name: "Charity Gala".to_string(),
            event_start_date: None,
            event_end_date: None,
            postal_code: Some("07927".to_string()),
            shipping_address: None,
            message: None,
            subtotal_cents: 31825,
            shipping_cost_cents: 4500,
            collection_cost_cents: 4500,
            total_amount_cents: 40825,
            status: OrderStatus::Pending,
            payment_session_ref: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn item(order_id: &str, product_id: &str, unit_price: i64, qty: i64) -> OrderItem {
        OrderItem {
            id: Uuid::new_v4().to_string(),
            order_id: order_id.to_string(),
            product_id: product_id.to_string(),
            title: format!("Product {product_id}"),
            unit_price_cents: unit_price,
            quantity: qty,
            line_total_cents: unit_price * qty,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_order_numbers_are_sequential_and_unique() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.orders();

        let a = repo.next_order_number().await.unwrap();
        let b = repo.next_order_number().await.unwrap();
        let c = repo.next_order_number().await.unwrap();

        assert_ne!(a, b);
        assert_ne!(b, c);
        assert!(a.ends_with("-0001"));
        assert!(b.ends_with("-0002"));
        assert!(c.ends_with("-0003"));
    }

    #[tokio::test]
    async fn test_insert_and_hydrate() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.orders();

        let o = order("20260804-0001");
        repo.insert_order(&o).await.unwrap();
        repo.insert_items(&[
            item(&o.id, "p1", 3975, 3),
            item(&o.id, "p2", 19900, 1),
        ])
        .await
        .unwrap();

        let (loaded, items) = repo.get_hydrated(&o.id).await.unwrap();
        assert_eq!(loaded.order_number, "20260804-0001");
        assert_eq!(loaded.status, OrderStatus::Pending);
        assert_eq!(items.len(), 2);

        let p1 = items.iter().find(|i| i.product_id == "p1").unwrap();
        assert_eq!(p1.line_total_cents, 11925);
    }

    #[tokio::test]
    async fn test_duplicate_order_number_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.orders();

        repo.insert_order(&order("20260804-0001")).await.unwrap();
        let err = repo.insert_order(&order("20260804-0001")).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_items_require_existing_order() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.orders();

        let err = repo
            .insert_items(&[item("no-such-order", "p1", 3975, 1)])
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }

    #[tokio::test]
    async fn test_payment_ref_and_status_updates() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.orders();

        let o = order("20260804-0001");
        repo.insert_order(&o).await.unwrap();

        repo.set_payment_session_ref(&o.id, "cs_test_123").await.unwrap();
        repo.set_status(&o.id, OrderStatus::Paid).await.unwrap();

        let loaded = repo.get_by_id(&o.id).await.unwrap().unwrap();
        assert_eq!(loaded.payment_session_ref.as_deref(), Some("cs_test_123"));
        assert_eq!(loaded.status, OrderStatus::Paid);
    }

    #[tokio::test]
    async fn test_hydrate_missing_order() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let err = db.orders().get_hydrated("missing").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
