//! Order repository: reads, the status mutation, and the store-report rows.
//!
//! Order placement itself lives in
//! [`OrderService`](crate::services::orders::OrderService) because it spans a
//! transaction over products and orders.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use markethub_core::{OrderId, OrderStatus, ProductId, StoreId};

use super::RepositoryError;
use crate::models::order::{Order, OrderItem, ShippingAddress};

pub(crate) const ORDER_COLUMNS: &str =
    "id, full_name, address_line, city, postal_code, country, phone, \
     items_price, shipping_price, total_price, status, delivered_at, created_at, updated_at";

/// One (order, line item) pair surviving the store-filtered join. The
/// in-process re-group under the order id happens in
/// [`group_store_report`](crate::services::orders::group_store_report).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StoreOrderRow {
    pub order_id: OrderId,
    #[sqlx(flatten)]
    pub shipping_address: ShippingAddress,
    pub items_price: Decimal,
    pub shipping_price: Decimal,
    pub total_price: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: i32,
    pub price: Decimal,
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get an order with its line items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1");

        let order = sqlx::query_as::<_, Order>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        let Some(mut order) = order else {
            return Ok(None);
        };

        order.items = self.items_for(id).await?;
        Ok(Some(order))
    }

    /// Update an order's status and delivery timestamp, the only permitted
    /// mutation after creation.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_status(
        &self,
        id: OrderId,
        status: OrderStatus,
        delivered_at: Option<DateTime<Utc>>,
    ) -> Result<Order, RepositoryError> {
        let sql = format!(
            "UPDATE orders \
             SET status = $2, delivered_at = $3, updated_at = now() \
             WHERE id = $1 \
             RETURNING {ORDER_COLUMNS}"
        );

        let order = sqlx::query_as::<_, Order>(&sql)
            .bind(id)
            .bind(status)
            .bind(delivered_at)
            .fetch_optional(self.pool)
            .await?;

        let mut order = order.ok_or(RepositoryError::NotFound)?;
        order.items = self.items_for(id).await?;
        Ok(order)
    }

    /// Fetch the (order, line item) pairs whose product belongs to the given
    /// store, newest order first. Line items of other stores are discarded
    /// by the join; order-level fields repeat on every row and are collapsed
    /// by the in-process re-group.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn store_report_rows(
        &self,
        store_id: StoreId,
    ) -> Result<Vec<StoreOrderRow>, RepositoryError> {
        let rows = sqlx::query_as::<_, StoreOrderRow>(
            "SELECT o.id AS order_id, \
                    o.full_name, o.address_line, o.city, o.postal_code, o.country, o.phone, \
                    o.items_price, o.shipping_price, o.total_price, o.status, \
                    o.created_at, o.updated_at, \
                    i.product_id, p.name AS product_name, i.quantity, i.price \
             FROM orders o \
             JOIN order_items i ON i.order_id = o.id \
             JOIN products p ON p.id = i.product_id \
             WHERE p.store_id = $1 \
             ORDER BY o.created_at DESC, o.id, i.id",
        )
        .bind(store_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    async fn items_for(&self, order_id: OrderId) -> Result<Vec<OrderItem>, RepositoryError> {
        let items = sqlx::query_as::<_, OrderItem>(
            "SELECT product_id, quantity, price FROM order_items \
             WHERE order_id = $1 ORDER BY id",
        )
        .bind(order_id)
        .fetch_all(self.pool)
        .await?;

        Ok(items)
    }
}
