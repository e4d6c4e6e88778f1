//! Order placement and the store-scoped report.
//!
//! Placement runs read-price / reserve-stock / write-order inside a single
//! database transaction: the stock decrement is a conditional UPDATE
//! (`quantity >= n`), so concurrent orders against the same product
//! serialize on the row and cannot oversell, and any failed line rolls the
//! whole order back. Line-item prices are snapshotted from that same UPDATE;
//! they are never recomputed afterward.

use std::collections::HashMap;

use rust_decimal::Decimal;
use sqlx::PgPool;
use thiserror::Error;

use markethub_core::{OrderId, ProductId, StoreId};

use crate::db::RepositoryError;
use crate::db::orders::{ORDER_COLUMNS, OrderRepository, StoreOrderRow};
use crate::models::order::{
    Order, OrderItem, StoreOrderItem, StoreOrderReport, ValidatedOrder,
};

/// Errors that can occur while placing an order.
#[derive(Debug, Error)]
pub enum OrderError {
    /// A referenced product does not exist; the whole order fails.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// A product has fewer units than requested; the whole order fails.
    #[error("Insufficient stock for product: {0}")]
    InsufficientStock(ProductId),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Order placement and reporting service.
pub struct OrderService<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderService<'a> {
    /// Create a new order service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Place an order.
    ///
    /// For each line item the product's stock is atomically decremented and
    /// its current price snapshotted; totals are computed from the
    /// snapshots. The order row and its line items are written in the same
    /// transaction, so no partial order (and no partial decrement) can ever
    /// be observed.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::ProductNotFound` if any product id is unknown,
    /// `OrderError::InsufficientStock` if any product has fewer units than
    /// requested. Either error aborts the transaction.
    pub async fn place(&self, input: &ValidatedOrder) -> Result<Order, OrderError> {
        let mut tx = self.pool.begin().await.map_err(RepositoryError::from)?;

        let mut items: Vec<OrderItem> = Vec::with_capacity(input.lines.len());
        let mut items_price = Decimal::ZERO;

        for &(product_id, quantity) in &input.lines {
            // Reserve stock and read the price in one statement. The guard
            // `quantity >= $2` makes the decrement atomic under concurrency.
            let price: Option<Decimal> = sqlx::query_scalar(
                "UPDATE products \
                 SET quantity = quantity - $2, \
                     in_stock = (quantity - $2) > 0, \
                     updated_at = now() \
                 WHERE id = $1 AND quantity >= $2 \
                 RETURNING price",
            )
            .bind(product_id)
            .bind(quantity)
            .fetch_optional(&mut *tx)
            .await
            .map_err(RepositoryError::from)?;

            let Some(price) = price else {
                // Distinguish a missing product from an out-of-stock one;
                // the transaction rolls back on drop either way.
                let exists: bool =
                    sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM products WHERE id = $1)")
                        .bind(product_id)
                        .fetch_one(&mut *tx)
                        .await
                        .map_err(RepositoryError::from)?;

                return Err(if exists {
                    OrderError::InsufficientStock(product_id)
                } else {
                    OrderError::ProductNotFound(product_id)
                });
            };

            items_price += price * Decimal::from(quantity);
            items.push(OrderItem {
                product_id,
                quantity,
                price,
            });
        }

        let total_price = items_price + input.shipping_price;

        let sql = format!(
            "INSERT INTO orders (full_name, address_line, city, postal_code, country, phone, \
                                 items_price, shipping_price, total_price) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {ORDER_COLUMNS}"
        );

        let mut order = sqlx::query_as::<_, Order>(&sql)
            .bind(&input.shipping_address.full_name)
            .bind(&input.shipping_address.address_line)
            .bind(&input.shipping_address.city)
            .bind(&input.shipping_address.postal_code)
            .bind(&input.shipping_address.country)
            .bind(&input.shipping_address.phone)
            .bind(items_price)
            .bind(input.shipping_price)
            .bind(total_price)
            .fetch_one(&mut *tx)
            .await
            .map_err(RepositoryError::from)?;

        for item in &items {
            sqlx::query(
                "INSERT INTO order_items (order_id, product_id, quantity, price) \
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(order.id)
            .bind(item.product_id)
            .bind(item.quantity)
            .bind(item.price)
            .execute(&mut *tx)
            .await
            .map_err(RepositoryError::from)?;
        }

        tx.commit().await.map_err(RepositoryError::from)?;

        order.items = items;
        Ok(order)
    }

    /// Build the store-scoped order report: every order containing at least
    /// one of the store's products, reconstructed with only that store's
    /// line items, newest first.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Repository` if the join query fails.
    pub async fn store_report(
        &self,
        store_id: StoreId,
    ) -> Result<Vec<StoreOrderReport>, OrderError> {
        let rows = OrderRepository::new(self.pool)
            .store_report_rows(store_id)
            .await?;

        Ok(group_store_report(rows))
    }
}

/// Re-group store-filtered (order, line item) rows under their original
/// order id.
///
/// Rows arrive sorted newest order first; entries keep that encounter
/// order. Order-level fields are taken from the first row of each group
/// exactly once, and every surviving row contributes exactly one line item,
/// so items are neither duplicated nor dropped. Cross-store orders split
/// per store upstream (the join already discarded other stores' items).
#[must_use]
pub fn group_store_report(rows: Vec<StoreOrderRow>) -> Vec<StoreOrderReport> {
    let mut reports: Vec<StoreOrderReport> = Vec::new();
    let mut index: HashMap<OrderId, usize> = HashMap::new();

    for row in rows {
        let item = StoreOrderItem {
            product_id: row.product_id,
            product_name: row.product_name,
            quantity: row.quantity,
            price: row.price,
        };

        if let Some(&position) = index.get(&row.order_id) {
            if let Some(report) = reports.get_mut(position) {
                report.items.push(item);
            }
        } else {
            index.insert(row.order_id, reports.len());
            reports.push(StoreOrderReport {
                id: row.order_id,
                shipping_address: row.shipping_address,
                items_price: row.items_price,
                shipping_price: row.shipping_price,
                total_price: row.total_price,
                status: row.status,
                created_at: row.created_at,
                updated_at: row.updated_at,
                items: vec![item],
            });
        }
    }

    reports
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use markethub_core::OrderStatus;

    use crate::models::order::ShippingAddress;

    fn address(name: &str) -> ShippingAddress {
        ShippingAddress {
            full_name: name.to_owned(),
            address_line: "1 Main St".to_owned(),
            city: "Lahore".to_owned(),
            postal_code: "54000".to_owned(),
            country: "PK".to_owned(),
            phone: "+923001234567".to_owned(),
        }
    }

    fn row(
        order_id: OrderId,
        created_minute: u32,
        product_name: &str,
        quantity: i32,
        price: i64,
    ) -> StoreOrderRow {
        StoreOrderRow {
            order_id,
            shipping_address: address("Jane Doe"),
            items_price: Decimal::from(100),
            shipping_price: Decimal::from(5),
            total_price: Decimal::from(105),
            status: OrderStatus::Processing,
            created_at: Utc.with_ymd_and_hms(2026, 8, 1, 12, created_minute, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2026, 8, 1, 12, created_minute, 0).unwrap(),
            product_id: ProductId::generate(),
            product_name: product_name.to_owned(),
            quantity,
            price: Decimal::from(price),
        }
    }

    #[test]
    fn test_group_merges_rows_of_same_order() {
        let order_id = OrderId::generate();
        let rows = vec![
            row(order_id, 30, "Mug", 2, 10),
            row(order_id, 30, "Teapot", 1, 25),
        ];

        let reports = group_store_report(rows);
        assert_eq!(reports.len(), 1);
        let report = reports.first().unwrap();
        assert_eq!(report.items.len(), 2);
        assert_eq!(report.items.first().unwrap().product_name, "Mug");
        assert_eq!(report.items.get(1).unwrap().product_name, "Teapot");
    }

    #[test]
    fn test_group_keeps_one_entry_per_order() {
        let first = OrderId::generate();
        let second = OrderId::generate();
        // Newest order first, as the SQL delivers them
        let rows = vec![
            row(first, 45, "Mug", 1, 10),
            row(second, 30, "Mug", 3, 10),
            row(second, 30, "Teapot", 1, 25),
        ];

        let reports = group_store_report(rows);
        assert_eq!(reports.len(), 2);
        // Encounter order (newest first) is preserved
        assert_eq!(reports.first().unwrap().id, first);
        assert_eq!(reports.get(1).unwrap().id, second);
        assert_eq!(reports.get(1).unwrap().items.len(), 2);
    }

    #[test]
    fn test_group_no_items_duplicated_or_dropped() {
        let a = OrderId::generate();
        let b = OrderId::generate();
        let rows = vec![
            row(a, 50, "One", 1, 1),
            row(a, 50, "Two", 1, 2),
            row(b, 40, "Three", 1, 3),
            row(a, 50, "Four", 1, 4),
        ];

        let reports = group_store_report(rows);
        let total_items: usize = reports.iter().map(|r| r.items.len()).sum();
        assert_eq!(total_items, 4);

        let names: Vec<_> = reports
            .iter()
            .flat_map(|r| r.items.iter().map(|i| i.product_name.clone()))
            .collect();
        assert_eq!(names, ["One", "Two", "Four", "Three"]);
    }

    #[test]
    fn test_group_takes_order_fields_once() {
        let order_id = OrderId::generate();
        let mut second_row = row(order_id, 10, "Teapot", 1, 25);
        // Divergent order-level fields on later rows must be ignored
        second_row.total_price = Decimal::from(999);
        let rows = vec![row(order_id, 10, "Mug", 2, 10), second_row];

        let reports = group_store_report(rows);
        assert_eq!(reports.len(), 1);
        assert_eq!(reports.first().unwrap().total_price, Decimal::from(105));
    }

    #[test]
    fn test_group_empty_input() {
        assert!(group_store_report(Vec::new()).is_empty());
    }

    #[test]
    fn test_totals_match_snapshot_invariant() {
        // items_price == sum(quantity * price), total == items + shipping
        let lines = [(3, Decimal::from(10)), (1, Decimal::from(5))];
        let shipping = Decimal::from(5);

        let items_price: Decimal = lines
            .iter()
            .map(|&(quantity, price)| price * Decimal::from(quantity))
            .sum();
        let total = items_price + shipping;

        assert_eq!(items_price, Decimal::from(35));
        assert_eq!(total, Decimal::from(40));
    }
}
