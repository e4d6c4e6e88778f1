//! Order domain model, write payloads, and the store-scoped report shape.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use markethub_core::{OrderId, OrderStatus, ProductId};

use super::ValidationError;

/// A shipping address embedded in an order. All fields are required.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ShippingAddress {
    #[serde(rename = "fullName")]
    pub full_name: String,
    #[serde(rename = "addressLine")]
    pub address_line: String,
    pub city: String,
    #[serde(rename = "postalCode")]
    pub postal_code: String,
    pub country: String,
    pub phone: String,
}

impl ShippingAddress {
    /// Validate that every field is present and non-empty.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` naming the first missing field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let fields = [
            ("fullName", &self.full_name),
            ("addressLine", &self.address_line),
            ("city", &self.city),
            ("postalCode", &self.postal_code),
            ("country", &self.country),
            ("phone", &self.phone),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(ValidationError::new(format!(
                    "Shipping address field '{name}' is required"
                )));
            }
        }
        Ok(())
    }
}

/// A line item: the (product, quantity, price-at-purchase) snapshot embedded
/// in an order. The price is fixed at order time and never recomputed.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct OrderItem {
    #[serde(rename = "product")]
    pub product_id: ProductId,
    pub quantity: i32,
    pub price: Decimal,
}

/// An order. Immutable after creation except `status`/`delivered_at`.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Order {
    /// Unique order ID.
    pub id: OrderId,
    /// Snapshotted line items.
    #[sqlx(skip)]
    #[serde(rename = "products")]
    pub items: Vec<OrderItem>,
    /// Shipping destination.
    #[sqlx(flatten)]
    #[serde(rename = "shippingAddress")]
    pub shipping_address: ShippingAddress,
    /// Sum of quantity x snapshotted price over all line items.
    #[serde(rename = "itemsPrice")]
    pub items_price: Decimal,
    /// Shipping cost supplied at checkout.
    #[serde(rename = "shippingPrice")]
    pub shipping_price: Decimal,
    /// `items_price + shipping_price`.
    #[serde(rename = "totalPrice")]
    pub total_price: Decimal,
    /// Lifecycle status.
    #[serde(rename = "orderStatus")]
    pub status: OrderStatus,
    /// Delivery timestamp, set when shipped.
    #[serde(rename = "deliveredAt", skip_serializing_if = "Option::is_none")]
    pub delivered_at: Option<DateTime<Utc>>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// One requested line in a checkout payload.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderLineInput {
    /// Product id as a string; malformed ids are rejected before any query.
    pub product: String,
    pub quantity: i32,
}

/// Payload for `POST /api/order/createOrder`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrder {
    pub products: Vec<OrderLineInput>,
    #[serde(rename = "shippingAddress")]
    pub shipping_address: ShippingAddress,
    #[serde(rename = "shippingPrice")]
    pub shipping_price: Decimal,
}

/// A validated checkout request.
#[derive(Debug, Clone)]
pub struct ValidatedOrder {
    pub lines: Vec<(ProductId, i32)>,
    pub shipping_address: ShippingAddress,
    pub shipping_price: Decimal,
}

impl CreateOrder {
    /// Validate the payload.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the product list is empty, a product id
    /// is malformed, a quantity is below 1, a shipping field is missing, or
    /// the shipping price is negative.
    pub fn validate(&self) -> Result<ValidatedOrder, ValidationError> {
        if self.products.is_empty() {
            return Err(ValidationError::new("No products provided in order."));
        }

        if self.shipping_price < Decimal::ZERO {
            return Err(ValidationError::new("Shipping price must be non-negative"));
        }

        self.shipping_address.validate()?;

        let mut lines = Vec::with_capacity(self.products.len());
        for line in &self.products {
            let product_id = ProductId::parse(&line.product)
                .map_err(|_| ValidationError::new("Invalid product ID format"))?;
            if line.quantity < 1 {
                return Err(ValidationError::new("Quantity must be at least 1"));
            }
            lines.push((product_id, line.quantity));
        }

        Ok(ValidatedOrder {
            lines,
            shipping_address: self.shipping_address.clone(),
            shipping_price: self.shipping_price,
        })
    }
}

/// Payload for `PATCH /api/order/{id}/status`.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderStatusPatch {
    pub status: OrderStatus,
    #[serde(default, rename = "deliveredAt")]
    pub delivered_at: Option<DateTime<Utc>>,
}

/// A line item in the store-scoped report, carrying the product name for
/// display alongside the original snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct StoreOrderItem {
    #[serde(rename = "product")]
    pub product_id: ProductId,
    #[serde(rename = "productName")]
    pub product_name: String,
    pub quantity: i32,
    pub price: Decimal,
}

/// One entry of the store-scoped report: an order reconstructed with only
/// the given store's line items. Order-level fields appear exactly once per
/// entry; `items_price`/`total_price` remain the order-wide values.
#[derive(Debug, Clone, Serialize)]
pub struct StoreOrderReport {
    pub id: OrderId,
    #[serde(rename = "shippingAddress")]
    pub shipping_address: ShippingAddress,
    #[serde(rename = "itemsPrice")]
    pub items_price: Decimal,
    #[serde(rename = "shippingPrice")]
    pub shipping_price: Decimal,
    #[serde(rename = "totalPrice")]
    pub total_price: Decimal,
    #[serde(rename = "orderStatus")]
    pub status: OrderStatus,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
    #[serde(rename = "products")]
    pub items: Vec<StoreOrderItem>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn address() -> ShippingAddress {
        ShippingAddress {
            full_name: "Jane Doe".to_owned(),
            address_line: "1 Main St".to_owned(),
            city: "Lahore".to_owned(),
            postal_code: "54000".to_owned(),
            country: "PK".to_owned(),
            phone: "+923001234567".to_owned(),
        }
    }

    #[test]
    fn test_create_order_rejects_empty_cart() {
        let payload = CreateOrder {
            products: Vec::new(),
            shipping_address: address(),
            shipping_price: Decimal::from(5),
        };
        let err = payload.validate().unwrap_err();
        assert!(err.0.contains("No products"));
    }

    #[test]
    fn test_create_order_rejects_malformed_product_id() {
        let payload = CreateOrder {
            products: vec![OrderLineInput {
                product: "not-a-uuid".to_owned(),
                quantity: 1,
            }],
            shipping_address: address(),
            shipping_price: Decimal::ZERO,
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn test_create_order_rejects_zero_quantity() {
        let payload = CreateOrder {
            products: vec![OrderLineInput {
                product: "67f3c1d2-8a4b-4c5d-9e6f-0123456789ab".to_owned(),
                quantity: 0,
            }],
            shipping_address: address(),
            shipping_price: Decimal::ZERO,
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn test_create_order_rejects_missing_address_field() {
        let mut addr = address();
        addr.city = String::new();
        let payload = CreateOrder {
            products: vec![OrderLineInput {
                product: "67f3c1d2-8a4b-4c5d-9e6f-0123456789ab".to_owned(),
                quantity: 1,
            }],
            shipping_address: addr,
            shipping_price: Decimal::ZERO,
        };
        let err = payload.validate().unwrap_err();
        assert!(err.0.contains("city"));
    }

    #[test]
    fn test_create_order_valid() {
        let payload = CreateOrder {
            products: vec![OrderLineInput {
                product: "67f3c1d2-8a4b-4c5d-9e6f-0123456789ab".to_owned(),
                quantity: 3,
            }],
            shipping_address: address(),
            shipping_price: Decimal::from(5),
        };
        let validated = payload.validate().unwrap();
        assert_eq!(validated.lines.len(), 1);
        assert_eq!(validated.lines.first().unwrap().1, 3);
    }

    #[test]
    fn test_order_wire_format() {
        let now = Utc::now();
        let order = Order {
            id: OrderId::generate(),
            items: vec![OrderItem {
                product_id: ProductId::generate(),
                quantity: 2,
                price: Decimal::from(10),
            }],
            shipping_address: address(),
            items_price: Decimal::from(20),
            shipping_price: Decimal::from(5),
            total_price: Decimal::from(25),
            status: OrderStatus::Processing,
            delivered_at: None,
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["orderStatus"], "Processing");
        assert_eq!(json["itemsPrice"], "20");
        assert_eq!(json["shippingAddress"]["fullName"], "Jane Doe");
        assert!(json.get("deliveredAt").is_none());
        assert_eq!(json["products"][0]["quantity"], 2);
    }
}
