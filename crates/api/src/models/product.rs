//! Product domain model and write payloads.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use markethub_core::{ProductCategory, ProductId, StoreId};

use super::{ValidationError, double_option};

/// Maximum length of a product name.
pub const MAX_NAME_LENGTH: usize = 100;
/// Maximum length of a product description.
pub const MAX_DESCRIPTION_LENGTH: usize = 1000;

/// A product listed by a store.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Display name (1-100 characters).
    pub name: String,
    /// Description (1-1000 characters).
    pub description: String,
    /// Regular price, non-negative.
    pub price: Decimal,
    /// Discounted price; strictly less than `price` when set.
    pub sale_price: Option<Decimal>,
    /// One of the ten fixed categories.
    pub category: ProductCategory,
    /// Image references.
    #[serde(rename = "image")]
    pub images: Vec<String>,
    /// Whether the product is purchasable; derived from `quantity` unless
    /// explicitly overridden.
    pub in_stock: bool,
    /// Units available, non-negative.
    pub quantity: i32,
    /// Owning store.
    pub store_id: StoreId,
    /// Average rating, 0-5.
    pub rating: Decimal,
    /// When the sale price stops applying.
    #[serde(rename = "saleEndingDate")]
    pub sale_ends_at: Option<DateTime<Utc>>,
    /// When the product was created.
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    /// When the product was last updated.
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Payload for `POST /api/products`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProduct {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    #[serde(default)]
    pub sale_price: Option<Decimal>,
    /// Category label; validated against the closed enumeration so the error
    /// message can list the valid values.
    pub category: String,
    #[serde(default, rename = "image")]
    pub images: Option<Vec<String>>,
    #[serde(default)]
    pub in_stock: Option<bool>,
    #[serde(default)]
    pub quantity: Option<i32>,
    /// Owning store id as a string; malformed ids are rejected before any
    /// query is issued.
    pub store_id: String,
    #[serde(default, rename = "saleEndingDate")]
    pub sale_ends_at: Option<DateTime<Utc>>,
}

/// A validated `CreateProduct`, ready to insert.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub sale_price: Option<Decimal>,
    pub category: ProductCategory,
    pub images: Vec<String>,
    pub in_stock: bool,
    pub quantity: i32,
    pub store_id: StoreId,
    pub sale_ends_at: Option<DateTime<Utc>>,
}

impl CreateProduct {
    /// Validate the payload and produce an insertable product.
    ///
    /// `quantity` defaults to 1; `in_stock` is derived from the quantity
    /// when not explicitly supplied.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` naming the first violated rule.
    pub fn validate(&self) -> Result<NewProduct, ValidationError> {
        let name = validate_name(&self.name)?;
        let description = validate_description(&self.description)?;

        if self.price < Decimal::ZERO {
            return Err(ValidationError::new("Price must be non-negative"));
        }
        validate_sale_price(self.sale_price, self.price)?;

        let category = parse_category(&self.category)?;

        let store_id = StoreId::parse(&self.store_id)
            .map_err(|_| ValidationError::new("Invalid store ID format"))?;

        let quantity = self.quantity.unwrap_or(1);
        if quantity < 0 {
            return Err(ValidationError::new("Quantity must be non-negative"));
        }

        // Auto-set in_stock based on quantity if not explicitly provided
        let in_stock = self.in_stock.unwrap_or(quantity > 0);

        Ok(NewProduct {
            name,
            description,
            price: self.price,
            sale_price: self.sale_price,
            category,
            images: self.images.clone().unwrap_or_default(),
            in_stock,
            quantity,
            store_id,
            sale_ends_at: self.sale_ends_at,
        })
    }
}

/// Payload for `PUT /api/products/{id}` (partial update).
///
/// `sale_price` uses the double-option encoding: absent leaves the value
/// untouched, `null` clears it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProduct {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default, deserialize_with = "double_option")]
    pub sale_price: Option<Option<Decimal>>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, rename = "image")]
    pub images: Option<Vec<String>>,
    #[serde(default)]
    pub in_stock: Option<bool>,
    #[serde(default)]
    pub quantity: Option<i32>,
    #[serde(default)]
    pub rating: Option<Decimal>,
}

impl UpdateProduct {
    /// Apply the update to an existing product, enforcing the same rules as
    /// creation.
    ///
    /// The sale price is validated against the possibly-just-updated price,
    /// and `in_stock` is re-derived from the quantity when the quantity
    /// changes without an explicit `in_stock`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` naming the first violated rule.
    pub fn apply(&self, product: &mut Product) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            product.name = validate_name(name)?;
        }

        if let Some(description) = &self.description {
            product.description = validate_description(description)?;
        }

        if let Some(price) = self.price {
            if price < Decimal::ZERO {
                return Err(ValidationError::new("Price must be non-negative"));
            }
            product.price = price;
        }

        match self.sale_price {
            Some(Some(sale_price)) => {
                validate_sale_price(Some(sale_price), product.price)?;
                product.sale_price = Some(sale_price);
            }
            Some(None) => product.sale_price = None,
            None => {
                // Unchanged, but a price update can invalidate the old sale price.
                validate_sale_price(product.sale_price, product.price)?;
            }
        }

        if let Some(category) = &self.category {
            product.category = parse_category(category)?;
        }

        if let Some(images) = &self.images {
            product.images.clone_from(images);
        }

        if let Some(in_stock) = self.in_stock {
            product.in_stock = in_stock;
        }

        if let Some(quantity) = self.quantity {
            if quantity < 0 {
                return Err(ValidationError::new("Quantity must be non-negative"));
            }
            product.quantity = quantity;
            // Re-derive availability unless the caller set it explicitly
            if self.in_stock.is_none() {
                product.in_stock = quantity > 0;
            }
        }

        if let Some(rating) = self.rating {
            if rating < Decimal::ZERO || rating > Decimal::from(5) {
                return Err(ValidationError::new("Rating must be between 0 and 5"));
            }
            product.rating = rating;
        }

        Ok(())
    }
}

/// Payload for `PATCH /api/products/{id}/stock`.
#[derive(Debug, Clone, Deserialize)]
pub struct StockPatch {
    #[serde(default)]
    pub quantity: Option<i32>,
    #[serde(default)]
    pub in_stock: Option<bool>,
}

impl StockPatch {
    /// Validate the patch.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the quantity is negative or the patch is
    /// empty.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.quantity.is_none() && self.in_stock.is_none() {
            return Err(ValidationError::new(
                "Provide quantity and/or in_stock to update",
            ));
        }
        if let Some(quantity) = self.quantity
            && quantity < 0
        {
            return Err(ValidationError::new("Quantity must be non-negative"));
        }
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() || trimmed.len() > MAX_NAME_LENGTH {
        return Err(ValidationError::new(format!(
            "Name must be between 1 and {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(trimmed.to_owned())
}

fn validate_description(description: &str) -> Result<String, ValidationError> {
    let trimmed = description.trim();
    if trimmed.is_empty() || trimmed.len() > MAX_DESCRIPTION_LENGTH {
        return Err(ValidationError::new(format!(
            "Description must be between 1 and {MAX_DESCRIPTION_LENGTH} characters"
        )));
    }
    Ok(trimmed.to_owned())
}

fn validate_sale_price(
    sale_price: Option<Decimal>,
    price: Decimal,
) -> Result<(), ValidationError> {
    if let Some(sale_price) = sale_price {
        if sale_price < Decimal::ZERO {
            return Err(ValidationError::new("Sale price must be non-negative"));
        }
        if sale_price >= price {
            return Err(ValidationError::new(
                "Sale price must be less than regular price",
            ));
        }
    }
    Ok(())
}

fn parse_category(label: &str) -> Result<ProductCategory, ValidationError> {
    label.parse().map_err(|_| {
        ValidationError::new(format!(
            "Invalid category. Valid categories: {}",
            ProductCategory::valid_labels()
        ))
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn create_payload() -> CreateProduct {
        CreateProduct {
            name: "Mug".to_owned(),
            description: "A sturdy ceramic mug".to_owned(),
            price: Decimal::from(10),
            sale_price: None,
            category: "Home & Garden".to_owned(),
            images: None,
            in_stock: None,
            quantity: None,
            store_id: "67f3c1d2-8a4b-4c5d-9e6f-0123456789ab".to_owned(),
            sale_ends_at: None,
        }
    }

    fn existing_product() -> Product {
        let now = Utc::now();
        Product {
            id: ProductId::generate(),
            name: "Mug".to_owned(),
            description: "A sturdy ceramic mug".to_owned(),
            price: Decimal::from(10),
            sale_price: None,
            category: ProductCategory::HomeAndGarden,
            images: Vec::new(),
            in_stock: true,
            quantity: 5,
            store_id: StoreId::generate(),
            rating: Decimal::ZERO,
            sale_ends_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_create_defaults_quantity_and_stock() {
        let new = create_payload().validate().unwrap();
        assert_eq!(new.quantity, 1);
        assert!(new.in_stock);
        assert_eq!(new.category, ProductCategory::HomeAndGarden);
    }

    #[test]
    fn test_create_zero_quantity_derives_out_of_stock() {
        let mut payload = create_payload();
        payload.quantity = Some(0);
        let new = payload.validate().unwrap();
        assert!(!new.in_stock);
    }

    #[test]
    fn test_create_explicit_in_stock_wins() {
        let mut payload = create_payload();
        payload.quantity = Some(0);
        payload.in_stock = Some(true);
        let new = payload.validate().unwrap();
        assert!(new.in_stock);
    }

    #[test]
    fn test_create_rejects_sale_price_at_or_above_price() {
        let mut payload = create_payload();
        payload.sale_price = Some(Decimal::from(10));
        assert!(payload.validate().is_err());

        payload.sale_price = Some(Decimal::from(12));
        assert!(payload.validate().is_err());

        payload.sale_price = Some(Decimal::from(8));
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn test_create_rejects_unknown_category() {
        let mut payload = create_payload();
        payload.category = "Gadgets".to_owned();
        let err = payload.validate().unwrap_err();
        assert!(err.0.contains("Invalid category"));
    }

    #[test]
    fn test_create_rejects_malformed_store_id() {
        let mut payload = create_payload();
        payload.store_id = "not-a-uuid".to_owned();
        let err = payload.validate().unwrap_err();
        assert!(err.0.contains("store ID"));
    }

    #[test]
    fn test_create_rejects_overlong_name() {
        let mut payload = create_payload();
        payload.name = "x".repeat(101);
        assert!(payload.validate().is_err());
    }

    #[test]
    fn test_create_trims_name_and_description() {
        let mut payload = create_payload();
        payload.name = "  Mug  ".to_owned();
        let new = payload.validate().unwrap();
        assert_eq!(new.name, "Mug");
    }

    #[test]
    fn test_update_sale_price_checked_against_new_price() {
        let mut product = existing_product();
        product.sale_price = Some(Decimal::from(8));

        // Dropping the price below the existing sale price must fail
        let update = UpdateProduct {
            price: Some(Decimal::from(5)),
            ..Default::default()
        };
        assert!(update.apply(&mut product).is_err());
    }

    #[test]
    fn test_update_new_sale_price_against_new_price() {
        let mut product = existing_product();
        let update = UpdateProduct {
            price: Some(Decimal::from(20)),
            sale_price: Some(Some(Decimal::from(15))),
            ..Default::default()
        };
        update.apply(&mut product).unwrap();
        assert_eq!(product.price, Decimal::from(20));
        assert_eq!(product.sale_price, Some(Decimal::from(15)));
    }

    #[test]
    fn test_update_clears_sale_price_with_null() {
        let mut product = existing_product();
        product.sale_price = Some(Decimal::from(8));

        let update: UpdateProduct = serde_json::from_str(r#"{"sale_price": null}"#).unwrap();
        update.apply(&mut product).unwrap();
        assert_eq!(product.sale_price, None);
    }

    #[test]
    fn test_update_quantity_rederives_in_stock() {
        let mut product = existing_product();
        let update = UpdateProduct {
            quantity: Some(0),
            ..Default::default()
        };
        update.apply(&mut product).unwrap();
        assert!(!product.in_stock);

        let update = UpdateProduct {
            quantity: Some(3),
            ..Default::default()
        };
        update.apply(&mut product).unwrap();
        assert!(product.in_stock);
    }

    #[test]
    fn test_update_explicit_in_stock_suppresses_derivation() {
        let mut product = existing_product();
        let update = UpdateProduct {
            quantity: Some(0),
            in_stock: Some(true),
            ..Default::default()
        };
        update.apply(&mut product).unwrap();
        assert!(product.in_stock);
    }

    #[test]
    fn test_update_rejects_out_of_range_rating() {
        let mut product = existing_product();
        let update = UpdateProduct {
            rating: Some(Decimal::from(6)),
            ..Default::default()
        };
        assert!(update.apply(&mut product).is_err());
    }

    #[test]
    fn test_stock_patch_requires_a_field() {
        let patch = StockPatch {
            quantity: None,
            in_stock: None,
        };
        assert!(patch.validate().is_err());

        let patch = StockPatch {
            quantity: Some(4),
            in_stock: None,
        };
        assert!(patch.validate().is_ok());
    }

    #[test]
    fn test_stock_patch_rejects_negative_quantity() {
        let patch = StockPatch {
            quantity: Some(-1),
            in_stock: None,
        };
        assert!(patch.validate().is_err());
    }
}
