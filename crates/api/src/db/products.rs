//! Product repository: CRUD plus filtered listing.
//!
//! The list query is assembled with `sqlx::QueryBuilder`; filter values are
//! always bound, never interpolated, and the sort column comes from a closed
//! enum so no user input reaches the SQL text.

use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};

use markethub_core::{ProductCategory, ProductId, SellerId, StoreId};

use super::{RepositoryError, escape_like};
use crate::models::product::{NewProduct, Product};

const PRODUCT_COLUMNS: &str = "id, name, description, price, sale_price, category, images, \
     in_stock, quantity, store_id, rating, sale_ends_at, created_at, updated_at";

/// Filters for the product listing endpoint.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub category: Option<ProductCategory>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub min_rating: Option<Decimal>,
    pub max_rating: Option<Decimal>,
    pub in_stock: Option<bool>,
    pub search: Option<String>,
    pub store_id: Option<StoreId>,
}

/// Sortable product columns. Anything else falls back to `CreatedAt`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProductSort {
    Name,
    Price,
    Rating,
    #[default]
    CreatedAt,
    UpdatedAt,
    Quantity,
}

impl ProductSort {
    /// Parse a `sortBy` query parameter, falling back to `CreatedAt` for
    /// unknown values.
    #[must_use]
    pub fn from_param(param: &str) -> Self {
        match param {
            "name" => Self::Name,
            "price" => Self::Price,
            "rating" => Self::Rating,
            "updatedAt" => Self::UpdatedAt,
            "quantity" => Self::Quantity,
            _ => Self::CreatedAt,
        }
    }

    /// The column this sort key orders by.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Price => "price",
            Self::Rating => "rating",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
            Self::Quantity => "quantity",
        }
    }
}

/// Sort direction; defaults to descending (newest/highest first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// Parse a `sortOrder` query parameter.
    #[must_use]
    pub fn from_param(param: &str) -> Self {
        if param.eq_ignore_ascii_case("asc") {
            Self::Asc
        } else {
            Self::Desc
        }
    }

    const fn sql(self) -> &'static str {
        match self {
            Self::Asc => " ASC",
            Self::Desc => " DESC",
        }
    }
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a validated product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn insert(&self, new: &NewProduct) -> Result<Product, RepositoryError> {
        let sql = format!(
            "INSERT INTO products (name, description, price, sale_price, category, images, \
                                   in_stock, quantity, store_id, sale_ends_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {PRODUCT_COLUMNS}"
        );

        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(&new.name)
            .bind(&new.description)
            .bind(new.price)
            .bind(new.sale_price)
            .bind(new.category)
            .bind(&new.images)
            .bind(new.in_stock)
            .bind(new.quantity)
            .bind(new.store_id)
            .bind(new.sale_ends_at)
            .fetch_one(self.pool)
            .await?;

        Ok(product)
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1");

        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(product)
    }

    /// Persist an updated product (all mutable columns).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(&self, product: &Product) -> Result<Product, RepositoryError> {
        let sql = format!(
            "UPDATE products \
             SET name = $2, description = $3, price = $4, sale_price = $5, category = $6, \
                 images = $7, in_stock = $8, quantity = $9, rating = $10, sale_ends_at = $11, \
                 updated_at = now() \
             WHERE id = $1 \
             RETURNING {PRODUCT_COLUMNS}"
        );

        let updated = sqlx::query_as::<_, Product>(&sql)
            .bind(product.id)
            .bind(&product.name)
            .bind(&product.description)
            .bind(product.price)
            .bind(product.sale_price)
            .bind(product.category)
            .bind(&product.images)
            .bind(product.in_stock)
            .bind(product.quantity)
            .bind(product.rating)
            .bind(product.sale_ends_at)
            .fetch_optional(self.pool)
            .await?;

        updated.ok_or(RepositoryError::NotFound)
    }

    /// Update only the stock fields; absent fields keep their value.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn patch_stock(
        &self,
        id: ProductId,
        quantity: Option<i32>,
        in_stock: Option<bool>,
    ) -> Result<Product, RepositoryError> {
        let sql = format!(
            "UPDATE products \
             SET quantity = COALESCE($2, quantity), \
                 in_stock = COALESCE($3, in_stock), \
                 updated_at = now() \
             WHERE id = $1 \
             RETURNING {PRODUCT_COLUMNS}"
        );

        let updated = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .bind(quantity)
            .bind(in_stock)
            .fetch_optional(self.pool)
            .await?;

        updated.ok_or(RepositoryError::NotFound)
    }

    /// Delete a product.
    ///
    /// # Returns
    ///
    /// Returns `true` if the product was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// List products matching the filter, sorted and paginated, together
    /// with the total match count.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if either query fails.
    pub async fn list(
        &self,
        filter: &ProductFilter,
        sort: ProductSort,
        order: SortOrder,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Product>, i64), RepositoryError> {
        let mut qb: QueryBuilder<'_, Postgres> =
            QueryBuilder::new(format!("SELECT {PRODUCT_COLUMNS} FROM products"));
        push_filter_clauses(&mut qb, filter);
        qb.push(" ORDER BY ").push(sort.column()).push(order.sql());
        qb.push(" LIMIT ").push_bind(limit);
        qb.push(" OFFSET ").push_bind(offset);

        let products = qb
            .build_query_as::<Product>()
            .fetch_all(self.pool)
            .await?;

        let mut count_qb: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM products");
        push_filter_clauses(&mut count_qb, filter);

        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(self.pool)
            .await?;

        Ok((products, total))
    }

    /// List a store's products, newest first, together with the total count.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if either query fails.
    pub async fn list_by_store(
        &self,
        store_id: StoreId,
        in_stock: Option<bool>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Product>, i64), RepositoryError> {
        let filter = ProductFilter {
            store_id: Some(store_id),
            in_stock,
            ..ProductFilter::default()
        };
        self.list(
            &filter,
            ProductSort::CreatedAt,
            SortOrder::Desc,
            limit,
            offset,
        )
        .await
    }

    /// List the products of all stores owned by a seller, newest first,
    /// together with the total count.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if either query fails.
    pub async fn list_by_seller(
        &self,
        seller_id: SellerId,
        in_stock: Option<bool>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Product>, i64), RepositoryError> {
        let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new(format!(
            "SELECT p.{} FROM products p \
             JOIN stores s ON s.id = p.store_id \
             WHERE s.seller_id = ",
            PRODUCT_COLUMNS.replace(", ", ", p.")
        ));
        qb.push_bind(seller_id);
        if let Some(in_stock) = in_stock {
            qb.push(" AND p.in_stock = ").push_bind(in_stock);
        }
        qb.push(" ORDER BY p.created_at DESC");
        qb.push(" LIMIT ").push_bind(limit);
        qb.push(" OFFSET ").push_bind(offset);

        let products = qb
            .build_query_as::<Product>()
            .fetch_all(self.pool)
            .await?;

        let mut count_qb: QueryBuilder<'_, Postgres> = QueryBuilder::new(
            "SELECT COUNT(*) FROM products p \
             JOIN stores s ON s.id = p.store_id \
             WHERE s.seller_id = ",
        );
        count_qb.push_bind(seller_id);
        if let Some(in_stock) = in_stock {
            count_qb.push(" AND p.in_stock = ").push_bind(in_stock);
        }

        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(self.pool)
            .await?;

        Ok((products, total))
    }
}

/// Append the filter's WHERE clauses. Shared between the list and count
/// queries so the pagination total always matches the page contents.
fn push_filter_clauses(qb: &mut QueryBuilder<'_, Postgres>, filter: &ProductFilter) {
    qb.push(" WHERE TRUE");

    if let Some(category) = filter.category {
        qb.push(" AND category = ").push_bind(category);
    }
    if let Some(min_price) = filter.min_price {
        qb.push(" AND price >= ").push_bind(min_price);
    }
    if let Some(max_price) = filter.max_price {
        qb.push(" AND price <= ").push_bind(max_price);
    }
    if let Some(min_rating) = filter.min_rating {
        qb.push(" AND rating >= ").push_bind(min_rating);
    }
    if let Some(max_rating) = filter.max_rating {
        qb.push(" AND rating <= ").push_bind(max_rating);
    }
    if let Some(in_stock) = filter.in_stock {
        qb.push(" AND in_stock = ").push_bind(in_stock);
    }
    if let Some(search) = &filter.search {
        let pattern = format!("%{}%", escape_like(search));
        qb.push(" AND (name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR description ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(store_id) = filter.store_id {
        qb.push(" AND store_id = ").push_bind(store_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_param_allow_list() {
        assert_eq!(ProductSort::from_param("name"), ProductSort::Name);
        assert_eq!(ProductSort::from_param("price"), ProductSort::Price);
        assert_eq!(ProductSort::from_param("rating"), ProductSort::Rating);
        assert_eq!(ProductSort::from_param("quantity"), ProductSort::Quantity);
        assert_eq!(ProductSort::from_param("updatedAt"), ProductSort::UpdatedAt);
        assert_eq!(ProductSort::from_param("createdAt"), ProductSort::CreatedAt);
        // Unknown values fall back to createdAt rather than erroring
        assert_eq!(
            ProductSort::from_param("password_hash"),
            ProductSort::CreatedAt
        );
    }

    #[test]
    fn test_sort_order_parsing() {
        assert_eq!(SortOrder::from_param("asc"), SortOrder::Asc);
        assert_eq!(SortOrder::from_param("ASC"), SortOrder::Asc);
        assert_eq!(SortOrder::from_param("desc"), SortOrder::Desc);
        assert_eq!(SortOrder::from_param("sideways"), SortOrder::Desc);
    }

    #[test]
    fn test_filter_clauses_bind_instead_of_interpolate() {
        let filter = ProductFilter {
            search: Some("mug'; DROP TABLE products; --".to_owned()),
            in_stock: Some(true),
            ..ProductFilter::default()
        };
        let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new("SELECT 1 FROM products");
        push_filter_clauses(&mut qb, &filter);
        let sql = qb.into_sql();
        // The search text must appear only as a bind placeholder
        assert!(!sql.contains("DROP TABLE"));
        assert!(sql.contains("ILIKE $"));
    }

    #[test]
    fn test_seller_join_column_prefixing() {
        // The per-seller listing prefixes every product column with `p.`
        let prefixed = format!("p.{}", PRODUCT_COLUMNS.replace(", ", ", p."));
        assert!(prefixed.starts_with("p.id, p.name"));
        assert!(prefixed.contains("p.store_id"));
        assert!(!prefixed.contains(", id"));
    }
}
