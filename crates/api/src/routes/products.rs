//! Product catalog route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::instrument;

use markethub_core::{ProductId, SellerId, StoreId};
use rust_decimal::Decimal;

use crate::db::products::{ProductFilter, ProductRepository, ProductSort, SortOrder};
use crate::db::stores::StoreRepository;
use crate::error::{AppError, Result};
use crate::models::product::{CreateProduct, Product, StockPatch, UpdateProduct};
use crate::response::{ApiJson, ApiResponse, PageQuery, Pagination};
use crate::state::AppState;

/// Create the product routes router.
pub fn routes() -> Router<AppState> {
    use axum::routing::patch;

    Router::new()
        .route("/", get(index).post(create))
        .route("/{id}", get(show).put(update).delete(destroy))
        .route("/{id}/stock", patch(patch_stock))
        .route("/store/{store_id}", get(by_store))
        .route("/seller/{seller_id}", get(by_seller))
}

/// Query parameters for the filtered product listing.
#[derive(Debug, Default, Deserialize)]
pub struct ProductListQuery {
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, rename = "minPrice")]
    pub min_price: Option<Decimal>,
    #[serde(default, rename = "maxPrice")]
    pub max_price: Option<Decimal>,
    #[serde(default, rename = "inStock")]
    pub in_stock: Option<bool>,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default, rename = "sortBy")]
    pub sort_by: Option<String>,
    #[serde(default, rename = "sortOrder")]
    pub sort_order: Option<String>,
    #[serde(default)]
    pub store_id: Option<String>,
    #[serde(default, rename = "minRating")]
    pub min_rating: Option<Decimal>,
    #[serde(default, rename = "maxRating")]
    pub max_rating: Option<Decimal>,
}

/// Query parameters for the per-store and per-seller listings.
#[derive(Debug, Default, Deserialize)]
pub struct ScopedListQuery {
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default, rename = "inStock")]
    pub in_stock: Option<bool>,
}

/// Product list payload: page of products plus pagination metadata.
#[derive(Debug, Serialize)]
pub struct ProductListData {
    pub products: Vec<Product>,
    pub pagination: Pagination,
}

/// `POST /api/products`
#[instrument(skip_all, fields(store_id = %payload.store_id))]
pub async fn create(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateProduct>,
) -> Result<(StatusCode, Json<ApiResponse<Product>>)> {
    let new = payload.validate()?;

    // Referencing a missing store is a client error, not a lookup miss
    if !StoreRepository::new(state.pool()).exists(new.store_id).await? {
        return Err(AppError::BadRequest("Store not found".to_owned()));
    }

    let product = ProductRepository::new(state.pool()).insert(&new).await?;

    Ok(ApiResponse::created("Product created successfully", product))
}

/// `GET /api/products`
#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ProductListQuery>,
) -> Result<(StatusCode, Json<ApiResponse<ProductListData>>)> {
    let category = match &query.category {
        Some(label) => Some(label.parse().map_err(|_| {
            AppError::BadRequest(format!(
                "Invalid category. Valid categories: {}",
                markethub_core::ProductCategory::valid_labels()
            ))
        })?),
        None => None,
    };

    let filter = ProductFilter {
        category,
        min_price: query.min_price,
        max_price: query.max_price,
        min_rating: query.min_rating,
        max_rating: query.max_rating,
        in_stock: query.in_stock,
        search: query.search.clone(),
        // An unparseable store_id filter is ignored rather than rejected
        store_id: query
            .store_id
            .as_deref()
            .and_then(|s| StoreId::parse(s).ok()),
    };

    let sort = query
        .sort_by
        .as_deref()
        .map(ProductSort::from_param)
        .unwrap_or_default();
    let order = query
        .sort_order
        .as_deref()
        .map(SortOrder::from_param)
        .unwrap_or_default();

    let pages = PageQuery {
        page: query.page,
        limit: query.limit,
    };
    let (page, limit) = pages.resolve();

    let (products, total) = ProductRepository::new(state.pool())
        .list(&filter, sort, order, limit, pages.offset())
        .await?;

    Ok(ApiResponse::ok(
        "Products retrieved successfully",
        ProductListData {
            products,
            pagination: Pagination::new(page, limit, total),
        },
    ))
}

/// `GET /api/products/{id}`
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<ApiResponse<Product>>)> {
    let id = parse_product_id(&id)?;

    let product = ProductRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_owned()))?;

    Ok(ApiResponse::ok("Product retrieved successfully", product))
}

/// `PUT /api/products/{id}`
#[instrument(skip_all, fields(product_id = %id))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<UpdateProduct>,
) -> Result<(StatusCode, Json<ApiResponse<Product>>)> {
    let id = parse_product_id(&id)?;

    let repo = ProductRepository::new(state.pool());
    let mut product = repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_owned()))?;

    payload.apply(&mut product)?;

    let product = repo.update(&product).await?;

    Ok(ApiResponse::ok("Product updated successfully", product))
}

/// `DELETE /api/products/{id}`
#[instrument(skip_all, fields(product_id = %id))]
pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<ApiResponse<Value>>)> {
    let id = parse_product_id(&id)?;

    let deleted = ProductRepository::new(state.pool()).delete(id).await?;
    if !deleted {
        return Err(AppError::NotFound("Product not found".to_owned()));
    }

    Ok(ApiResponse::ok(
        "Product deleted successfully",
        json!({ "deleted_product_id": id }),
    ))
}

/// `PATCH /api/products/{id}/stock`
#[instrument(skip_all, fields(product_id = %id))]
pub async fn patch_stock(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<StockPatch>,
) -> Result<(StatusCode, Json<ApiResponse<Product>>)> {
    let id = parse_product_id(&id)?;
    payload.validate()?;

    let product = ProductRepository::new(state.pool())
        .patch_stock(id, payload.quantity, payload.in_stock)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => {
                AppError::NotFound("Product not found".to_owned())
            }
            other => other.into(),
        })?;

    Ok(ApiResponse::ok(
        "Product stock updated successfully",
        product,
    ))
}

/// `GET /api/products/store/{storeId}`
pub async fn by_store(
    State(state): State<AppState>,
    Path(store_id): Path<String>,
    Query(query): Query<ScopedListQuery>,
) -> Result<(StatusCode, Json<ApiResponse<ProductListData>>)> {
    let store_id = StoreId::parse(&store_id)
        .map_err(|_| AppError::BadRequest("Invalid store ID format".to_owned()))?;

    if !StoreRepository::new(state.pool()).exists(store_id).await? {
        return Err(AppError::NotFound("Store not found".to_owned()));
    }

    let pages = PageQuery {
        page: query.page,
        limit: query.limit,
    };
    let (page, limit) = pages.resolve();

    let (products, total) = ProductRepository::new(state.pool())
        .list_by_store(store_id, query.in_stock, limit, pages.offset())
        .await?;

    Ok(ApiResponse::ok(
        "Store products retrieved successfully",
        ProductListData {
            products,
            pagination: Pagination::new(page, limit, total),
        },
    ))
}

/// `GET /api/products/seller/{sellerId}`
pub async fn by_seller(
    State(state): State<AppState>,
    Path(seller_id): Path<String>,
    Query(query): Query<ScopedListQuery>,
) -> Result<(StatusCode, Json<ApiResponse<ProductListData>>)> {
    let seller_id = SellerId::parse(&seller_id)
        .map_err(|_| AppError::BadRequest("Invalid seller ID format".to_owned()))?;

    let pages = PageQuery {
        page: query.page,
        limit: query.limit,
    };
    let (page, limit) = pages.resolve();

    let (products, total) = ProductRepository::new(state.pool())
        .list_by_seller(seller_id, query.in_stock, limit, pages.offset())
        .await?;

    Ok(ApiResponse::ok(
        "Seller products retrieved successfully",
        ProductListData {
            products,
            pagination: Pagination::new(page, limit, total),
        },
    ))
}

fn parse_product_id(id: &str) -> Result<ProductId> {
    ProductId::parse(id).map_err(|_| AppError::BadRequest("Invalid product ID format".to_owned()))
}
