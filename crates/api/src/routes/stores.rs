//! Store route handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use serde::Serialize;
use tracing::instrument;

use markethub_core::{SellerId, StoreId};

use crate::db::sellers::SellerRepository;
use crate::db::stores::StoreRepository;
use crate::error::{AppError, Result};
use crate::models::store::{CreateStore, Store, StoreWithOwner, UpdateStore};
use crate::response::{ApiJson, ApiResponse};
use crate::state::AppState;

/// Create the store routes router (the `POST /api/store` creation route is
/// registered separately for compatibility with its singular path).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/{id}", get(show).put(update).delete(destroy))
        .route("/seller/{seller_id}", get(by_seller))
        .route("/category/{category}", get(by_category))
}

/// Store list payload with the count the clients display.
#[derive(Debug, Serialize)]
pub struct StoreListData {
    pub count: usize,
    pub stores: Vec<StoreWithOwner>,
}

/// `POST /api/store`
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateStore>,
) -> Result<(StatusCode, Json<ApiResponse<Store>>)> {
    let (name, seller_id) = payload.validate()?;

    // The owning seller must exist before the store is created
    if !SellerRepository::new(state.pool()).exists(seller_id).await? {
        return Err(AppError::BadRequest("Invalid seller ID".to_owned()));
    }

    let store = StoreRepository::new(state.pool())
        .create(
            &name,
            payload.category.as_deref(),
            payload.description.as_deref(),
            payload.banner.as_deref(),
            payload.logo.as_deref(),
            seller_id,
        )
        .await?;

    Ok(ApiResponse::created("Store saved successfully", store))
}

/// `GET /api/stores`
pub async fn index(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<ApiResponse<StoreListData>>)> {
    let stores = StoreRepository::new(state.pool()).list_with_owner().await?;

    Ok(ApiResponse::ok(
        "Stores retrieved successfully",
        StoreListData {
            count: stores.len(),
            stores,
        },
    ))
}

/// `GET /api/stores/{id}`
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<ApiResponse<StoreWithOwner>>)> {
    let id = parse_store_id(&id)?;

    let store = StoreRepository::new(state.pool())
        .get_with_owner(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Store not found".to_owned()))?;

    Ok(ApiResponse::ok("Store retrieved successfully", store))
}

/// `GET /api/stores/seller/{sellerId}`
pub async fn by_seller(
    State(state): State<AppState>,
    Path(seller_id): Path<String>,
) -> Result<(StatusCode, Json<ApiResponse<StoreListData>>)> {
    let seller_id = SellerId::parse(&seller_id)
        .map_err(|_| AppError::BadRequest("Invalid seller ID format".to_owned()))?;

    let stores = StoreRepository::new(state.pool())
        .list_by_seller(seller_id)
        .await?;

    Ok(ApiResponse::ok(
        "Seller stores retrieved successfully",
        StoreListData {
            count: stores.len(),
            stores,
        },
    ))
}

/// `GET /api/stores/category/{category}`
///
/// Case-insensitive substring match: "elect" finds "Electronics".
pub async fn by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<(StatusCode, Json<ApiResponse<StoreListData>>)> {
    let stores = StoreRepository::new(state.pool())
        .search_by_category(&category)
        .await?;

    Ok(ApiResponse::ok(
        format!("Stores in {category} category retrieved successfully"),
        StoreListData {
            count: stores.len(),
            stores,
        },
    ))
}

/// `PUT /api/stores/{id}`
#[instrument(skip_all, fields(store_id = %id))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<UpdateStore>,
) -> Result<(StatusCode, Json<ApiResponse<Store>>)> {
    let id = parse_store_id(&id)?;

    let repo = StoreRepository::new(state.pool());
    let mut store = repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Store not found".to_owned()))?;

    payload.apply(&mut store)?;

    let store = repo.update(&store).await?;

    Ok(ApiResponse::ok("Store updated successfully", store))
}

/// `DELETE /api/stores/{id}`
///
/// Refused while products still reference the store, so deleting a store
/// can never orphan its catalog.
#[instrument(skip_all, fields(store_id = %id))]
pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<ApiResponse<Store>>)> {
    let id = parse_store_id(&id)?;

    let repo = StoreRepository::new(state.pool());

    if !repo.exists(id).await? {
        return Err(AppError::NotFound("Store not found".to_owned()));
    }

    if repo.has_products(id).await? {
        return Err(AppError::Conflict(
            "Store still has products; delete or reassign them first".to_owned(),
        ));
    }

    let store = repo.delete(id).await.map_err(|e| match e {
        crate::db::RepositoryError::NotFound => AppError::NotFound("Store not found".to_owned()),
        other => other.into(),
    })?;

    Ok(ApiResponse::ok("Store deleted successfully", store))
}

fn parse_store_id(id: &str) -> Result<StoreId> {
    StoreId::parse(id).map_err(|_| AppError::BadRequest("Invalid store ID format".to_owned()))
}
