//! Order route handlers: checkout, status update, and the store report.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use markethub_core::{OrderId, StoreId};

use crate::db::orders::OrderRepository;
use crate::error::{AppError, Result};
use crate::models::order::{CreateOrder, Order, OrderStatusPatch, StoreOrderReport};
use crate::response::{ApiJson, ApiResponse};
use crate::services::orders::OrderService;
use crate::state::AppState;

/// Query parameters for the store order report.
#[derive(Debug, Deserialize)]
pub struct StoreOrdersQuery {
    #[serde(default, rename = "storeId")]
    pub store_id: Option<String>,
}

/// Store report payload.
#[derive(Debug, Serialize)]
pub struct StoreOrdersData {
    pub orders: Vec<StoreOrderReport>,
}

/// `POST /api/order/createOrder`
///
/// Validates the cart, snapshots prices, reserves stock, and persists the
/// order atomically. An unknown product or an out-of-stock line fails the
/// whole order.
#[instrument(skip_all, fields(lines = payload.products.len()))]
pub async fn create(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateOrder>,
) -> Result<(StatusCode, Json<ApiResponse<Order>>)> {
    let validated = payload.validate()?;

    let order = OrderService::new(state.pool()).place(&validated).await?;

    tracing::info!(order_id = %order.id, total = %order.total_price, "Order created");

    Ok(ApiResponse::created("Order created successfully", order))
}

/// `PATCH /api/order/{id}/status`
///
/// The only permitted mutation of an order after creation.
#[instrument(skip_all, fields(order_id = %id))]
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<OrderStatusPatch>,
) -> Result<(StatusCode, Json<ApiResponse<Order>>)> {
    let id = OrderId::parse(&id)
        .map_err(|_| AppError::BadRequest("Invalid order ID format".to_owned()))?;

    let order = OrderRepository::new(state.pool())
        .update_status(id, payload.status, payload.delivered_at)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => {
                AppError::NotFound("Order not found".to_owned())
            }
            other => other.into(),
        })?;

    Ok(ApiResponse::ok("Order status updated successfully", order))
}

/// `GET /api/getOrders?storeId=...`
///
/// The store-scoped report: one entry per order containing at least one of
/// the store's line items, with order-level fields taken once and only that
/// store's items attached.
#[instrument(skip_all)]
pub async fn store_orders(
    State(state): State<AppState>,
    Query(query): Query<StoreOrdersQuery>,
) -> Result<(StatusCode, Json<ApiResponse<StoreOrdersData>>)> {
    let store_id = query
        .store_id
        .as_deref()
        .ok_or_else(|| AppError::BadRequest("storeId query parameter is required".to_owned()))?;
    let store_id = StoreId::parse(store_id)
        .map_err(|_| AppError::BadRequest("Invalid store ID format".to_owned()))?;

    let orders = OrderService::new(state.pool()).store_report(store_id).await?;

    Ok(ApiResponse::ok(
        "Orders retrieved successfully for this store",
        StoreOrdersData { orders },
    ))
}
