//! HTTP route handlers for the marketplace API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Liveness check
//! GET  /health/ready                    - Readiness check (pings the database)
//!
//! # Products
//! POST   /api/products                  - Create product
//! GET    /api/products                  - List with filters + pagination
//! GET    /api/products/{id}             - Product detail
//! PUT    /api/products/{id}             - Partial update
//! DELETE /api/products/{id}             - Delete
//! PATCH  /api/products/{id}/stock       - Stock-only update
//! GET    /api/products/store/{storeId}  - Products of one store
//! GET    /api/products/seller/{sellerId} - Products of all a seller's stores
//!
//! # Stores
//! POST   /api/store                     - Create store
//! GET    /api/stores                    - All stores (with owner)
//! GET    /api/stores/{id}               - Store detail
//! GET    /api/stores/seller/{sellerId}  - Stores by owner
//! GET    /api/stores/category/{category} - Case-insensitive category search
//! PUT    /api/stores/{id}               - Update
//! DELETE /api/stores/{id}               - Delete (refused while products exist)
//!
//! # Sellers
//! POST /api/seller/signup/step1         - Personal info -> setup token
//! POST /api/seller/signup/step2         - Store info -> session token (bearer)
//! POST /api/seller/login                - Login with account-status gating
//! GET  /api/seller/categories           - Store category list
//!
//! # Orders
//! POST  /api/order/createOrder          - Place an order (price snapshot + stock reserve)
//! PATCH /api/order/{id}/status          - Status/deliveredAt, the one permitted mutation
//! GET   /api/getOrders?storeId=...      - Store-scoped order report
//! ```

pub mod orders;
pub mod products;
pub mod sellers;
pub mod stores;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::state::AppState;

/// Create all routes for the API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/products", products::routes())
        .nest("/api/stores", stores::routes())
        .route("/api/store", post(stores::create))
        .nest("/api/seller", sellers::routes())
        .route("/api/order/createOrder", post(orders::create))
        .route("/api/order/{id}/status", patch(orders::update_status))
        .route("/api/getOrders", get(orders::store_orders))
}
