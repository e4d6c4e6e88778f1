//! Seller registration and login route handlers.
//!
//! Registration is a two-step flow: step 1 creates the account from
//! personal information and answers with a short-lived setup token; step 2
//! (authenticated with that token) attaches the store information,
//! activates the account, and answers with a session token.

use axum::{Json, Router, extract::State, http::StatusCode, routing::{get, post}};
use serde::Serialize;
use tracing::instrument;

use markethub_core::STORE_CATEGORIES;

use crate::error::Result;
use crate::middleware::auth::RequireSeller;
use crate::models::seller::{LoginRequest, SellerProfile, SignupStep1, SignupStep2};
use crate::response::{ApiJson, ApiResponse};
use crate::services::auth::AuthService;
use crate::state::AppState;

/// Create the seller routes router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/signup/step1", post(signup_step1))
        .route("/signup/step2", post(signup_step2))
        .route("/login", post(login))
        .route("/categories", get(categories))
}

/// Auth response payload: the issued token plus the seller's public view.
#[derive(Debug, Serialize)]
pub struct SellerAuthData {
    pub token: String,
    pub seller: SellerProfile,
}

/// `POST /api/seller/signup/step1`
#[instrument(skip_all, fields(email = %payload.email))]
pub async fn signup_step1(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<SignupStep1>,
) -> Result<(StatusCode, Json<ApiResponse<SellerAuthData>>)> {
    let (full_name, email, phone) = payload.validate()?;

    let auth = AuthService::new(state.pool(), state.encoding_key());
    let (seller, token) = auth
        .register_step1(&full_name, &email, &phone, &payload.password)
        .await?;

    Ok(ApiResponse::created(
        "Seller account created successfully! Proceed to store setup.",
        SellerAuthData {
            token,
            seller: seller.into(),
        },
    ))
}

/// `POST /api/seller/signup/step2` (requires the step-1 bearer token)
#[instrument(skip_all, fields(seller_id = %auth_seller.seller.id))]
pub async fn signup_step2(
    State(state): State<AppState>,
    auth_seller: RequireSeller,
    ApiJson(payload): ApiJson<SignupStep2>,
) -> Result<(StatusCode, Json<ApiResponse<SellerAuthData>>)> {
    payload.validate()?;

    let auth = AuthService::new(state.pool(), state.encoding_key());
    let (seller, token) = auth
        .complete_store_setup(&auth_seller.seller, &payload)
        .await?;

    Ok(ApiResponse::ok(
        "Store setup completed successfully! Welcome to MarketHub.",
        SellerAuthData {
            token,
            seller: seller.into(),
        },
    ))
}

/// `POST /api/seller/login`
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<(StatusCode, Json<ApiResponse<SellerAuthData>>)> {
    let auth = AuthService::new(state.pool(), state.encoding_key());
    let (seller, token) = auth.login(&payload.email, &payload.password).await?;

    tracing::info!(seller_id = %seller.id, "Seller logged in");

    Ok(ApiResponse::ok(
        "Login successful",
        SellerAuthData {
            token,
            seller: seller.into(),
        },
    ))
}

/// `GET /api/seller/categories`
pub async fn categories() -> (StatusCode, Json<ApiResponse<&'static [&'static str]>>) {
    ApiResponse::ok("Categories retrieved successfully", STORE_CATEGORIES)
}
