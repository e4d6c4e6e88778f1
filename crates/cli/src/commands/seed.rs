//! Seed the database with a demo seller, store, and products.
//!
//! Exercises the real registration flow (step 1 + step 2) so the seeded
//! account behaves exactly like one created through the API, then inserts a
//! small demo catalog.

use jsonwebtoken::EncodingKey;
use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use tracing::info;

use markethub_api::config::ApiConfig;
use markethub_api::db::{self, ProductRepository, StoreRepository};
use markethub_api::models::product::NewProduct;
use markethub_api::models::seller::SignupStep2;
use markethub_api::services::auth::{AuthError, AuthService};
use markethub_core::{Email, Phone, ProductCategory};

const DEMO_EMAIL: &str = "demo@markethub.dev";
const DEMO_PASSWORD: &str = "demo-marketplace-2026";

/// Seed demo data. Safe to re-run; a second invocation is a no-op.
///
/// # Errors
///
/// Returns an error if configuration is missing or a database operation
/// fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let config = ApiConfig::from_env()?;
    let pool = db::create_pool(&config.database_url).await?;
    let encoding_key = EncodingKey::from_secret(config.jwt_secret.expose_secret().as_bytes());

    let auth = AuthService::new(&pool, &encoding_key);

    let email = Email::parse(DEMO_EMAIL)?;
    let phone = Phone::parse("+923001112233")?;

    let (seller, _token) = match auth
        .register_step1("Demo Seller", &email, &phone, DEMO_PASSWORD)
        .await
    {
        Ok(created) => created,
        Err(AuthError::DuplicateEmail | AuthError::DuplicatePhone) => {
            info!("Demo seller already exists; nothing to do");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let store_setup = SignupStep2 {
        store_name: "Demo Electronics".to_owned(),
        store_category: "Electronics & Gadgets".to_owned(),
        store_description: "A demonstration storefront seeded for local development".to_owned(),
        store_logo: None,
        store_banner: None,
    };
    let (seller, _token) = auth.complete_store_setup(&seller, &store_setup).await?;
    info!(seller_id = %seller.id, slug = ?seller.store_slug, "Demo seller created");

    let store = StoreRepository::new(&pool)
        .create(
            "Demo Electronics",
            Some("Electronics & Gadgets"),
            Some("Gadgets and accessories for the demo marketplace"),
            None,
            None,
            seller.id,
        )
        .await?;
    info!(store_id = %store.id, "Demo store created");

    let products = ProductRepository::new(&pool);
    for (name, description, price_cents, quantity) in [
        ("Wireless Earbuds", "Compact earbuds with charging case", 4999_i64, 25),
        ("USB-C Hub", "7-in-1 hub with HDMI and card reader", 3499, 40),
        ("Mechanical Keyboard", "Hot-swappable 75% board", 8999, 12),
    ] {
        let new = NewProduct {
            name: name.to_owned(),
            description: description.to_owned(),
            price: Decimal::new(price_cents, 2),
            sale_price: None,
            category: ProductCategory::Electronics,
            images: Vec::new(),
            in_stock: true,
            quantity,
            store_id: store.id,
            sale_ends_at: None,
        };
        let product = products.insert(&new).await?;
        info!(product_id = %product.id, name, "Demo product created");
    }

    info!("Seeding complete!");
    Ok(())
}
