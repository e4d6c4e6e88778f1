//! Seller repository for database operations.
//!
//! Queries are runtime-checked (`sqlx::query_as`) against the `sellers`
//! table; rows decode straight into the [`Seller`] model.

use sqlx::PgPool;

use markethub_core::{AccountStatus, Email, Phone, SellerId};

use super::RepositoryError;
use crate::models::seller::Seller;

const SELLER_COLUMNS: &str = "id, full_name, email, phone, password_hash, store_name, \
     store_category, store_description, store_slug, store_logo, store_banner, \
     registration_step, account_status, is_verified, created_at, updated_at";

/// Fields persisted when registration step 2 completes.
pub struct StoreSetup<'a> {
    pub store_name: &'a str,
    pub store_category: &'a str,
    pub store_description: &'a str,
    pub store_slug: &'a str,
    pub store_logo: Option<&'a str>,
    pub store_banner: Option<&'a str>,
}

/// Repository for seller database operations.
pub struct SellerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SellerRepository<'a> {
    /// Create a new seller repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a partial seller account (registration step 1).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` with a field-specific message if
    /// the email or phone is already registered.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create_step1(
        &self,
        full_name: &str,
        email: &Email,
        phone: &Phone,
        password_hash: &str,
    ) -> Result<Seller, RepositoryError> {
        let sql = format!(
            "INSERT INTO sellers (full_name, email, phone, password_hash) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {SELLER_COLUMNS}"
        );

        sqlx::query_as::<_, Seller>(&sql)
            .bind(full_name)
            .bind(email)
            .bind(phone)
            .bind(password_hash)
            .fetch_one(self.pool)
            .await
            .map_err(map_unique_violation)
    }

    /// Get a seller by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: SellerId) -> Result<Option<Seller>, RepositoryError> {
        let sql = format!("SELECT {SELLER_COLUMNS} FROM sellers WHERE id = $1");

        let seller = sqlx::query_as::<_, Seller>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(seller)
    }

    /// Get a seller by email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<Seller>, RepositoryError> {
        let sql = format!("SELECT {SELLER_COLUMNS} FROM sellers WHERE email = $1");

        let seller = sqlx::query_as::<_, Seller>(&sql)
            .bind(email)
            .fetch_optional(self.pool)
            .await?;

        Ok(seller)
    }

    /// Check whether a seller exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn exists(&self, id: SellerId) -> Result<bool, RepositoryError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM sellers WHERE id = $1)")
            .bind(id)
            .fetch_one(self.pool)
            .await?;

        Ok(exists)
    }

    /// Check whether a store slug is already taken.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn slug_exists(&self, slug: &str) -> Result<bool, RepositoryError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM sellers WHERE store_slug = $1)")
                .bind(slug)
                .fetch_one(self.pool)
                .await?;

        Ok(exists)
    }

    /// Attach store information to a seller and activate the account
    /// (registration step 2).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the seller doesn't exist.
    /// Returns `RepositoryError::Conflict` if the slug was taken concurrently.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn complete_store_setup(
        &self,
        id: SellerId,
        setup: &StoreSetup<'_>,
    ) -> Result<Seller, RepositoryError> {
        let sql = format!(
            "UPDATE sellers \
             SET store_name = $2, store_category = $3, store_description = $4, \
                 store_slug = $5, store_logo = $6, store_banner = $7, \
                 registration_step = 2, account_status = $8, updated_at = now() \
             WHERE id = $1 \
             RETURNING {SELLER_COLUMNS}"
        );

        let seller = sqlx::query_as::<_, Seller>(&sql)
            .bind(id)
            .bind(setup.store_name)
            .bind(setup.store_category)
            .bind(setup.store_description)
            .bind(setup.store_slug)
            .bind(setup.store_logo)
            .bind(setup.store_banner)
            .bind(AccountStatus::Active)
            .fetch_optional(self.pool)
            .await
            .map_err(map_unique_violation)?;

        seller.ok_or(RepositoryError::NotFound)
    }
}

/// Translate unique-constraint violations into field-specific conflicts.
fn map_unique_violation(e: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        let message = match db_err.constraint() {
            Some("sellers_email_key") => "A seller account with this email already exists",
            Some("sellers_phone_key") => "A seller account with this phone number already exists",
            Some("sellers_store_slug_key") => {
                "A store with this name already exists. Please choose a different store name."
            }
            _ => "A seller account with these details already exists",
        };
        return RepositoryError::Conflict(message.to_owned());
    }
    RepositoryError::Database(e)
}
