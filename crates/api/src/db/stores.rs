//! Store repository for database operations.

use sqlx::PgPool;

use markethub_core::{SellerId, StoreId};

use super::{RepositoryError, escape_like};
use crate::models::store::{OwnerSummary, Store, StoreWithOwner};

const STORE_COLUMNS: &str =
    "s.id, s.name, s.category, s.description, s.banner, s.logo, s.seller_id, \
     s.created_at, s.updated_at";

/// A store row joined with its owner's summary fields.
#[derive(Debug, sqlx::FromRow)]
struct StoreWithOwnerRow {
    #[sqlx(flatten)]
    store: Store,
    owner_name: String,
    owner_email: String,
}

impl From<StoreWithOwnerRow> for StoreWithOwner {
    fn from(row: StoreWithOwnerRow) -> Self {
        Self {
            store: row.store,
            owner: OwnerSummary {
                name: row.owner_name,
                email: row.owner_email,
            },
        }
    }
}

/// Repository for store database operations.
pub struct StoreRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> StoreRepository<'a> {
    /// Create a new store repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a store. The caller is responsible for checking that the
    /// seller exists (so a missing seller can be reported as a client
    /// error, not a foreign-key failure).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        name: &str,
        category: Option<&str>,
        description: Option<&str>,
        banner: Option<&str>,
        logo: Option<&str>,
        seller_id: SellerId,
    ) -> Result<Store, RepositoryError> {
        let store = sqlx::query_as::<_, Store>(
            "INSERT INTO stores (name, category, description, banner, logo, seller_id) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING id, name, category, description, banner, logo, seller_id, \
                       created_at, updated_at",
        )
        .bind(name)
        .bind(category)
        .bind(description)
        .bind(banner)
        .bind(logo)
        .bind(seller_id)
        .fetch_one(self.pool)
        .await?;

        Ok(store)
    }

    /// Get a store by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: StoreId) -> Result<Option<Store>, RepositoryError> {
        let store = sqlx::query_as::<_, Store>(
            "SELECT id, name, category, description, banner, logo, seller_id, \
                    created_at, updated_at \
             FROM stores WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(store)
    }

    /// Check whether a store exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn exists(&self, id: StoreId) -> Result<bool, RepositoryError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM stores WHERE id = $1)")
            .bind(id)
            .fetch_one(self.pool)
            .await?;

        Ok(exists)
    }

    /// Get a store with its owner summary.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_with_owner(
        &self,
        id: StoreId,
    ) -> Result<Option<StoreWithOwner>, RepositoryError> {
        let sql = format!(
            "SELECT {STORE_COLUMNS}, sel.full_name AS owner_name, sel.email AS owner_email \
             FROM stores s JOIN sellers sel ON sel.id = s.seller_id \
             WHERE s.id = $1"
        );

        let row = sqlx::query_as::<_, StoreWithOwnerRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(Into::into))
    }

    /// List all stores with their owner summaries, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_with_owner(&self) -> Result<Vec<StoreWithOwner>, RepositoryError> {
        let sql = format!(
            "SELECT {STORE_COLUMNS}, sel.full_name AS owner_name, sel.email AS owner_email \
             FROM stores s JOIN sellers sel ON sel.id = s.seller_id \
             ORDER BY s.created_at DESC"
        );

        let rows = sqlx::query_as::<_, StoreWithOwnerRow>(&sql)
            .fetch_all(self.pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// List the stores owned by a seller.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_seller(
        &self,
        seller_id: SellerId,
    ) -> Result<Vec<StoreWithOwner>, RepositoryError> {
        let sql = format!(
            "SELECT {STORE_COLUMNS}, sel.full_name AS owner_name, sel.email AS owner_email \
             FROM stores s JOIN sellers sel ON sel.id = s.seller_id \
             WHERE s.seller_id = $1 \
             ORDER BY s.created_at DESC"
        );

        let rows = sqlx::query_as::<_, StoreWithOwnerRow>(&sql)
            .bind(seller_id)
            .fetch_all(self.pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Find stores whose category contains the given fragment,
    /// case-insensitively ("elect" matches "Electronics").
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn search_by_category(
        &self,
        category: &str,
    ) -> Result<Vec<StoreWithOwner>, RepositoryError> {
        let pattern = format!("%{}%", escape_like(category));
        let sql = format!(
            "SELECT {STORE_COLUMNS}, sel.full_name AS owner_name, sel.email AS owner_email \
             FROM stores s JOIN sellers sel ON sel.id = s.seller_id \
             WHERE s.category ILIKE $1 \
             ORDER BY s.created_at DESC"
        );

        let rows = sqlx::query_as::<_, StoreWithOwnerRow>(&sql)
            .bind(pattern)
            .fetch_all(self.pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Persist an updated store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the store doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(&self, store: &Store) -> Result<Store, RepositoryError> {
        let updated = sqlx::query_as::<_, Store>(
            "UPDATE stores \
             SET name = $2, category = $3, description = $4, banner = $5, logo = $6, \
                 updated_at = now() \
             WHERE id = $1 \
             RETURNING id, name, category, description, banner, logo, seller_id, \
                       created_at, updated_at",
        )
        .bind(store.id)
        .bind(&store.name)
        .bind(&store.category)
        .bind(&store.description)
        .bind(&store.banner)
        .bind(&store.logo)
        .fetch_optional(self.pool)
        .await?;

        updated.ok_or(RepositoryError::NotFound)
    }

    /// Check whether any products still reference this store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn has_products(&self, id: StoreId) -> Result<bool, RepositoryError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM products WHERE store_id = $1)")
                .bind(id)
                .fetch_one(self.pool)
                .await?;

        Ok(exists)
    }

    /// Delete a store.
    ///
    /// # Returns
    ///
    /// The deleted store, so the response can echo it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the store doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: StoreId) -> Result<Store, RepositoryError> {
        let deleted = sqlx::query_as::<_, Store>(
            "DELETE FROM stores WHERE id = $1 \
             RETURNING id, name, category, description, banner, logo, seller_id, \
                       created_at, updated_at",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        deleted.ok_or(RepositoryError::NotFound)
    }
}
