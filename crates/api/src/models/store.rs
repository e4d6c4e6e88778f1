//! Store domain model and write payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use markethub_core::{SellerId, StoreId};

use super::ValidationError;

/// A store owned by a seller.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Store {
    /// Unique store ID.
    pub id: StoreId,
    /// Display name.
    pub name: String,
    /// Free-text category label, matched case-insensitively in search.
    pub category: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Banner image reference.
    pub banner: Option<String>,
    /// Logo image reference.
    pub logo: Option<String>,
    /// Owning seller.
    #[serde(rename = "user_id")]
    pub seller_id: SellerId,
    /// When the store was created.
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    /// When the store was last updated.
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// A store together with a summary of its owner, for read endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct StoreWithOwner {
    #[serde(flatten)]
    pub store: Store,
    pub owner: OwnerSummary,
}

/// The owner fields attached to store reads.
#[derive(Debug, Clone, Serialize)]
pub struct OwnerSummary {
    pub name: String,
    pub email: String,
}

/// Payload for `POST /api/store`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateStore {
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub banner: Option<String>,
    #[serde(default)]
    pub logo: Option<String>,
    /// Owning seller id as a string; malformed ids are rejected before any
    /// query is issued.
    pub user_id: String,
}

impl CreateStore {
    /// Validate the payload.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the name is empty or the seller id is
    /// malformed.
    pub fn validate(&self) -> Result<(String, SellerId), ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::new("Store name is required"));
        }

        let seller_id = SellerId::parse(&self.user_id)
            .map_err(|_| ValidationError::new("Invalid seller ID format"))?;

        Ok((name.to_owned(), seller_id))
    }
}

/// Payload for `PUT /api/stores/{id}` (partial update).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateStore {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub banner: Option<String>,
    #[serde(default)]
    pub logo: Option<String>,
}

impl UpdateStore {
    /// Apply the update to an existing store.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if a provided name is empty.
    pub fn apply(&self, store: &mut Store) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            let trimmed = name.trim();
            if trimmed.is_empty() {
                return Err(ValidationError::new("Store name cannot be empty"));
            }
            store.name = trimmed.to_owned();
        }
        if let Some(category) = &self.category {
            store.category = Some(category.clone());
        }
        if let Some(description) = &self.description {
            store.description = Some(description.clone());
        }
        if let Some(banner) = &self.banner {
            store.banner = Some(banner.clone());
        }
        if let Some(logo) = &self.logo {
            store.logo = Some(logo.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_create_store_validates_seller_id() {
        let payload = CreateStore {
            name: "Tech Bazaar".to_owned(),
            category: None,
            description: None,
            banner: None,
            logo: None,
            user_id: "garbage".to_owned(),
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn test_create_store_requires_name() {
        let payload = CreateStore {
            name: "   ".to_owned(),
            category: None,
            description: None,
            banner: None,
            logo: None,
            user_id: "67f3c1d2-8a4b-4c5d-9e6f-0123456789ab".to_owned(),
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn test_update_store_applies_fields() {
        let now = Utc::now();
        let mut store = Store {
            id: StoreId::generate(),
            name: "Old Name".to_owned(),
            category: None,
            description: None,
            banner: None,
            logo: None,
            seller_id: SellerId::generate(),
            created_at: now,
            updated_at: now,
        };

        let update = UpdateStore {
            name: Some("New Name".to_owned()),
            category: Some("Electronics & Gadgets".to_owned()),
            ..Default::default()
        };
        update.apply(&mut store).unwrap();
        assert_eq!(store.name, "New Name");
        assert_eq!(store.category.as_deref(), Some("Electronics & Gadgets"));
    }

    #[test]
    fn test_update_store_rejects_empty_name() {
        let now = Utc::now();
        let mut store = Store {
            id: StoreId::generate(),
            name: "Keep".to_owned(),
            category: None,
            description: None,
            banner: None,
            logo: None,
            seller_id: SellerId::generate(),
            created_at: now,
            updated_at: now,
        };

        let update = UpdateStore {
            name: Some(String::new()),
            ..Default::default()
        };
        assert!(update.apply(&mut store).is_err());
        assert_eq!(store.name, "Keep");
    }
}
