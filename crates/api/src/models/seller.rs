//! Seller domain model and registration payloads.
//!
//! Registration happens in two steps: personal information first (creating a
//! partial account), store information second (activating it). The password
//! hash never leaves this module in a serializable form; read endpoints use
//! [`SellerProfile`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use markethub_core::{AccountStatus, Email, Phone, STORE_CATEGORIES, SellerId};

use super::ValidationError;

/// Minimum length of a store description at registration step 2.
pub const MIN_STORE_DESCRIPTION_LENGTH: usize = 20;

/// A seller account (database row).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Seller {
    /// Unique seller ID.
    pub id: SellerId,
    /// Full name given at signup.
    pub full_name: String,
    /// Login email, unique.
    pub email: Email,
    /// Contact phone, unique.
    pub phone: Phone,
    /// Argon2 password hash.
    pub password_hash: String,
    /// Store name, set at step 2.
    pub store_name: Option<String>,
    /// Store category, set at step 2.
    pub store_category: Option<String>,
    /// Store description, set at step 2.
    pub store_description: Option<String>,
    /// Unique URL slug derived from the store name.
    pub store_slug: Option<String>,
    /// Logo image reference.
    pub store_logo: Option<String>,
    /// Banner image reference.
    pub store_banner: Option<String>,
    /// 1 after step 1, 2 once store setup completes.
    pub registration_step: i32,
    /// Account lifecycle status; gates login.
    pub account_status: AccountStatus,
    /// Whether the seller passed verification.
    pub is_verified: bool,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

/// The public view of a seller, returned by auth endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct SellerProfile {
    pub id: SellerId,
    #[serde(rename = "fullName")]
    pub full_name: String,
    pub email: Email,
    #[serde(rename = "phoneNumber")]
    pub phone: Phone,
    #[serde(rename = "storeName", skip_serializing_if = "Option::is_none")]
    pub store_name: Option<String>,
    #[serde(rename = "storeSlug", skip_serializing_if = "Option::is_none")]
    pub store_slug: Option<String>,
    #[serde(rename = "storeCategory", skip_serializing_if = "Option::is_none")]
    pub store_category: Option<String>,
    #[serde(rename = "storeDescription", skip_serializing_if = "Option::is_none")]
    pub store_description: Option<String>,
    #[serde(rename = "storeLogo", skip_serializing_if = "Option::is_none")]
    pub store_logo: Option<String>,
    #[serde(rename = "storeBanner", skip_serializing_if = "Option::is_none")]
    pub store_banner: Option<String>,
    #[serde(rename = "registrationStep")]
    pub registration_step: i32,
    #[serde(rename = "accountStatus")]
    pub account_status: AccountStatus,
    #[serde(rename = "isVerified")]
    pub is_verified: bool,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl From<Seller> for SellerProfile {
    fn from(seller: Seller) -> Self {
        Self {
            id: seller.id,
            full_name: seller.full_name,
            email: seller.email,
            phone: seller.phone,
            store_name: seller.store_name,
            store_slug: seller.store_slug,
            store_category: seller.store_category,
            store_description: seller.store_description,
            store_logo: seller.store_logo,
            store_banner: seller.store_banner,
            registration_step: seller.registration_step,
            account_status: seller.account_status,
            is_verified: seller.is_verified,
            created_at: seller.created_at,
        }
    }
}

/// Payload for `POST /api/seller/signup/step1`.
#[derive(Debug, Clone, Deserialize)]
pub struct SignupStep1 {
    #[serde(rename = "fullName")]
    pub full_name: String,
    pub email: String,
    #[serde(rename = "phoneNumber")]
    pub phone_number: String,
    pub password: String,
    #[serde(rename = "confirmPassword")]
    pub confirm_password: String,
}

impl SignupStep1 {
    /// Validate the payload.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for a missing field, mismatched passwords,
    /// or a malformed email/phone. Password strength is checked by the auth
    /// service, which owns the policy.
    pub fn validate(&self) -> Result<(String, Email, Phone), ValidationError> {
        let full_name = self.full_name.trim();
        if full_name.is_empty() {
            return Err(ValidationError::new("Please provide all required fields"));
        }

        if self.password != self.confirm_password {
            return Err(ValidationError::new("Passwords do not match"));
        }

        let email = Email::parse(&self.email)
            .map_err(|_| ValidationError::new("Please enter a valid email address"))?;

        let phone = Phone::parse(&self.phone_number).map_err(|_| {
            ValidationError::new("Please enter a valid phone number (+xxxxxxxxxxx)")
        })?;

        Ok((full_name.to_owned(), email, phone))
    }
}

/// Payload for `POST /api/seller/signup/step2`.
#[derive(Debug, Clone, Deserialize)]
pub struct SignupStep2 {
    #[serde(rename = "storeName")]
    pub store_name: String,
    #[serde(rename = "storeCategory")]
    pub store_category: String,
    #[serde(rename = "storeDescription")]
    pub store_description: String,
    #[serde(default, rename = "storeLogo")]
    pub store_logo: Option<String>,
    #[serde(default, rename = "storeBanner")]
    pub store_banner: Option<String>,
}

impl SignupStep2 {
    /// Validate the payload.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for a missing field, an unknown store
    /// category, or a description shorter than 20 characters.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.store_name.trim().is_empty() || self.store_description.trim().is_empty() {
            return Err(ValidationError::new(
                "Please provide all required store information",
            ));
        }

        if !STORE_CATEGORIES.contains(&self.store_category.as_str()) {
            return Err(ValidationError::new("Invalid store category"));
        }

        if self.store_description.trim().len() < MIN_STORE_DESCRIPTION_LENGTH {
            return Err(ValidationError::new(format!(
                "Store description must be at least {MIN_STORE_DESCRIPTION_LENGTH} characters long"
            )));
        }

        Ok(())
    }
}

/// Payload for `POST /api/seller/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn step1_payload() -> SignupStep1 {
        SignupStep1 {
            full_name: "Ayesha Khan".to_owned(),
            email: "ayesha@example.com".to_owned(),
            phone_number: "+923001234567".to_owned(),
            password: "hunter2hunter2".to_owned(),
            confirm_password: "hunter2hunter2".to_owned(),
        }
    }

    #[test]
    fn test_step1_valid() {
        let (name, email, phone) = step1_payload().validate().unwrap();
        assert_eq!(name, "Ayesha Khan");
        assert_eq!(email.as_str(), "ayesha@example.com");
        assert_eq!(phone.as_str(), "+923001234567");
    }

    #[test]
    fn test_step1_password_mismatch() {
        let mut payload = step1_payload();
        payload.confirm_password = "different".to_owned();
        let err = payload.validate().unwrap_err();
        assert!(err.0.contains("Passwords do not match"));
    }

    #[test]
    fn test_step1_bad_email() {
        let mut payload = step1_payload();
        payload.email = "not-an-email".to_owned();
        assert!(payload.validate().is_err());
    }

    #[test]
    fn test_step1_bad_phone() {
        let mut payload = step1_payload();
        payload.phone_number = "03001234567".to_owned();
        assert!(payload.validate().is_err());
    }

    #[test]
    fn test_step2_rejects_short_description() {
        let payload = SignupStep2 {
            store_name: "Tech Bazaar".to_owned(),
            store_category: "Electronics & Gadgets".to_owned(),
            store_description: "Too short".to_owned(),
            store_logo: None,
            store_banner: None,
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn test_step2_rejects_unknown_category() {
        let payload = SignupStep2 {
            store_name: "Tech Bazaar".to_owned(),
            store_category: "Spaceships".to_owned(),
            store_description: "A long enough description of the store".to_owned(),
            store_logo: None,
            store_banner: None,
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn test_step2_valid() {
        let payload = SignupStep2 {
            store_name: "Tech Bazaar".to_owned(),
            store_category: "Electronics & Gadgets".to_owned(),
            store_description: "A long enough description of the store".to_owned(),
            store_logo: Some("logo.png".to_owned()),
            store_banner: None,
        };
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn test_profile_omits_unset_store_fields() {
        let now = Utc::now();
        let seller = Seller {
            id: SellerId::generate(),
            full_name: "Ayesha Khan".to_owned(),
            email: Email::parse("ayesha@example.com").unwrap(),
            phone: Phone::parse("+923001234567").unwrap(),
            password_hash: "$argon2id$...".to_owned(),
            store_name: None,
            store_category: None,
            store_description: None,
            store_slug: None,
            store_logo: None,
            store_banner: None,
            registration_step: 1,
            account_status: AccountStatus::Pending,
            is_verified: false,
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(SellerProfile::from(seller)).unwrap();
        assert!(json.get("storeName").is_none());
        assert_eq!(json["registrationStep"], 1);
        assert_eq!(json["accountStatus"], "pending");
        // The hash must never appear in a serialized profile
        assert!(!json.to_string().contains("argon2"));
    }
}
