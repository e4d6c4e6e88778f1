//! Authentication service.
//!
//! Owns the two-step seller registration flow, login with account-status
//! gating, argon2 password hashing, and bearer-token issuance.
//!
//! Tokens come in two scopes: a short-lived `setup` token issued after
//! registration step 1 (good only for completing store setup) and a
//! longer-lived `session` token issued after step 2 or login.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use markethub_core::{AccountStatus, Email, Phone, SellerId, slugify};

use crate::db::RepositoryError;
use crate::db::sellers::{SellerRepository, StoreSetup};
use crate::models::seller::{Seller, SignupStep2};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Lifetime of the step-1 setup token, in seconds (1 hour).
const SETUP_TOKEN_TTL_SECS: i64 = 60 * 60;

/// Lifetime of a session token, in seconds (7 days).
const SESSION_TOKEN_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// Fallback slug base when a store name contains no usable characters.
const FALLBACK_SLUG: &str = "store";

/// What a token entitles its bearer to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenScope {
    /// Step-1 token: may only complete store setup.
    Setup,
    /// Full session token.
    Session,
}

/// Bearer token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Seller this token belongs to.
    pub sub: SellerId,
    /// Token scope.
    pub scope: TokenScope,
    /// Expiry (unix seconds).
    pub exp: i64,
    /// Issued at (unix seconds).
    pub iat: i64,
}

/// Issue a signed token for a seller.
///
/// # Errors
///
/// Returns `AuthError::TokenEncoding` if signing fails.
pub fn issue_token(
    key: &EncodingKey,
    seller_id: SellerId,
    scope: TokenScope,
    ttl_secs: i64,
) -> Result<String, AuthError> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: seller_id,
        scope,
        exp: now + ttl_secs,
        iat: now,
    };

    jsonwebtoken::encode(&Header::default(), &claims, key).map_err(|_| AuthError::TokenEncoding)
}

/// Verify a token and return its claims.
///
/// # Errors
///
/// Returns `AuthError::InvalidToken` if the token is malformed, has a bad
/// signature, or expired.
pub fn verify_token(key: &DecodingKey, token: &str) -> Result<Claims, AuthError> {
    jsonwebtoken::decode::<Claims>(token, key, &Validation::default())
        .map(|data| data.claims)
        .map_err(|_| AuthError::InvalidToken)
}

/// Authentication service.
///
/// Handles seller registration, store setup, and login.
pub struct AuthService<'a> {
    sellers: SellerRepository<'a>,
    encoding_key: &'a EncodingKey,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, encoding_key: &'a EncodingKey) -> Self {
        Self {
            sellers: SellerRepository::new(pool),
            encoding_key,
        }
    }

    /// Registration step 1: create a partial seller account and issue the
    /// setup token for step 2.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::WeakPassword` if the password doesn't meet
    /// requirements, `AuthError::DuplicateEmail`/`DuplicatePhone` if either
    /// unique field is taken.
    pub async fn register_step1(
        &self,
        full_name: &str,
        email: &Email,
        phone: &Phone,
        password: &str,
    ) -> Result<(Seller, String), AuthError> {
        validate_password(password)?;

        // Pre-check both unique fields so the error names the right one
        if self.sellers.get_by_email(email).await?.is_some() {
            return Err(AuthError::DuplicateEmail);
        }

        let password_hash = hash_password(password)?;

        let seller = self
            .sellers
            .create_step1(full_name, email, phone, &password_hash)
            .await
            .map_err(|e| match e {
                // A concurrent signup can still hit the constraint
                RepositoryError::Conflict(message) => {
                    if message.contains("phone") {
                        AuthError::DuplicatePhone
                    } else {
                        AuthError::DuplicateEmail
                    }
                }
                other => AuthError::Repository(other),
            })?;

        let token = issue_token(
            self.encoding_key,
            seller.id,
            TokenScope::Setup,
            SETUP_TOKEN_TTL_SECS,
        )?;

        Ok((seller, token))
    }

    /// Registration step 2: attach store information, activate the account,
    /// and issue a session token.
    ///
    /// The payload must already be validated; this method owns the slug
    /// derivation and the registration-step gate.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::WrongRegistrationStep` if step 1 is not the
    /// seller's current step.
    pub async fn complete_store_setup(
        &self,
        seller: &Seller,
        payload: &SignupStep2,
    ) -> Result<(Seller, String), AuthError> {
        if seller.registration_step != 1 {
            return Err(AuthError::WrongRegistrationStep(seller.registration_step));
        }

        let slug = self.unique_slug(&payload.store_name).await?;

        let setup = StoreSetup {
            store_name: payload.store_name.trim(),
            store_category: &payload.store_category,
            store_description: payload.store_description.trim(),
            store_slug: &slug,
            store_logo: payload.store_logo.as_deref(),
            store_banner: payload.store_banner.as_deref(),
        };

        let seller = self.sellers.complete_store_setup(seller.id, &setup).await?;

        let token = issue_token(
            self.encoding_key,
            seller.id,
            TokenScope::Session,
            SESSION_TOKEN_TTL_SECS,
        )?;

        Ok((seller, token))
    }

    /// Login with email and password, gated on account status.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` for an unknown email or wrong
    /// password, `AuthError::AccountSuspended`/`AccountRejected` when the
    /// account status forbids login.
    pub async fn login(&self, email: &str, password: &str) -> Result<(Seller, String), AuthError> {
        let email = Email::parse(email)?;

        let seller = self
            .sellers
            .get_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &seller.password_hash)?;

        check_account_status(seller.account_status)?;

        let token = issue_token(
            self.encoding_key,
            seller.id,
            TokenScope::Session,
            SESSION_TOKEN_TTL_SECS,
        )?;

        Ok((seller, token))
    }

    /// Load the seller a verified token belongs to.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::SellerNotFound` if the account no longer exists.
    pub async fn seller_for_claims(&self, claims: &Claims) -> Result<Seller, AuthError> {
        self.sellers
            .get_by_id(claims.sub)
            .await?
            .ok_or(AuthError::SellerNotFound)
    }

    /// Derive a slug from the store name, suffixing `-2`, `-3`... until it
    /// is unique.
    async fn unique_slug(&self, store_name: &str) -> Result<String, AuthError> {
        let base = {
            let s = slugify(store_name);
            if s.is_empty() { FALLBACK_SLUG.to_owned() } else { s }
        };

        let mut candidate = base.clone();
        let mut counter = 2u32;
        while self.sellers.slug_exists(&candidate).await? {
            candidate = format!("{base}-{counter}");
            counter += 1;
        }

        Ok(candidate)
    }
}

/// Refuse logins for suspended or rejected accounts.
fn check_account_status(status: AccountStatus) -> Result<(), AuthError> {
    match status {
        AccountStatus::Suspended => Err(AuthError::AccountSuspended),
        AccountStatus::Rejected => Err(AuthError::AccountRejected),
        // Pending sellers may log in to finish store setup
        AccountStatus::Pending | AccountStatus::Active => Ok(()),
    }
}

/// Check password strength requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters long"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(verify_password("correct horse battery", &hash).is_ok());
        assert!(verify_password("wrong password", &hash).is_err());
    }

    #[test]
    fn test_hashes_are_salted() {
        let h1 = hash_password("same-password").unwrap();
        let h2 = hash_password("same-password").unwrap();
        assert_ne!(h1, h2);
    }

    #[test]
    fn test_validate_password_too_short() {
        let err = validate_password("short").unwrap_err();
        assert!(matches!(err, AuthError::WeakPassword(_)));
        assert!(validate_password("exactly-8").is_ok());
    }

    #[test]
    fn test_token_roundtrip() {
        let encoding = EncodingKey::from_secret(b"0123456789abcdef0123456789abcdef");
        let decoding = DecodingKey::from_secret(b"0123456789abcdef0123456789abcdef");

        let seller_id = SellerId::generate();
        let token = issue_token(&encoding, seller_id, TokenScope::Setup, 3600)
            .unwrap();

        let claims = verify_token(&decoding, &token).unwrap();
        assert_eq!(claims.sub, seller_id);
        assert_eq!(claims.scope, TokenScope::Setup);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_token_rejects_wrong_key() {
        let encoding = EncodingKey::from_secret(b"0123456789abcdef0123456789abcdef");
        let other = DecodingKey::from_secret(b"ffffffffffffffffffffffffffffffff");

        let token = issue_token(
            &encoding,
            SellerId::generate(),
            TokenScope::Session,
            3600,
        )
        .unwrap();

        assert!(matches!(
            verify_token(&other, &token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_token_rejects_expired() {
        let encoding = EncodingKey::from_secret(b"0123456789abcdef0123456789abcdef");
        let decoding = DecodingKey::from_secret(b"0123456789abcdef0123456789abcdef");

        // Well past the default 60s validation leeway
        let token = issue_token(
            &encoding,
            SellerId::generate(),
            TokenScope::Session,
            -600,
        )
        .unwrap();

        assert!(matches!(
            verify_token(&decoding, &token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_token_rejects_garbage() {
        let decoding = DecodingKey::from_secret(b"0123456789abcdef0123456789abcdef");
        assert!(matches!(
            verify_token(&decoding, "not.a.token"),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_account_gating() {
        assert!(check_account_status(AccountStatus::Active).is_ok());
        assert!(check_account_status(AccountStatus::Pending).is_ok());
        assert!(matches!(
            check_account_status(AccountStatus::Suspended),
            Err(AuthError::AccountSuspended)
        ));
        assert!(matches!(
            check_account_status(AccountStatus::Rejected),
            Err(AuthError::AccountRejected)
        ));
    }
}
