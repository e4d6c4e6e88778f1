//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
///
/// The display strings double as client-facing messages for the
/// non-internal variants.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("Please enter a valid email address")]
    InvalidEmail(#[from] markethub_core::EmailError),

    /// Invalid credentials (wrong password or unknown email).
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Seller not found (e.g. token for a deleted account).
    #[error("Invalid token. Seller not found.")]
    SellerNotFound,

    /// Email already registered.
    #[error("A seller account with this email already exists")]
    DuplicateEmail,

    /// Phone number already registered.
    #[error("A seller account with this phone number already exists")]
    DuplicatePhone,

    /// Password too weak or invalid.
    #[error("{0}")]
    WeakPassword(String),

    /// Account suspended by moderation.
    #[error("Your account has been suspended. Please contact support.")]
    AccountSuspended,

    /// Seller application rejected.
    #[error("Your seller application has been rejected. Please contact support.")]
    AccountRejected,

    /// The seller is not at the registration step this operation requires.
    #[error("Please complete registration step 1 first")]
    WrongRegistrationStep(i32),

    /// No bearer token on a protected request.
    #[error("Access denied. No token provided.")]
    MissingToken,

    /// The bearer token failed verification or expired.
    #[error("Invalid token.")]
    InvalidToken,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,

    /// Token signing error.
    #[error("token encoding error")]
    TokenEncoding,
}
