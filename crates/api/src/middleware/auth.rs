//! Authentication middleware and extractors.
//!
//! Provides an extractor for requiring a seller bearer token in route
//! handlers.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::AppError;
use crate::models::seller::Seller;
use crate::services::auth::{AuthError, AuthService, Claims, verify_token};
use crate::state::AppState;

/// Extractor that requires a valid seller bearer token.
///
/// Verifies the `Authorization: Bearer <token>` header and loads the seller
/// it belongs to. Handlers that need the token scope can read it from the
/// claims.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireSeller { seller, .. }: RequireSeller,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", seller.full_name)
/// }
/// ```
pub struct RequireSeller {
    /// The authenticated seller.
    pub seller: Seller,
    /// The verified token claims.
    pub claims: Claims,
}

impl FromRequestParts<AppState> for RequireSeller {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(AppError::Auth(AuthError::MissingToken))?;

        let claims = verify_token(state.decoding_key(), token)?;

        let auth = AuthService::new(state.pool(), state.encoding_key());
        let seller = auth.seller_for_claims(&claims).await?;

        Ok(Self { seller, claims })
    }
}

/// Extract the bearer token from the Authorization header, if any.
fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(axum::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with_auth(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/api/seller/signup/step2");
        if let Some(value) = value {
            builder = builder.header("Authorization", value);
        }
        let (parts, ()) = builder.body(()).unwrap().into_parts();
        parts
    }

    #[test]
    fn test_bearer_token_extraction() {
        let parts = parts_with_auth(Some("Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&parts), Some("abc.def.ghi"));
    }

    #[test]
    fn test_bearer_token_missing_header() {
        let parts = parts_with_auth(None);
        assert_eq!(bearer_token(&parts), None);
    }

    #[test]
    fn test_bearer_token_wrong_scheme() {
        let parts = parts_with_auth(Some("Basic dXNlcjpwYXNz"));
        assert_eq!(bearer_token(&parts), None);
    }
}
