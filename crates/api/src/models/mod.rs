//! Domain models and request payloads.
//!
//! Each entity has one payload type per write shape with a single
//! `validate()` used by every route that accepts it, so the validation rules
//! live in exactly one place per entity.

pub mod order;
pub mod product;
pub mod seller;
pub mod store;

use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// A request payload failed validation.
///
/// The message is client-facing and names the offending field or rule.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    /// Convenience constructor from anything string-like.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Deserialize a field that distinguishes "absent" from "explicitly null".
///
/// Use with `#[serde(default, deserialize_with = "double_option")]` on an
/// `Option<Option<T>>` field: absent stays `None`, `null` becomes
/// `Some(None)`, and a value becomes `Some(Some(value))`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[derive(Debug, Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "double_option")]
        sale_price: Option<Option<Decimal>>,
    }

    #[test]
    fn test_double_option_absent() {
        let patch: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(patch.sale_price, None);
    }

    #[test]
    fn test_double_option_null() {
        let patch: Patch = serde_json::from_str(r#"{"sale_price": null}"#).unwrap();
        assert_eq!(patch.sale_price, Some(None));
    }

    #[test]
    fn test_double_option_value() {
        let patch: Patch = serde_json::from_str(r#"{"sale_price": "9.99"}"#).unwrap();
        assert_eq!(
            patch.sale_price,
            Some(Some(Decimal::new(999, 2)))
        );
    }
}
