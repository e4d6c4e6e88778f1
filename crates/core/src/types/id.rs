//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types.

/// Error returned when an identifier string is not a valid UUID.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid identifier format")]
pub struct IdParseError;

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around [`uuid::Uuid`] with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `generate()`, `parse()`, `as_uuid()`
/// - `From<Uuid>` and `Into<Uuid>` implementations
/// - `sqlx` `Type`, `Encode`, and `Decode` implementations (with `postgres` feature)
///
/// `parse()` is the boundary check for request identifiers: a malformed
/// string is rejected before any query is issued.
///
/// # Example
///
/// ```rust
/// # use markethub_core::define_id;
/// define_id!(SellerId);
/// define_id!(StoreId);
///
/// let seller_id = SellerId::generate();
/// let store_id = StoreId::generate();
///
/// // These are different types, so this won't compile:
/// // let _: SellerId = store_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(::uuid::Uuid);

        impl $name {
            /// Create a new ID from a UUID value.
            #[must_use]
            pub const fn new(id: ::uuid::Uuid) -> Self {
                Self(id)
            }

            /// Generate a fresh random (v4) ID.
            #[must_use]
            pub fn generate() -> Self {
                Self(::uuid::Uuid::new_v4())
            }

            /// Parse an ID from its string representation.
            ///
            /// # Errors
            ///
            /// Returns [`IdParseError`](crate::types::id::IdParseError) when
            /// the string is not a well-formed UUID.
            pub fn parse(s: &str) -> ::core::result::Result<Self, $crate::types::id::IdParseError> {
                ::uuid::Uuid::parse_str(s)
                    .map(Self)
                    .map_err(|_| $crate::types::id::IdParseError)
            }

            /// Get the underlying UUID value.
            #[must_use]
            pub const fn as_uuid(&self) -> ::uuid::Uuid {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<::uuid::Uuid> for $name {
            fn from(id: ::uuid::Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for ::uuid::Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Type<::sqlx::Postgres> for $name {
            fn type_info() -> ::sqlx::postgres::PgTypeInfo {
                <::uuid::Uuid as ::sqlx::Type<::sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &::sqlx::postgres::PgTypeInfo) -> bool {
                <::uuid::Uuid as ::sqlx::Type<::sqlx::Postgres>>::compatible(ty)
            }
        }

        #[cfg(feature = "postgres")]
        impl<'r> ::sqlx::Decode<'r, ::sqlx::Postgres> for $name {
            fn decode(
                value: ::sqlx::postgres::PgValueRef<'r>,
            ) -> ::core::result::Result<Self, ::sqlx::error::BoxDynError> {
                let id = <::uuid::Uuid as ::sqlx::Decode<::sqlx::Postgres>>::decode(value)?;
                Ok(Self(id))
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Encode<'_, ::sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut ::sqlx::postgres::PgArgumentBuffer,
            ) -> ::std::result::Result<::sqlx::encode::IsNull, ::sqlx::error::BoxDynError> {
                <::uuid::Uuid as ::sqlx::Encode<::sqlx::Postgres>>::encode_by_ref(&self.0, buf)
            }
        }
    };
}

// Define standard entity IDs
define_id!(SellerId);
define_id!(StoreId);
define_id!(ProductId);
define_id!(OrderId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let id = ProductId::parse("67f3c1d2-8a4b-4c5d-9e6f-0123456789ab").unwrap();
        assert_eq!(id.to_string(), "67f3c1d2-8a4b-4c5d-9e6f-0123456789ab");
    }

    #[test]
    fn test_parse_malformed() {
        assert!(ProductId::parse("not-a-uuid").is_err());
        assert!(ProductId::parse("").is_err());
        assert!(ProductId::parse("12345").is_err());
    }

    #[test]
    fn test_generate_unique() {
        assert_ne!(SellerId::generate(), SellerId::generate());
    }

    #[test]
    fn test_serde_transparent() {
        let id = StoreId::parse("67f3c1d2-8a4b-4c5d-9e6f-0123456789ab").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"67f3c1d2-8a4b-4c5d-9e6f-0123456789ab\"");

        let back: StoreId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
