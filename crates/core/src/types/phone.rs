//! Phone number type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Phone`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum PhoneError {
    /// The input string is empty.
    #[error("phone number cannot be empty")]
    Empty,
    /// The input does not start with a country prefix.
    #[error("phone number must start with +")]
    MissingPlusPrefix,
    /// The digits after the prefix are invalid.
    #[error("phone number must be + followed by {min} to {max} digits")]
    InvalidDigits {
        /// Minimum digit count.
        min: usize,
        /// Maximum digit count.
        max: usize,
    },
}

/// A phone number in international format: `+` followed by 10 to 14 digits.
///
/// Seller phone numbers are unique, so the value is normalized (whitespace
/// stripped) at the parse boundary and compared verbatim.
///
/// ## Examples
///
/// ```
/// use markethub_core::Phone;
///
/// assert!(Phone::parse("+923001234567").is_ok());
/// assert!(Phone::parse("+14155550123").is_ok());
///
/// assert!(Phone::parse("").is_err());            // empty
/// assert!(Phone::parse("03001234567").is_err()); // missing +
/// assert!(Phone::parse("+1234").is_err());       // too short
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    /// Minimum number of digits after the `+` prefix.
    pub const MIN_DIGITS: usize = 10;
    /// Maximum number of digits after the `+` prefix.
    pub const MAX_DIGITS: usize = 14;

    /// Parse a `Phone` from a string.
    ///
    /// Whitespace is stripped before validation.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, does not start with `+`, or
    /// does not consist of 10-14 digits after the prefix.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        let normalized: String = s.chars().filter(|c| !c.is_whitespace()).collect();

        if normalized.is_empty() {
            return Err(PhoneError::Empty);
        }

        let digits = normalized
            .strip_prefix('+')
            .ok_or(PhoneError::MissingPlusPrefix)?;

        let digit_count = digits.chars().count();
        if digit_count < Self::MIN_DIGITS
            || digit_count > Self::MAX_DIGITS
            || !digits.chars().all(|c| c.is_ascii_digit())
        {
            return Err(PhoneError::InvalidDigits {
                min: Self::MIN_DIGITS,
                max: Self::MAX_DIGITS,
            });
        }

        Ok(Self(normalized))
    }

    /// Returns the phone number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Phone` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Phone {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Phone {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Phone {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Phone {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        // Database values are assumed valid
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Phone {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert!(Phone::parse("+923001234567").is_ok());
        assert!(Phone::parse("+14155550123").is_ok());
        assert!(Phone::parse("+4915123456789").is_ok());
    }

    #[test]
    fn test_parse_strips_whitespace() {
        let phone = Phone::parse("+92 300 123 4567").unwrap();
        assert_eq!(phone.as_str(), "+923001234567");
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(Phone::parse(""), Err(PhoneError::Empty)));
    }

    #[test]
    fn test_parse_missing_plus() {
        assert!(matches!(
            Phone::parse("03001234567"),
            Err(PhoneError::MissingPlusPrefix)
        ));
    }

    #[test]
    fn test_parse_too_short() {
        assert!(matches!(
            Phone::parse("+1234"),
            Err(PhoneError::InvalidDigits { .. })
        ));
    }

    #[test]
    fn test_parse_too_long() {
        assert!(matches!(
            Phone::parse("+123456789012345"),
            Err(PhoneError::InvalidDigits { .. })
        ));
    }

    #[test]
    fn test_parse_non_digits() {
        assert!(matches!(
            Phone::parse("+92300abc4567"),
            Err(PhoneError::InvalidDigits { .. })
        ));
    }
}
