//! Product and store category enumerations.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when a string is not a valid [`ProductCategory`].
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid category: {0}")]
pub struct CategoryError(pub String);

/// The closed set of product categories.
///
/// The wire labels are fixed; several are multi-word ("Home & Garden"), so
/// serde renames carry the exact strings rather than a rename-all rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
pub enum ProductCategory {
    Electronics,
    Clothing,
    #[serde(rename = "Home & Garden")]
    #[cfg_attr(feature = "postgres", sqlx(rename = "Home & Garden"))]
    HomeAndGarden,
    Sports,
    Books,
    Toys,
    Beauty,
    Automotive,
    Food,
    Other,
}

impl ProductCategory {
    /// All categories, in wire-label order.
    pub const ALL: [Self; 10] = [
        Self::Electronics,
        Self::Clothing,
        Self::HomeAndGarden,
        Self::Sports,
        Self::Books,
        Self::Toys,
        Self::Beauty,
        Self::Automotive,
        Self::Food,
        Self::Other,
    ];

    /// The wire label for this category.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Electronics => "Electronics",
            Self::Clothing => "Clothing",
            Self::HomeAndGarden => "Home & Garden",
            Self::Sports => "Sports",
            Self::Books => "Books",
            Self::Toys => "Toys",
            Self::Beauty => "Beauty",
            Self::Automotive => "Automotive",
            Self::Food => "Food",
            Self::Other => "Other",
        }
    }

    /// A comma-separated list of all valid labels, for error messages.
    #[must_use]
    pub fn valid_labels() -> String {
        Self::ALL
            .iter()
            .map(Self::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ProductCategory {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|c| c.as_str() == s)
            .copied()
            .ok_or_else(|| CategoryError(s.to_owned()))
    }
}

/// The static list of store categories offered at seller signup.
///
/// Unlike product categories this is presentation data, not a closed domain
/// enum: stores persist the label as free text and search matches it as a
/// case-insensitive substring.
pub const STORE_CATEGORIES: &[&str] = &[
    "Fashion & Clothing",
    "Electronics & Gadgets",
    "Home & Garden",
    "Beauty & Personal Care",
    "Sports & Outdoors",
    "Books & Media",
    "Toys & Games",
    "Food & Beverages",
    "Health & Wellness",
    "Art & Crafts",
    "Automotive",
    "Pet Supplies",
    "Office Supplies",
    "Jewelry & Accessories",
    "Other",
];

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_from_str_roundtrip() {
        for category in ProductCategory::ALL {
            let parsed = ProductCategory::from_str(category.as_str()).unwrap();
            assert_eq!(parsed, category);
        }
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        assert!(ProductCategory::from_str("Gadgets").is_err());
        assert!(ProductCategory::from_str("electronics").is_err()); // case-sensitive
        assert!(ProductCategory::from_str("").is_err());
    }

    #[test]
    fn test_serde_multiword_label() {
        let json = serde_json::to_string(&ProductCategory::HomeAndGarden).unwrap();
        assert_eq!(json, "\"Home & Garden\"");

        let back: ProductCategory = serde_json::from_str("\"Home & Garden\"").unwrap();
        assert_eq!(back, ProductCategory::HomeAndGarden);
    }

    #[test]
    fn test_ten_categories() {
        assert_eq!(ProductCategory::ALL.len(), 10);
    }

    #[test]
    fn test_valid_labels_message() {
        let labels = ProductCategory::valid_labels();
        assert!(labels.starts_with("Electronics, Clothing"));
        assert!(labels.ends_with("Food, Other"));
    }
}
