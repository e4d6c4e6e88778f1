//! Status enums for sellers and orders.

use serde::{Deserialize, Serialize};

/// Seller account status.
///
/// A seller is `pending` between registration steps 1 and 2, becomes
/// `active` when store setup completes, and can later be `suspended` or
/// `rejected` by moderation. Suspended and rejected accounts are refused at
/// login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(feature = "postgres", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    #[default]
    Pending,
    Active,
    Suspended,
    Rejected,
}

impl std::fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Active => write!(f, "active"),
            Self::Suspended => write!(f, "suspended"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

/// Order lifecycle status.
///
/// Orders are created as `Processing`; moving to `Shipped` (optionally with
/// a delivery timestamp) is the only permitted mutation after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
pub enum OrderStatus {
    #[default]
    Processing,
    Shipped,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Processing => write!(f, "Processing"),
            Self::Shipped => write!(f, "Shipped"),
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Processing" => Ok(Self::Processing),
            "Shipped" => Ok(Self::Shipped),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}
