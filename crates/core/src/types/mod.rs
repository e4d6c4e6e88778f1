//! Core types for MarketHub.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod category;
pub mod email;
pub mod id;
pub mod phone;
pub mod slug;
pub mod status;

pub use category::{CategoryError, ProductCategory, STORE_CATEGORIES};
pub use email::{Email, EmailError};
pub use id::*;
pub use phone::{Phone, PhoneError};
pub use slug::slugify;
pub use status::{AccountStatus, OrderStatus};
