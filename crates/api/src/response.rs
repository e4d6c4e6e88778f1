//! Response envelope, pagination, and the JSON extractor.
//!
//! Every endpoint renders the same envelope:
//! `{"success": true, "message": ..., "data": ...}` on success and
//! `{"success": false, "message": ...}` on failure (see
//! [`AppError`](crate::error::AppError)).

use axum::{Json, extract::FromRequest, http::StatusCode};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Maximum page size for list endpoints.
pub const MAX_PAGE_SIZE: i64 = 50;
/// Default page size for list endpoints.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// The uniform success envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// A 200 response with a message and payload.
    pub fn ok(message: impl Into<String>, data: T) -> (StatusCode, Json<Self>) {
        (
            StatusCode::OK,
            Json(Self {
                success: true,
                message: message.into(),
                data: Some(data),
            }),
        )
    }

    /// A 201 response with a message and payload.
    pub fn created(message: impl Into<String>, data: T) -> (StatusCode, Json<Self>) {
        (
            StatusCode::CREATED,
            Json(Self {
                success: true,
                message: message.into(),
                data: Some(data),
            }),
        )
    }
}

/// JSON extractor that renders rejections through the error envelope.
///
/// Axum's stock `Json` rejects malformed bodies with a bare 422; routing the
/// rejection through [`AppError`] keeps the envelope uniform and the status
/// at 400.
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Common `page`/`limit` query parameters.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub limit: Option<i64>,
}

impl PageQuery {
    /// Resolve to a concrete `(page, per_page)` pair.
    ///
    /// The page floors at 1; the limit is clamped to `1..=50`.
    #[must_use]
    pub fn resolve(self) -> (i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let limit = self
            .limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        (page, limit)
    }

    /// The OFFSET corresponding to the resolved page.
    #[must_use]
    pub fn offset(self) -> i64 {
        let (page, limit) = self.resolve();
        (page - 1) * limit
    }
}

/// Pagination metadata attached to list responses.
#[derive(Debug, Clone, Serialize)]
pub struct Pagination {
    pub current_page: i64,
    pub total_pages: i64,
    pub total_products: i64,
    pub products_per_page: i64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl Pagination {
    /// Build pagination metadata from a resolved page, page size, and total
    /// row count.
    #[must_use]
    pub fn new(page: i64, per_page: i64, total: i64) -> Self {
        let total_pages = if total == 0 {
            0
        } else {
            (total + per_page - 1) / per_page
        };
        Self {
            current_page: page,
            total_pages,
            total_products: total,
            products_per_page: per_page,
            has_next_page: page < total_pages,
            has_prev_page: page > 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_query_defaults() {
        let (page, limit) = PageQuery::default().resolve();
        assert_eq!(page, 1);
        assert_eq!(limit, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_limit_clamped_to_50() {
        let query = PageQuery {
            page: Some(1),
            limit: Some(100),
        };
        let (_, limit) = query.resolve();
        assert_eq!(limit, 50);
    }

    #[test]
    fn test_limit_floors_at_1() {
        let query = PageQuery {
            page: Some(1),
            limit: Some(0),
        };
        let (_, limit) = query.resolve();
        assert_eq!(limit, 1);
    }

    #[test]
    fn test_page_floors_at_1() {
        let query = PageQuery {
            page: Some(-3),
            limit: None,
        };
        let (page, _) = query.resolve();
        assert_eq!(page, 1);
    }

    #[test]
    fn test_offset() {
        let query = PageQuery {
            page: Some(3),
            limit: Some(20),
        };
        assert_eq!(query.offset(), 40);
    }

    #[test]
    fn test_pagination_math() {
        let p = Pagination::new(2, 10, 35);
        assert_eq!(p.total_pages, 4);
        assert!(p.has_next_page);
        assert!(p.has_prev_page);

        let p = Pagination::new(4, 10, 35);
        assert!(!p.has_next_page);

        let p = Pagination::new(1, 10, 0);
        assert_eq!(p.total_pages, 0);
        assert!(!p.has_next_page);
        assert!(!p.has_prev_page);
    }
}
