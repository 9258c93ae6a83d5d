//! Common API types
//!
//! Response envelope, pagination parameters and the single place where
//! domain failures are translated into HTTP outcomes.

pub mod validated_json;

pub use validated_json::ValidatedJson;

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::DomainError;

/// Standard API response envelope
///
/// Every REST endpoint wraps its payload in this envelope.
/// On success: `{"success": true, "data": {...}}`,
/// on failure: `{"success": false, "error": "description"}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// `true` when the request was handled successfully
    pub success: bool,
    /// Payload; `null` on failure
    pub data: Option<T>,
    /// Error description; `null` on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Empty response for operations without return data
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EmptyData {}

/// Pagination parameters for list queries
#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct PaginationParams {
    /// Page number (1-based). Default: 1
    #[serde(default = "default_page")]
    pub page: u32,
    /// Items per page (1-100). Default: 50
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    50
}

/// Error shorthand used by handlers
pub type ApiError = (StatusCode, Json<ApiResponse<EmptyData>>);

/// Translate a domain failure into its HTTP outcome.
///
/// Conflict (someone else just booked this slot) and NotFound get their
/// own status codes so clients can react differently from plain bad
/// input.
pub fn error_response(err: DomainError) -> ApiError {
    let status = match &err {
        DomainError::Validation(_) | DomainError::InvalidState(_) => StatusCode::BAD_REQUEST,
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::Conflict(_) => StatusCode::CONFLICT,
        DomainError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(ApiResponse::error(err.to_string())))
}

/// 400 for malformed path/query input that never reaches the services
pub fn bad_request(message: impl Into<String>) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(ApiResponse::error(message)))
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_distinct_statuses() {
        let (status, _) = error_response(DomainError::Validation("bad".into()));
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = error_response(DomainError::InvalidState("late".into()));
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = error_response(DomainError::not_found("Slot", "id", "x"));
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = error_response(DomainError::Conflict("taken".into()));
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = error_response(DomainError::Database("gone".into()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn envelope_success_and_error_shapes() {
        let ok = ApiResponse::success(1);
        assert!(ok.success);
        assert_eq!(ok.data, Some(1));
        assert!(ok.error.is_none());

        let err = ApiResponse::<i32>::error("nope");
        assert!(!err.success);
        assert!(err.data.is_none());
        assert_eq!(err.error.as_deref(), Some("nope"));
    }
}
