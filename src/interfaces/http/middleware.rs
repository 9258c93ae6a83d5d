//! Capability middleware for Axum
//!
//! The platform gateway authenticates callers and forwards the resolved
//! role in `X-Caller-Role`. Each route is layered with its operation;
//! the single capability table in `application::access` decides.

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::application::access::{is_allowed, CallerRole, Operation};
use crate::interfaces::http::common::ApiResponse;

/// Header carrying the resolved caller role
pub const CALLER_ROLE_HEADER: &str = "x-caller-role";

/// Enforce the capability table for one operation.
///
/// Missing header → 401; unknown role or insufficient capability → 403.
/// The parsed role is stored in request extensions for handlers that
/// care who called.
pub async fn capability_middleware(
    State(operation): State<Operation>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let Some(header) = request
        .headers()
        .get(CALLER_ROLE_HEADER)
        .and_then(|v| v.to_str().ok())
    else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::<()>::error("missing X-Caller-Role header")),
        )
            .into_response();
    };

    let role = match CallerRole::parse(header) {
        Ok(role) => role,
        Err(_) => {
            return (
                StatusCode::FORBIDDEN,
                Json(ApiResponse::<()>::error(format!(
                    "unknown caller role '{header}'"
                ))),
            )
                .into_response();
        }
    };

    if !is_allowed(operation, role) {
        return (
            StatusCode::FORBIDDEN,
            Json(ApiResponse::<()>::error(format!(
                "role '{}' may not perform this operation",
                role.as_str()
            ))),
        )
            .into_response();
    }

    request.extensions_mut().insert(role);
    next.run(request).await
}

// ── Tests ──────────────────────────────────────────────────────
