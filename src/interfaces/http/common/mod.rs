//! Common API types: response envelope and error mapping

pub mod validated_json;

pub use validated_json::ValidatedJson;

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::DomainError;

/// Standard response envelope.
///
/// Every REST endpoint wraps its payload in this shape.
/// On success: `{"success": true, "data": {...}}`,
/// on failure: `{"success": false, "error": "description"}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// `true` when the request succeeded
    pub success: bool,
    /// Payload, `null` on failure
    pub data: Option<T>,
    /// Error description, `null` on success
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

/// HTTP status for a domain error.
pub fn error_status(error: &DomainError) -> StatusCode {
    match error {
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::Conflict(_) => StatusCode::CONFLICT,
        DomainError::InvalidState(_) | DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        DomainError::Forbidden(_) => StatusCode::FORBIDDEN,
        DomainError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Map a domain error onto the handler error shape, surfacing the message
/// verbatim.
pub fn domain_error<T>(error: DomainError) -> (StatusCode, Json<ApiResponse<T>>) {
    (
        error_status(&error),
        Json(ApiResponse::error(error.to_string())),
    )
}

/// 403 with a fixed message, for access-policy denials.
pub fn forbidden<T>() -> (StatusCode, Json<ApiResponse<T>>) {
    (
        StatusCode::FORBIDDEN,
        Json(ApiResponse::error("Access denied")),
    )
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_the_error_taxonomy() {
        let cases = [
            (
                DomainError::not_found("Event", "id", "x"),
                StatusCode::NOT_FOUND,
            ),
            (
                DomainError::Conflict("dup".into()),
                StatusCode::CONFLICT,
            ),
            (
                DomainError::InvalidState("full".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                DomainError::Validation("bad".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                DomainError::Unauthorized("nope".into()),
                StatusCode::UNAUTHORIZED,
            ),
            (
                DomainError::Forbidden("nope".into()),
                StatusCode::FORBIDDEN,
            ),
            (
                DomainError::Unexpected("boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (error, expected) in cases {
            assert_eq!(error_status(&error), expected);
        }
    }

    #[test]
    fn error_messages_are_surfaced_verbatim() {
        let (_, body) =
            domain_error::<()>(DomainError::InvalidState("Event is at full capacity".into()));
        assert_eq!(body.0.error.as_deref(), Some("Event is at full capacity"));
        assert!(!body.0.success);
    }
}
