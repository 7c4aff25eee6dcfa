//! JSON extractor with request validation
//!
//! `ValidatedJson<T>` deserializes a JSON body like `axum::Json<T>` and then
//! runs the `validator` rules declared on `T`. Malformed JSON yields a 400;
//! a rule violation yields a 422 listing each offending field.

use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use validator::Validate;

use super::ApiResponse;

pub struct ValidatedJson<T>(pub T);

pub enum ValidatedJsonRejection {
    Json(JsonRejection),
    Rules(validator::ValidationErrors),
}

impl IntoResponse for ValidatedJsonRejection {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Json(rejection) => (
                StatusCode::BAD_REQUEST,
                format!("Invalid JSON: {}", rejection),
            ),
            Self::Rules(errors) => {
                let mut parts = Vec::new();
                for (field, field_errors) in errors.field_errors() {
                    for error in field_errors {
                        match &error.message {
                            Some(message) => parts.push(format!("{}: {}", field, message)),
                            None => parts.push(format!("{}: {:?}", field, error.code)),
                        }
                    }
                }
                if parts.is_empty() {
                    parts.push("Validation failed".to_string());
                }
                (StatusCode::UNPROCESSABLE_ENTITY, parts.join("; "))
            }
        };

        (status, Json(ApiResponse::<()>::error(message))).into_response()
    }
}

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidatedJsonRejection;

    async fn from_request(req: axum::extract::Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(ValidatedJsonRejection::Json)?;

        value.validate().map_err(ValidatedJsonRejection::Rules)?;

        Ok(ValidatedJson(value))
    }
}

// ── Tests ──────────────────────────────────────────────────────
