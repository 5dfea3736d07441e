use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use salesdesk_infra::SalesError;

pub fn sales_error_to_response(err: SalesError) -> axum::response::Response {
    let message = err.to_string();
    match err {
        SalesError::InvalidAmount => json_error(StatusCode::BAD_REQUEST, "invalid_amount", message),
        SalesError::UserNotFound(_) => json_error(StatusCode::BAD_REQUEST, "user_not_found", message),
        SalesError::InvalidStatus(_) => json_error(StatusCode::BAD_REQUEST, "invalid_status", message),
        SalesError::EmptyIdentifier => json_error(StatusCode::BAD_REQUEST, "invalid_id", message),
        SalesError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", message),
        SalesError::InvalidTransition { .. } => {
            json_error(StatusCode::CONFLICT, "invalid_transition", message)
        }
        SalesError::VersionConflict(_) => json_error(StatusCode::CONFLICT, "conflict", message),
        SalesError::UserValidation(_) => {
            json_error(StatusCode::BAD_GATEWAY, "user_validation_failed", message)
        }
        SalesError::Persistence(_) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "persistence_error", message)
        }
    }
}

/// Malformed or mistyped request bodies are the caller's fault.
pub fn json_rejection_to_response(rejection: JsonRejection) -> axum::response::Response {
    tracing::warn!(error = %rejection.body_text(), "invalid request payload");
    json_error(StatusCode::BAD_REQUEST, "invalid_payload", rejection.body_text())
}

pub fn query_rejection_to_response(rejection: QueryRejection) -> axum::response::Response {
    json_error(StatusCode::BAD_REQUEST, "invalid_query", rejection.body_text())
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
