use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Request-level error taxonomy. Every failure is terminal for its request;
/// nothing is retried.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed caller input.
    #[error("{0}")]
    Validation(String),

    /// A caller-referenced entity does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The admin singleton is absent. An operational precondition, not
    /// something the caller can remedy.
    #[error("Admin user not found")]
    AdminMissing,

    /// Storage or other unexpected failure. Surfaced as an opaque 500.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::NotFound(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::AdminMissing => (StatusCode::NOT_FOUND, "Admin user not found".to_string()),
            ApiError::Internal(e) => {
                tracing::error!("Internal error: {:#}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong".to_string(),
                )
            }
        };
        (status, Json(json!({ "success": false, "message": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_validation_is_400() {
        let response = ApiError::Validation("date is required".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "date is required");
    }

    #[tokio::test]
    async fn test_not_found_is_400() {
        // Caller-input not-found maps to 400, not 404
        let response = ApiError::NotFound("Doctor not found".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Doctor not found");
    }

    #[tokio::test]
    async fn test_admin_missing_is_404() {
        let response = ApiError::AdminMissing.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Admin user not found");
    }

    #[tokio::test]
    async fn test_internal_is_opaque_500() {
        let response = ApiError::Internal(anyhow::anyhow!("connection refused")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Something went wrong");
        assert_eq!(body["success"], false);
    }
}
