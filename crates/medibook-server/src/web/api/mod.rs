pub mod appointments;
pub mod auth;
pub mod doctors;
pub mod middleware;
pub mod notifications;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{routing::get, routing::post, Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;

pub fn build_api_routes(state: Arc<AppState>) -> Router {
    Router::new()
        // Auth routes
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::me))
        // Appointment routes
        .route("/booking", post(appointments::book))
        .route("/user-appointments", get(appointments::user_appointments))
        .route("/doctor-appointments", get(appointments::doctor_appointments))
        .route("/status-update", post(appointments::status_update))
        .route("/document-download", get(appointments::document_download))
        .route("/user-documents", get(appointments::user_documents))
        // Doctor directory routes
        .route("/doctor-application", post(doctors::doctor_application))
        .route("/approved-doctors", get(doctors::approved_doctors))
        // Notification mailbox routes
        .route("/notifications/mark-seen", post(notifications::mark_seen))
        .route("/notifications/clear", post(notifications::clear))
        .with_state(state)
}

fn respond(status: StatusCode, message: &str, data: Option<Value>) -> Response {
    let mut body = json!({ "success": true, "message": message });
    if let Some(data) = data {
        body["data"] = data;
    }
    (status, Json(body)).into_response()
}

/// 200 envelope.
pub(crate) fn ok(message: &str, data: Option<Value>) -> Response {
    respond(StatusCode::OK, message, data)
}

/// 201 envelope, used when a new entity was created.
pub(crate) fn created(message: &str, data: Option<Value>) -> Response {
    respond(StatusCode::CREATED, message, data)
}

/// Parse a caller-supplied id; malformed input is a validation error, not
/// a lookup miss.
pub(crate) fn parse_uuid(value: &str, field: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(value).map_err(|_| ApiError::Validation(format!("Invalid {}", field)))
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_ok_envelope_without_data() {
        let response = ok("All good", None);
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "All good");
        assert!(body.get("data").is_none());
    }

    #[tokio::test]
    async fn test_created_envelope_with_data() {
        let response = created("Made it", Some(json!({"id": 7})));
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["id"], 7);
    }

    #[test]
    fn test_parse_uuid_rejects_garbage() {
        let err = parse_uuid("not-a-uuid", "userId").unwrap_err();
        assert!(matches!(err, ApiError::Validation(msg) if msg == "Invalid userId"));
    }
}
