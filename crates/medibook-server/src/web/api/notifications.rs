use crate::error::ApiResult;
use crate::state::AppState;
use crate::web::api::middleware::AuthUser;
use crate::web::api::{ok, parse_uuid};
use axum::extract::State;
use axum::response::Response;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct MailboxRequest {
    #[serde(rename = "userId")]
    pub user_id: String,
}

/// POST /api/notifications/mark-seen
#[tracing::instrument(skip(state, req))]
pub async fn mark_seen(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Json(req): Json<MailboxRequest>,
) -> ApiResult<Response> {
    let user_id = parse_uuid(&req.user_id, "userId")?;
    let (unseen, seen) = state.mailbox.mark_all_seen(user_id).await?;
    Ok(ok(
        "All notifications marked as read",
        Some(json!({ "notifications": unseen, "seenNotifications": seen })),
    ))
}

/// POST /api/notifications/clear
#[tracing::instrument(skip(state, req))]
pub async fn clear(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Json(req): Json<MailboxRequest>,
) -> ApiResult<Response> {
    let user_id = parse_uuid(&req.user_id, "userId")?;
    let (unseen, seen) = state.mailbox.clear_all(user_id).await?;
    Ok(ok(
        "Notifications deleted",
        Some(json!({ "notifications": unseen, "seenNotifications": seen })),
    ))
}
