use crate::auth::validate_access_token;
use crate::state::AppState;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use medibook_common::Claims;
use serde_json::json;
use std::sync::Arc;

/// Extractor that validates a JWT Bearer token and provides the claims.
/// Operation routing still uses the ids supplied in the request body or
/// query; the token only gates access.
#[derive(Debug)]
pub struct AuthUser(pub Claims);

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "success": false, "message": message })),
    )
        .into_response()
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());

        let token = match auth_header {
            Some(val) => match val.strip_prefix("Bearer ") {
                Some(t) => t,
                None => return Err(unauthorized("Invalid authorization header format")),
            },
            None => return Err(unauthorized("Missing authorization header")),
        };

        match validate_access_token(token, &state.config.auth.jwt_secret) {
            Ok(claims) => Ok(AuthUser(claims)),
            Err(_) => Err(unauthorized("Invalid or expired token")),
        }
    }
}
