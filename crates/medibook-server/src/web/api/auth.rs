use crate::auth::{create_access_token, hash_password, verify_password};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::web::api::middleware::AuthUser;
use crate::web::api::{created, ok, parse_uuid};
use axum::extract::State;
use axum::response::Response;
use axum::Json;
use medibook_common::Role;
use medibook_db::{UserRepo, UserRow};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Account shape returned to clients. Never includes the password hash.
fn user_json(user: &UserRow) -> Value {
    json!({
        "id": user.user_id,
        "fullName": user.full_name,
        "email": user.email,
        "role": user.role,
        "notifications": user.notifications.0,
        "seenNotifications": user.seen_notifications.0,
        "createdAt": user.created_at,
    })
}

/// POST /api/auth/register
#[tracing::instrument(skip(state, req))]
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<Response> {
    if req.full_name.trim().is_empty() {
        return Err(ApiError::Validation("fullName is required".to_string()));
    }
    if req.email.trim().is_empty() {
        return Err(ApiError::Validation("email is required".to_string()));
    }
    if req.password.is_empty() {
        return Err(ApiError::Validation("password is required".to_string()));
    }

    // Self-registration only ever creates patient or doctor accounts; the
    // admin is seeded out of band.
    let role = match req.role.as_deref() {
        None | Some("patient") => Role::Patient,
        Some("doctor") => Role::Doctor,
        Some(_) => return Err(ApiError::Validation("Invalid role".to_string())),
    };

    if UserRepo::get_by_email(&state.pool, &req.email).await?.is_some() {
        return Err(ApiError::Validation("User already exists".to_string()));
    }

    let password_hash = hash_password(&req.password)?;
    let user_id = Uuid::new_v4();
    UserRepo::create(
        &state.pool,
        user_id,
        &req.full_name,
        &req.email,
        &password_hash,
        role.as_str(),
    )
    .await?;

    tracing::info!(user_id = %user_id, "User registered");
    Ok(created("Register success", None))
}

/// POST /api/auth/login
#[tracing::instrument(skip(state, req))]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Response> {
    let user = UserRepo::get_by_email(&state.pool, &req.email)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    if !verify_password(&req.password, &user.password_hash)? {
        return Err(ApiError::Validation(
            "Invalid email or password".to_string(),
        ));
    }

    let token = create_access_token(
        &user.user_id.to_string(),
        &user.email,
        &state.config.auth.jwt_secret,
    )?;

    Ok(ok(
        "Login successful",
        Some(json!({ "token": token, "user": user_json(&user) })),
    ))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
) -> ApiResult<Response> {
    let user_id = parse_uuid(&claims.sub, "userId")?;
    let user = UserRepo::get_by_id(&state.pool, user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;
    Ok(ok("User data", Some(user_json(&user))))
}
