use crate::directory::{self, DoctorApplication};
use crate::error::ApiResult;
use crate::state::AppState;
use crate::web::api::middleware::AuthUser;
use crate::web::api::{created, ok, parse_uuid};
use axum::extract::State;
use axum::response::Response;
use axum::Json;
use medibook_db::DoctorRow;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorApplicationRequest {
    pub user_id: String,
    pub doctor: DoctorApplication,
}

fn doctor_json(doctor: &DoctorRow) -> Value {
    json!({
        "id": doctor.doctor_id,
        "userId": doctor.user_id,
        "fullName": doctor.full_name,
        "email": doctor.email,
        "phone": doctor.phone,
        "address": doctor.address,
        "specialization": doctor.specialization,
        "experience": doctor.experience,
        "fees": doctor.fees,
        "status": doctor.status,
        "createdAt": doctor.created_at,
    })
}

/// POST /api/doctor-application
#[tracing::instrument(skip(state, req))]
pub async fn doctor_application(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Json(req): Json<DoctorApplicationRequest>,
) -> ApiResult<Response> {
    let user_id = parse_uuid(&req.user_id, "userId")?;
    let doctor = directory::apply(&state, user_id, req.doctor).await?;
    Ok(created(
        "Doctor registration request sent successfully",
        Some(doctor_json(&doctor)),
    ))
}

/// GET /api/approved-doctors
pub async fn approved_doctors(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
) -> ApiResult<Response> {
    let doctors = directory::list_approved(&state).await?;
    let data: Vec<Value> = doctors.iter().map(doctor_json).collect();
    Ok(ok("Doctor Users data list", Some(json!(data))))
}
