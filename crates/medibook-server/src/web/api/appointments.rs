use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::web::api::middleware::AuthUser;
use crate::web::api::{created, ok, parse_uuid};
use crate::workflow::{self, BookingRequest, UploadedDocument};
use axum::extract::{Multipart, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use medibook_common::{AppointmentStatus, DoctorSnapshot, PatientSnapshot};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct UserIdQuery {
    #[serde(rename = "userId")]
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
pub struct AppointIdQuery {
    #[serde(rename = "appointId")]
    pub appoint_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdateRequest {
    #[allow(dead_code)]
    pub user_id: Option<String>,
    pub appointment_id: String,
    pub status: String,
}

/// POST /api/booking -- multipart: userId, doctorId, date, userInfo,
/// doctorInfo, optional document file.
#[tracing::instrument(skip(state, multipart))]
pub async fn book(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    mut multipart: Multipart,
) -> ApiResult<Response> {
    let mut user_id = None;
    let mut doctor_id = None;
    let mut date = None;
    let mut user_info = None;
    let mut doctor_info = None;
    let mut document = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(format!("Invalid multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "userId" => user_id = Some(read_text(field, "userId").await?),
            "doctorId" => doctor_id = Some(read_text(field, "doctorId").await?),
            "date" => date = Some(read_text(field, "date").await?),
            "userInfo" => user_info = Some(read_text(field, "userInfo").await?),
            "doctorInfo" => doctor_info = Some(read_text(field, "doctorInfo").await?),
            "document" => {
                let file_name = field.file_name().unwrap_or("document").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::Validation(format!("Invalid document upload: {}", e)))?;
                document = Some(UploadedDocument {
                    file_name,
                    bytes: bytes.to_vec(),
                });
            }
            _ => {}
        }
    }

    let user_id = require_field(user_id, "userId")?;
    let doctor_id = require_field(doctor_id, "doctorId")?;
    let date = require_field(date, "date")?;
    let user_info = require_field(user_info, "userInfo")?;
    let doctor_info = require_field(doctor_info, "doctorInfo")?;

    let patient_info: PatientSnapshot = serde_json::from_str(&user_info)
        .map_err(|_| ApiError::Validation("Invalid userInfo".to_string()))?;
    let doctor_info: DoctorSnapshot = serde_json::from_str(&doctor_info)
        .map_err(|_| ApiError::Validation("Invalid doctorInfo".to_string()))?;

    let request = BookingRequest {
        patient_id: parse_uuid(&user_id, "userId")?,
        doctor_id: parse_uuid(&doctor_id, "doctorId")?,
        date,
        patient_info,
        doctor_info,
        document,
    };

    let appointment = workflow::book(&state, request).await?;
    Ok(created(
        "Appointment booked successfully",
        Some(workflow::appointment_json(&appointment)),
    ))
}

async fn read_text(field: axum::extract::multipart::Field<'_>, name: &str) -> ApiResult<String> {
    field
        .text()
        .await
        .map_err(|e| ApiError::Validation(format!("Invalid {}: {}", name, e)))
}

fn require_field(value: Option<String>, name: &str) -> ApiResult<String> {
    value.ok_or_else(|| ApiError::Validation(format!("{} is required", name)))
}

/// GET /api/user-appointments?userId=
pub async fn user_appointments(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Query(query): Query<UserIdQuery>,
) -> ApiResult<Response> {
    let user_id = parse_uuid(&query.user_id, "userId")?;
    let appointments = workflow::list_for_patient(&state, user_id).await?;
    Ok(ok("All appointments listed", Some(json!(appointments))))
}

/// GET /api/doctor-appointments?userId= -- the id is the doctor's user
/// account, not the directory profile.
pub async fn doctor_appointments(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Query(query): Query<UserIdQuery>,
) -> ApiResult<Response> {
    let user_id = parse_uuid(&query.user_id, "userId")?;
    let appointments = workflow::list_for_doctor(&state, user_id).await?;
    Ok(ok("All appointments listed", Some(json!(appointments))))
}

/// GET /api/user-documents?userId=
pub async fn user_documents(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Query(query): Query<UserIdQuery>,
) -> ApiResult<Response> {
    let user_id = parse_uuid(&query.user_id, "userId")?;
    let documents = workflow::list_documents(&state, user_id).await?;
    let message = if documents.is_empty() {
        "No documents"
    } else {
        "All documents listed"
    };
    Ok(ok(message, Some(json!(documents))))
}

/// POST /api/status-update
#[tracing::instrument(skip(state, req))]
pub async fn status_update(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Json(req): Json<StatusUpdateRequest>,
) -> ApiResult<Response> {
    let appointment_id = parse_uuid(&req.appointment_id, "appointmentId")?;
    let status = AppointmentStatus::parse(&req.status)
        .ok_or_else(|| ApiError::Validation("Invalid appointment status".to_string()))?;

    let appointment = workflow::set_status(&state, appointment_id, status).await?;
    Ok(ok(
        "Appointment status updated",
        Some(workflow::appointment_json(&appointment)),
    ))
}

/// GET /api/document-download?appointId= -- binary stream with the stored
/// filename in Content-Disposition.
pub async fn document_download(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Query(query): Query<AppointIdQuery>,
) -> ApiResult<Response> {
    let appointment_id = parse_uuid(&query.appoint_id, "appointId")?;
    let (filename, bytes) = workflow::fetch_document(&state, appointment_id).await?;

    let headers = [
        (
            header::CONTENT_TYPE,
            "application/octet-stream".to_string(),
        ),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        ),
    ];
    Ok((headers, bytes).into_response())
}
