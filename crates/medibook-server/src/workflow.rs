use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use anyhow::Context;
use medibook_common::{AppointmentStatus, DoctorSnapshot, Notification, PatientSnapshot};
use medibook_db::{AppointmentRepo, AppointmentRow, DoctorRepo, DoctorRow, NewAppointment, UserRepo};
use serde_json::{json, Value};
use uuid::Uuid;

/// Booking input after multipart decoding. Snapshots arrive from the
/// client and are persisted verbatim with the appointment.
#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub date: String,
    pub patient_info: PatientSnapshot,
    pub doctor_info: DoctorSnapshot,
    pub document: Option<UploadedDocument>,
}

#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Book an appointment. The insert is the commit point: the follow-up
/// alert to the doctor's owning user is best-effort and its failure never
/// rolls the booking back.
#[tracing::instrument(skip(state, request), fields(patient_id = %request.patient_id, doctor_id = %request.doctor_id))]
pub async fn book(state: &AppState, request: BookingRequest) -> ApiResult<AppointmentRow> {
    if request.date.trim().is_empty() {
        return Err(ApiError::Validation("date is required".to_string()));
    }

    let patient = UserRepo::get_by_id(&state.pool, request.patient_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;
    let doctor = DoctorRepo::get(&state.pool, request.doctor_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Doctor not found".to_string()))?;

    let (document_filename, document_path) = match &request.document {
        Some(upload) => {
            let stored = state.documents.save(&upload.file_name, &upload.bytes).await?;
            (Some(stored.filename), Some(stored.path))
        }
        None => (None, None),
    };

    let appointment = NewAppointment {
        appointment_id: Uuid::new_v4(),
        patient_id: patient.user_id,
        doctor_id: doctor.doctor_id,
        patient_info: request.patient_info,
        doctor_info: request.doctor_info,
        date: request.date,
        document_filename,
        document_path,
    };
    AppointmentRepo::create(&state.pool, &appointment).await?;

    tracing::info!(appointment_id = %appointment.appointment_id, "Appointment booked");

    notify_doctor_of_booking(state, &doctor, &appointment.patient_info.full_name).await;

    AppointmentRepo::get(&state.pool, appointment.appointment_id)
        .await?
        .context("Appointment missing after insert")
        .map_err(ApiError::from)
}

/// Alert the user account behind the doctor profile. Any failure here is
/// logged and swallowed; the appointment row is already committed.
async fn notify_doctor_of_booking(state: &AppState, doctor: &DoctorRow, patient_name: &str) {
    match UserRepo::get_by_id(&state.pool, doctor.user_id).await {
        Ok(Some(owner)) => {
            if let Err(e) = state
                .mailbox
                .enqueue(owner.user_id, Notification::new_appointment(patient_name))
                .await
            {
                tracing::warn!(
                    doctor_id = %doctor.doctor_id,
                    "Failed to notify doctor of new appointment: {}",
                    e
                );
            }
        }
        Ok(None) => {
            tracing::warn!(
                doctor_id = %doctor.doctor_id,
                user_id = %doctor.user_id,
                "Doctor profile has no owning user; skipping booking alert"
            );
        }
        Err(e) => {
            tracing::warn!(
                doctor_id = %doctor.doctor_id,
                "Failed to load doctor's owning user: {:#}",
                e
            );
        }
    }
}

/// Re-persist an appointment's status and alert the patient. A repeat call
/// with the current status writes the same value again and re-alerts.
#[tracing::instrument(skip(state))]
pub async fn set_status(
    state: &AppState,
    appointment_id: Uuid,
    status: AppointmentStatus,
) -> ApiResult<AppointmentRow> {
    let appointment = AppointmentRepo::get(&state.pool, appointment_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Appointment not found".to_string()))?;

    AppointmentRepo::set_status(&state.pool, appointment_id, status.as_str()).await?;

    if let Err(e) = state
        .mailbox
        .enqueue(
            appointment.patient_id,
            Notification::appointment_status(appointment_id, status.as_str()),
        )
        .await
    {
        tracing::warn!(
            appointment_id = %appointment_id,
            "Failed to notify patient of status change: {}",
            e
        );
    }

    AppointmentRepo::get(&state.pool, appointment_id)
        .await?
        .context("Appointment missing after status update")
        .map_err(ApiError::from)
}

/// List a patient's appointments, each enriched with the doctor's current
/// directory name under `docName`.
pub async fn list_for_patient(state: &AppState, patient_id: Uuid) -> ApiResult<Vec<Value>> {
    let appointments = AppointmentRepo::list_for_patient(&state.pool, patient_id).await?;

    let mut doctor_ids: Vec<Uuid> = appointments.iter().map(|a| a.doctor_id).collect();
    doctor_ids.sort_unstable();
    doctor_ids.dedup();
    let doctors = DoctorRepo::list_by_ids(&state.pool, &doctor_ids).await?;

    Ok(attach_doctor_names(&appointments, &doctors))
}

/// List the appointments booked against the doctor profile owned by a
/// user account.
pub async fn list_for_doctor(state: &AppState, owner_user_id: Uuid) -> ApiResult<Vec<Value>> {
    let doctor = DoctorRepo::get_by_user_id(&state.pool, owner_user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Doctor profile not found".to_string()))?;
    let appointments = AppointmentRepo::list_for_doctor(&state.pool, doctor.doctor_id).await?;
    Ok(appointments.iter().map(appointment_json).collect())
}

/// List the document descriptors attached to a patient's appointments,
/// in insertion order. Document-less appointments contribute nothing.
pub async fn list_documents(state: &AppState, patient_id: Uuid) -> ApiResult<Vec<Value>> {
    let appointments = AppointmentRepo::list_for_patient(&state.pool, patient_id).await?;
    Ok(appointments
        .iter()
        .filter_map(|appointment| {
            match (&appointment.document_filename, &appointment.document_path) {
                (Some(filename), Some(path)) => Some(json!({
                    "appointmentId": appointment.appointment_id,
                    "filename": filename,
                    "path": path,
                    "date": appointment.date,
                })),
                _ => None,
            }
        })
        .collect())
}

/// Fetch an appointment's attached document for download.
pub async fn fetch_document(
    state: &AppState,
    appointment_id: Uuid,
) -> ApiResult<(String, Vec<u8>)> {
    let appointment = AppointmentRepo::get(&state.pool, appointment_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Appointment not found".to_string()))?;
    let filename = appointment
        .document_filename
        .ok_or_else(|| ApiError::NotFound("No document attached to this appointment".to_string()))?;
    let bytes = state
        .documents
        .read(&filename)
        .await?
        .ok_or_else(|| ApiError::NotFound("Document file not found".to_string()))?;
    Ok((filename, bytes))
}

/// Join appointments with the current directory names of their doctors.
/// A doctor deleted from the directory yields an empty `docName`.
fn attach_doctor_names(appointments: &[AppointmentRow], doctors: &[DoctorRow]) -> Vec<Value> {
    appointments
        .iter()
        .map(|appointment| {
            let doc_name = doctors
                .iter()
                .find(|d| d.doctor_id == appointment.doctor_id)
                .map(|d| d.full_name.as_str())
                .unwrap_or("");
            let mut value = appointment_json(appointment);
            value["docName"] = json!(doc_name);
            value
        })
        .collect()
}

/// Client-facing shape of one appointment.
pub fn appointment_json(appointment: &AppointmentRow) -> Value {
    json!({
        "id": appointment.appointment_id,
        "userId": appointment.patient_id,
        "doctorId": appointment.doctor_id,
        "userInfo": appointment.patient_info.0,
        "doctorInfo": appointment.doctor_info.0,
        "date": appointment.date,
        "document": match (&appointment.document_filename, &appointment.document_path) {
            (Some(filename), Some(path)) => json!({ "filename": filename, "path": path }),
            _ => Value::Null,
        },
        "status": appointment.status,
        "createdAt": appointment.created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sqlx::types::Json;

    fn row(doctor_id: Uuid) -> AppointmentRow {
        AppointmentRow {
            appointment_id: Uuid::new_v4(),
            patient_id: Uuid::new_v4(),
            doctor_id,
            patient_info: Json(PatientSnapshot {
                full_name: "Jane Roe".to_string(),
                email: None,
                phone: None,
            }),
            doctor_info: Json(DoctorSnapshot {
                full_name: "Dr. Lee".to_string(),
                email: None,
                phone: None,
            }),
            date: "2026-09-01 10:00".to_string(),
            document_filename: None,
            document_path: None,
            status: "pending".to_string(),
            created_at: Utc::now(),
        }
    }

    fn doctor(doctor_id: Uuid, name: &str) -> DoctorRow {
        DoctorRow {
            doctor_id,
            user_id: Uuid::new_v4(),
            full_name: name.to_string(),
            email: "d@clinic.test".to_string(),
            phone: "555".to_string(),
            address: "1 Clinic Way".to_string(),
            specialization: "gp".to_string(),
            experience: "5 years".to_string(),
            fees: 50.0,
            status: "approved".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_attach_doctor_names_matches_by_id() {
        let doctor_id = Uuid::new_v4();
        let values = attach_doctor_names(&[row(doctor_id)], &[doctor(doctor_id, "Dr. Strange")]);
        assert_eq!(values.len(), 1);
        assert_eq!(values[0]["docName"], "Dr. Strange");
    }

    #[test]
    fn test_attach_doctor_names_missing_doctor_is_empty() {
        let values = attach_doctor_names(&[row(Uuid::new_v4())], &[]);
        assert_eq!(values[0]["docName"], "");
    }

    #[test]
    fn test_appointment_json_shape() {
        let mut appointment = row(Uuid::new_v4());
        appointment.document_filename = Some("abc_report.pdf".to_string());
        appointment.document_path = Some("/uploads/abc_report.pdf".to_string());

        let value = appointment_json(&appointment);
        assert_eq!(value["userInfo"]["fullName"], "Jane Roe");
        assert_eq!(value["doctorInfo"]["fullName"], "Dr. Lee");
        assert_eq!(value["status"], "pending");
        assert_eq!(value["document"]["filename"], "abc_report.pdf");
        assert_eq!(value["document"]["path"], "/uploads/abc_report.pdf");
    }

    #[test]
    fn test_appointment_json_no_document_is_null() {
        let value = appointment_json(&row(Uuid::new_v4()));
        assert!(value["document"].is_null());
    }
}
